//! Mock tree entities provider for Canopy.
//!
//! Serves the same REST routes as the real provider with generated,
//! deterministic data. Used by `canopy-mock` for local development and
//! by adapter tests, which bind it to a loopback port.
//!
//! ```ignore
//! use canopy_mock::{router, MockConfig, RequestLog};
//!
//! let log = RequestLog::default();
//! let app = router(MockConfig::default(), log.clone());
//! // serve `app`, run requests, then inspect `log.snapshot().await`
//! ```

pub mod data;
mod server;

pub use server::{MockConfig, RecordedRequest, RequestLog, router, serve_with_shutdown};
