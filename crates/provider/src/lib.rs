//! HTTP adapter for the tree entities data provider.
//!
//! This crate implements the [`EntityProvider`] port from `canopy-core`
//! on top of `reqwest`.
//!
//! # Endpoints
//!
//! - `GET  {base}/v2.0/Tree/TreeOfValues/{table_id}/{field_id}`
//! - `GET  {base}/v3.0/Tree/{table_id}/TableEntities?from=&to=&sort_by=`
//! - `POST` on the same URL with a `{"filter": ...}` body when a filter is set
//!
//! # Usage
//!
//! ```ignore
//! use canopy_provider::{HttpEntityProvider, ProviderConfig};
//!
//! let provider = HttpEntityProvider::new(ProviderConfig {
//!     base_url: "http://localhost:3000".to_string(),
//!     ..Default::default()
//! })?;
//!
//! let tree = provider.tree_of_values("roads", "kind").await?;
//! ```
//!
//! Every request carries the configured timeout. Errors are mapped to
//! [`ProviderError`] and never retried here.
//!
//! [`EntityProvider`]: canopy_core::ports::EntityProvider
//! [`ProviderError`]: canopy_core::error::ProviderError

mod client;
mod endpoints;
mod wire;

pub use client::{HttpEntityProvider, ProviderConfig};
