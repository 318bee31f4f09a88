//! Core domain layer for Canopy.
//!
//! This crate contains the domain models, port traits (interfaces), and
//! business logic services for browsing trees of values and table
//! entities served by an external data provider. It follows hexagonal
//! architecture principles - this is the innermost layer with no
//! dependencies on infrastructure.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      canopy (binary)                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │      canopy-graphql          │        canopy-provider       │
//! │        (API)                 │           (HTTP)             │
//! ├──────────────────────────────┴──────────────────────────────┤
//! │                      canopy-core  ← YOU ARE HERE            │
//! │               (models, ports, services)                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`models`] - Domain models (TableEntity, TreeOfValues, etc.)
//! - [`ports`] - Provider port and pagination types
//! - [`services`] - Core business logic (PaginatedAggregator)
//! - [`error`] - Domain error types
//! - [`metrics`] - Prometheus metrics definitions
//!
//! # Aggregation
//!
//! [`services::PaginatedAggregator`] requests `[1, n]`, `[n + 1, 2n]`, ...
//! from an [`ports::EntityProvider`] and stops after a short page or a page
//! without continuation token. The provider is injected, so one instance is
//! built per process and shared.

pub mod error;
pub mod metrics;
pub mod models;
pub mod ports;
pub mod services;
