//! GraphQL API for Canopy.
//!
//! Provides the request layer the frontend uses to browse trees of
//! values and table entities.
//!
//! # Queries
//!
//! - `treeOfValues(tableId, fieldId)`
//! - `tableEntities(tableId, from, to, sortBy, filter)` - one provider page
//! - `allTableEntities(tableId, pageSize, sortBy, filter)` - every page, concatenated
//!
//! # Building the Schema
//!
//! ```ignore
//! use canopy_graphql::{build_schema, QueryDefaults};
//!
//! let provider: Arc<dyn EntityProvider> = Arc::new(HttpEntityProvider::new(config)?);
//! let schema = build_schema(provider, AggregatorConfig::default(), QueryDefaults::default());
//! ```

mod schema;
mod server;
mod types;

pub use schema::{
    MAX_QUERY_COMPLEXITY, MAX_QUERY_DEPTH, Query, QueryDefaults, SharedAggregator, build_schema,
};
pub use server::{ServerConfig, router, serve_with_shutdown};
pub use types::CanopySchema;
