//! Port trait for the tree entities data provider.
//!
//! This trait defines the interface for fetching trees of values and
//! pages of table entities. Implementations live in the infrastructure
//! layer (e.g., `canopy-provider`).

use async_trait::async_trait;

use crate::error::ProviderResult;
use crate::models::{TableEntity, TreeOfValues};

use super::pagination::{PageRequest, PageResponse};

/// Port trait for the external data provider.
///
/// Implementations own transport concerns (timeouts, connection pooling).
/// Callers never retry through this trait.
#[async_trait]
pub trait EntityProvider: Send + Sync {
    /// Fetch the tree of values of a table field.
    async fn tree_of_values(&self, table_id: &str, field_id: &str)
    -> ProviderResult<TreeOfValues>;

    /// Fetch one page of table entities.
    async fn table_entities(
        &self,
        request: &PageRequest,
    ) -> ProviderResult<PageResponse<TableEntity>>;
}
