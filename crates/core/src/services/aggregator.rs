//! Paginated aggregation over the entity provider.
//!
//! Collects every entity of a collection by requesting successive
//! ranges `[from, from + page_size - 1]` until the provider runs dry.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::error::{AggregateError, AggregateResult};
use crate::metrics::{AggregationTimer, record_entities_aggregated, record_page_fetched};
use crate::models::TableEntity;
use crate::ports::{AggregateQuery, EntityProvider, PageRange, PageRequest};

// =============================================================================
// Configuration
// =============================================================================

/// Safety limits for a single aggregation.
///
/// The provider is trusted to eventually return a short page. These caps
/// turn a misbehaving provider into an error instead of an endless loop.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Maximum number of page requests per aggregation. Must be at least 1.
    pub max_pages: u32,
    /// Maximum number of entities per aggregation.
    pub max_items: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_pages: 1_000,
            max_items: 100_000,
        }
    }
}

// =============================================================================
// PaginatedAggregator
// =============================================================================

/// Concatenates all pages of a collection into one ordered sequence.
///
/// # Termination
///
/// The loop stops after a page that is shorter than requested, or after
/// a page that carries no continuation token, whichever comes first.
///
/// # Failure
///
/// Aggregation is all-or-nothing. A failing page request drops every item
/// collected so far and returns [`AggregateError::ProviderRequestFailed`].
/// Pages are fetched strictly one after another and never retried.
pub struct PaginatedAggregator<P: EntityProvider + ?Sized> {
    config: AggregatorConfig,
    provider: Arc<P>,
}

impl<P: EntityProvider + ?Sized> PaginatedAggregator<P> {
    pub fn new(config: AggregatorConfig, provider: Arc<P>) -> Self {
        Self { config, provider }
    }

    /// Safety limits in effect.
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Fetch every entity of `query.collection_id`.
    #[instrument(skip_all, fields(collection = %query.collection_id, page_size = query.page_size))]
    pub async fn aggregate(&self, query: &AggregateQuery) -> AggregateResult<Vec<TableEntity>> {
        validate_query(query)?;
        if self.config.max_pages == 0 {
            return Err(AggregateError::InvalidArgument(
                "max_pages must be at least 1".into(),
            ));
        }

        let _timer = AggregationTimer::new();
        let page_size = u64::from(query.page_size);
        let mut range = PageRange::first(query.page_size)?;
        let mut entities = Vec::new();
        let mut pages = 0u32;

        loop {
            if pages >= self.config.max_pages {
                warn!(
                    pages,
                    fetched = entities.len(),
                    "⚠️  Page limit reached, provider keeps signalling more data"
                );
                return Err(AggregateError::LimitExceeded {
                    collection_id: query.collection_id.clone(),
                    limit: format!("more than {} pages", self.config.max_pages),
                });
            }

            let request = PageRequest {
                collection_id: query.collection_id.clone(),
                range,
                sort_key: query.sort_key.clone(),
                filter: query.filter.clone(),
            };

            let page = self
                .provider
                .table_entities(&request)
                .await
                .map_err(|source| {
                    warn!(range = %range, error = %source, "⚠️  Page request failed");
                    AggregateError::ProviderRequestFailed {
                        collection_id: query.collection_id.clone(),
                        range,
                        source,
                    }
                })?;

            pages += 1;
            record_page_fetched();

            let received = page.items.len();
            let has_next = page.has_next_page();
            debug!(
                from = range.from,
                to = range.to,
                received,
                total = ?page.total_count,
                has_next,
                "Page fetched"
            );

            entities.extend(page.items);

            if entities.len() > self.config.max_items {
                warn!(
                    pages,
                    fetched = entities.len(),
                    "⚠️  Item limit exceeded"
                );
                return Err(AggregateError::LimitExceeded {
                    collection_id: query.collection_id.clone(),
                    limit: format!("more than {} items", self.config.max_items),
                });
            }

            if (received as u64) < page_size || !has_next {
                break;
            }

            range = range.next();
        }

        record_entities_aggregated(entities.len());
        debug!(pages, entities = entities.len(), "Aggregation complete");

        Ok(entities)
    }
}

/// Reject malformed queries before any provider call.
fn validate_query(query: &AggregateQuery) -> AggregateResult<()> {
    if query.collection_id.trim().is_empty() {
        return Err(AggregateError::InvalidArgument(
            "collection id is required".into(),
        ));
    }
    if query.page_size == 0 {
        return Err(AggregateError::InvalidArgument(
            "page size must be positive".into(),
        ));
    }
    if query.sort_key.trim().is_empty() {
        return Err(AggregateError::InvalidArgument(
            "sort key is required".into(),
        ));
    }
    Ok(())
}
