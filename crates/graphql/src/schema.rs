//! GraphQL schema definition.
//!
//! This module exposes the tree entities provider to the frontend:
//! trees of values, single pages of table entities, and full
//! collections through the paginated aggregator.

use std::sync::Arc;

use async_graphql::{Context, EmptyMutation, EmptySubscription, Object, Result, Schema};
use tracing::debug;

use canopy_core::ports::{AggregateQuery, EntityProvider, PageRange, PageRequest};
use canopy_core::services::{AggregatorConfig, PaginatedAggregator};

use crate::types::{CanopySchema, TableEntity, TreeOfValues};

// -----------------------------------------------------------------------------
// Schema Configuration
// -----------------------------------------------------------------------------

/// Maximum query depth to prevent deeply nested queries (DoS protection).
/// Note: GraphQL introspection requires depth ~13, so we use 15 to allow it.
pub const MAX_QUERY_DEPTH: usize = 15;

/// Maximum query complexity score (DoS protection).
/// Each field has a default complexity of 1, nested objects multiply.
pub const MAX_QUERY_COMPLEXITY: usize = 500;

/// Defaults and caps applied to entity queries.
#[derive(Debug, Clone)]
pub struct QueryDefaults {
    /// Page size used when `pageSize` is omitted.
    pub default_page_size: u32,
    /// Largest accepted page size.
    pub max_page_size: u32,
    /// Sort field used when `sortBy` is omitted.
    pub default_sort_by: String,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            default_page_size: 100,
            max_page_size: 1000,
            default_sort_by: "CreationTime".to_string(),
        }
    }
}

/// Aggregator type shared through the schema context.
pub type SharedAggregator = PaginatedAggregator<dyn EntityProvider>;

// -----------------------------------------------------------------------------
// Schema Builder
// -----------------------------------------------------------------------------

/// Build the schema around a single provider instance.
///
/// Includes query depth and complexity limits for DoS protection.
pub fn build_schema(
    provider: Arc<dyn EntityProvider>,
    aggregator_config: AggregatorConfig,
    defaults: QueryDefaults,
) -> CanopySchema {
    let aggregator: Arc<SharedAggregator> =
        Arc::new(PaginatedAggregator::new(aggregator_config, provider.clone()));

    Schema::build(Query, EmptyMutation, EmptySubscription)
        .data(provider)
        .data(aggregator)
        .data(defaults)
        .limit_depth(MAX_QUERY_DEPTH)
        .limit_complexity(MAX_QUERY_COMPLEXITY)
        .finish()
}

// -----------------------------------------------------------------------------
// Query
// -----------------------------------------------------------------------------

/// Query root for tree entities.
#[derive(Default)]
pub struct Query;

#[Object]
impl Query {
    /// Liveness probe.
    async fn health(&self) -> &'static str {
        "OK"
    }

    /// Get the tree of values of a table field.
    async fn tree_of_values<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        table_id: String,
        field_id: String,
    ) -> Result<TreeOfValues> {
        validate_id(&table_id, "tableId")?;
        validate_id(&field_id, "fieldId")?;

        let provider = ctx.data::<Arc<dyn EntityProvider>>()?;
        let tree = provider.tree_of_values(&table_id, &field_id).await?;

        Ok(TreeOfValues::from(tree))
    }

    /// Get a single page of table entities.
    async fn table_entities<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        table_id: String,
        #[graphql(default = 1)] from: i32,
        #[graphql(default = 100)] to: i32,
        sort_by: Option<String>,
        filter: Option<String>,
    ) -> Result<Vec<TableEntity>> {
        let defaults = ctx.data::<QueryDefaults>()?;

        validate_id(&table_id, "tableId")?;
        validate_filter(&filter)?;
        let range = validate_range(from, to, defaults.max_page_size)?;
        let sort_key = resolve_sort_key(sort_by, defaults)?;

        let provider = ctx.data::<Arc<dyn EntityProvider>>()?;
        let request = PageRequest {
            collection_id: table_id,
            range,
            sort_key,
            filter,
        };
        let page = provider.table_entities(&request).await?;

        debug!(
            table = %request.collection_id,
            range = %request.range,
            count = page.items.len(),
            "tableEntities"
        );

        Ok(page.items.into_iter().map(TableEntity::from).collect())
    }

    /// Get every entity of a table, fetched page by page.
    async fn all_table_entities<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        table_id: String,
        page_size: Option<i32>,
        sort_by: Option<String>,
        filter: Option<String>,
    ) -> Result<Vec<TableEntity>> {
        let defaults = ctx.data::<QueryDefaults>()?;

        validate_id(&table_id, "tableId")?;
        validate_filter(&filter)?;
        let page_size = validate_page_size(page_size, defaults)?;
        let sort_key = resolve_sort_key(sort_by, defaults)?;

        let aggregator = ctx.data::<Arc<SharedAggregator>>()?;
        let query = AggregateQuery {
            collection_id: table_id,
            page_size,
            sort_key,
            filter,
        };
        let entities = aggregator.aggregate(&query).await?;

        debug!(
            table = %query.collection_id,
            count = entities.len(),
            "allTableEntities"
        );

        Ok(entities.into_iter().map(TableEntity::from).collect())
    }
}

// -----------------------------------------------------------------------------
// Helpers & Validation
// -----------------------------------------------------------------------------

/// Maximum length for table and field identifiers.
const MAX_ID_LENGTH: usize = 128;
/// Maximum length for the opaque filter string.
const MAX_FILTER_LENGTH: usize = 1024;
/// Maximum length for sort field names.
const MAX_SORT_KEY_LENGTH: usize = 64;

/// Validate a required identifier.
fn validate_id(value: &str, field_name: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(async_graphql::Error::new(format!(
            "{field_name} is required"
        )));
    }
    if value.len() > MAX_ID_LENGTH {
        return Err(async_graphql::Error::new(format!(
            "{field_name} too long: maximum {MAX_ID_LENGTH} characters allowed"
        )));
    }
    Ok(())
}

/// Validate the optional filter string.
fn validate_filter(filter: &Option<String>) -> Result<()> {
    if let Some(value) = filter {
        if value.len() > MAX_FILTER_LENGTH {
            return Err(async_graphql::Error::new(format!(
                "filter too long: maximum {MAX_FILTER_LENGTH} characters allowed"
            )));
        }
    }
    Ok(())
}

/// Use the given sort field or the configured default.
fn resolve_sort_key(sort_by: Option<String>, defaults: &QueryDefaults) -> Result<String> {
    let sort_key = sort_by.unwrap_or_else(|| defaults.default_sort_by.clone());

    if sort_key.trim().is_empty() {
        return Err(async_graphql::Error::new("sortBy cannot be empty"));
    }
    if sort_key.len() > MAX_SORT_KEY_LENGTH {
        return Err(async_graphql::Error::new(format!(
            "sortBy too long: maximum {MAX_SORT_KEY_LENGTH} characters allowed"
        )));
    }
    Ok(sort_key)
}

/// Validate `pageSize` against `1..=max_page_size`.
///
/// Out-of-range values are rejected rather than clamped.
fn validate_page_size(page_size: Option<i32>, defaults: &QueryDefaults) -> Result<u32> {
    let Some(size) = page_size else {
        return Ok(defaults.default_page_size);
    };

    match u32::try_from(size) {
        Ok(size) if (1..=defaults.max_page_size).contains(&size) => Ok(size),
        _ => Err(async_graphql::Error::new(format!(
            "pageSize must be between 1 and {}",
            defaults.max_page_size
        ))),
    }
}

/// Validate a `from`/`to` pair into a page range.
fn validate_range(from: i32, to: i32, max_page_size: u32) -> Result<PageRange> {
    let (Ok(from), Ok(to)) = (u64::try_from(from), u64::try_from(to)) else {
        return Err(async_graphql::Error::new("from and to must be positive"));
    };

    let range = PageRange::new(from, to)?;
    if range.size() > u64::from(max_page_size) {
        return Err(async_graphql::Error::new(format!(
            "range too large: maximum {max_page_size} entities per page"
        )));
    }
    Ok(range)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use canopy_core::error::{ProviderError, ProviderResult};
    use canopy_core::models::{
        self, Classification, ExclusiveId, Geo, GeoJsonGeometry, TreeOfValuesNode,
    };
    use canopy_core::ports::PageResponse;

    use super::*;

    /// In-memory provider with a fixed number of entities.
    struct FakeProvider {
        total: u64,
        requests: Mutex<Vec<PageRequest>>,
    }

    impl FakeProvider {
        fn new(total: u64) -> Arc<Self> {
            Arc::new(Self {
                total,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<PageRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EntityProvider for FakeProvider {
        async fn tree_of_values(
            &self,
            table_id: &str,
            field_id: &str,
        ) -> ProviderResult<models::TreeOfValues> {
            if table_id == "missing" {
                return Err(ProviderError::Status {
                    status: 404,
                    url: format!("fake://{table_id}/{field_id}"),
                });
            }
            let leaf = |name: &str| TreeOfValuesNode {
                name: name.into(),
                children: Vec::new(),
            };
            Ok(models::TreeOfValues {
                exclusive_id: ExclusiveId {
                    data_store: "ds".into(),
                    table_id: table_id.into(),
                    entity_id: "e".into(),
                    value_list_id: "vl".into(),
                    tree_of_values_id: "tv".into(),
                    sequence: 1,
                },
                kind: "tree-type".into(),
                name: format!("Tree {table_id}"),
                display_name: format!("Tree {table_id} - {field_id}"),
                tree_of_values: vec![TreeOfValuesNode {
                    name: "root".into(),
                    children: vec![leaf("a"), leaf("b")],
                }],
            })
        }

        async fn table_entities(
            &self,
            request: &PageRequest,
        ) -> ProviderResult<PageResponse<models::TableEntity>> {
            self.requests.lock().unwrap().push(request.clone());

            let range = request.range;
            let items = (range.from..=range.to.min(self.total))
                .map(|seq| entity(&request.collection_id, seq))
                .collect();

            Ok(PageResponse {
                items,
                total_count: Some(self.total),
                next_page_token: (range.to < self.total).then(|| format!("page-{}", range.to + 1)),
            })
        }
    }

    fn entity(table_id: &str, seq: u64) -> models::TableEntity {
        models::TableEntity {
            exclusive_id: format!("exclusive-{table_id}-{seq}"),
            table_id: table_id.into(),
            entity_id: format!("entity-{table_id}-{seq}"),
            value_list_id: String::new(),
            tree_of_values_id: String::new(),
            sequence: seq as i64,
            link: String::new(),
            geo: Geo {
                wkt: "POINT(0 0)".into(),
                geo_json: GeoJsonGeometry {
                    kind: "Point".into(),
                    coordinates: "0,0".into(),
                    geometries: Vec::new(),
                },
            },
            classification: Classification {
                triangle_id: String::new(),
                c1: seq as i64,
                publish_procedure: String::new(),
            },
            date: String::new(),
            properties: BTreeMap::from([("status".to_string(), "active".to_string())]),
        }
    }

    fn schema(provider: Arc<FakeProvider>) -> CanopySchema {
        build_schema(provider, AggregatorConfig::default(), QueryDefaults::default())
    }

    async fn run(schema: &CanopySchema, query: &str) -> (serde_json::Value, Vec<String>) {
        let response = schema.execute(query).await;
        let errors = response.errors.iter().map(|e| e.message.clone()).collect();
        let data = response.data.into_json().unwrap();
        (data, errors)
    }

    #[tokio::test]
    async fn test_all_table_entities_aggregates() {
        let provider = FakeProvider::new(25);
        let schema = schema(provider.clone());

        let (data, errors) = run(
            &schema,
            r#"{ allTableEntities(tableId: "roads", pageSize: 10) { entityId sequence properties } }"#,
        )
        .await;

        assert!(errors.is_empty(), "{errors:?}");
        let entities = data["allTableEntities"].as_array().unwrap();
        assert_eq!(entities.len(), 25);
        assert_eq!(entities[24]["sequence"], 25);
        assert_eq!(entities[0]["properties"]["status"], "active");
        assert_eq!(provider.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_all_table_entities_uses_defaults_and_filter() {
        let provider = FakeProvider::new(5);
        let schema = schema(provider.clone());

        let (_, errors) = run(
            &schema,
            r#"{ allTableEntities(tableId: "roads", filter: "status=active") { entityId } }"#,
        )
        .await;

        assert!(errors.is_empty(), "{errors:?}");
        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].range, PageRange { from: 1, to: 100 });
        assert_eq!(requests[0].sort_key, "CreationTime");
        assert_eq!(requests[0].filter.as_deref(), Some("status=active"));
    }

    #[tokio::test]
    async fn test_all_table_entities_passes_empty_filter_through() {
        let provider = FakeProvider::new(5);
        let schema = schema(provider.clone());

        let (_, errors) = run(
            &schema,
            r#"{ allTableEntities(tableId: "roads", filter: "") { entityId } }"#,
        )
        .await;

        assert!(errors.is_empty(), "{errors:?}");
        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].filter.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_page_size_out_of_range_is_rejected() {
        let provider = FakeProvider::new(25);
        let schema = schema(provider.clone());

        for page_size in [0, -5, 1001] {
            let query = format!(
                r#"{{ allTableEntities(tableId: "roads", pageSize: {page_size}) {{ entityId }} }}"#
            );
            let (_, errors) = run(&schema, &query).await;
            assert_eq!(errors.len(), 1, "pageSize={page_size}");
            assert!(errors[0].contains("pageSize"));
        }
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn test_table_entities_single_page() {
        let provider = FakeProvider::new(25);
        let schema = schema(provider.clone());

        let (data, errors) = run(
            &schema,
            r#"{ tableEntities(tableId: "roads", from: 11, to: 20, sortBy: "Sequence") { sequence } }"#,
        )
        .await;

        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(data["tableEntities"].as_array().map(Vec::len), Some(10));

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].range, PageRange { from: 11, to: 20 });
        assert_eq!(requests[0].sort_key, "Sequence");
    }

    #[tokio::test]
    async fn test_table_entities_rejects_bad_range() {
        let provider = FakeProvider::new(25);
        let schema = schema(provider.clone());

        for args in ["from: 20, to: 10", "from: 0, to: 10", "from: 1, to: 1001"] {
            let query = format!(r#"{{ tableEntities(tableId: "roads", {args}) {{ sequence }} }}"#);
            let (_, errors) = run(&schema, &query).await;
            assert_eq!(errors.len(), 1, "{args}");
        }
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn test_tree_of_values() {
        let schema = schema(FakeProvider::new(0));

        let (data, errors) = run(
            &schema,
            r#"{ treeOfValues(tableId: "roads", fieldId: "kind") { type nodeCount exclusiveId { tableId } treeOfValues { name children { name } } } }"#,
        )
        .await;

        assert!(errors.is_empty(), "{errors:?}");
        let tree = &data["treeOfValues"];
        assert_eq!(tree["type"], "tree-type");
        assert_eq!(tree["nodeCount"], 3);
        assert_eq!(tree["exclusiveId"]["tableId"], "roads");
        assert_eq!(tree["treeOfValues"][0]["children"][1]["name"], "b");
    }

    #[tokio::test]
    async fn test_provider_error_becomes_graphql_error() {
        let schema = schema(FakeProvider::new(0));

        let (_, errors) = run(
            &schema,
            r#"{ treeOfValues(tableId: "missing", fieldId: "kind") { name } }"#,
        )
        .await;

        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("404"));
    }

    #[test]
    fn test_validate_id_boundaries() {
        assert!(validate_id("", "tableId").is_err());
        assert!(validate_id("  ", "tableId").is_err());
        assert!(validate_id(&"x".repeat(200), "tableId").is_err());
        assert!(validate_id("roads", "tableId").is_ok());
    }

    #[test]
    fn test_validate_filter_boundaries() {
        assert!(validate_filter(&Some(String::new())).is_ok());
        assert!(validate_filter(&Some("x".repeat(2000))).is_err());
        assert!(validate_filter(&None).is_ok());
        assert!(validate_filter(&Some("status=active".into())).is_ok());
    }

    #[test]
    fn test_page_size_defaults_and_bounds() {
        let defaults = QueryDefaults::default();
        assert_eq!(validate_page_size(None, &defaults).ok(), Some(100));
        assert_eq!(validate_page_size(Some(1), &defaults).ok(), Some(1));
        assert_eq!(validate_page_size(Some(1000), &defaults).ok(), Some(1000));
        assert!(validate_page_size(Some(1001), &defaults).is_err());
        assert!(validate_page_size(Some(0), &defaults).is_err());
    }
}
