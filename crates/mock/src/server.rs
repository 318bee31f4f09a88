//! Mock provider HTTP server.

use std::future::Future;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::data;

/// Mock provider behaviour.
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Number of entities in every table.
    pub total_entities: u64,
    /// Answer 503 to table entity requests starting at or after this position.
    pub fail_from: Option<u64>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            total_entities: 150,
            fail_from: None,
        }
    }
}

/// A table entities request as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub table_id: String,
    pub from: u64,
    pub to: u64,
    pub sort_by: String,
    pub filter: Option<String>,
}

/// Shared log of table entities requests.
#[derive(Debug, Clone, Default)]
pub struct RequestLog {
    inner: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl RequestLog {
    async fn push(&self, request: RecordedRequest) {
        self.inner.lock().await.push(request);
    }

    /// Copy of every request recorded so far, in arrival order.
    pub async fn snapshot(&self) -> Vec<RecordedRequest> {
        self.inner.lock().await.clone()
    }
}

#[derive(Clone)]
struct MockState {
    config: Arc<MockConfig>,
    log: RequestLog,
}

/// Query string of `TableEntities`. Values are parsed leniently.
#[derive(Debug, Deserialize)]
struct EntitiesParams {
    from: Option<String>,
    to: Option<String>,
    sort_by: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FilterBody {
    filter: Option<String>,
}

/// Build the mock provider router.
pub fn router(config: MockConfig, log: RequestLog) -> Router {
    let state = MockState {
        config: Arc::new(config),
        log,
    };

    Router::new()
        .route(
            "/v2.0/Tree/TreeOfValues/{table_id}/{field_id}",
            get(tree_of_values),
        )
        .route(
            "/v3.0/Tree/{table_id}/TableEntities",
            get(table_entities).post(table_entities),
        )
        .route("/health", get(health_check))
        .fallback(not_found)
        .with_state(state)
}

/// Serve the mock provider until `shutdown_signal` resolves.
pub async fn serve_with_shutdown<F>(
    config: MockConfig,
    host: &str,
    port: u16,
    shutdown_signal: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let total = config.total_entities;
    let app = router(config, RequestLog::default());

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(addr = %addr, total_entities = total, "🧪 Mock provider listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}

async fn tree_of_values(Path((table_id, field_id)): Path<(String, String)>) -> Response {
    debug!(table = %table_id, field = %field_id, "GET TreeOfValues");
    Json(data::tree_of_values(&table_id, &field_id)).into_response()
}

async fn table_entities(
    State(state): State<MockState>,
    method: Method,
    Path(table_id): Path<String>,
    Query(params): Query<EntitiesParams>,
    body: Bytes,
) -> Response {
    let from = parse_position(params.from.as_deref(), 1);
    let to = parse_position(params.to.as_deref(), 100);
    let sort_by = params
        .sort_by
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "CreationTime".to_string());
    let filter = serde_json::from_slice::<FilterBody>(&body)
        .ok()
        .and_then(|b| b.filter);

    debug!(%method, table = %table_id, from, to, sort_by = %sort_by, filter = ?filter, "TableEntities");

    state
        .log
        .push(RecordedRequest {
            method: method.to_string(),
            table_id: table_id.clone(),
            from,
            to,
            sort_by: sort_by.clone(),
            filter,
        })
        .await;

    if state.config.fail_from.is_some_and(|fail| from >= fail) {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "Service unavailable", "message": "Injected failure" })),
        )
            .into_response();
    }

    Json(data::table_entities_page(
        &table_id,
        from,
        to,
        state.config.total_entities,
        &sort_by,
    ))
    .into_response()
}

/// Parse a 1-based position, falling back to `default` on garbage or zero.
fn parse_position(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "message": "Mock API server is running" }))
}

async fn not_found(method: Method, uri: Uri) -> Response {
    debug!(%method, %uri, "404");
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not found",
            "message": format!("No mock data found for {method} {uri}")
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_position_is_lenient() {
        assert_eq!(parse_position(Some("41"), 1), 41);
        assert_eq!(parse_position(Some("abc"), 1), 1);
        assert_eq!(parse_position(Some("0"), 100), 100);
        assert_eq!(parse_position(None, 100), 100);
    }
}
