//! HTTP client for the tree entities data provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace, warn};
use url::Url;

use canopy_core::error::{ProviderError, ProviderResult};
use canopy_core::metrics::record_provider_error;
use canopy_core::models::{TableEntity, TreeOfValues};
use canopy_core::ports::{EntityProvider, PageRequest, PageResponse};

use crate::endpoints::{table_entities_url, tree_of_values_url};
use crate::wire::{FilterBody, TableEntitiesBody};

/// Smallest accepted request timeout.
const MIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Configuration for the provider client.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Provider base URL (e.g., "http://localhost:3000").
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Page size used when the caller gives none.
    pub default_page_size: u32,
    /// Largest page size callers may request.
    pub max_page_size: u32,
    /// Sort field used when the caller gives none.
    pub default_sort_by: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout: Duration::from_secs(30),
            default_page_size: 100,
            max_page_size: 1000,
            default_sort_by: "CreationTime".to_string(),
        }
    }
}

impl ProviderConfig {
    /// Check the configuration and return the parsed base URL.
    pub fn validate(&self) -> ProviderResult<Url> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            ProviderError::InvalidConfig(format!("invalid base URL '{}': {e}", self.base_url))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ProviderError::InvalidConfig(format!(
                "base URL must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.timeout < MIN_TIMEOUT {
            return Err(ProviderError::InvalidConfig(
                "timeout must be at least 1000ms".into(),
            ));
        }
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(ProviderError::InvalidConfig(
                "page sizes must be positive".into(),
            ));
        }
        if self.default_page_size > self.max_page_size {
            return Err(ProviderError::InvalidConfig(format!(
                "default page size {} cannot exceed max page size {}",
                self.default_page_size, self.max_page_size
            )));
        }
        if self.default_sort_by.trim().is_empty() {
            return Err(ProviderError::InvalidConfig(
                "default sort field cannot be empty".into(),
            ));
        }

        Ok(url)
    }
}

/// HTTP adapter implementing the EntityProvider port.
///
/// Build one per process and share it behind an `Arc`; the inner
/// `reqwest::Client` pools connections.
pub struct HttpEntityProvider {
    client: reqwest::Client,
    base_url: Url,
    config: ProviderConfig,
}

impl HttpEntityProvider {
    /// Validate the configuration and build the client.
    #[instrument(skip_all, fields(url = %config.base_url))]
    pub fn new(config: ProviderConfig) -> ProviderResult<Self> {
        let base_url = config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        debug!(timeout_ms = config.timeout.as_millis(), "Provider client ready");

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Configuration the client was built with.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Send a request and decode a JSON body.
    async fn send<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
        url: &Url,
    ) -> ProviderResult<T> {
        let result = Self::execute(request, url).await;
        if let Err(e) = &result {
            warn!(operation, url = %url, error = %e, "⚠️  Provider request failed");
            record_provider_error(operation);
        }
        result
    }

    async fn execute<T: DeserializeOwned>(request: RequestBuilder, url: &Url) -> ProviderResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| transport_error(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                ProviderError::Decode(e.to_string())
            } else {
                transport_error(e, url)
            }
        })
    }
}

#[async_trait]
impl EntityProvider for HttpEntityProvider {
    #[instrument(skip(self))]
    async fn tree_of_values(
        &self,
        table_id: &str,
        field_id: &str,
    ) -> ProviderResult<TreeOfValues> {
        let url = tree_of_values_url(&self.base_url, table_id, field_id)?;
        trace!(url = %url, "Fetching tree of values");

        self.send("tree_of_values", self.client.get(url.clone()), &url)
            .await
    }

    #[instrument(skip_all, fields(table = %request.collection_id, range = %request.range))]
    async fn table_entities(
        &self,
        request: &PageRequest,
    ) -> ProviderResult<PageResponse<TableEntity>> {
        let url = table_entities_url(
            &self.base_url,
            &request.collection_id,
            request.range,
            &request.sort_key,
        )?;

        let builder = match request.filter.as_deref() {
            Some(filter) => self.client.post(url.clone()).json(&FilterBody { filter }),
            None => self.client.get(url.clone()),
        };
        trace!(url = %url, filtered = request.filter.is_some(), "Fetching table entities");

        let body: TableEntitiesBody = self.send("table_entities", builder, &url).await?;
        trace!(
            received = body.entities_list.len(),
            total = ?body.total_entities,
            "Page received"
        );

        Ok(body.into())
    }
}

fn transport_error(error: reqwest::Error, url: &Url) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout {
            url: url.to_string(),
        }
    } else {
        ProviderError::Transport(error.to_string())
    }
}
