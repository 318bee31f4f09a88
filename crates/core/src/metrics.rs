//! Metrics definitions for provider access and aggregation.
//!
//! Metrics are collected using the `metrics` crate and can be exported
//! to Prometheus via `metrics-exporter-prometheus`. Without an installed
//! recorder every call is a no-op.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Instant;

/// Initialize all metric descriptions.
/// Call this once at startup before any metrics are recorded.
pub fn init_metrics() {
    describe_counter!(
        "provider_pages_fetched_total",
        "Total number of entity pages fetched from the provider"
    );
    describe_counter!(
        "provider_errors_total",
        "Total number of failed provider requests"
    );
    describe_counter!(
        "entities_aggregated_total",
        "Total number of entities returned by completed aggregations"
    );
    describe_histogram!(
        "aggregation_duration_seconds",
        "Time taken by a full paginated aggregation in seconds"
    );
}

/// Record a page fetched during aggregation.
pub fn record_page_fetched() {
    counter!("provider_pages_fetched_total").increment(1);
}

/// Record a failed provider request.
///
/// # Arguments
/// * `operation` - The provider operation ("table_entities" or "tree_of_values")
pub fn record_provider_error(operation: &str) {
    counter!("provider_errors_total", "operation" => operation.to_string()).increment(1);
}

/// Record the size of a completed aggregation.
pub fn record_entities_aggregated(count: usize) {
    counter!("entities_aggregated_total").increment(count as u64);
}

/// Record aggregation duration.
pub fn record_aggregation_duration(duration_secs: f64) {
    histogram!("aggregation_duration_seconds").record(duration_secs);
}

/// A timer that automatically records aggregation duration when dropped.
pub struct AggregationTimer {
    start: Instant,
}

impl AggregationTimer {
    /// Start a new aggregation timer.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for AggregationTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AggregationTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        record_aggregation_duration(duration);
    }
}
