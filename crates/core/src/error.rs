//! Error types for the Canopy domain layer.
//!
//! This module defines a small hierarchy of error types:
//!
//! - [`ProviderError`] - Failures talking to the external data provider
//! - [`AggregateError`] - Failures of a paginated aggregation
//!
//! A provider failure during aggregation is wrapped into
//! [`AggregateError::ProviderRequestFailed`] together with the collection
//! and the page range that failed.

use thiserror::Error;

use crate::ports::PageRange;

// =============================================================================
// Provider Errors
// =============================================================================

/// Data provider connectivity and protocol errors.
///
/// These errors occur when communicating with the tree entities
/// provider over HTTP.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection or transport-level failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request did not complete within the configured timeout.
    #[error("Request timeout: {url}")]
    Timeout {
        /// URL of the request that timed out.
        url: String,
    },

    /// Provider answered with a non-success status.
    #[error("HTTP error! status: {status} ({url})")]
    Status {
        /// HTTP status code.
        status: u16,
        /// URL of the failing request.
        url: String,
    },

    /// Response body could not be decoded.
    #[error("Decoding error: {0}")]
    Decode(String),

    /// Provider client configuration is invalid.
    #[error("Configuration error: {0}")]
    InvalidConfig(String),
}

// =============================================================================
// Aggregation Errors
// =============================================================================

/// Errors returned by [`crate::services::PaginatedAggregator`].
///
/// Aggregation is all-or-nothing: whatever error is returned, no partial
/// result is handed back to the caller.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// Query rejected before the first provider call.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A single page request failed and aborted the aggregation.
    #[error("Provider request failed for collection {collection_id} at range {range}: {source}")]
    ProviderRequestFailed {
        /// Collection being aggregated.
        collection_id: String,
        /// Range of the failing page request.
        range: PageRange,
        /// Underlying provider failure.
        #[source]
        source: ProviderError,
    },

    /// The configured safety cap was reached before the provider ran out of data.
    #[error("Aggregation limit exceeded for collection {collection_id}: {limit}")]
    LimitExceeded {
        /// Collection being aggregated.
        collection_id: String,
        /// Human readable description of the limit that was hit.
        limit: String,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Result type for aggregation operations.
pub type AggregateResult<T> = Result<T, AggregateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_failure_keeps_context() {
        let err = AggregateError::ProviderRequestFailed {
            collection_id: "roads".into(),
            range: PageRange { from: 11, to: 20 },
            source: ProviderError::Status {
                status: 503,
                url: "http://provider/v3.0/Tree/roads/TableEntities".into(),
            },
        };
        let msg = err.to_string();

        // Collection, range and status must all be visible for debugging
        assert!(msg.contains("roads"));
        assert!(msg.contains("[11, 20]"));
        assert!(msg.contains("503"));
    }

    #[test]
    fn test_provider_failure_exposes_source() {
        use std::error::Error as _;

        let err = AggregateError::ProviderRequestFailed {
            collection_id: "roads".into(),
            range: PageRange { from: 1, to: 10 },
            source: ProviderError::Transport("connection refused".into()),
        };

        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("Transport error: connection refused"));
    }
}
