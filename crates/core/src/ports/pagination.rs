//! Pagination types for range-based provider queries.
//!
//! The data provider pages with inclusive, 1-based `from`/`to` ranges
//! rather than cursors. A page is followed either by a continuation
//! token or by nothing at all.

use std::fmt;

use crate::error::{AggregateError, AggregateResult};

/// Inclusive, 1-based range of items requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    /// First item position (1-based).
    pub from: u64,
    /// Last item position (inclusive).
    pub to: u64,
}

impl PageRange {
    /// Build a validated range.
    pub fn new(from: u64, to: u64) -> AggregateResult<Self> {
        if from == 0 {
            return Err(AggregateError::InvalidArgument(
                "range start must be at least 1".into(),
            ));
        }
        if to < from {
            return Err(AggregateError::InvalidArgument(format!(
                "range end {to} is before range start {from}"
            )));
        }
        Ok(Self { from, to })
    }

    /// The first page of `page_size` items: `[1, page_size]`.
    pub fn first(page_size: u32) -> AggregateResult<Self> {
        if page_size == 0 {
            return Err(AggregateError::InvalidArgument(
                "page size must be positive".into(),
            ));
        }
        Ok(Self {
            from: 1,
            to: u64::from(page_size),
        })
    }

    /// The range immediately following this one, with the same length.
    pub fn next(&self) -> Self {
        let size = self.size();
        Self {
            from: self.to + 1,
            to: self.to + size,
        }
    }

    /// Number of items covered by the range.
    pub fn size(&self) -> u64 {
        self.to - self.from + 1
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.from, self.to)
    }
}

/// A single page request sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Collection (table) identifier.
    pub collection_id: String,
    /// Requested item range.
    pub range: PageRange,
    /// Provider sort field.
    pub sort_key: String,
    /// Opaque filter, passed through unmodified.
    pub filter: Option<String>,
}

/// A single page returned by the provider.
#[derive(Debug, Clone)]
pub struct PageResponse<T> {
    /// Items of this page, in provider order.
    pub items: Vec<T>,
    /// Total number of items, when the provider reports it.
    pub total_count: Option<u64>,
    /// Continuation token for the next page.
    pub next_page_token: Option<String>,
}

impl<T> PageResponse<T> {
    /// Whether the provider signalled a further page.
    ///
    /// An empty token counts as no continuation.
    pub fn has_next_page(&self) -> bool {
        self.next_page_token
            .as_deref()
            .is_some_and(|token| !token.is_empty())
    }
}

/// Parameters of a full paginated aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateQuery {
    /// Collection (table) identifier.
    pub collection_id: String,
    /// Items per page request.
    pub page_size: u32,
    /// Provider sort field.
    pub sort_key: String,
    /// Opaque filter applied to every page request.
    pub filter: Option<String>,
}
