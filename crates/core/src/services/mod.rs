mod aggregator;

pub use aggregator::{AggregatorConfig, PaginatedAggregator};
