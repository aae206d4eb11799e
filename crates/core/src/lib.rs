//! Chartfeed Core - live quote cache and chart series aggregation.
//!
//! This crate blends durable historical bars read from an object store with a
//! short-lived cache of live quotes pulled in bulk from an upstream provider.
//! It is storage-agnostic: backends implement [`storage::ObjectStore`], and
//! providers implement `chartfeed_market_data::QuoteProvider`.
//!
//! ```text
//! ChartDataService
//!   ├── MappingResolver      (symbol -> instrument snapshot)
//!   ├── HistoricalBarLoader  (primary -> backup prefix search)
//!   └── SeriesAggregator
//!         └── BulkQuoteFetcher ──► LiveQuoteCache
//! ```

pub mod chart_data;
pub mod config;
pub mod constants;
pub mod errors;
pub mod history;
pub mod live;
pub mod mapping;
pub mod series;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use chart_data::{ChartDataService, ChartDataServiceTrait};
pub use config::CoreConfig;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
