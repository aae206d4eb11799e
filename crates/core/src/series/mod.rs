//! Chart series: historical bars plus an optional synthetic latest bar.

pub mod aggregator;
pub mod model;

#[cfg(test)]
mod aggregator_tests;

pub use aggregator::SeriesAggregator;
pub use model::{synthetic_latest_bar, Bar};
