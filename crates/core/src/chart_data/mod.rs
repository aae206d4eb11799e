//! Caller-facing surface of the core layer.
//!
//! The request router talks only to [`ChartDataServiceTrait`]; everything it
//! needs (mapping, series, refresh, cache status) goes through it.

pub mod service;
pub mod traits;


pub use service::ChartDataService;
pub use traits::ChartDataServiceTrait;
