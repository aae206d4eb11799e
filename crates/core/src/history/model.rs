use serde::{Deserialize, Serialize};

/// One end-of-day bar read from durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalBar {
    /// Unix seconds, UTC
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}
