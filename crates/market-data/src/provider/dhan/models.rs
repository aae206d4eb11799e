//! Dhan market feed API response models.
//!
//! Only the fields the live cache consumes are modelled; everything else in
//! the payload (depth, circuit limits, OI) is ignored by serde.

use std::collections::HashMap;

use serde::Deserialize;

/// Top-level response of `POST /v2/marketfeed/quote`
#[derive(Debug, Deserialize)]
pub struct DhanQuoteResponse {
    /// "success" or "failure"
    #[serde(default)]
    pub status: Option<String>,

    /// Segment key ("NSE_EQ") -> security id as string -> quote
    #[serde(default)]
    pub data: Option<HashMap<String, HashMap<String, DhanQuoteData>>>,

    /// Error payload fields, present on failures
    #[serde(default, rename = "errorCode")]
    pub error_code: Option<String>,
    #[serde(default, rename = "errorMessage")]
    pub error_message: Option<String>,
}

/// Per-instrument quote
#[derive(Debug, Deserialize)]
pub struct DhanQuoteData {
    #[serde(default)]
    pub last_price: Option<f64>,
    #[serde(default)]
    pub ohlc: Option<DhanOhlc>,
    #[serde(default)]
    pub volume: Option<f64>,
}

/// Session OHLC block
#[derive(Debug, Default, Deserialize)]
pub struct DhanOhlc {
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub close: Option<f64>,
}
