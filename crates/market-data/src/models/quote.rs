use serde::{Deserialize, Serialize};

use super::types::InstrumentId;

/// Session open/high/low/close as reported by the feed.
///
/// Any leg can be missing early in the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ohlc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<f64>,
}

/// Latest quote for one instrument. Lives only inside the live cache.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveQuote {
    pub instrument_id: InstrumentId,

    pub ohlc: Ohlc,

    /// Last traded price (required)
    pub last_price: f64,

    pub volume: f64,
}

impl LiveQuote {
    /// Create a quote with only a last traded price
    pub fn new(instrument_id: InstrumentId, last_price: f64) -> Self {
        Self {
            instrument_id,
            ohlc: Ohlc::default(),
            last_price,
            volume: 0.0,
        }
    }

    /// Create a full quote
    pub fn with_ohlc(
        instrument_id: InstrumentId,
        ohlc: Ohlc,
        last_price: f64,
        volume: f64,
    ) -> Self {
        Self {
            instrument_id,
            ohlc,
            last_price,
            volume,
        }
    }

    pub fn open_or_last(&self) -> f64 {
        self.ohlc.open.unwrap_or(self.last_price)
    }

    pub fn high_or_last(&self) -> f64 {
        self.ohlc.high.unwrap_or(self.last_price)
    }

    pub fn low_or_last(&self) -> f64 {
        self.ohlc.low.unwrap_or(self.last_price)
    }
}
