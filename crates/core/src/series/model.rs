use chartfeed_market_data::LiveQuote;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::history::HistoricalBar;

/// One chart bar, the shape the front end consumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix seconds
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl From<&HistoricalBar> for Bar {
    fn from(bar: &HistoricalBar) -> Self {
        Self {
            time: bar.timestamp,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }
}

/// Build the "current" bar from a live quote.
///
/// Missing open/high/low fall back to the last price, which is also the
/// close. The bar is stamped `now`, but never earlier than `not_before`.
pub fn synthetic_latest_bar(quote: &LiveQuote, now: DateTime<Utc>, not_before: Option<i64>) -> Bar {
    let time = match not_before {
        Some(last) => now.timestamp().max(last),
        None => now.timestamp(),
    };
    Bar {
        time,
        open: quote.open_or_last(),
        high: quote.high_or_last(),
        low: quote.low_or_last(),
        close: quote.last_price,
        volume: quote.volume,
    }
}
