//! Shared test doubles: a settable clock, a recording pacer and a scripted
//! quote provider.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chartfeed_market_data::{
    ExchangeSegment, InstrumentId, LiveQuote, LiveQuoteMap, MarketDataError, Ohlc, QuoteProvider,
    RateLimit,
};
use chrono::{DateTime, TimeZone, Utc};

use crate::live::Pacer;
use crate::mapping::{InstrumentMapping, InstrumentRecord};
use crate::utils::Clock;

// =========================================================================
// Clock
// =========================================================================

pub struct MockClock {
    now: Mutex<DateTime<Utc>>,
}

impl Default for MockClock {
    fn default() -> Self {
        Self::at(Utc.with_ymd_and_hms(2024, 6, 3, 9, 15, 0).unwrap())
    }
}

impl MockClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// =========================================================================
// Pacer
// =========================================================================

#[derive(Default)]
pub struct RecordingPacer {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingPacer {
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().unwrap().clone()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, delay: Duration) {
        self.pauses.lock().unwrap().push(delay);
    }
}

// =========================================================================
// Quote provider
// =========================================================================

/// Answers every id it is asked for with `last_price = id + 0.5`, except on
/// calls scripted to fail.
pub struct MockQuoteProvider {
    calls: Mutex<Vec<Vec<InstrumentId>>>,
    failures: Mutex<HashMap<usize, fn() -> MarketDataError>>,
    rate_limit: RateLimit,
}

impl Default for MockQuoteProvider {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            rate_limit: RateLimit {
                max_instruments_per_request: 1000,
                min_delay: Duration::ZERO,
            },
        }
    }
}

impl MockQuoteProvider {
    pub fn with_rate_limit(rate_limit: RateLimit) -> Self {
        Self {
            rate_limit,
            ..Self::default()
        }
    }

    /// Make the `call`-th request (1-based, counted across cycles) fail.
    pub fn fail_call(&self, call: usize, error: fn() -> MarketDataError) {
        self.failures.lock().unwrap().insert(call, error);
    }

    pub fn calls(&self) -> Vec<Vec<InstrumentId>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

pub fn transient_error() -> MarketDataError {
    MarketDataError::ProviderError {
        provider: "MOCK".into(),
        message: "gateway timeout".into(),
    }
}

pub fn permanent_error() -> MarketDataError {
    MarketDataError::Unauthorized {
        provider: "MOCK".into(),
        message: "token expired".into(),
    }
}

pub fn quote_for(id: InstrumentId) -> LiveQuote {
    let last = id as f64 + 0.5;
    LiveQuote::with_ohlc(
        id,
        Ohlc {
            open: Some(last - 1.0),
            high: None,
            low: Some(last - 2.0),
            close: Some(last - 0.25),
        },
        last,
        1000.0,
    )
}

#[async_trait]
impl QuoteProvider for MockQuoteProvider {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    fn rate_limit(&self) -> RateLimit {
        self.rate_limit.clone()
    }

    async fn fetch_quotes(
        &self,
        _exchange: ExchangeSegment,
        instrument_ids: &[InstrumentId],
    ) -> Result<LiveQuoteMap, MarketDataError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(instrument_ids.to_vec());
            calls.len()
        };
        // Let concurrent callers interleave with an in-flight refresh
        tokio::task::yield_now().await;

        if let Some(error) = self.failures.lock().unwrap().get(&call) {
            return Err(error());
        }
        Ok(instrument_ids
            .iter()
            .map(|&id| (id, quote_for(id)))
            .collect())
    }
}

// =========================================================================
// Fixtures
// =========================================================================

/// Mapping with ids `1..=count` and symbols `SYM1..`.
pub fn mapping_with_ids(count: u64) -> InstrumentMapping {
    let (mapping, _) = InstrumentMapping::from_records(
        (1..=count).map(|id| InstrumentRecord::new(format!("SYM{}", id), id, 1.0, "A")),
    );
    mapping
}
