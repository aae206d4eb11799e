use std::sync::Arc;

use chartfeed_market_data::InstrumentId;
use log::debug;

use super::{synthetic_latest_bar, Bar};
use crate::history::{HistoricalBarLoader, HistoryError};
use crate::live::BulkQuoteFetcher;
use crate::mapping::MappingResolver;
use crate::utils::Clock;

/// Combines a historical series with the live overlay.
pub struct SeriesAggregator {
    history: Arc<HistoricalBarLoader>,
    mapping: Arc<MappingResolver>,
    fetcher: Arc<BulkQuoteFetcher>,
    clock: Arc<dyn Clock>,
}

impl SeriesAggregator {
    pub fn new(
        history: Arc<HistoricalBarLoader>,
        mapping: Arc<MappingResolver>,
        fetcher: Arc<BulkQuoteFetcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            history,
            mapping,
            fetcher,
            clock,
        }
    }

    /// Historical bars for `instrument_id`, plus one synthetic bar when a
    /// live quote exists.
    ///
    /// A stale cache is refreshed inline before the quote is read. Without a
    /// configured provider the historical series is returned as is.
    pub async fn build_series(&self, instrument_id: InstrumentId) -> Result<Vec<Bar>, HistoryError> {
        let historical = self.history.load_series(instrument_id).await?;
        let mut bars: Vec<Bar> = historical.iter().map(Bar::from).collect();

        if !self.fetcher.provider_available() {
            return Ok(bars);
        }

        let cache = self.fetcher.cache();
        if !cache.is_fresh_and_populated() {
            let mapping = self.mapping.resolve().await;
            self.fetcher.refresh(&mapping).await;
        }

        match cache.get(instrument_id) {
            Some(quote) => {
                let last_time = bars.last().map(|bar| bar.time);
                bars.push(synthetic_latest_bar(&quote, self.clock.now(), last_time));
            }
            None => debug!("No live quote for instrument {}", instrument_id),
        }
        Ok(bars)
    }
}
