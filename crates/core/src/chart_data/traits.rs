use std::sync::Arc;

use async_trait::async_trait;
use chartfeed_market_data::InstrumentId;

use crate::errors::Result;
use crate::live::{CacheStatus, RefreshOutcome};
use crate::mapping::{InstrumentMapping, InstrumentRecord};
use crate::series::Bar;

/// Trait for the chart data service.
#[async_trait]
pub trait ChartDataServiceTrait: Send + Sync {
    /// Cached mapping, loaded on first use or while empty. Never fails.
    async fn resolve_mapping(&self) -> Arc<InstrumentMapping>;

    /// Reload the mapping from storage, replacing the cached snapshot.
    async fn reload_mapping(&self) -> Arc<InstrumentMapping>;

    /// Every mapping record, in table order.
    async fn stock_list(&self) -> Vec<InstrumentRecord>;

    /// Resolve a ticker symbol; [`Error::SymbolNotFound`](crate::Error::SymbolNotFound) on a miss.
    async fn instrument_for_symbol(&self, symbol: &str) -> Result<InstrumentRecord>;

    /// Historical series with the live overlay appended when available.
    async fn build_series(&self, instrument_id: InstrumentId) -> Result<Vec<Bar>>;

    async fn build_series_for_symbol(&self, symbol: &str) -> Result<Vec<Bar>>;

    /// Refresh live quotes. `forced` marks the cache stale first.
    async fn refresh(&self, forced: bool) -> RefreshOutcome;

    async fn cache_status(&self) -> CacheStatus;
}
