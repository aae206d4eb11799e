use std::sync::Arc;

use async_trait::async_trait;
use chartfeed_market_data::{InstrumentId, QuoteProvider};
use log::info;

use super::ChartDataServiceTrait;
use crate::config::CoreConfig;
use crate::errors::{Error, Result};
use crate::history::HistoricalBarLoader;
use crate::live::{BulkQuoteFetcher, CacheStatus, LiveQuoteCache, Pacer, RefreshOutcome};
use crate::mapping::{InstrumentMapping, InstrumentRecord, MappingResolver};
use crate::series::{Bar, SeriesAggregator};
use crate::storage::ObjectStore;
use crate::utils::Clock;

/// Wires the resolver, loader, cache, fetcher and aggregator together.
///
/// Construct once at process start and share the handle.
pub struct ChartDataService {
    config: CoreConfig,
    mapping: Arc<MappingResolver>,
    cache: Arc<LiveQuoteCache>,
    fetcher: Arc<BulkQuoteFetcher>,
    aggregator: SeriesAggregator,
}

impl ChartDataService {
    pub fn new(
        config: CoreConfig,
        store: Arc<dyn ObjectStore>,
        provider: Option<Arc<dyn QuoteProvider>>,
        pacer: Arc<dyn Pacer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut resolver = MappingResolver::new(
            store.clone(),
            config.bucket.clone(),
            config.mapping_key.clone(),
        );
        if let Some(key) = &config.stocklist_key {
            resolver = resolver.with_stocklist(key.clone());
        }
        let mapping = Arc::new(resolver);
        let history = Arc::new(HistoricalBarLoader::new(
            store,
            config.bucket.clone(),
            config.history_prefixes.clone(),
        ));
        let cache = Arc::new(LiveQuoteCache::new(config.live_ttl, clock.clone()));
        let fetcher = Arc::new(BulkQuoteFetcher::new(
            provider,
            cache.clone(),
            pacer,
            clock.clone(),
            &config,
        ));
        let aggregator =
            SeriesAggregator::new(history, mapping.clone(), fetcher.clone(), clock);

        info!(
            "Chart data service ready: bucket={}, live quotes {}",
            config.bucket,
            if fetcher.provider_available() {
                "enabled"
            } else {
                "disabled"
            }
        );

        Self {
            config,
            mapping,
            cache,
            fetcher,
            aggregator,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }
}

#[async_trait]
impl ChartDataServiceTrait for ChartDataService {
    async fn resolve_mapping(&self) -> Arc<InstrumentMapping> {
        self.mapping.resolve().await
    }

    async fn reload_mapping(&self) -> Arc<InstrumentMapping> {
        self.mapping.reload().await
    }

    async fn stock_list(&self) -> Vec<InstrumentRecord> {
        self.mapping.resolve().await.records().to_vec()
    }

    async fn instrument_for_symbol(&self, symbol: &str) -> Result<InstrumentRecord> {
        self.mapping
            .instrument_for_symbol(symbol)
            .await
            .ok_or_else(|| Error::SymbolNotFound(symbol.trim().to_uppercase()))
    }

    async fn build_series(&self, instrument_id: InstrumentId) -> Result<Vec<Bar>> {
        Ok(self.aggregator.build_series(instrument_id).await?)
    }

    async fn build_series_for_symbol(&self, symbol: &str) -> Result<Vec<Bar>> {
        let record = self.instrument_for_symbol(symbol).await?;
        self.build_series(record.instrument_id).await
    }

    async fn refresh(&self, forced: bool) -> RefreshOutcome {
        if forced {
            self.cache.force_stale();
        }
        let mapping = self.mapping.resolve().await;
        self.fetcher.refresh(&mapping).await
    }

    async fn cache_status(&self) -> CacheStatus {
        let total = self.mapping.resolve().await.len();
        self.cache
            .status(total, self.fetcher.provider_available(), &self.config.bucket)
    }
}
