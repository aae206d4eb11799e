//! Tests for SeriesAggregator overlay and refresh behavior.

#[cfg(test)]
mod tests {
    use crate::config::CoreConfig;
    use crate::history::{HistoricalBarLoader, HistoryError};
    use crate::live::{BulkQuoteFetcher, LiveQuoteCache};
    use crate::mapping::MappingResolver;
    use crate::series::SeriesAggregator;
    use crate::storage::InMemoryObjectStore;
    use crate::test_support::{MockClock, MockQuoteProvider, RecordingPacer};
    use crate::utils::Clock;
    use chartfeed_market_data::QuoteProvider;
    use std::sync::Arc;

    const MAPPING: &str = "Stock Name,Instrument ID,Market Cap,Setup_Case\nACME,1,10,A\nBETA,2,20,B\n";
    const SERIES: &str = "date,open,high,low,close,volume\n\
                          2024-05-30,10,11,9,10.5,100\n\
                          2024-05-31,10.5,12,10,11.5,120\n";

    struct Harness {
        store: Arc<InMemoryObjectStore>,
        provider: Arc<MockQuoteProvider>,
        clock: Arc<MockClock>,
        aggregator: SeriesAggregator,
    }

    fn harness(with_provider: bool) -> Harness {
        let config = CoreConfig::default();
        let store = Arc::new(InMemoryObjectStore::new());
        store.insert(&config.bucket, &config.mapping_key, MAPPING);
        store.insert(&config.bucket, "eod_data/1.csv", SERIES);
        store.insert(&config.bucket, "eod_data/3.csv", SERIES);

        let provider = Arc::new(MockQuoteProvider::default());
        let clock = Arc::new(MockClock::default());
        let cache = Arc::new(LiveQuoteCache::new(config.live_ttl, clock.clone()));
        let fetcher = Arc::new(BulkQuoteFetcher::new(
            with_provider.then(|| provider.clone() as Arc<dyn QuoteProvider>),
            cache,
            Arc::new(RecordingPacer::default()),
            clock.clone(),
            &config,
        ));
        let aggregator = SeriesAggregator::new(
            Arc::new(HistoricalBarLoader::new(
                store.clone(),
                config.bucket.clone(),
                config.history_prefixes.clone(),
            )),
            Arc::new(MappingResolver::new(
                store.clone(),
                config.bucket.clone(),
                config.mapping_key.clone(),
            )),
            fetcher,
            clock.clone(),
        );
        Harness {
            store,
            provider,
            clock,
            aggregator,
        }
    }

    #[tokio::test]
    async fn test_appends_synthetic_bar_from_live_quote() {
        let h = harness(true);
        let bars = h.aggregator.build_series(1).await.unwrap();

        assert_eq!(bars.len(), 3);
        let latest = bars[2];
        assert_eq!(latest.time, h.clock.now().timestamp());
        assert_eq!(latest.close, 1.5);
        assert_eq!(latest.open, 0.5);
        // Mock quote has no high
        assert_eq!(latest.high, 1.5);
        assert!(latest.time >= bars[1].time);
    }

    #[tokio::test]
    async fn test_twice_within_ttl_calls_provider_once() {
        let h = harness(true);
        h.aggregator.build_series(1).await.unwrap();
        h.clock.advance(chrono::Duration::seconds(300));
        h.aggregator.build_series(1).await.unwrap();

        assert_eq!(h.provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_refreshes_again_after_ttl() {
        let h = harness(true);
        h.aggregator.build_series(1).await.unwrap();
        h.clock.advance(chrono::Duration::seconds(601));
        h.aggregator.build_series(1).await.unwrap();

        assert_eq!(h.provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_instrument_without_quote_returns_history_unmodified() {
        let h = harness(true);
        // Instrument 3 has history but is not in the mapping, so never quoted
        let bars = h.aggregator.build_series(3).await.unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(h.provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_no_provider_returns_history_only() {
        let h = harness(false);
        let bars = h.aggregator.build_series(1).await.unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(h.provider.call_count(), 0);
        // Mapping is not even needed without a provider
        assert!(!h.store.reads().contains(&"uploads/mapping.csv".to_string()));
    }

    #[tokio::test]
    async fn test_missing_history_propagates_not_found() {
        let h = harness(true);
        let err = h.aggregator.build_series(2).await.unwrap_err();

        assert!(matches!(err, HistoryError::NotFound { instrument_id: 2 }));
        // No refresh is paid for a series that does not exist
        assert_eq!(h.provider.call_count(), 0);
    }
}
