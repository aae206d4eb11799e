use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chartfeed_market_data::{
    ExchangeSegment, InstrumentId, LiveQuoteMap, QuoteProvider, RetryClass,
};
use log::{debug, error, info, warn};
use tokio::sync::Mutex;

use super::{LiveQuoteCache, Pacer, RefreshOutcome, RefreshReport, SkipReason};
use crate::config::CoreConfig;
use crate::mapping::InstrumentMapping;
use crate::utils::Clock;

/// Refreshes the live quote cache from the upstream provider in batches.
///
/// Each batch is one provider call. A transient batch failure is logged and
/// skipped; a permanent one stops the cycle. Whatever succeeded replaces the
/// cache content wholesale.
pub struct BulkQuoteFetcher {
    provider: Option<Arc<dyn QuoteProvider>>,
    cache: Arc<LiveQuoteCache>,
    pacer: Arc<dyn Pacer>,
    clock: Arc<dyn Clock>,
    exchange: ExchangeSegment,
    batch_size: usize,
    batch_delay: Duration,
    pause_after_last_batch: bool,
    refresh_lock: Mutex<()>,
    /// Completed provider cycles, bumped while `refresh_lock` is held.
    cycles: AtomicU64,
}

impl BulkQuoteFetcher {
    pub fn new(
        provider: Option<Arc<dyn QuoteProvider>>,
        cache: Arc<LiveQuoteCache>,
        pacer: Arc<dyn Pacer>,
        clock: Arc<dyn Clock>,
        config: &CoreConfig,
    ) -> Self {
        Self {
            provider,
            cache,
            pacer,
            clock,
            exchange: config.exchange,
            batch_size: config.batch_size.max(1),
            batch_delay: config.batch_delay,
            pause_after_last_batch: config.pause_after_last_batch,
            refresh_lock: Mutex::new(()),
            cycles: AtomicU64::new(0),
        }
    }

    pub fn provider_available(&self) -> bool {
        self.provider.is_some()
    }

    pub fn cache(&self) -> &Arc<LiveQuoteCache> {
        &self.cache
    }

    /// Batch size and delay after applying the provider's own limits.
    fn pacing(&self, provider: &dyn QuoteProvider) -> (usize, Duration) {
        let limit = provider.rate_limit();
        let size = self
            .batch_size
            .min(limit.max_instruments_per_request.max(1));
        let delay = self.batch_delay.max(limit.min_delay);
        (size, delay)
    }

    /// Bring the cache up to date for every instrument in `mapping`.
    ///
    /// Does nothing while the cache is fresh and non-empty. Concurrent callers
    /// that find it stale share a single cycle, even one in which every batch
    /// failed.
    pub async fn refresh(&self, mapping: &InstrumentMapping) -> RefreshOutcome {
        if self.cache.is_fresh_and_populated() {
            return self.skip(SkipReason::CacheFresh);
        }

        let Some(provider) = self.provider.as_ref() else {
            debug!("No quote provider configured; live refresh skipped");
            return RefreshOutcome {
                quotes: Arc::new(LiveQuoteMap::new()),
                report: RefreshReport::skipped(SkipReason::ProviderUnavailable),
            };
        };

        let ids = mapping.instrument_ids();
        if ids.is_empty() {
            warn!("Mapping has no instruments; live refresh skipped");
            return self.skip(SkipReason::EmptyUniverse);
        }

        let seen = self.cycles.load(Ordering::Acquire);
        let _guard = self.refresh_lock.lock().await;
        // Whoever held the lock before us may already have refreshed
        if self.cache.is_fresh_and_populated() {
            return self.skip(SkipReason::CacheFresh);
        }
        if self.cycles.load(Ordering::Acquire) != seen {
            debug!("Live refresh joined a cycle that completed while waiting");
            return self.skip(SkipReason::JoinedInFlightCycle);
        }

        let outcome = self.run_cycle(provider.as_ref(), &ids).await;
        self.cycles.fetch_add(1, Ordering::AcqRel);
        outcome
    }

    fn skip(&self, reason: SkipReason) -> RefreshOutcome {
        let quotes = self.cache.quotes();
        RefreshOutcome {
            report: RefreshReport {
                quotes_cached: quotes.len(),
                ..RefreshReport::skipped(reason)
            },
            quotes,
        }
    }

    async fn run_cycle(
        &self,
        provider: &dyn QuoteProvider,
        ids: &[InstrumentId],
    ) -> RefreshOutcome {
        let started_at = self.clock.now();
        let (batch_size, delay) = self.pacing(provider);
        let batches: Vec<&[InstrumentId]> = ids.chunks(batch_size).collect();
        let total = batches.len();

        let mut report = RefreshReport {
            batches_total: total,
            started_at: Some(started_at),
            ..RefreshReport::default()
        };
        let mut merged = LiveQuoteMap::with_capacity(ids.len());

        info!(
            "Refreshing live quotes for {} instruments in {} batches via {}",
            ids.len(),
            total,
            provider.id()
        );

        for (index, batch) in batches.iter().enumerate() {
            let number = index + 1;
            match provider.fetch_quotes(self.exchange, batch).await {
                Ok(quotes) => {
                    debug!(
                        "Batch {}/{}: {} of {} instruments quoted",
                        number,
                        total,
                        quotes.len(),
                        batch.len()
                    );
                    report.batches_succeeded += 1;
                    merged.extend(quotes);
                }
                Err(e) => match e.retry_class() {
                    RetryClass::SkipBatch => {
                        warn!(
                            "Batch {}/{} ({} instruments, first {}) failed, skipping: {}",
                            number,
                            total,
                            batch.len(),
                            batch[0],
                            e
                        );
                        report.failed_batches.push(number);
                    }
                    RetryClass::Abort => {
                        error!(
                            "Batch {}/{} failed permanently, abandoning remaining {} batches: {}",
                            number,
                            total,
                            total - number,
                            e
                        );
                        report.failed_batches.extend(number..=total);
                        report.aborted = true;
                        break;
                    }
                },
            }

            if number < total || self.pause_after_last_batch {
                self.pacer.pause(delay).await;
            }
        }

        if report.batches_succeeded == 0 {
            warn!(
                "All {} quote batches failed; keeping previous cache of {} quotes",
                total,
                self.cache.len()
            );
            return RefreshOutcome {
                quotes: self.cache.quotes(),
                report,
            };
        }

        let quotes = self.cache.replace(merged, started_at);
        report.quotes_cached = quotes.len();
        report.cache_replaced = true;
        if report.failed_batches.is_empty() {
            info!("Live quote cache refreshed with {} quotes", quotes.len());
        } else {
            warn!(
                "Live quote cache refreshed with {} quotes; failed batches: {:?}",
                quotes.len(),
                report.failed_batches
            );
        }
        RefreshOutcome { quotes, report }
    }
}
