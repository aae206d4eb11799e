use std::sync::{Arc, RwLock};
use std::time::Duration;

use chartfeed_market_data::{InstrumentId, LiveQuote, LiveQuoteMap};
use chrono::{DateTime, Utc};
use log::debug;

use super::{CacheState, CacheStatus};
use crate::utils::sync;
use crate::utils::Clock;

#[derive(Debug, Default)]
struct Snapshot {
    quotes: Arc<LiveQuoteMap>,
    fetched_at: Option<DateTime<Utc>>,
}

/// Most recently fetched live quotes plus the time of that fetch.
///
/// Readers always see one complete snapshot: quotes and fetch time are
/// swapped together under a single write lock.
pub struct LiveQuoteCache {
    inner: RwLock<Snapshot>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl LiveQuoteCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: RwLock::new(Snapshot::default()),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn state(&self) -> CacheState {
        let snapshot = sync::read(&self.inner, "Live quote cache");
        self.state_of(&snapshot)
    }

    fn state_of(&self, snapshot: &Snapshot) -> CacheState {
        match snapshot.fetched_at {
            None if snapshot.quotes.is_empty() => CacheState::Empty,
            None => CacheState::Stale,
            Some(fetched_at) => {
                // A clock that went backwards counts as zero age
                let age = (self.clock.now() - fetched_at)
                    .to_std()
                    .unwrap_or(Duration::ZERO);
                if age < self.ttl {
                    CacheState::Fresh
                } else {
                    CacheState::Stale
                }
            }
        }
    }

    pub fn is_fresh(&self) -> bool {
        self.state() == CacheState::Fresh
    }

    /// Fresh and holding at least one quote; the only state in which a
    /// refresh is skipped.
    pub fn is_fresh_and_populated(&self) -> bool {
        let snapshot = sync::read(&self.inner, "Live quote cache");
        !snapshot.quotes.is_empty() && self.state_of(&snapshot) == CacheState::Fresh
    }

    /// Cached quote regardless of freshness.
    pub fn get(&self, instrument_id: InstrumentId) -> Option<LiveQuote> {
        sync::read(&self.inner, "Live quote cache")
            .quotes
            .get(&instrument_id)
            .cloned()
    }

    /// Current quotes snapshot.
    pub fn quotes(&self) -> Arc<LiveQuoteMap> {
        sync::read(&self.inner, "Live quote cache").quotes.clone()
    }

    pub fn len(&self) -> usize {
        sync::read(&self.inner, "Live quote cache").quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        sync::read(&self.inner, "Live quote cache").fetched_at
    }

    /// Drop the fetch time so the next freshness check fails. Quotes stay.
    pub fn force_stale(&self) {
        sync::write(&self.inner, "Live quote cache").fetched_at = None;
        debug!("Live quote cache forced stale");
    }

    /// Replace all quotes and the fetch time in one step.
    pub fn replace(&self, quotes: LiveQuoteMap, fetched_at: DateTime<Utc>) -> Arc<LiveQuoteMap> {
        let quotes = Arc::new(quotes);
        let mut snapshot = sync::write(&self.inner, "Live quote cache");
        snapshot.quotes = quotes.clone();
        snapshot.fetched_at = Some(fetched_at);
        quotes
    }

    pub fn status(
        &self,
        total_count: usize,
        provider_available: bool,
        bucket: &str,
    ) -> CacheStatus {
        let snapshot = sync::read(&self.inner, "Live quote cache");
        let state = self.state_of(&snapshot);
        let age_seconds = snapshot
            .fetched_at
            .map(|t| (self.clock.now() - t).num_seconds().max(0) as u64);

        CacheStatus {
            is_fresh: state == CacheState::Fresh,
            state,
            age_seconds,
            fetched_at: snapshot.fetched_at,
            cached_count: snapshot.quotes.len(),
            total_count,
            provider_available,
            bucket: bucket.to_string(),
        }
    }
}
