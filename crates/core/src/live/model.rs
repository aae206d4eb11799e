use std::sync::Arc;

use chartfeed_market_data::LiveQuoteMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Freshness state of the live quote cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CacheState {
    /// Never fetched
    Empty,
    /// Fetched less than one TTL ago
    Fresh,
    /// TTL elapsed, or forced stale
    Stale,
}

/// Snapshot of cache health for the request layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatus {
    pub is_fresh: bool,
    pub state: CacheState,
    /// `None` while the cache has no fetch time (never fetched or forced stale).
    pub age_seconds: Option<u64>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub cached_count: usize,
    pub total_count: usize,
    pub provider_available: bool,
    pub bucket: String,
}

/// Why a refresh call did not contact the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    CacheFresh,
    /// Another caller's cycle finished while this one waited for it.
    JoinedInFlightCycle,
    ProviderUnavailable,
    EmptyUniverse,
}

/// What one refresh cycle did.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReport {
    pub batches_total: usize,
    pub batches_succeeded: usize,
    /// 1-based batch numbers that failed or were never sent after an abort.
    pub failed_batches: Vec<usize>,
    pub quotes_cached: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
    /// A permanent provider error stopped the cycle early.
    pub aborted: bool,
    /// Whether the cache content and fetch time were replaced.
    pub cache_replaced: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

impl RefreshReport {
    pub fn skipped(reason: SkipReason) -> Self {
        Self {
            skipped: Some(reason),
            ..Self::default()
        }
    }
}

/// Quotes a refresh call answers with, plus its report.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub quotes: Arc<LiveQuoteMap>,
    pub report: RefreshReport,
}
