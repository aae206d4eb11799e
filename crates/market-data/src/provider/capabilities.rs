//! Rate limiting configuration for quote providers.

use std::time::Duration;

/// Rate limiting configuration for a provider.
///
/// Controls how large a single request may be and how long to wait
/// between consecutive requests so the provider does not block us.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimit {
    /// Maximum instrument ids accepted in one quote request.
    pub max_instruments_per_request: usize,

    /// Minimum delay between requests.
    pub min_delay: Duration,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            max_instruments_per_request: 1000,
            min_delay: Duration::from_secs(1),
        }
    }
}
