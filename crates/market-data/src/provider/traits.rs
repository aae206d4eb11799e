//! Quote provider trait definitions.
//!
//! This module defines the core `QuoteProvider` trait that every live
//! quote source must implement.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{ExchangeSegment, InstrumentId, LiveQuoteMap};

use super::capabilities::RateLimit;

/// Trait for live quote providers.
///
/// Implement this trait to add support for a new quote source. The bulk
/// fetcher in the core crate only ever talks to this trait.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use chartfeed_market_data::{QuoteProvider, RateLimit};
///
/// struct MyProvider {
///     api_key: String,
/// }
///
/// #[async_trait]
/// impl QuoteProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     fn rate_limit(&self) -> RateLimit {
///         RateLimit::default()
///     }
///
///     // ... implement fetch_quotes
/// }
/// ```
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "DHAN". Used for logging and errors.
    fn id(&self) -> &'static str;

    /// Rate limiting configuration.
    fn rate_limit(&self) -> RateLimit;

    /// Fetch the latest quotes for a batch of instruments.
    ///
    /// # Arguments
    ///
    /// * `exchange` - The exchange segment the ids belong to
    /// * `instrument_ids` - At most `rate_limit().max_instruments_per_request` ids
    ///
    /// # Returns
    ///
    /// The quotes the provider returned, keyed by instrument id. Instruments the
    /// provider does not know are simply absent; that is not an error.
    async fn fetch_quotes(
        &self,
        exchange: ExchangeSegment,
        instrument_ids: &[InstrumentId],
    ) -> Result<LiveQuoteMap, MarketDataError>;
}
