//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all provider operations
//! - [`RetryClass`]: Classification for determining how a refresh cycle proceeds

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur while fetching live quotes.
///
/// Each variant is classified into a [`RetryClass`] via the
/// [`retry_class`](Self::retry_class) method.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// No provider is configured (missing credentials).
    /// This is a valid, permanent state rather than a transient error.
    #[error("Provider unavailable: {provider}")]
    Unavailable {
        /// The provider that is not configured
        provider: String,
    },

    /// The provider rejected the credentials (HTTP 401/403).
    #[error("Unauthorized: {provider} - {message}")]
    Unauthorized {
        /// The provider that rejected the request
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred (HTTP 5xx, unexpected status).
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider answered, but the payload did not have the expected shape.
    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse {
        /// The provider that returned the payload
        provider: String,
        /// What was wrong with it
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// - [`RetryClass::SkipBatch`]: log, drop this batch, continue with the next
    /// - [`RetryClass::Abort`]: log, stop issuing requests for this cycle
    ///
    /// # Examples
    ///
    /// ```
    /// use chartfeed_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::RateLimited { provider: "DHAN".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::SkipBatch);
    ///
    /// let error = MarketDataError::Unavailable { provider: "DHAN".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::Abort);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::Unavailable { .. } | Self::Unauthorized { .. } => RetryClass::Abort,

            Self::RateLimited { .. }
            | Self::Timeout { .. }
            | Self::ProviderError { .. }
            | Self::MalformedResponse { .. }
            | Self::Network(_) => RetryClass::SkipBatch,
        }
    }

    /// Returns true if the error is permanent for the current cycle.
    pub fn is_permanent(&self) -> bool {
        self.retry_class() == RetryClass::Abort
    }
}
