//! Dhan market feed provider implementation.
//!
//! Fetches live quotes for up to 1000 instruments per request.
//!
//! # API Endpoints
//!
//! - Quote snapshot: `POST https://api.dhan.co/v2/marketfeed/quote`
//!   with body `{"NSE_EQ": [1333, 11536]}`
//!
//! # Response Format
//!
//! `{"status": "success", "data": {"NSE_EQ": {"1333": {"last_price": .., "ohlc": {..}, "volume": ..}}}}`
//!
//! Security ids come back as string keys.

mod models;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};

use crate::errors::MarketDataError;
use crate::models::{ExchangeSegment, InstrumentId, LiveQuote, LiveQuoteMap, Ohlc};
use crate::provider::{QuoteProvider, RateLimit};

use models::{DhanQuoteData, DhanQuoteResponse};

const BASE_URL: &str = "https://api.dhan.co/v2";
const PROVIDER_ID: &str = "DHAN";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Dhan accepts at most this many instruments per quote request
const MAX_INSTRUMENTS_PER_REQUEST: usize = 1000;

/// Dhan allows one quote request per second
const MIN_REQUEST_DELAY: Duration = Duration::from_secs(1);

/// Dhan market feed provider.
///
/// # Example
///
/// ```ignore
/// let provider = DhanProvider::from_credentials(client_id, access_token);
/// if let Some(provider) = provider {
///     let quotes = provider.fetch_quotes(ExchangeSegment::NseEquity, &[1333]).await?;
/// }
/// ```
pub struct DhanProvider {
    client: Client,
    client_id: String,
    access_token: String,
    base_url: String,
}

impl DhanProvider {
    /// Create a new provider with the given credentials.
    pub fn new(client_id: String, access_token: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            client_id,
            access_token,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Build a provider only when both credentials are present and non-blank.
    ///
    /// `None` is the permanent "unavailable" state: the caller runs without
    /// live quotes.
    pub fn from_credentials(
        client_id: Option<String>,
        access_token: Option<String>,
    ) -> Option<Self> {
        let client_id = client_id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        let access_token = access_token
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        match (client_id, access_token) {
            (Some(id), Some(token)) => Some(Self::new(id, token)),
            _ => None,
        }
    }

    /// Point the provider at a different API root (sandbox, local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn map_transport_error(e: reqwest::Error) -> MarketDataError {
        if e.is_timeout() {
            MarketDataError::Timeout {
                provider: PROVIDER_ID.to_string(),
            }
        } else {
            MarketDataError::Network(e)
        }
    }

    /// Turn the parsed payload into live quotes for one segment.
    fn parse_quotes(
        response: DhanQuoteResponse,
        exchange: ExchangeSegment,
    ) -> Result<LiveQuoteMap, MarketDataError> {
        if let Some(status) = response.status.as_deref() {
            if !status.eq_ignore_ascii_case("success") {
                return Err(MarketDataError::MalformedResponse {
                    provider: PROVIDER_ID.to_string(),
                    message: format!(
                        "API returned status: {} ({})",
                        status,
                        response
                            .error_message
                            .or(response.error_code)
                            .unwrap_or_else(|| "no remarks".to_string())
                    ),
                });
            }
        }

        let mut segments = response
            .data
            .ok_or_else(|| MarketDataError::MalformedResponse {
                provider: PROVIDER_ID.to_string(),
                message: "No data in response".to_string(),
            })?;

        // A successful response without the segment quoted nothing
        let Some(entries) = segments.remove(exchange.as_str()) else {
            warn!("No {} segment in successful quote response", exchange);
            return Ok(LiveQuoteMap::new());
        };

        let mut quotes = HashMap::with_capacity(entries.len());
        for (raw_id, data) in entries {
            let instrument_id = match raw_id.trim().parse::<InstrumentId>() {
                Ok(id) => id,
                Err(_) => {
                    warn!("Skipping quote with non-numeric security id '{}'", raw_id);
                    continue;
                }
            };
            match Self::to_live_quote(instrument_id, data) {
                Some(quote) => {
                    quotes.insert(instrument_id, quote);
                }
                None => debug!("Skipping quote for {}: no price", instrument_id),
            }
        }

        Ok(quotes)
    }

    fn to_live_quote(instrument_id: InstrumentId, data: DhanQuoteData) -> Option<LiveQuote> {
        let ohlc = data.ohlc.unwrap_or_default();
        let last_price = data.last_price.or(ohlc.close)?;

        Some(LiveQuote::with_ohlc(
            instrument_id,
            Ohlc {
                open: ohlc.open,
                high: ohlc.high,
                low: ohlc.low,
                close: ohlc.close,
            },
            last_price,
            data.volume.unwrap_or(0.0),
        ))
    }
}

#[async_trait]
impl QuoteProvider for DhanProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            max_instruments_per_request: MAX_INSTRUMENTS_PER_REQUEST,
            min_delay: MIN_REQUEST_DELAY,
        }
    }

    async fn fetch_quotes(
        &self,
        exchange: ExchangeSegment,
        instrument_ids: &[InstrumentId],
    ) -> Result<LiveQuoteMap, MarketDataError> {
        if instrument_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let url = format!("{}/marketfeed/quote", self.base_url);
        let mut body = HashMap::new();
        body.insert(exchange.as_str(), instrument_ids);

        let response = self
            .client
            .post(&url)
            .header("access-token", &self.access_token)
            .header("client-id", &self.client_id)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let message = response.text().await.unwrap_or_default();
            return Err(MarketDataError::Unauthorized {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {}: {}", status, message),
            });
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if !status.is_success() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP error: {}", status),
            });
        }

        let response_text = response.text().await.map_err(Self::map_transport_error)?;
        let parsed: DhanQuoteResponse =
            serde_json::from_str(&response_text).map_err(|e| MarketDataError::MalformedResponse {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse response: {}", e),
            })?;

        Self::parse_quotes(parsed, exchange)
    }
}
