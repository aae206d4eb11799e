//! Chartfeed Market Data Crate
//!
//! Provider-agnostic access to live quotes for the charting backend.
//!
//! # Overview
//!
//! The crate supports:
//! - Bulk live-quote fetching keyed by numeric instrument id
//! - A provider trait so the core layer never depends on a concrete vendor
//! - Error classification that separates "skip this batch" from "stop the cycle"
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |   Core Layer     | --> |  QuoteProvider   |  (trait object, optional)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  DhanProvider    |  (HTTP market feed)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    LiveQuote     |  (instrument id -> OHLC/LTP)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`LiveQuote`] - Latest quote for one instrument
//! - [`Ohlc`] - Session open/high/low/close, each optional
//! - [`ExchangeSegment`] - Exchange segment a batch is requested for
//! - [`MarketDataError`] - Provider errors with [`RetryClass`]

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::{MarketDataError, RetryClass};

pub use models::{ExchangeSegment, InstrumentId, LiveQuote, LiveQuoteMap, Ohlc};

pub use provider::dhan::DhanProvider;
pub use provider::{QuoteProvider, RateLimit};
