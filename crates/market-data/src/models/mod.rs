//! Market data models
//!
//! - `types` - Type aliases for common identifiers (InstrumentId, LiveQuoteMap)
//! - `exchange` - Exchange segment addressed by a quote request
//! - `quote` - Live quote data structures (LiveQuote, Ohlc)

mod exchange;
mod quote;
mod types;

pub use exchange::ExchangeSegment;
pub use quote::{LiveQuote, Ohlc};
pub use types::{InstrumentId, LiveQuoteMap};
