use std::collections::HashMap;

use super::quote::LiveQuote;

/// Numeric instrument (security) id assigned by the exchange feed
pub type InstrumentId = u64;

/// Live quotes keyed by instrument id
pub type LiveQuoteMap = HashMap<InstrumentId, LiveQuote>;
