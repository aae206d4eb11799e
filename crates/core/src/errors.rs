//! Core error types for the chart data layer.
//!
//! Module-level errors (storage, mapping, history) carry the diagnostic
//! detail; this root type wraps them for callers that want a single type.

use thiserror::Error;

use crate::history::HistoryError;
use crate::mapping::MappingError;
use crate::storage::StorageError;
use chartfeed_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the chart data layer.
///
/// Nothing in this layer is fatal to the process: every variant describes a
/// degraded answer (no series, no live overlay), never a reason to exit.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage operation failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Mapping table error: {0}")]
    Mapping(#[from] MappingError),

    #[error("Historical series error: {0}")]
    History(#[from] HistoryError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),
}

impl Error {
    /// True when the caller should answer "not found" rather than "failed".
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::History(e) => e.is_not_found(),
            Error::SymbolNotFound(_) => true,
            Error::Storage(e) => e.is_not_found(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_not_found_is_not_found() {
        assert!(Error::SymbolNotFound("ACME".to_string()).is_not_found());
    }

    #[test]
    fn test_history_errors_are_not_found() {
        let err: Error = HistoryError::NotFound { instrument_id: 42 }.into();
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Historical series error: No historical series for instrument 42"
        );
    }

    #[test]
    fn test_config_error_is_not_not_found() {
        assert!(!Error::InvalidConfigValue("batch size".to_string()).is_not_found());
    }
}
