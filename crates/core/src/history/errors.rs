use chartfeed_market_data::InstrumentId;
use thiserror::Error;

use crate::storage::StorageError;

/// Why a CSV object could not be turned into a series at all.
#[derive(Error, Debug)]
pub enum SeriesParseError {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Failure to produce a historical series.
///
/// Every variant is "not found" to callers; the variant says why.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// No configured location holds an object for this instrument.
    #[error("No historical series for instrument {instrument_id}")]
    NotFound { instrument_id: InstrumentId },

    /// The winning object lacks required columns or is not CSV.
    #[error("Historical series {key} for instrument {instrument_id} is unusable: {source}")]
    Schema {
        instrument_id: InstrumentId,
        key: String,
        #[source]
        source: SeriesParseError,
    },

    /// The winning object parsed but no row survived validation.
    #[error("Historical series {key} for instrument {instrument_id} has no valid rows")]
    Empty {
        instrument_id: InstrumentId,
        key: String,
    },

    /// An unexpected storage failure aborted the lookup.
    #[error("Storage failure loading series for instrument {instrument_id}: {source}")]
    Storage {
        instrument_id: InstrumentId,
        #[source]
        source: StorageError,
    },
}

impl HistoryError {
    pub fn instrument_id(&self) -> InstrumentId {
        match self {
            Self::NotFound { instrument_id }
            | Self::Schema { instrument_id, .. }
            | Self::Empty { instrument_id, .. }
            | Self::Storage { instrument_id, .. } => *instrument_id,
        }
    }

    /// Always true: callers surface every history failure as "not found".
    pub fn is_not_found(&self) -> bool {
        true
    }
}
