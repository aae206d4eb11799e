//! Per-instrument historical series.
//!
//! Series live in the object store as `{prefix}/{instrument_id}.csv` under an
//! ordered list of prefixes (primary, then backup).

pub mod errors;
pub mod loader;
pub mod model;
pub mod parser;


pub use errors::{HistoryError, SeriesParseError};
pub use loader::HistoricalBarLoader;
pub use model::HistoricalBar;
pub use parser::{parse_series, parse_timestamp, REQUIRED_COLUMNS};
