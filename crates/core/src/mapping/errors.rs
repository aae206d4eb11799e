use thiserror::Error;

/// Errors that make a mapping table unusable as a whole.
///
/// Bad individual rows are not errors; they are dropped during parsing.
#[derive(Error, Debug)]
pub enum MappingError {
    #[error("Mapping table is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Mapping table is not valid CSV: {0}")]
    Csv(#[from] csv::Error),
}
