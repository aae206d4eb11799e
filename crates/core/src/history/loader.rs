use std::sync::Arc;

use chartfeed_market_data::InstrumentId;
use log::{debug, error, warn};

use super::{parse_series, HistoricalBar, HistoryError};
use crate::storage::ObjectStore;

/// Reads per-instrument series, searching an ordered list of prefixes.
pub struct HistoricalBarLoader {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    prefixes: Vec<String>,
}

impl HistoricalBarLoader {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>, prefixes: Vec<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            prefixes,
        }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Object key of an instrument's series under `prefix`.
    pub fn series_key(prefix: &str, instrument_id: InstrumentId) -> String {
        format!("{}/{}.csv", prefix.trim_end_matches('/'), instrument_id)
    }

    /// Load one instrument's series.
    ///
    /// A missing key advances to the next prefix. The first object found is
    /// authoritative: if it is unusable, later prefixes are not consulted. Any
    /// other storage error ends the search.
    pub async fn load_series(
        &self,
        instrument_id: InstrumentId,
    ) -> Result<Vec<HistoricalBar>, HistoryError> {
        for prefix in &self.prefixes {
            let key = Self::series_key(prefix, instrument_id);
            let bytes = match self.store.get(&self.bucket, &key).await {
                Ok(bytes) => bytes,
                Err(e) if e.is_not_found() => {
                    debug!(
                        "No series for instrument {} at {}/{}",
                        instrument_id, self.bucket, key
                    );
                    continue;
                }
                Err(e) => {
                    error!(
                        "Storage error loading series for instrument {} at {}/{}: {}",
                        instrument_id, self.bucket, key, e
                    );
                    return Err(HistoryError::Storage {
                        instrument_id,
                        source: e,
                    });
                }
            };

            let bars = parse_series(&bytes).map_err(|source| {
                warn!(
                    "Unusable series for instrument {} at {}/{}: {}",
                    instrument_id, self.bucket, key, source
                );
                HistoryError::Schema {
                    instrument_id,
                    key: key.clone(),
                    source,
                }
            })?;

            if bars.is_empty() {
                warn!(
                    "Series for instrument {} at {}/{} has no valid rows",
                    instrument_id, self.bucket, key
                );
                return Err(HistoryError::Empty { instrument_id, key });
            }

            debug!(
                "Loaded {} bars for instrument {} from {}/{}",
                bars.len(),
                instrument_id,
                self.bucket,
                key
            );
            return Ok(bars);
        }

        warn!(
            "No historical series for instrument {} in any of {:?}",
            instrument_id, self.prefixes
        );
        Err(HistoryError::NotFound { instrument_id })
    }
}
