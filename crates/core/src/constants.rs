//! Defaults shared by configuration and services.

/// Bucket holding the mapping table and historical series
pub const DEFAULT_BUCKET: &str = "mytradeapp-csv-data";

/// Key of the symbol -> instrument mapping table
pub const DEFAULT_MAPPING_KEY: &str = "uploads/mapping.csv";

/// Master stocklist consulted for symbols the mapping table lacks
pub const DEFAULT_STOCKLIST_KEY: &str =
    "uploads/master_marketsmithindia_data_marketcap_gt500cr.csv";

/// Primary location of per-instrument end-of-day series
pub const PRIMARY_HISTORY_PREFIX: &str = "eod_data";

/// Backup location, consulted only when the primary has no object
pub const BACKUP_HISTORY_PREFIX: &str = "stock_dump_eod";

/// Live quotes older than this are stale
pub const LIVE_QUOTE_TTL_SECS: u64 = 600;

/// Instruments per upstream quote request
pub const QUOTE_BATCH_SIZE: usize = 1000;

/// Pause between upstream quote requests
pub const QUOTE_BATCH_DELAY_MS: u64 = 1000;
