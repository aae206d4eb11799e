use std::time::Duration;

use chartfeed_market_data::ExchangeSegment;

use crate::constants::*;
use crate::errors::{Error, Result};

/// Core layer configuration.
///
/// Built once at process start and handed to [`ChartDataService::new`](crate::chart_data::ChartDataService::new).
#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub bucket: String,
    pub mapping_key: String,
    /// Fallback table for symbol lookups; `None` disables it.
    pub stocklist_key: Option<String>,
    /// Ordered storage prefixes for historical series; first hit wins.
    pub history_prefixes: Vec<String>,
    pub exchange: ExchangeSegment,
    pub live_ttl: Duration,
    pub batch_size: usize,
    pub batch_delay: Duration,
    /// Also pause after the final batch of a refresh cycle.
    pub pause_after_last_batch: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            mapping_key: DEFAULT_MAPPING_KEY.to_string(),
            stocklist_key: Some(DEFAULT_STOCKLIST_KEY.to_string()),
            history_prefixes: vec![
                PRIMARY_HISTORY_PREFIX.to_string(),
                BACKUP_HISTORY_PREFIX.to_string(),
            ],
            exchange: ExchangeSegment::NseEquity,
            live_ttl: Duration::from_secs(LIVE_QUOTE_TTL_SECS),
            batch_size: QUOTE_BATCH_SIZE,
            batch_delay: Duration::from_millis(QUOTE_BATCH_DELAY_MS),
            pause_after_last_batch: true,
        }
    }
}

impl CoreConfig {
    /// Read configuration from `CHARTFEED_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// Unset or blank variables keep their defaults; set but invalid values
    /// are rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let mut config = Self::default();

        if let Some(bucket) = get("CHARTFEED_BUCKET") {
            config.bucket = bucket;
        }
        if let Some(key) = get("CHARTFEED_MAPPING_KEY") {
            config.mapping_key = key;
        }
        if let Some(key) = get("CHARTFEED_STOCKLIST_KEY") {
            config.stocklist_key = (!key.eq_ignore_ascii_case("none")).then_some(key);
        }
        if let Some(prefixes) = get("CHARTFEED_HISTORY_PREFIXES") {
            config.history_prefixes = prefixes
                .split(',')
                .map(|p| p.trim().trim_matches('/').to_string())
                .filter(|p| !p.is_empty())
                .collect();
        }
        if let Some(exchange) = get("CHARTFEED_EXCHANGE") {
            config.exchange = exchange.parse().map_err(Error::InvalidConfigValue)?;
        }
        if let Some(ttl) = get("CHARTFEED_LIVE_TTL_SECS") {
            config.live_ttl = Duration::from_secs(parse_number("CHARTFEED_LIVE_TTL_SECS", &ttl)?);
        }
        if let Some(size) = get("CHARTFEED_BATCH_SIZE") {
            config.batch_size = parse_number("CHARTFEED_BATCH_SIZE", &size)?;
        }
        if let Some(delay) = get("CHARTFEED_BATCH_DELAY_MS") {
            config.batch_delay =
                Duration::from_millis(parse_number("CHARTFEED_BATCH_DELAY_MS", &delay)?);
        }
        if let Some(flag) = get("CHARTFEED_PAUSE_AFTER_LAST_BATCH") {
            config.pause_after_last_batch = parse_bool("CHARTFEED_PAUSE_AFTER_LAST_BATCH", &flag)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bucket.is_empty() {
            return Err(Error::InvalidConfigValue("bucket must not be empty".into()));
        }
        if self.mapping_key.is_empty() {
            return Err(Error::InvalidConfigValue(
                "mapping key must not be empty".into(),
            ));
        }
        if self.history_prefixes.is_empty() {
            return Err(Error::InvalidConfigValue(
                "at least one history prefix is required".into(),
            ));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidConfigValue(
                "batch size must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::InvalidConfigValue(format!("{}={}", name, value)))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::InvalidConfigValue(format!("{}={}", name, value))),
    }
}
