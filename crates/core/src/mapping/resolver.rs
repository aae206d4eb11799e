use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use log::{debug, error, info, warn};
use tokio::sync::Mutex;

use super::model::normalize_symbol;
use super::parser::{parse_mapping, write_mapping};
use super::{InstrumentMapping, InstrumentRecord};
use crate::storage::ObjectStore;
use crate::utils::sync;

/// Loads and caches the symbol -> instrument mapping table.
///
/// Fails soft: every anomaly is logged and answered with an empty mapping.
/// The cached snapshot is re-resolved only while it is empty.
///
/// Symbol lookups that miss the mapping fall back to an optional master
/// stocklist. Stocklist hits are remembered but never join the snapshot, so
/// they do not widen the live refresh universe.
pub struct MappingResolver {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    key: String,
    stocklist_key: Option<String>,
    cached: RwLock<Arc<InstrumentMapping>>,
    stocklist_hits: RwLock<HashMap<String, InstrumentRecord>>,
    load_lock: Mutex<()>,
}

impl MappingResolver {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            key: key.into(),
            stocklist_key: None,
            cached: RwLock::new(Arc::new(InstrumentMapping::empty())),
            stocklist_hits: RwLock::new(HashMap::new()),
            load_lock: Mutex::new(()),
        }
    }

    /// Consult `key` for symbols the mapping table does not know.
    pub fn with_stocklist(mut self, key: impl Into<String>) -> Self {
        self.stocklist_key = Some(key.into()).filter(|k: &String| !k.is_empty());
        self
    }

    /// Cached snapshot without touching storage.
    pub fn current(&self) -> Arc<InstrumentMapping> {
        sync::read(&self.cached, "Mapping").clone()
    }

    /// Return the cached mapping, loading it first if the cache is empty.
    pub async fn resolve(&self) -> Arc<InstrumentMapping> {
        let current = self.current();
        if !current.is_empty() {
            return current;
        }

        let _guard = self.load_lock.lock().await;
        // Another caller may have loaded it while we waited
        let current = self.current();
        if !current.is_empty() {
            return current;
        }
        self.load_and_store().await
    }

    /// Reload from storage and replace the cached snapshot unconditionally.
    pub async fn reload(&self) -> Arc<InstrumentMapping> {
        let _guard = self.load_lock.lock().await;
        self.load_and_store().await
    }

    /// Look a symbol up, forcing one reload if it is not in the cached mapping
    /// and then trying the stocklist.
    pub async fn instrument_for_symbol(&self, symbol: &str) -> Option<InstrumentRecord> {
        let normalized = normalize_symbol(symbol);
        if normalized.is_empty() {
            return None;
        }

        if let Some(record) = self.resolve().await.get_by_symbol(&normalized) {
            return Some(record.clone());
        }
        let remembered = sync::read(&self.stocklist_hits, "Stocklist")
            .get(&normalized)
            .cloned();
        if remembered.is_some() {
            return remembered;
        }

        debug!("Symbol {} not in cached mapping; reloading", normalized);
        if let Some(record) = self.reload_keeping_previous().await.get_by_symbol(&normalized) {
            return Some(record.clone());
        }

        let found = self.lookup_stocklist(&normalized).await;
        if found.is_none() {
            warn!("Symbol {} not found in mapping or stocklist", normalized);
        }
        found
    }

    /// Reload, but keep the cached snapshot if the table cannot be read.
    async fn reload_keeping_previous(&self) -> Arc<InstrumentMapping> {
        let _guard = self.load_lock.lock().await;
        match self.try_load().await {
            Some(mapping) => {
                let mapping = Arc::new(mapping);
                *sync::write(&self.cached, "Mapping") = mapping.clone();
                mapping
            }
            None => {
                let current = self.current();
                warn!(
                    "Mapping reload failed; keeping cached snapshot of {} instruments",
                    current.len()
                );
                current
            }
        }
    }

    async fn lookup_stocklist(&self, symbol: &str) -> Option<InstrumentRecord> {
        let key = self.stocklist_key.as_deref()?;
        let bytes = match self.store.get(&self.bucket, key).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Could not load stocklist {}/{}: {}", self.bucket, key, e);
                return None;
            }
        };
        let stocklist = match parse_mapping(&bytes) {
            Ok(stocklist) => stocklist,
            Err(e) => {
                error!("Rejected stocklist {}/{}: {}", self.bucket, key, e);
                return None;
            }
        };

        let record = stocklist.get_by_symbol(symbol)?.clone();
        info!(
            "Resolved {} to instrument {} from stocklist {}/{}",
            symbol, record.instrument_id, self.bucket, key
        );
        sync::write(&self.stocklist_hits, "Stocklist").insert(symbol.to_string(), record.clone());
        Some(record)
    }

    async fn load_and_store(&self) -> Arc<InstrumentMapping> {
        let mapping = Arc::new(self.try_load().await.unwrap_or_else(InstrumentMapping::empty));
        *sync::write(&self.cached, "Mapping") = mapping.clone();
        mapping
    }

    /// `None` when the table exists but cannot be read or is rejected.
    async fn try_load(&self) -> Option<InstrumentMapping> {
        let mapping = match self.store.get(&self.bucket, &self.key).await {
            Ok(bytes) => match parse_mapping(&bytes) {
                Ok(mapping) => {
                    info!(
                        "Loaded mapping {}/{} with {} instruments",
                        self.bucket,
                        self.key,
                        mapping.len()
                    );
                    mapping
                }
                Err(e) => {
                    error!("Rejected mapping {}/{}: {}", self.bucket, self.key, e);
                    return None;
                }
            },
            Err(e) if e.is_not_found() => self.seed_sample().await,
            Err(e) => {
                error!("Failed to load mapping {}/{}: {}", self.bucket, self.key, e);
                return None;
            }
        };
        Some(mapping)
    }

    /// Persist the built-in sample so later runs observe the same table.
    async fn seed_sample(&self) -> InstrumentMapping {
        let sample = InstrumentMapping::sample();
        info!(
            "Mapping {}/{} not found; seeding sample with {} instruments",
            self.bucket,
            self.key,
            sample.len()
        );
        match write_mapping(&sample) {
            Ok(bytes) => {
                if let Err(e) = self.store.put(&self.bucket, &self.key, bytes).await {
                    warn!(
                        "Could not persist sample mapping to {}/{}: {}",
                        self.bucket, self.key, e
                    );
                }
            }
            Err(e) => warn!("Could not serialize sample mapping: {}", e),
        }
        sample
    }
}
