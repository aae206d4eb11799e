//! Tests for MappingResolver loading, seeding and lookup.

#[cfg(test)]
mod tests {
    use crate::mapping::{parse_mapping, InstrumentMapping, MappingResolver};
    use crate::storage::{InMemoryObjectStore, ObjectStore, StorageError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const BUCKET: &str = "charts";
    const KEY: &str = "uploads/mapping.csv";
    const STOCKLIST: &str = "uploads/master_list.csv";

    fn resolver(store: Arc<InMemoryObjectStore>) -> MappingResolver {
        MappingResolver::new(store, BUCKET, KEY)
    }

    // =========================================================================
    // Counting store wrapper
    // =========================================================================

    struct CountingStore {
        inner: Arc<InMemoryObjectStore>,
        gets: AtomicUsize,
    }

    #[async_trait]
    impl ObjectStore for CountingStore {
        async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            self.inner.get(bucket, key).await
        }

        async fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
            self.inner.put(bucket, key, bytes).await
        }

        async fn head_exists(&self, bucket: &str, key: &str) -> Result<bool, StorageError> {
            self.inner.head_exists(bucket, key).await
        }
    }

    #[tokio::test]
    async fn test_missing_object_seeds_and_persists_sample() {
        let store = Arc::new(InMemoryObjectStore::new());
        let mapping = resolver(store.clone()).resolve().await;

        assert_eq!(mapping.records(), InstrumentMapping::sample().records());
        let persisted = store.object(BUCKET, KEY).expect("sample should be written");
        let reparsed = parse_mapping(&persisted).unwrap();
        assert_eq!(reparsed.len(), mapping.len());
    }

    #[tokio::test]
    async fn test_missing_columns_returns_empty_and_does_not_seed() {
        let store = Arc::new(InMemoryObjectStore::new());
        store.insert(BUCKET, KEY, "Stock Name,Instrument ID\nTCS,11536\n");

        let mapping = resolver(store.clone()).resolve().await;

        assert!(mapping.is_empty());
        // Original object left as it was
        assert_eq!(
            store.object(BUCKET, KEY).unwrap(),
            b"Stock Name,Instrument ID\nTCS,11536\n".to_vec()
        );
    }

    #[tokio::test]
    async fn test_backend_error_returns_empty_and_does_not_seed() {
        let store = Arc::new(InMemoryObjectStore::new());
        store.fail_key(BUCKET, KEY);

        let mapping = resolver(store.clone()).resolve().await;

        assert!(mapping.is_empty());
        assert!(store.object(BUCKET, KEY).is_none());
    }

    #[tokio::test]
    async fn test_seed_put_failure_still_returns_sample() {
        struct ReadOnlyStore;

        #[async_trait]
        impl ObjectStore for ReadOnlyStore {
            async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
                Err(StorageError::not_found(bucket, key))
            }
            async fn put(&self, bucket: &str, key: &str, _: Vec<u8>) -> Result<(), StorageError> {
                Err(StorageError::backend(bucket, key, "read only"))
            }
            async fn head_exists(&self, _: &str, _: &str) -> Result<bool, StorageError> {
                Ok(false)
            }
        }

        let resolver = MappingResolver::new(Arc::new(ReadOnlyStore), BUCKET, KEY);
        assert!(!resolver.resolve().await.is_empty());
    }

    #[tokio::test]
    async fn test_non_empty_mapping_is_cached() {
        let inner = Arc::new(InMemoryObjectStore::new());
        inner.insert(
            BUCKET,
            KEY,
            "Stock Name,Instrument ID,Market Cap,Setup_Case\nACME,7,1,A\n",
        );
        let store = Arc::new(CountingStore {
            inner,
            gets: AtomicUsize::new(0),
        });
        let resolver = MappingResolver::new(store.clone(), BUCKET, KEY);

        resolver.resolve().await;
        resolver.resolve().await;

        assert_eq!(store.gets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_mapping_is_re_resolved() {
        let inner = Arc::new(InMemoryObjectStore::new());
        inner.insert(BUCKET, KEY, "Stock Name,Instrument ID,Market Cap,Setup_Case\n");
        let store = Arc::new(CountingStore {
            inner: inner.clone(),
            gets: AtomicUsize::new(0),
        });
        let resolver = MappingResolver::new(store.clone(), BUCKET, KEY);

        assert!(resolver.resolve().await.is_empty());
        inner.insert(
            BUCKET,
            KEY,
            "Stock Name,Instrument ID,Market Cap,Setup_Case\nACME,7,1,A\n",
        );
        let mapping = resolver.resolve().await;

        assert_eq!(mapping.instrument_ids(), vec![7]);
        assert_eq!(store.gets.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_reload_replaces_snapshot_wholesale() {
        let store = Arc::new(InMemoryObjectStore::new());
        store.insert(
            BUCKET,
            KEY,
            "Stock Name,Instrument ID,Market Cap,Setup_Case\nOLD,1,1,A\n",
        );
        let resolver = resolver(store.clone());
        let before = resolver.resolve().await;

        store.insert(
            BUCKET,
            KEY,
            "Stock Name,Instrument ID,Market Cap,Setup_Case\nNEW,2,1,A\n",
        );
        let after = resolver.reload().await;

        // Earlier snapshot is unchanged
        assert_eq!(before.instrument_ids(), vec![1]);
        assert_eq!(after.instrument_ids(), vec![2]);
        assert!(resolver.current().get_by_symbol("OLD").is_none());
    }

    #[tokio::test]
    async fn test_symbol_lookup_reloads_once_on_miss() {
        let store = Arc::new(InMemoryObjectStore::new());
        store.insert(
            BUCKET,
            KEY,
            "Stock Name,Instrument ID,Market Cap,Setup_Case\nACME,1,1,A\n",
        );
        let resolver = resolver(store.clone());
        resolver.resolve().await;

        store.insert(
            BUCKET,
            KEY,
            "Stock Name,Instrument ID,Market Cap,Setup_Case\nACME,1,1,A\nNEWCO,2,1,B\n",
        );

        let found = resolver.instrument_for_symbol(" newco ").await.unwrap();
        assert_eq!(found.instrument_id, 2);
        assert!(resolver.instrument_for_symbol("GHOST").await.is_none());
        assert!(resolver.instrument_for_symbol("   ").await.is_none());
    }

    #[tokio::test]
    async fn test_symbol_only_in_stocklist_is_resolved_and_remembered() {
        let inner = Arc::new(InMemoryObjectStore::new());
        inner.insert(
            BUCKET,
            KEY,
            "Stock Name,Instrument ID,Market Cap,Setup_Case\nTCS,11536,1,A\n",
        );
        inner.insert(
            BUCKET,
            STOCKLIST,
            "Stock Name,Instrument ID,Market Cap,Setup_Case,Sector\nTCS,1,1,A,IT\nINFY,1594,6,B,IT\n,9,1,A,IT\n",
        );
        let store = Arc::new(CountingStore {
            inner,
            gets: AtomicUsize::new(0),
        });
        let resolver = MappingResolver::new(store.clone(), BUCKET, KEY).with_stocklist(STOCKLIST);

        let found = resolver.instrument_for_symbol("infy").await.unwrap();
        assert_eq!(found.instrument_id, 1594);
        // Mapping table wins over the stocklist
        let tcs = resolver.instrument_for_symbol("TCS").await.unwrap();
        assert_eq!(tcs.instrument_id, 11536);
        // Stocklist symbols stay out of the refresh universe
        assert_eq!(resolver.current().instrument_ids(), vec![11536]);

        let gets = store.gets.load(Ordering::SeqCst);
        resolver.instrument_for_symbol("INFY").await;
        assert_eq!(store.gets.load(Ordering::SeqCst), gets);
    }

    #[tokio::test]
    async fn test_symbol_lookup_without_stocklist_stops_after_reload() {
        let store = Arc::new(InMemoryObjectStore::new());
        store.insert(
            BUCKET,
            KEY,
            "Stock Name,Instrument ID,Market Cap,Setup_Case\nTCS,11536,1,A\n",
        );
        store.insert(
            BUCKET,
            STOCKLIST,
            "Stock Name,Instrument ID,Market Cap,Setup_Case\nINFY,1594,6,B\n",
        );

        assert!(resolver(store).instrument_for_symbol("INFY").await.is_none());
    }

    #[tokio::test]
    async fn test_unreadable_stocklist_is_a_miss() {
        let store = Arc::new(InMemoryObjectStore::new());
        store.insert(
            BUCKET,
            KEY,
            "Stock Name,Instrument ID,Market Cap,Setup_Case\nTCS,11536,1,A\n",
        );
        store.fail_key(BUCKET, STOCKLIST);
        let resolver = resolver(store).with_stocklist(STOCKLIST);

        assert!(resolver.instrument_for_symbol("INFY").await.is_none());
        assert!(resolver.instrument_for_symbol("TCS").await.is_some());
    }

    #[tokio::test]
    async fn test_failed_reload_on_miss_keeps_cached_snapshot() {
        let store = Arc::new(InMemoryObjectStore::new());
        store.insert(
            BUCKET,
            KEY,
            "Stock Name,Instrument ID,Market Cap,Setup_Case\nACME,1,1,A\nBETA,2,1,B\n",
        );
        let resolver = resolver(store.clone());
        resolver.resolve().await;

        store.fail_key(BUCKET, KEY);
        assert!(resolver.instrument_for_symbol("GHOST").await.is_none());

        assert_eq!(resolver.current().instrument_ids(), vec![1, 2]);
        assert!(resolver.instrument_for_symbol("BETA").await.is_some());
    }
}
