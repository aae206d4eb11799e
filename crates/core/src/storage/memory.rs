use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ObjectStore, StorageError};
use crate::utils::sync;

type ObjectKey = (String, String);

/// Process-local object store, for tests and demos.
///
/// Keys can be marked as failing to simulate backend errors other than
/// "not found".
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<ObjectKey, Vec<u8>>>,
    failing: Mutex<HashSet<ObjectKey>>,
    reads: Mutex<Vec<ObjectKey>>,
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    sync::lock(mutex, "In-memory object store")
}

fn object_key(bucket: &str, key: &str) -> ObjectKey {
    (bucket.to_string(), key.to_string())
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object synchronously.
    pub fn insert(&self, bucket: &str, key: &str, bytes: impl Into<Vec<u8>>) {
        lock(&self.objects).insert(object_key(bucket, key), bytes.into());
    }

    /// Make every operation on this key fail with [`StorageError::Backend`].
    pub fn fail_key(&self, bucket: &str, key: &str) {
        lock(&self.failing).insert(object_key(bucket, key));
    }

    /// Current contents of an object, if present.
    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        lock(&self.objects).get(&object_key(bucket, key)).cloned()
    }

    /// Keys read through [`ObjectStore::get`], in call order.
    pub fn reads(&self) -> Vec<String> {
        lock(&self.reads).iter().map(|(_, k)| k.clone()).collect()
    }

    fn check_failing(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        if lock(&self.failing).contains(&object_key(bucket, key)) {
            return Err(StorageError::backend(bucket, key, "injected failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        lock(&self.reads).push(object_key(bucket, key));
        self.check_failing(bucket, key)?;
        lock(&self.objects)
            .get(&object_key(bucket, key))
            .cloned()
            .ok_or_else(|| StorageError::not_found(bucket, key))
    }

    async fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        self.check_failing(bucket, key)?;
        lock(&self.objects).insert(object_key(bucket, key), bytes);
        Ok(())
    }

    async fn head_exists(&self, bucket: &str, key: &str) -> Result<bool, StorageError> {
        self.check_failing(bucket, key)?;
        Ok(lock(&self.objects).contains_key(&object_key(bucket, key)))
    }
}
