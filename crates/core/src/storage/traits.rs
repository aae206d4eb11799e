use async_trait::async_trait;

use super::StorageError;

/// Bucket/key object store consumed by the core layer.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read the whole object. A missing key is [`StorageError::NotFound`].
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Write (create or overwrite) an object.
    async fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<(), StorageError>;

    /// Whether the key exists, without reading it.
    async fn head_exists(&self, bucket: &str, key: &str) -> Result<bool, StorageError>;
}
