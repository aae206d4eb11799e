use thiserror::Error;

/// Errors raised by an [`ObjectStore`](super::ObjectStore) backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The key is absent. Expected, and drives fallback search.
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// Any other backend failure (permissions, network, throttling).
    #[error("Storage backend failed for {bucket}/{key}: {message}")]
    Backend {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn not_found(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NotFound {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    pub fn backend(
        bucket: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Backend {
            bucket: bucket.into(),
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(StorageError::not_found("b", "k").is_not_found());
        assert!(!StorageError::backend("b", "k", "denied").is_not_found());
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert!(!StorageError::from(io).is_not_found());
    }

    #[test]
    fn test_display_includes_location() {
        let err = StorageError::backend("charts", "eod_data/1.csv", "AccessDenied");
        assert_eq!(
            err.to_string(),
            "Storage backend failed for charts/eod_data/1.csv: AccessDenied"
        );
    }
}
