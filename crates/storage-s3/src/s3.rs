use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use chartfeed_core::storage::{ObjectStore, StorageError};
use log::{debug, info};

/// Connection settings for [`S3ObjectStore`].
#[derive(Debug, Clone, Default)]
pub struct S3Settings {
    /// Region override; otherwise the default AWS provider chain decides.
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible stores. Enables path-style addressing.
    pub endpoint: Option<String>,
}

/// Object store backed by Amazon S3.
#[derive(Clone, Debug)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the default AWS credential and region chain.
    pub async fn connect(settings: &S3Settings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &settings.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &settings.endpoint {
            builder = builder.endpoint_url(endpoint.clone()).force_path_style(true);
        }
        info!(
            "S3 object store ready (region: {})",
            shared
                .region()
                .map(|r| r.as_ref().to_string())
                .unwrap_or_else(|| "unset".to_string())
        );
        Self::new(Client::from_conf(builder.build()))
    }
}

fn backend_error(bucket: &str, key: &str, err: impl std::error::Error) -> StorageError {
    StorageError::backend(bucket, key, DisplayErrorContext(err).to_string())
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let response = match self.client.get_object().bucket(bucket).key(key).send().await {
            Ok(response) => response,
            Err(err) => {
                let missing = err
                    .as_service_error()
                    .map(|e| e.is_no_such_key())
                    .unwrap_or(false)
                    || err.raw_response().map(|r| r.status().as_u16()) == Some(404);
                if missing {
                    return Err(StorageError::not_found(bucket, key));
                }
                return Err(backend_error(bucket, key, err));
            }
        };

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| backend_error(bucket, key, e))?;
        let bytes = data.into_bytes().to_vec();
        debug!("Read s3://{}/{} ({} bytes)", bucket, key, bytes.len());
        Ok(bytes)
    }

    async fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        let len = bytes.len();
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| backend_error(bucket, key, e))?;
        debug!("Wrote s3://{}/{} ({} bytes)", bucket, key, len);
        Ok(())
    }

    async fn head_exists(&self, bucket: &str, key: &str) -> Result<bool, StorageError> {
        match self.client.head_object().bucket(bucket).key(key).send().await {
            Ok(_) => Ok(true),
            Err(err) => {
                let missing = err
                    .as_service_error()
                    .map(|e| e.is_not_found())
                    .unwrap_or(false)
                    || err.raw_response().map(|r| r.status().as_u16()) == Some(404);
                if missing {
                    Ok(false)
                } else {
                    Err(backend_error(bucket, key, err))
                }
            }
        }
    }
}
