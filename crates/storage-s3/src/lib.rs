//! Chartfeed Storage - durable [`ObjectStore`](chartfeed_core::storage::ObjectStore) backends.
//!
//! - **S3** (`s3.rs`) - Amazon S3 or any S3-compatible endpoint
//! - **Local directory** (`fs.rs`) - `{root}/{bucket}/{key}` files, for development

pub mod fs;
pub mod s3;

pub use fs::FsObjectStore;
pub use s3::{S3ObjectStore, S3Settings};
