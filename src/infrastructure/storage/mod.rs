//! Object store seam.
//!
//! The upload pipeline writes through [`ObjectStore::put_object`] and every read
//! of a video asks [`ObjectStore::presign_get`] for a fresh capability. The S3
//! implementation lives in [`s3`]; tests substitute their own.

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub mod s3;

pub use s3::S3Storage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("upload of {key} failed: {reason}")]
    UploadFailed { key: String, reason: String },

    #[error("presigning {key} failed: {reason}")]
    PresignFailed { key: String, reason: String },

    #[error("couldn't read upload body: {0}")]
    Body(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Single atomic put of the file at `source`. A failed call leaves no object
    /// the caller may treat as stored.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        source: &Path,
        content_type: &str,
    ) -> StorageResult<()>;

    /// Issue a time-bounded GET URL for one object.
    async fn presign_get(&self, bucket: &str, key: &str, ttl: Duration) -> StorageResult<String>;
}
