pub mod error;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
pub use error::StorageError;

/// Trait defining object storage operations
///
/// `bucket` and `region` are per-call overrides sourced from the job
/// description; `None` falls back to the client's configured defaults.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Download the object at `key`.
    async fn get_data<'a>(
        &self,
        key: &str,
        bucket: Option<&'a str>,
        region: Option<&'a str>,
    ) -> Result<Bytes, StorageError>;

    /// Upload `data` under `key`, applying the configured ACL and storage
    /// class.
    async fn put_data<'a>(
        &self,
        data: Bytes,
        key: &str,
        bucket: Option<&'a str>,
        region: Option<&'a str>,
    ) -> Result<(), StorageError>;
}
