use crate::core::client::queue::QueueError;
use crate::core::client::storage::StorageError;
use crate::thumbnailer::ConvertError;
use thiserror::Error;

pub type JobResult<T> = Result<T, JobError>;

/// Error types for one job's trip through the pipeline. Any of these leaves
/// the queue message undeleted, so the transport redelivers it once the
/// visibility lock expires.
#[derive(Error, Debug)]
pub enum JobError {
    /// Source download or thumbnail upload failed.
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    /// Reply publication or acknowledgment failed.
    #[error("Queue error: {0}")]
    QueueError(#[from] QueueError),

    /// Conversion failed: unresolvable strategy, execution error, timeout or
    /// empty output.
    #[error("Conversion error: {0}")]
    ConvertError(#[from] ConvertError),

    #[error("Failed to serialize reply: {0}")]
    SerializeError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
