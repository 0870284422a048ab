pub mod job;

use crate::core::client::queue::QueueError;
use crate::core::client::storage::StorageError;
use thiserror::Error;

pub use job::{JobError, JobResult};

/// Result type for thumbd operations
pub type ThumbdResult<T> = Result<T, ThumbdError>;

/// Error types for process-level operations
#[derive(Error, Debug)]
pub enum ThumbdError {
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Queue error: {0}")]
    QueueError(#[from] QueueError),

    #[error("Job error: {0}")]
    JobError(#[from] JobError),

    /// Run Command error
    #[error("Run Command Error: {0}")]
    RunCommandError(String),

    /// Resource Setup error
    #[error("Resource setup error: {0}")]
    ResourceSetupError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
