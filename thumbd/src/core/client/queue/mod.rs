pub mod error;
pub mod sqs;

use crate::types::queue::{QueueMessage, QueueType};
use async_trait::async_trait;
pub use error::QueueError;

/// Trait defining queue operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Receive at most one message from the jobs queue under a visibility
    /// lock, waiting up to the configured long-poll interval.
    ///
    /// # Returns
    /// * `Ok(Some(message))` - A message was received and is now locked
    /// * `Ok(None)` - The long poll elapsed without a message
    /// * `Err(QueueError)` - The transport failed
    async fn receive_message(&self) -> Result<Option<QueueMessage>, QueueError>;

    /// Send a message to the given logical destination.
    async fn send_message(&self, queue: QueueType, payload: String) -> Result<(), QueueError>;

    /// Delete (acknowledge) a message previously received from the jobs
    /// queue, ending its visibility lock for good.
    async fn delete_message(&self, receipt_handle: &str) -> Result<(), QueueError>;
}
