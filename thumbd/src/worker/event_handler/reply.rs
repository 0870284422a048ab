use crate::core::client::queue::QueueClient;
use crate::error::JobResult;
use crate::types::job::{JobDescription, ReplyMessage};
use crate::types::queue::QueueType;
use tracing::info;

/// Publish the completion message for a job. The destination is the job's
/// `{queue}_{reply_suffix}` channel when one was named, otherwise the default
/// reply queue.
pub async fn publish(
    queue: &dyn QueueClient,
    job: &JobDescription,
    reply: &ReplyMessage,
) -> JobResult<()> {
    let payload = serde_json::to_string(reply)?;
    queue.send_message(QueueType::Reply(job.queue.clone()), payload).await?;
    info!(id = %reply.id, files = ?reply.files, "Published completion reply");
    Ok(())
}
