use crate::core::config::Config;
use crate::error::{JobError, JobResult};
use crate::thumbnailer::{qr, Conversion, Thumbnailer};
use crate::types::job::{thumbnail_key, JobDescription, ReplyMessage};
use crate::types::queue::{QueueMessage, QueueType};
use crate::worker::event_handler::reply;
use crate::worker::parser::job_message;
use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, error, info_span, warn, Instrument};

/// Drives one dequeued job through its state machine:
/// download → convert → upload → decode QR → reply → acknowledge.
///
/// The message is deleted only when every stage up to the reply has
/// succeeded; any failure leaves it locked until the visibility timeout
/// expires and the transport redelivers it. Redelivery is bounded: a message
/// seen more often than the configured receive count is routed to the
/// dead-letter queue instead of being retried.
pub struct JobPipeline {
    config: Arc<Config>,
    thumbnailer: Thumbnailer,
    http: reqwest::Client,
}

impl JobPipeline {
    pub fn new(config: Arc<Config>) -> Self {
        let thumbnailer = Thumbnailer::new(config.conversion().clone());
        Self { config, thumbnailer, http: reqwest::Client::new() }
    }

    /// Handle one received message end to end, including the acknowledgment
    /// decision. `Ok(())` means the message reached a terminal state (done
    /// or dead-lettered); `Err` means it was left for redelivery.
    pub async fn process_message(&self, message: QueueMessage) -> JobResult<()> {
        let job = match job_message::parse(&message.body) {
            Ok(job) => job,
            Err(e) => {
                warn!(
                    message_id = ?message.message_id,
                    error = %e,
                    "Malformed job payload, routing to dead-letter queue"
                );
                return self.dead_letter(&message).await;
            }
        };

        let max_receive_count = self.config.service().max_receive_count;
        if message.receive_count > max_receive_count {
            warn!(
                id = %job.id,
                receive_count = message.receive_count,
                max_receive_count,
                "Job exhausted its delivery attempts, routing to dead-letter queue"
            );
            return self.dead_letter(&message).await;
        }

        let span = info_span!(
            "job_processing",
            id = %job.id,
            original = %job.original,
            strategy = %job.strategy,
        );
        match self.run_job(&job).instrument(span).await {
            Ok(reply) => {
                self.config.queue().delete_message(&message.receipt_handle).await.map_err(JobError::from)?;
                debug!(id = %job.id, files = ?reply.files, "Job acknowledged");
                Ok(())
            }
            Err(e) => {
                error!(id = %job.id, error = %e, "Job failed, leaving message for redelivery");
                Err(e)
            }
        }
    }

    /// Move a poison payload out of the delivery loop: copy it to the
    /// dead-letter queue, then delete the original.
    async fn dead_letter(&self, message: &QueueMessage) -> JobResult<()> {
        self.config.queue().send_message(QueueType::DeadLetter, message.body.clone()).await?;
        self.config.queue().delete_message(&message.receipt_handle).await?;
        Ok(())
    }

    /// The per-job state machine. Every produced artifact is scoped: the
    /// downloaded source and the conversion scratch directory are removed on
    /// all exit paths once they are no longer needed.
    async fn run_job(&self, job: &JobDescription) -> JobResult<ReplyMessage> {
        let source = self.download(job).await?;

        // A bag of independent conversion tasks, joined before anything else
        // happens. Exactly one entry today; the join keeps the shape ready
        // for multiple simultaneous variants per job.
        let inputs = vec![source.path().to_path_buf()];
        let conversion_result = futures::future::try_join_all(
            std::iter::once(self.thumbnailer.execute(job, &inputs)),
        )
        .await;

        // The source file is done for regardless of how the conversion went.
        drop(source);
        let conversions = conversion_result?;

        let files = self.upload_all(job, &conversions).await?;
        let qrcode = self.decode_qr(&conversions).await;

        let reply = ReplyMessage { id: job.id.clone(), files, qrcode };
        reply::publish(self.config.queue(), job, &reply).await?;
        self.notify(job).await;
        Ok(reply)
    }

    /// Fetch the source object into a uniquely named local file under the
    /// scratch root. The file removes itself on drop.
    async fn download(&self, job: &JobDescription) -> JobResult<NamedTempFile> {
        let data = self
            .config
            .storage()
            .get_data(&job.original, job.bucket.as_deref(), job.region.as_deref())
            .await?;

        let suffix = Path::new(&job.original)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let source = tempfile::Builder::new()
            .prefix("thumbd-src-")
            .suffix(&suffix)
            .tempfile_in(&self.config.conversion().tmp_dir)?;
        tokio::fs::write(source.path(), &data).await?;
        debug!(key = %job.original, bytes = data.len(), "Downloaded source object");
        Ok(source)
    }

    /// Upload every produced file under its derived remote key. All uploads
    /// run concurrently and all must succeed before the job may be
    /// acknowledged.
    async fn upload_all(
        &self,
        job: &JobDescription,
        conversions: &[Conversion],
    ) -> JobResult<Vec<String>> {
        let mut uploads = Vec::new();
        for conversion in conversions {
            for path in &conversion.files {
                let Some(file_name) = path.file_name() else { continue };
                let remote_key = thumbnail_key(&job.destination, &file_name.to_string_lossy());
                uploads.push(async move {
                    let data = tokio::fs::read(path).await?;
                    self.config
                        .storage()
                        .put_data(Bytes::from(data), &remote_key, job.bucket.as_deref(), job.region.as_deref())
                        .await?;
                    debug!(key = %remote_key, "Uploaded thumbnail");
                    Ok::<String, JobError>(remote_key)
                });
            }
        }
        futures::future::try_join_all(uploads).await
    }

    /// Decode a QR payload from the first file of the listing. Best-effort:
    /// any failure yields an empty string.
    async fn decode_qr(&self, conversions: &[Conversion]) -> String {
        let Some(first) = conversions.first().and_then(|conversion| conversion.files.first()).cloned()
        else {
            return String::new();
        };
        tokio::task::spawn_blocking(move || qr::decode(&first).unwrap_or_default())
            .await
            .unwrap_or_default()
    }

    /// POST the job payload to its callback URL, if any. Never fails the job.
    async fn notify(&self, job: &JobDescription) {
        let Some(url) = &job.notify else { return };
        match self.http.post(url).json(job).send().await {
            Ok(_) => debug!(url = %url, "Notified callback"),
            Err(e) => warn!(url = %url, error = %e, "Notify callback failed"),
        }
    }
}
