use crate::core::config::Config;
use crate::error::{JobResult, ThumbdResult};
use crate::worker::event_handler::pipeline::JobPipeline;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// The top-level polling loop: receive one message under a visibility lock,
/// hand it to the pipeline, re-arm regardless of outcome.
///
/// An explicit loop with backoff replaces the reference's recursive
/// self-rearming receive: empty receives and transport errors both sleep
/// before the next poll, so a zero long-poll wait cannot hot-spin the
/// process.
#[derive(Clone)]
pub struct QueueWorker {
    config: Arc<Config>,
    pipeline: Arc<JobPipeline>,
    cancellation_token: CancellationToken,
}

impl QueueWorker {
    pub fn new(config: Arc<Config>, cancellation_token: CancellationToken) -> Self {
        let pipeline = Arc::new(JobPipeline::new(config.clone()));
        Self { config, pipeline, cancellation_token }
    }

    /// Triggers a graceful shutdown
    pub fn shutdown(&self) {
        info!("Triggering shutdown for queue worker");
        self.cancellation_token.cancel();
    }

    /// Check if shutdown has been requested (non-blocking)
    pub fn is_shutdown_requested(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }

    /// Run the worker loop until shutdown. Jobs are spawned onto a JoinSet
    /// bounded by `max_concurrent_jobs`; at the default of 1 this reproduces
    /// the strictly sequential reference behavior.
    pub async fn run(&self) -> ThumbdResult<()> {
        let mut tasks = JoinSet::new();
        let max_concurrent_tasks = self.config.service().max_concurrent_jobs;
        let backoff = self.config.service().poll_backoff;
        info!(pool_size = max_concurrent_tasks, "Starting queue worker");

        loop {
            if self.is_shutdown_requested() {
                info!("Shutdown requested, stopping message processing");
                break;
            }

            tokio::select! {
                biased;

                Some(result) = tasks.join_next(), if !tasks.is_empty() => {
                    Self::handle_task_result(result);
                }

                _ = self.cancellation_token.cancelled() => {
                    info!("Shutdown signal received, breaking from main loop");
                    break;
                }

                message_result = self.config.queue().receive_message(), if tasks.len() < max_concurrent_tasks => {
                    match message_result {
                        Ok(Some(message)) => {
                            debug!(
                                message_id = ?message.message_id,
                                receive_count = message.receive_count,
                                "Received message from queue"
                            );
                            let pipeline = self.pipeline.clone();
                            tasks.spawn(async move { pipeline.process_message(message).await });
                        }
                        Ok(None) => sleep(backoff).await,
                        Err(e) => {
                            error!(error = %e, "Failed to receive message from queue");
                            sleep(backoff).await;
                        }
                    }
                }
            }
        }

        // Drain in-flight jobs during shutdown.
        info!(remaining = tasks.len(), "Waiting for in-flight jobs to complete");
        while let Some(result) = tasks.join_next().await {
            Self::handle_task_result(result);
        }
        info!("Queue worker shutdown complete");

        Ok(())
    }

    fn handle_task_result(result: Result<JobResult<()>, tokio::task::JoinError>) {
        match result {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                // Already logged with job context by the pipeline; the
                // message redelivers after its visibility timeout.
                debug!(error = %e, "Job task finished with error");
            }
            Err(e) => {
                error!("Job task panicked or was cancelled: {:?}", e);
            }
        }
    }
}
