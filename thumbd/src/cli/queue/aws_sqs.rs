use clap::Args;

/// Parameters used to config AWS SQS.
#[derive(Debug, Clone, Args)]
pub struct AWSSQSCliArgs {
    /// Name of the jobs queue the worker polls.
    #[arg(env = "THUMBD_SQS_QUEUE", long, default_value = Some("thumbd"))]
    pub sqs_queue: Option<String>,

    /// Default reply destination, used when a job carries no `queue` field.
    /// Defaults to `{sqs_queue}_{sqs_reply_suffix}`.
    #[arg(env = "THUMBD_SQS_REPLY_QUEUE", long)]
    pub sqs_reply_queue: Option<String>,

    /// Suffix appended to a job's `queue` field to form its reply
    /// destination, i.e. `{queue}_{suffix}`.
    #[arg(env = "THUMBD_SQS_REPLY_SUFFIX", long, default_value = Some("reply"))]
    pub sqs_reply_suffix: Option<String>,

    /// Dead-letter destination for poison payloads.
    /// Defaults to `{sqs_queue}_dlq`.
    #[arg(env = "THUMBD_SQS_DEAD_LETTER_QUEUE", long)]
    pub sqs_dead_letter_queue: Option<String>,

    /// Visibility timeout (seconds) requested on every receive. A failed job
    /// becomes visible again once this expires.
    #[arg(env = "THUMBD_SQS_VISIBILITY_TIMEOUT", long, default_value_t = 300)]
    pub sqs_visibility_timeout: u32,

    /// Long-poll wait (seconds) per receive. 0 degrades to short polling;
    /// the worker then relies on its own empty-receive backoff.
    #[arg(env = "THUMBD_SQS_WAIT_TIME", long, default_value_t = 20)]
    pub sqs_wait_time: u32,

    /// Deliveries after which a message is routed to the dead-letter queue
    /// instead of being retried.
    #[arg(env = "THUMBD_SQS_MAX_RECEIVE_COUNT", long, default_value_t = 5)]
    pub sqs_max_receive_count: u32,
}
