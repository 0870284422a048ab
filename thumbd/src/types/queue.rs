use strum_macros::Display;

/// Logical queue destinations known to the worker. The SQS client resolves
/// each to a concrete queue name from [`QueueParams`](crate::types::params::QueueParams).
#[derive(Display, Debug, Clone, PartialEq, Eq)]
pub enum QueueType {
    /// The job intake queue the worker polls.
    #[strum(serialize = "jobs")]
    Jobs,
    /// Completion replies. The optional channel selects the
    /// `{channel}_{reply_suffix}` destination; `None` targets the default
    /// reply queue.
    #[strum(serialize = "reply")]
    Reply(Option<String>),
    /// Terminal destination for payloads that exhausted their attempts or
    /// never parsed.
    #[strum(serialize = "dead_letter")]
    DeadLetter,
}

/// One message pulled off the jobs queue under a visibility lock.
#[derive(Debug, Clone)]
pub struct QueueMessage {
    pub message_id: Option<String>,
    pub body: String,
    /// Lock handle required to delete (acknowledge) the message.
    pub receipt_handle: String,
    /// `ApproximateReceiveCount` as reported by the transport; 1 on first
    /// delivery.
    pub receive_count: u32,
}
