use crate::core::client::queue::{QueueClient, QueueError};
use crate::types::params::QueueParams;
use crate::types::queue::{QueueMessage, QueueType};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_sqs::types::MessageSystemAttributeName;
use aws_sdk_sqs::Client;

#[derive(Clone, Debug)]
pub struct SQS {
    client: Client,
    params: QueueParams,
}

impl SQS {
    /// Creates a new SQS client from the shared AWS configuration and the
    /// resolved queue parameters.
    pub fn new(aws_config: &SdkConfig, params: QueueParams) -> Self {
        let sqs_config_builder = aws_sdk_sqs::config::Builder::from(aws_config);
        let client = Client::from_conf(sqs_config_builder.build());
        Self { client, params }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Resolve a logical destination to a concrete queue name. Replies follow
    /// the `{channel}_{reply_suffix}` convention when the job named a channel.
    pub fn queue_name(&self, queue: &QueueType) -> String {
        match queue {
            QueueType::Jobs => self.params.queue_name.clone(),
            QueueType::Reply(Some(channel)) => {
                format!("{}_{}", channel, self.params.reply_suffix)
            }
            QueueType::Reply(None) => self.params.reply_queue.clone(),
            QueueType::DeadLetter => self.params.dead_letter_queue.clone(),
        }
    }

    async fn queue_url(&self, queue: &QueueType) -> Result<String, QueueError> {
        let queue_name = self.queue_name(queue);
        Ok(self
            .client
            .get_queue_url()
            .queue_name(&queue_name)
            .send()
            .await?
            .queue_url()
            .ok_or_else(|| QueueError::FailedToGetQueueUrl(queue_name))?
            .to_string())
    }
}

#[async_trait]
impl QueueClient for SQS {
    /// Receive one message from the jobs queue with the configured visibility
    /// timeout and long-poll wait.
    ///
    /// The receive asks for `ApproximateReceiveCount` explicitly: the
    /// pipeline inspects the delivery count before acknowledging so it can
    /// route exhausted messages to the dead-letter queue instead of letting
    /// them loop through redelivery forever.
    async fn receive_message(&self) -> Result<Option<QueueMessage>, QueueError> {
        let queue_url = self.queue_url(&QueueType::Jobs).await?;

        let output = self
            .client
            .receive_message()
            .queue_url(&queue_url)
            .max_number_of_messages(1)
            .visibility_timeout(self.params.visibility_timeout as i32)
            .wait_time_seconds(self.params.wait_time as i32)
            .message_system_attribute_names(MessageSystemAttributeName::ApproximateReceiveCount)
            .send()
            .await?;

        let Some(messages) = output.messages else {
            return Ok(None);
        };
        let Some(message) = messages.into_iter().next() else {
            return Ok(None);
        };

        let receipt_handle = message.receipt_handle.ok_or(QueueError::MissingReceiptHandle)?;
        let body = message.body.ok_or(QueueError::EmptyPayload)?;
        let receive_count = message
            .attributes
            .as_ref()
            .and_then(|attributes| attributes.get(&MessageSystemAttributeName::ApproximateReceiveCount))
            .and_then(|count| count.parse().ok())
            .unwrap_or(1);

        Ok(Some(QueueMessage {
            message_id: message.message_id,
            body,
            receipt_handle,
            receive_count,
        }))
    }

    async fn send_message(&self, queue: QueueType, payload: String) -> Result<(), QueueError> {
        let queue_url = self.queue_url(&queue).await?;

        self.client.send_message().queue_url(&queue_url).message_body(payload).send().await?;

        tracing::debug!(queue = %queue, "Sent message");
        Ok(())
    }

    async fn delete_message(&self, receipt_handle: &str) -> Result<(), QueueError> {
        let queue_url = self.queue_url(&QueueType::Jobs).await?;

        self.client
            .delete_message()
            .queue_url(&queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await?;

        Ok(())
    }
}
