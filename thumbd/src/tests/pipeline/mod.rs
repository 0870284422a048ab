use crate::core::client::queue::MockQueueClient;
use crate::core::client::storage::MockStorageClient;
use crate::error::JobError;
use crate::tests::common::{write_stub_convert, TestConfigBuilder, STUB_FAIL, STUB_WRITE_OUTPUT};
use crate::thumbnailer::ConvertError;
use crate::types::queue::{QueueMessage, QueueType};
use crate::worker::event_handler::pipeline::JobPipeline;
use bytes::Bytes;
use rstest::rstest;

fn message(body: &str, receipt_handle: &str, receive_count: u32) -> QueueMessage {
    QueueMessage {
        message_id: Some("m-1".to_string()),
        body: body.to_string(),
        receipt_handle: receipt_handle.to_string(),
        receive_count,
    }
}

/// A pdf job against a tool that writes `0.png` uploads `a_small.0.png`,
/// replies with that key and acknowledges the message.
#[rstest]
#[tokio::test]
async fn pdf_job_uploads_replies_and_acknowledges() {
    let tmp = tempfile::tempdir().unwrap();
    let stub = write_stub_convert(tmp.path(), STUB_WRITE_OUTPUT);

    let mut storage = MockStorageClient::new();
    storage
        .expect_get_data()
        .withf(|key, bucket, region| key == "a.pdf" && bucket.is_none() && region.is_none())
        .times(1)
        .returning(|_, _, _| Ok(Bytes::from_static(b"%PDF-1.4")));
    storage
        .expect_put_data()
        .withf(|_data, key, _bucket, _region| key == "a_small.0.png")
        .times(1)
        .returning(|_, _, _, _| Ok(()));

    let mut queue = MockQueueClient::new();
    queue
        .expect_send_message()
        .withf(|queue, payload| {
            *queue == QueueType::Reply(None)
                && payload.contains(r#""files":["a_small.0.png"]"#)
                && payload.contains(r#""id":"job-1""#)
        })
        .times(1)
        .returning(|_, _| Ok(()));
    queue.expect_delete_message().withf(|handle| handle == "r-1").times(1).returning(|_| Ok(()));

    let config = TestConfigBuilder::new(tmp.path())
        .with_convert_command(stub.display().to_string())
        .with_storage(storage)
        .with_queue(queue)
        .build();

    let body = r#"{"id": "job-1", "original": "a.pdf", "destination": "a_small", "strategy": "pdf"}"#;
    JobPipeline::new(config).process_message(message(body, "r-1", 1)).await.unwrap();
}

/// A failing conversion uploads nothing, sends no reply and leaves the
/// message undeleted for redelivery.
#[rstest]
#[tokio::test]
async fn failing_conversion_leaves_message_for_redelivery() {
    let tmp = tempfile::tempdir().unwrap();
    let stub = write_stub_convert(tmp.path(), STUB_FAIL);

    let mut storage = MockStorageClient::new();
    storage.expect_get_data().times(1).returning(|_, _, _| Ok(Bytes::from_static(b"img")));
    storage.expect_put_data().never();

    let mut queue = MockQueueClient::new();
    queue.expect_send_message().never();
    queue.expect_delete_message().never();

    let config = TestConfigBuilder::new(tmp.path())
        .with_convert_command(stub.display().to_string())
        .with_storage(storage)
        .with_queue(queue)
        .build();

    let body = r#"{"original": "b.png", "destination": "b_small", "strategy": "bounded", "width": 64, "height": 64}"#;
    let err = JobPipeline::new(config).process_message(message(body, "r-2", 1)).await.unwrap_err();
    assert!(matches!(err, JobError::ConvertError(ConvertError::CommandFailed { status: 1, .. })));
}

/// A body that is neither JSON nor base64 is dead-lettered and deleted, and
/// the pipeline reports success so polling continues.
#[rstest]
#[tokio::test]
async fn malformed_body_is_dead_lettered_and_polling_continues() {
    let tmp = tempfile::tempdir().unwrap();
    let body = "!!definitely-not-json!!";

    let mut storage = MockStorageClient::new();
    storage.expect_get_data().never();

    let mut queue = MockQueueClient::new();
    queue
        .expect_send_message()
        .withf(move |queue, payload| *queue == QueueType::DeadLetter && payload == body)
        .times(1)
        .returning(|_, _| Ok(()));
    queue.expect_delete_message().withf(|handle| handle == "r-3").times(1).returning(|_| Ok(()));

    let config = TestConfigBuilder::new(tmp.path()).with_storage(storage).with_queue(queue).build();

    JobPipeline::new(config).process_message(message(body, "r-3", 1)).await.unwrap();
}

/// A message delivered more often than the configured receive count is
/// routed to the dead-letter queue instead of being processed again.
#[rstest]
#[tokio::test]
async fn exhausted_message_is_dead_lettered_without_processing() {
    let tmp = tempfile::tempdir().unwrap();

    let mut storage = MockStorageClient::new();
    storage.expect_get_data().never();

    let mut queue = MockQueueClient::new();
    queue
        .expect_send_message()
        .withf(|queue, _payload| *queue == QueueType::DeadLetter)
        .times(1)
        .returning(|_, _| Ok(()));
    queue.expect_delete_message().times(1).returning(|_| Ok(()));

    let config = TestConfigBuilder::new(tmp.path()).with_storage(storage).with_queue(queue).build();

    let body = r#"{"original": "a.pdf", "destination": "a_small"}"#;
    JobPipeline::new(config).process_message(message(body, "r-4", 6)).await.unwrap();
}

/// A job naming a reply channel gets its reply on `{channel}_{suffix}`.
#[rstest]
#[tokio::test]
async fn reply_goes_to_the_job_channel() {
    let tmp = tempfile::tempdir().unwrap();
    let stub = write_stub_convert(tmp.path(), STUB_WRITE_OUTPUT);

    let mut storage = MockStorageClient::new();
    storage.expect_get_data().times(1).returning(|_, _, _| Ok(Bytes::from_static(b"img")));
    storage.expect_put_data().times(1).returning(|_, _, _, _| Ok(()));

    let mut queue = MockQueueClient::new();
    queue
        .expect_send_message()
        .withf(|queue, _payload| *queue == QueueType::Reply(Some("orders".to_string())))
        .times(1)
        .returning(|_, _| Ok(()));
    queue.expect_delete_message().times(1).returning(|_| Ok(()));

    let config = TestConfigBuilder::new(tmp.path())
        .with_convert_command(stub.display().to_string())
        .with_storage(storage)
        .with_queue(queue)
        .build();

    let body = r#"{"original": "c.png", "destination": "c_small", "strategy": "fill", "width": 32, "height": 32, "queue": "orders"}"#;
    JobPipeline::new(config).process_message(message(body, "r-5", 1)).await.unwrap();
}

/// Per-job bucket and region overrides reach the storage collaborator on
/// both the download and the upload.
#[rstest]
#[tokio::test]
async fn bucket_and_region_overrides_are_passed_through() {
    let tmp = tempfile::tempdir().unwrap();
    let stub = write_stub_convert(tmp.path(), STUB_WRITE_OUTPUT);

    let mut storage = MockStorageClient::new();
    storage
        .expect_get_data()
        .withf(|_key, bucket, region| *bucket == Some("other") && *region == Some("eu-west-1"))
        .times(1)
        .returning(|_, _, _| Ok(Bytes::from_static(b"img")));
    storage
        .expect_put_data()
        .withf(|_data, _key, bucket, region| *bucket == Some("other") && *region == Some("eu-west-1"))
        .times(1)
        .returning(|_, _, _, _| Ok(()));

    let mut queue = MockQueueClient::new();
    queue.expect_send_message().times(1).returning(|_, _| Ok(()));
    queue.expect_delete_message().times(1).returning(|_| Ok(()));

    let config = TestConfigBuilder::new(tmp.path())
        .with_convert_command(stub.display().to_string())
        .with_storage(storage)
        .with_queue(queue)
        .build();

    let body = r#"{"original": "d.png", "destination": "d_small", "strategy": "strict", "width": 16, "height": 16, "bucket": "other", "region": "eu-west-1"}"#;
    JobPipeline::new(config).process_message(message(body, "r-6", 1)).await.unwrap();
}

/// An upload failure gates acknowledgment: no reply is sent and the message
/// stays locked until redelivery.
#[rstest]
#[tokio::test]
async fn failed_upload_blocks_reply_and_acknowledgment() {
    let tmp = tempfile::tempdir().unwrap();
    let stub = write_stub_convert(tmp.path(), STUB_WRITE_OUTPUT);

    let mut storage = MockStorageClient::new();
    storage.expect_get_data().times(1).returning(|_, _, _| Ok(Bytes::from_static(b"img")));
    storage.expect_put_data().times(1).returning(|_, _, _, _| {
        Err(crate::core::client::storage::StorageError::ObjectStreamError("broken pipe".to_string()))
    });

    let mut queue = MockQueueClient::new();
    queue.expect_send_message().never();
    queue.expect_delete_message().never();

    let config = TestConfigBuilder::new(tmp.path())
        .with_convert_command(stub.display().to_string())
        .with_storage(storage)
        .with_queue(queue)
        .build();

    let body = r#"{"original": "e.png", "destination": "e_small", "strategy": "bounded", "width": 8, "height": 8}"#;
    let err = JobPipeline::new(config).process_message(message(body, "r-7", 1)).await.unwrap_err();
    assert!(matches!(err, JobError::StorageError(_)));
}
