use crate::cli::SetupCmd;
use crate::core::config::build_aws_config;
use crate::error::{ThumbdError, ThumbdResult};
use crate::types::params::{QueueParams, StorageParams};
use aws_config::SdkConfig;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_sqs::types::QueueAttributeName;
use std::collections::HashMap;
use tracing::info;

/// Create the resources the worker depends on: the jobs queue (with its
/// visibility timeout and a dead-letter redrive policy), the reply queue and
/// the bucket. Existing resources are left untouched.
pub async fn setup(setup_cmd: &SetupCmd) -> ThumbdResult<()> {
    let aws_config = build_aws_config(&setup_cmd.aws_config_args).await;
    let queue_params = QueueParams::try_from(setup_cmd.clone())?;
    let storage_params = StorageParams::try_from(setup_cmd.clone())?;
    let max_receive_count = setup_cmd.aws_sqs_args.sqs_max_receive_count;

    setup_queues(&aws_config, &queue_params, max_receive_count).await?;
    setup_bucket(&aws_config, &storage_params).await?;

    info!("Setup completed");
    Ok(())
}

async fn setup_queues(
    aws_config: &SdkConfig,
    params: &QueueParams,
    max_receive_count: u32,
) -> ThumbdResult<()> {
    let client = aws_sdk_sqs::Client::new(aws_config);

    // The dead-letter queue first: its ARN goes into the jobs queue's
    // redrive policy.
    let dlq_url = create_queue(&client, &params.dead_letter_queue, HashMap::new()).await?;
    let dlq_arn = queue_arn(&client, &dlq_url).await?;

    let mut attributes = HashMap::new();
    attributes.insert(QueueAttributeName::VisibilityTimeout, params.visibility_timeout.to_string());
    attributes.insert(
        QueueAttributeName::RedrivePolicy,
        format!(r#"{{"deadLetterTargetArn":"{}","maxReceiveCount":"{}"}}"#, dlq_arn, max_receive_count),
    );
    create_queue(&client, &params.queue_name, attributes).await?;

    create_queue(&client, &params.reply_queue, HashMap::new()).await?;

    Ok(())
}

async fn create_queue(
    client: &aws_sdk_sqs::Client,
    queue_name: &str,
    attributes: HashMap<QueueAttributeName, String>,
) -> ThumbdResult<String> {
    let mut request = client.create_queue().queue_name(queue_name);
    if !attributes.is_empty() {
        request = request.set_attributes(Some(attributes));
    }
    let response = request.send().await.map_err(|e| {
        ThumbdError::ResourceSetupError(format!("Failed to create SQS queue '{}': {}", queue_name, e))
    })?;

    let queue_url = response
        .queue_url()
        .ok_or_else(|| ThumbdError::ResourceSetupError("Failed to get SQS URL".to_string()))?
        .to_string();
    info!(queue = %queue_name, "Queue ready");
    Ok(queue_url)
}

async fn queue_arn(client: &aws_sdk_sqs::Client, queue_url: &str) -> ThumbdResult<String> {
    let attributes = client
        .get_queue_attributes()
        .queue_url(queue_url)
        .attribute_names(QueueAttributeName::QueueArn)
        .send()
        .await
        .map_err(|e| {
            ThumbdError::ResourceSetupError(format!("Failed to get queue attributes: {}", e))
        })?;

    attributes
        .attributes()
        .and_then(|attributes| attributes.get(&QueueAttributeName::QueueArn))
        .map(|arn| arn.to_string())
        .ok_or_else(|| {
            ThumbdError::ResourceSetupError(format!("Failed to get queue ARN for {}", queue_url))
        })
}

async fn setup_bucket(aws_config: &SdkConfig, params: &StorageParams) -> ThumbdResult<()> {
    let client = aws_sdk_s3::Client::new(aws_config);

    let mut request = client.create_bucket().bucket(&params.bucket_name);

    // S3 requires a location constraint everywhere except us-east-1.
    let region = aws_config.region().map(|region| region.to_string());
    if let Some(region) = region.filter(|region| region != "us-east-1") {
        request = request.create_bucket_configuration(
            CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(region.as_str()))
                .build(),
        );
    }

    match request.send().await {
        Ok(_) => {
            info!(bucket = %params.bucket_name, "Bucket created");
            Ok(())
        }
        Err(e) => {
            let already_there = e.as_service_error().map(|service_error| {
                service_error.is_bucket_already_owned_by_you() || service_error.is_bucket_already_exists()
            });
            if already_there == Some(true) {
                info!(bucket = %params.bucket_name, "Bucket already exists");
                Ok(())
            } else {
                Err(ThumbdError::ResourceSetupError(format!(
                    "Failed to create bucket '{}': {}",
                    params.bucket_name, e
                )))
            }
        }
    }
}
