use crate::cli::provider::aws::AWSConfigCliArgs;
use crate::cli::RunCmd;
use crate::core::client::queue::sqs::SQS;
use crate::core::client::queue::QueueClient;
use crate::core::client::storage::s3::AWSS3;
use crate::core::client::storage::StorageClient;
use crate::error::ThumbdResult;
use crate::types::params::{ConversionParams, QueueParams, ServiceParams, StorageParams};
use aws_config::{BehaviorVersion, Region, SdkConfig};
use tracing::debug;

/// Process-wide configuration: the resolved parameter structs plus the
/// storage and queue clients built from them. Constructed once at startup
/// and passed by `Arc` into the worker — there is no global configuration
/// store, and per-job bucket/region overrides travel as plain function
/// arguments.
pub struct Config {
    storage_params: StorageParams,
    queue_params: QueueParams,
    conversion_params: ConversionParams,
    service_params: ServiceParams,
    storage: Box<dyn StorageClient>,
    queue: Box<dyn QueueClient>,
}

impl Config {
    pub fn new(
        storage_params: StorageParams,
        queue_params: QueueParams,
        conversion_params: ConversionParams,
        service_params: ServiceParams,
        storage: Box<dyn StorageClient>,
        queue: Box<dyn QueueClient>,
    ) -> Self {
        Self { storage_params, queue_params, conversion_params, service_params, storage, queue }
    }

    /// Build the full configuration from the `run` command line.
    pub async fn from_run_cmd(run_cmd: &RunCmd) -> ThumbdResult<Self> {
        let storage_params = StorageParams::try_from(run_cmd.clone())?;
        let queue_params = QueueParams::try_from(run_cmd.clone())?;
        let conversion_params = ConversionParams::try_from(run_cmd.clone())?;
        let service_params = ServiceParams::try_from(run_cmd.clone())?;

        let aws_config = build_aws_config(&run_cmd.aws_config_args).await;
        debug!(
            bucket = %storage_params.bucket_name,
            queue = %queue_params.queue_name,
            "Configuration resolved"
        );

        let storage = Box::new(AWSS3::new(&aws_config, storage_params.clone()));
        let queue = Box::new(SQS::new(&aws_config, queue_params.clone()));

        Ok(Self::new(storage_params, queue_params, conversion_params, service_params, storage, queue))
    }

    pub fn storage(&self) -> &dyn StorageClient {
        self.storage.as_ref()
    }

    pub fn queue(&self) -> &dyn QueueClient {
        self.queue.as_ref()
    }

    pub fn storage_params(&self) -> &StorageParams {
        &self.storage_params
    }

    pub fn queue_params(&self) -> &QueueParams {
        &self.queue_params
    }

    pub fn conversion(&self) -> &ConversionParams {
        &self.conversion_params
    }

    pub fn service(&self) -> &ServiceParams {
        &self.service_params
    }
}

/// Load the shared AWS SDK configuration, honoring the region and endpoint
/// overrides (the latter mainly for localstack-style deployments).
pub async fn build_aws_config(args: &AWSConfigCliArgs) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &args.aws_region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(endpoint) = &args.aws_endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }
    loader.load().await
}
