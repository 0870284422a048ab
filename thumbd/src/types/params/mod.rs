use crate::cli::{RunCmd, SetupCmd};
use crate::error::ThumbdError;
use std::path::PathBuf;
use std::time::Duration;

/// StorageParams - Arguments used to reach object storage
#[derive(Debug, Clone)]
pub struct StorageParams {
    pub bucket_name: String,
    /// Canned ACL applied to uploads, verbatim (e.g. `public-read`).
    pub acl: Option<String>,
    pub storage_class: Option<String>,
}

/// QueueParams - Arguments used to resolve queue destinations
#[derive(Debug, Clone)]
pub struct QueueParams {
    pub queue_name: String,
    pub reply_queue: String,
    pub reply_suffix: String,
    pub dead_letter_queue: String,
    pub visibility_timeout: u32,
    pub wait_time: u32,
}

/// ConversionParams - Arguments used to drive the external conversion tool
#[derive(Debug, Clone)]
pub struct ConversionParams {
    pub convert_command: String,
    pub tmp_dir: PathBuf,
    pub timeout: Duration,
}

/// ServiceParams - Arguments used to shape the worker loop
#[derive(Debug, Clone)]
pub struct ServiceParams {
    pub max_concurrent_jobs: usize,
    pub max_receive_count: u32,
    pub poll_backoff: Duration,
}

impl TryFrom<RunCmd> for StorageParams {
    type Error = ThumbdError;
    fn try_from(run_cmd: RunCmd) -> Result<Self, Self::Error> {
        Ok(Self {
            bucket_name: run_cmd
                .aws_s3_args
                .s3_bucket
                .ok_or(ThumbdError::RunCommandError("Bucket name is required".to_string()))?,
            acl: run_cmd.aws_s3_args.s3_acl,
            storage_class: run_cmd.aws_s3_args.s3_storage_class,
        })
    }
}

impl TryFrom<SetupCmd> for StorageParams {
    type Error = ThumbdError;
    fn try_from(setup_cmd: SetupCmd) -> Result<Self, Self::Error> {
        Ok(Self {
            bucket_name: setup_cmd
                .aws_s3_args
                .s3_bucket
                .ok_or(ThumbdError::RunCommandError("Bucket name is required".to_string()))?,
            acl: setup_cmd.aws_s3_args.s3_acl,
            storage_class: setup_cmd.aws_s3_args.s3_storage_class,
        })
    }
}

impl TryFrom<RunCmd> for QueueParams {
    type Error = ThumbdError;
    fn try_from(run_cmd: RunCmd) -> Result<Self, Self::Error> {
        QueueParams::try_from(run_cmd.aws_sqs_args)
    }
}

impl TryFrom<SetupCmd> for QueueParams {
    type Error = ThumbdError;
    fn try_from(setup_cmd: SetupCmd) -> Result<Self, Self::Error> {
        QueueParams::try_from(setup_cmd.aws_sqs_args)
    }
}

impl TryFrom<crate::cli::queue::aws_sqs::AWSSQSCliArgs> for QueueParams {
    type Error = ThumbdError;
    fn try_from(args: crate::cli::queue::aws_sqs::AWSSQSCliArgs) -> Result<Self, Self::Error> {
        let queue_name = args
            .sqs_queue
            .ok_or(ThumbdError::RunCommandError("SQS queue name is required".to_string()))?;
        let reply_suffix = args
            .sqs_reply_suffix
            .ok_or(ThumbdError::RunCommandError("SQS reply suffix is required".to_string()))?;
        let reply_queue = args
            .sqs_reply_queue
            .unwrap_or_else(|| format!("{}_{}", queue_name, reply_suffix));
        let dead_letter_queue =
            args.sqs_dead_letter_queue.unwrap_or_else(|| format!("{}_dlq", queue_name));
        Ok(Self {
            queue_name,
            reply_queue,
            reply_suffix,
            dead_letter_queue,
            visibility_timeout: args.sqs_visibility_timeout,
            wait_time: args.sqs_wait_time,
        })
    }
}

impl TryFrom<RunCmd> for ConversionParams {
    type Error = ThumbdError;
    fn try_from(run_cmd: RunCmd) -> Result<Self, Self::Error> {
        Ok(Self {
            convert_command: run_cmd.convert_args.convert_command,
            tmp_dir: run_cmd.convert_args.tmp_dir.unwrap_or_else(std::env::temp_dir),
            timeout: Duration::from_millis(run_cmd.convert_args.convert_timeout_ms),
        })
    }
}

impl TryFrom<RunCmd> for ServiceParams {
    type Error = ThumbdError;
    fn try_from(run_cmd: RunCmd) -> Result<Self, Self::Error> {
        Ok(Self {
            max_concurrent_jobs: run_cmd.service_args.max_concurrent_jobs.max(1),
            max_receive_count: run_cmd.aws_sqs_args.sqs_max_receive_count,
            poll_backoff: Duration::from_millis(run_cmd.service_args.poll_backoff_ms),
        })
    }
}
