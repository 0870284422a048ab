use clap::Args;

/// Parameters used to config AWS.
#[derive(Debug, Clone, Args)]
pub struct AWSConfigCliArgs {
    /// AWS region; falls back to the SDK's default provider chain.
    #[arg(env = "THUMBD_AWS_REGION", long)]
    pub aws_region: Option<String>,

    /// Endpoint override, mainly for localstack-style test deployments.
    #[arg(env = "THUMBD_AWS_ENDPOINT_URL", long)]
    pub aws_endpoint_url: Option<String>,
}
