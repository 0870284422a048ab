use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod convert;
pub mod provider;
pub mod queue;
pub mod service;
pub mod storage;

#[derive(Parser, Debug)]
#[command(
    name = "thumbd",
    about = "thumbd - queue-driven image thumbnailing worker",
    long_about = "thumbd polls an SQS queue for thumbnailing jobs, fetches the source image \
    from S3, runs an external conversion tool, uploads the produced files and reports \
    completion on a reply queue.\n\n\
    Quick Start:\n  \
    thumbd run --sqs-queue thumbnails --s3-bucket images",
    after_help = "Examples:\n  \
    thumbd run --sqs-queue thumbnails --s3-bucket images\n  \
    thumbd thumbnail --remote-image photos/a.pdf --descriptions jobs.json\n  \
    thumbd setup --sqs-queue thumbnails --s3-bucket images"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the thumbnailing worker
    #[command(long_about = "Start the worker loop: poll the jobs queue, process each job \
        and report completion on the reply queue. Runs until interrupted.")]
    Run {
        #[command(flatten)]
        run_command: Box<RunCmd>,
    },
    /// Submit thumbnailing jobs for one remote image and exit
    #[command(long_about = "Read a JSON manifest of thumbnail descriptions, enqueue one job \
        per description for the given S3 image and print the submitted job ids.")]
    Thumbnail {
        #[command(flatten)]
        thumbnail_command: Box<ThumbnailCmd>,
    },
    /// Create the queues and bucket the worker depends on
    #[command(long_about = "Create the jobs queue (with visibility timeout and a dead-letter \
        redrive policy), the reply queue and the bucket if they do not exist yet.")]
    Setup {
        #[command(flatten)]
        setup_command: Box<SetupCmd>,
    },
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct RunCmd {
    #[clap(flatten, next_help_heading = "AWS")]
    pub aws_config_args: provider::aws::AWSConfigCliArgs,

    #[clap(flatten, next_help_heading = "Storage")]
    pub aws_s3_args: storage::aws_s3::AWSS3CliArgs,

    #[clap(flatten, next_help_heading = "Queue")]
    pub aws_sqs_args: queue::aws_sqs::AWSSQSCliArgs,

    #[clap(flatten, next_help_heading = "Conversion")]
    pub convert_args: convert::ConvertCliArgs,

    #[clap(flatten, next_help_heading = "Service")]
    pub service_args: service::ServiceCliArgs,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct ThumbnailCmd {
    /// Path to the image on S3 to thumbnail.
    #[arg(env = "THUMBD_REMOTE_IMAGE", long, value_name = "KEY")]
    pub remote_image: String,

    /// Path to a JSON manifest describing the thumbnail conversions: either a
    /// single job object or an array of them.
    #[arg(env = "THUMBD_DESCRIPTIONS", long, value_name = "PATH")]
    pub descriptions: PathBuf,

    /// Per-submission bucket override.
    #[arg(long)]
    pub bucket: Option<String>,

    /// Per-submission region override.
    #[arg(long)]
    pub region: Option<String>,

    #[clap(flatten, next_help_heading = "AWS")]
    pub aws_config_args: provider::aws::AWSConfigCliArgs,

    #[clap(flatten, next_help_heading = "Queue")]
    pub aws_sqs_args: queue::aws_sqs::AWSSQSCliArgs,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct SetupCmd {
    #[clap(flatten, next_help_heading = "AWS")]
    pub aws_config_args: provider::aws::AWSConfigCliArgs,

    #[clap(flatten, next_help_heading = "Storage")]
    pub aws_s3_args: storage::aws_s3::AWSS3CliArgs,

    #[clap(flatten, next_help_heading = "Queue")]
    pub aws_sqs_args: queue::aws_sqs::AWSSQSCliArgs,
}
