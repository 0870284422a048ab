use clap::Parser as _;
use dotenvy::dotenv;
use std::sync::Arc;
use thumbd::cli::{Cli, Commands, RunCmd, ThumbnailCmd};
use thumbd::client::{self, Client};
use thumbd::core::client::queue::sqs::SQS;
use thumbd::core::config::{build_aws_config, Config};
use thumbd::setup::setup;
use thumbd::types::params::QueueParams;
use thumbd::utils::logging::init_logging;
use thumbd::worker::controller::QueueWorker;
use thumbd::{ThumbdError, ThumbdResult};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Run { run_command } => {
            info!("Starting thumbd worker");
            if let Err(e) = run_thumbd(run_command).await {
                error!(error = %e, error_chain = ?e, "Failed to run thumbd worker");
                panic!("Failed to run thumbd worker: {}", e);
            }
        }
        Commands::Thumbnail { thumbnail_command } => match run_thumbnail(thumbnail_command).await {
            Ok(output) => print_result(&output),
            Err(e) => {
                print_result(&format!("{}", e));
                std::process::exit(1);
            }
        },
        Commands::Setup { setup_command } => {
            info!("Setting up thumbd resources");
            if let Err(e) = setup(setup_command).await {
                error!(error = %e, error_chain = ?e, "Failed to setup thumbd resources");
                panic!("Failed to setup thumbd resources: {}", e);
            }
        }
    }
}

async fn run_thumbd(run_cmd: &RunCmd) -> ThumbdResult<()> {
    let config = Arc::new(Config::from_run_cmd(run_cmd).await?);

    let cancellation_token = CancellationToken::new();
    let worker = Arc::new(QueueWorker::new(config, cancellation_token));

    let run_handle = tokio::spawn({
        let worker = worker.clone();
        async move { worker.run().await }
    });

    tokio::signal::ctrl_c().await.expect("Failed to listen for ctrl+c");
    worker.shutdown();

    run_handle
        .await
        .map_err(|e| ThumbdError::RunCommandError(format!("Worker task panicked: {}", e)))??;
    info!("thumbd worker shutting down");
    Ok(())
}

/// One-shot submission: enqueue the manifest's jobs for the remote image and
/// report the submitted ids as a JSON object.
async fn run_thumbnail(cmd: &ThumbnailCmd) -> ThumbdResult<String> {
    let queue_params = QueueParams::try_from(cmd.aws_sqs_args.clone())?;
    let aws_config = build_aws_config(&cmd.aws_config_args).await;
    let queue = Box::new(SQS::new(&aws_config, queue_params));

    let content = std::fs::read_to_string(&cmd.descriptions)?;
    let descriptions = client::parse_descriptions(&content)?;

    let ids = Client::new(queue)
        .thumbnail(&cmd.remote_image, descriptions, cmd.bucket.clone(), cmd.region.clone())
        .await?;

    Ok(serde_json::to_string_pretty(&serde_json::json!({ "submitted": ids }))?)
}

#[allow(clippy::print_stdout)]
fn print_result(output: &str) {
    println!("{}", output);
}
