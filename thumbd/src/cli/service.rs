use clap::Args;

/// Parameters used to config the worker loop.
#[derive(Debug, Clone, Args)]
pub struct ServiceCliArgs {
    /// Jobs processed concurrently. 1 reproduces the strictly sequential
    /// reference behavior; the pipeline is safe to fan out.
    #[arg(env = "THUMBD_MAX_CONCURRENT_JOBS", long, default_value_t = 1)]
    pub max_concurrent_jobs: usize,

    /// Backoff (milliseconds) after an empty receive or a transport error,
    /// guarding against hot-spinning when long polling is disabled.
    #[arg(env = "THUMBD_POLL_BACKOFF_MS", long, default_value_t = 1_000)]
    pub poll_backoff_ms: u64,
}
