use clap::Args;
use std::path::PathBuf;

/// Parameters used to config the external conversion tool.
#[derive(Debug, Clone, Args)]
pub struct ConvertCliArgs {
    /// Conversion binary invoked by the built-in strategies. Jobs may
    /// override it per message.
    #[arg(env = "THUMBD_CONVERT_COMMAND", long, default_value = "convert")]
    pub convert_command: String,

    /// Root directory for per-job scratch space; defaults to the system
    /// temporary directory.
    #[arg(env = "THUMBD_TMP_DIR", long)]
    pub tmp_dir: Option<PathBuf>,

    /// Wall-clock bound (milliseconds) on one conversion process.
    #[arg(env = "THUMBD_CONVERT_TIMEOUT_MS", long, default_value_t = 20_000)]
    pub convert_timeout_ms: u64,
}
