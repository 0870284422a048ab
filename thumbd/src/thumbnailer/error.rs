use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    /// The job named a strategy that is neither a built-in nor a template.
    #[error("could not find strategy {0}")]
    StrategyNotFound(String),

    /// A manual template referenced a field outside the allow-list, or an
    /// input index out of range.
    #[error("template references unavailable field {0}")]
    Template(String),

    #[error("strategy {strategy} requires width and height")]
    MissingDimensions { strategy: String },

    #[error("failed to create scratch directory: {0}")]
    ScratchDir(#[source] std::io::Error),

    #[error("failed to spawn conversion process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("conversion exited with status {status}: {stderr}")]
    CommandFailed { status: i32, stderr: String },

    #[error("conversion timed out after {0:?}")]
    Timeout(Duration),

    /// The process exited cleanly but wrote nothing into the scratch
    /// directory — a silently-wrong conversion command.
    #[error("no files created")]
    NoFilesCreated,

    #[error("failed to list conversion output: {0}")]
    ListOutput(#[source] std::io::Error),
}
