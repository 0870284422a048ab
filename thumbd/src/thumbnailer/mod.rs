pub mod error;
pub mod qr;
pub mod strategy;

use crate::types::job::JobDescription;
use crate::types::params::ConversionParams;
pub use error::ConvertError;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use strategy::{ConversionRequest, Strategy};
use tempfile::TempDir;
use tokio::process::Command;
use tracing::debug;

/// The files produced by one conversion, together with the scratch directory
/// that owns them. Dropping the value removes the directory, so it must be
/// held until every file has been uploaded.
#[derive(Debug)]
pub struct Conversion {
    _dir: TempDir,
    /// Produced files in listing order (numeric-aware, so page 2 sorts
    /// before page 10).
    pub files: Vec<PathBuf>,
}

/// Runs one conversion: allocates scratch space, resolves the job's strategy
/// to a command line and executes it under a wall-clock bound.
#[derive(Debug, Clone)]
pub struct Thumbnailer {
    params: ConversionParams,
}

impl Thumbnailer {
    pub fn new(params: ConversionParams) -> Self {
        Self { params }
    }

    /// Execute the image conversion command for one job.
    ///
    /// # Arguments
    /// * `job` - The job description
    /// * `local_paths` - The local input image(s)
    ///
    /// # Returns
    /// * `Ok(Conversion)` - The ordered, non-empty scratch listing
    /// * `Err(ConvertError)` - Strategy resolution, execution, timeout or
    ///   empty-output failure
    pub async fn execute(
        &self,
        job: &JobDescription,
        local_paths: &[PathBuf],
    ) -> Result<Conversion, ConvertError> {
        let output_dir = tempfile::Builder::new()
            .prefix("thumbd-")
            .tempdir_in(&self.params.tmp_dir)
            .map_err(ConvertError::ScratchDir)?;

        let request = ConversionRequest {
            local_paths: local_paths.to_vec(),
            output_dir: output_dir.path().to_path_buf(),
            width: job.width,
            height: job.height,
            format: job.format.clone(),
            background: job.background.clone(),
            quality: job.quality,
            command: job.command.clone().unwrap_or_else(|| self.params.convert_command.clone()),
        };

        let strategy = Strategy::resolve(&job.strategy)?;
        let command_line = strategy.command_line(&request)?;
        debug!(command = %command_line, "Running conversion");

        let output = tokio::time::timeout(
            self.params.timeout,
            Command::new("sh")
                .arg("-c")
                .arg(&command_line)
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| ConvertError::Timeout(self.params.timeout))?
        .map_err(ConvertError::Spawn)?;

        if !output.status.success() {
            return Err(ConvertError::CommandFailed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let files = list_outputs(output_dir.path()).map_err(ConvertError::ListOutput)?;
        if files.is_empty() {
            return Err(ConvertError::NoFilesCreated);
        }

        Ok(Conversion { _dir: output_dir, files })
    }
}

/// List the scratch directory in a stable order. Page-numbered outputs sort
/// numerically so `2.png` precedes `10.png`; anything else sorts by name
/// after them.
fn list_outputs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort_by_key(|path| {
        let page = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.parse::<u32>().ok());
        (page.is_none(), page, path.file_name().map(|name| name.to_os_string()))
    });
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::time::Duration;

    fn thumbnailer(tmp: &Path, timeout_ms: u64) -> Thumbnailer {
        Thumbnailer::new(ConversionParams {
            convert_command: "convert".to_string(),
            tmp_dir: tmp.to_path_buf(),
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    fn manual_job(template: &str) -> JobDescription {
        serde_json::from_value(serde_json::json!({
            "original": "in.png",
            "destination": "out",
            "strategy": template,
        }))
        .unwrap()
    }

    #[rstest]
    #[tokio::test]
    async fn clean_exit_with_files_returns_ordered_listing() {
        let tmp = tempfile::tempdir().unwrap();
        let job = manual_job("touch %(convertedPath)s/2.png %(convertedPath)s/10.png %(convertedPath)s/0.png");
        let conversion = thumbnailer(tmp.path(), 5_000)
            .execute(&job, &[PathBuf::from("in.png")])
            .await
            .unwrap();

        let names: Vec<_> = conversion
            .files
            .iter()
            .map(|path| path.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["0.png", "2.png", "10.png"]);
    }

    #[rstest]
    #[tokio::test]
    async fn clean_exit_without_files_is_the_distinguished_error() {
        let tmp = tempfile::tempdir().unwrap();
        let job = manual_job("true %(convertedPath)s");
        let err = thumbnailer(tmp.path(), 5_000)
            .execute(&job, &[PathBuf::from("in.png")])
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::NoFilesCreated));
    }

    #[rstest]
    #[tokio::test]
    async fn nonzero_exit_surfaces_status_and_stderr() {
        let tmp = tempfile::tempdir().unwrap();
        let job = manual_job(": %(convertedPath)s; echo boom >&2; exit 3");
        let err = thumbnailer(tmp.path(), 5_000)
            .execute(&job, &[PathBuf::from("in.png")])
            .await
            .unwrap_err();
        match err {
            ConvertError::CommandFailed { status, stderr } => {
                assert_eq!(status, 3);
                assert_eq!(stderr, "boom");
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn timeout_kills_the_process_and_leaks_no_scratch() {
        let tmp = tempfile::tempdir().unwrap();
        let job = manual_job(": %(convertedPath)s; sleep 5");
        let err = thumbnailer(tmp.path(), 50)
            .execute(&job, &[PathBuf::from("in.png")])
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::Timeout(_)));

        // The scratch directory is owned by the failed conversion and must
        // be gone once it is dropped.
        let leftovers = std::fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(leftovers, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_strategy_spawns_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let mut job = manual_job("true %(convertedPath)s");
        job.strategy = "explode".to_string();
        let err = thumbnailer(tmp.path(), 5_000)
            .execute(&job, &[PathBuf::from("in.png")])
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::StrategyNotFound(_)));
    }
}
