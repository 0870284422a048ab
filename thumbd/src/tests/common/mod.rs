use crate::core::client::queue::{MockQueueClient, QueueClient};
use crate::core::client::storage::{MockStorageClient, StorageClient};
use crate::core::config::Config;
use crate::types::params::{ConversionParams, QueueParams, ServiceParams, StorageParams};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Builds a [`Config`] around mock clients and a throwaway scratch root.
/// Mocks default to "no calls expected", so a scenario only wires up the
/// collaborators it means to exercise.
pub struct TestConfigBuilder {
    tmp_dir: PathBuf,
    convert_command: String,
    max_receive_count: u32,
    storage: Option<Box<dyn StorageClient>>,
    queue: Option<Box<dyn QueueClient>>,
}

impl TestConfigBuilder {
    pub fn new(tmp_dir: &Path) -> Self {
        Self {
            tmp_dir: tmp_dir.to_path_buf(),
            convert_command: "convert".to_string(),
            max_receive_count: 5,
            storage: None,
            queue: None,
        }
    }

    pub fn with_convert_command(mut self, command: impl Into<String>) -> Self {
        self.convert_command = command.into();
        self
    }

    pub fn with_storage(mut self, storage: MockStorageClient) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }

    pub fn with_queue(mut self, queue: MockQueueClient) -> Self {
        self.queue = Some(Box::new(queue));
        self
    }

    pub fn build(self) -> Arc<Config> {
        let storage = self.storage.unwrap_or_else(|| Box::new(MockStorageClient::new()));
        let queue = self.queue.unwrap_or_else(|| Box::new(MockQueueClient::new()));

        Arc::new(Config::new(
            StorageParams { bucket_name: "test-bucket".to_string(), acl: None, storage_class: None },
            QueueParams {
                queue_name: "test".to_string(),
                reply_queue: "test_reply".to_string(),
                reply_suffix: "reply".to_string(),
                dead_letter_queue: "test_dlq".to_string(),
                visibility_timeout: 30,
                wait_time: 0,
            },
            ConversionParams {
                convert_command: self.convert_command,
                tmp_dir: self.tmp_dir,
                timeout: Duration::from_secs(5),
            },
            ServiceParams {
                max_concurrent_jobs: 1,
                max_receive_count: self.max_receive_count,
                poll_backoff: Duration::from_millis(10),
            },
            storage,
            queue,
        ))
    }
}

/// Write an executable stand-in for the conversion binary. The script's last
/// argument is always the output path (with `%d` expanded to `0` for the
/// page-numbered strategies), matching how the built-in command lines are
/// laid out.
pub fn write_stub_convert(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-convert");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write stub script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("mark stub script executable");
    path
}

/// Stub body that creates the file the command line asked for and exits 0.
pub const STUB_WRITE_OUTPUT: &str = r#"for last in "$@"; do :; done
out=$(printf '%s' "$last" | sed 's/%d/0/')
printf 'thumb' > "$out""#;

/// Stub body that fails without producing anything.
pub const STUB_FAIL: &str = "exit 1";
