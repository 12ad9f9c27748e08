pub(crate) mod db_dump;
mod logic;
pub(crate) mod s3_upload;

use std::path::PathBuf;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::storage::S3Store;

/// What to do besides taking the local snapshot, which always happens.
#[derive(Debug, Clone, Default)]
pub struct BackupOptions {
    pub to_remote: bool,
    pub cleanup_remote: bool,
    pub cleanup_local: bool,
    /// Remote retention override in hours, validated before use.
    pub remote_timeout: Option<String>,
    /// Local retention override in hours, validated before use.
    pub local_timeout: Option<String>,
}

/// Public entry point for a snapshot run against S3.
pub async fn run_backup_flow(config: &AppConfig, options: &BackupOptions) -> Result<PathBuf> {
    logic::perform_backup_orchestration(config, options, S3Store::connect).await
}
