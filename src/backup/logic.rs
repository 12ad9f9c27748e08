// bacman/src/backup/logic.rs
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime, Utc};
use tracing::info;

use super::BackupOptions;
use super::db_dump::create_snapshot;
use super::s3_upload::upload_snapshot;
use crate::config::{AppConfig, RemoteSettings, SnapshotPaths};
use crate::errors::{AppError, Result};
use crate::prune::{self, local::prune_local, remote::prune_remote};
use crate::storage::ObjectStore;

/// Creates the snapshot directory (and parents) unless it already exists.
pub fn ensure_directory(directory: &Path) -> Result<()> {
    if directory.is_dir() {
        return Ok(());
    }
    info!("Creating directory {} ...", directory.display());
    fs::create_dir_all(directory).map_err(|e| AppError::directory(directory, e))
}

/// `{prefix}-{YYYYMMDD}-{HHMMSS}.{suffix}`
pub fn snapshot_file_name(prefix: &str, suffix: &str, now: NaiveDateTime) -> String {
    format!("{}-{}.{}", prefix, now.format("%Y%m%d-%H%M%S"), suffix)
}

/// Absolute path for a snapshot taken now. The directory must exist.
pub fn generate_file_name(paths: &SnapshotPaths) -> Result<PathBuf> {
    let directory = fs::canonicalize(&paths.directory)
        .map_err(|e| AppError::directory(&paths.directory, e))?;
    let now = Local::now().naive_local();
    Ok(directory.join(snapshot_file_name(&paths.prefix, paths.suffix, now)))
}

/// Runs one snapshot cycle: dump, then the requested upload and pruning
/// steps, in that order. `connect` opens the object store and is only called
/// when a remote step was requested.
pub async fn perform_backup_orchestration<F, Fut, S>(
    config: &AppConfig,
    options: &BackupOptions,
    connect: F,
) -> Result<PathBuf>
where
    F: FnOnce(RemoteSettings) -> Fut,
    Fut: Future<Output = Result<S>>,
    S: ObjectStore,
{
    ensure_directory(&config.paths.directory)?;

    let path = generate_file_name(&config.paths)?;
    info!("Creating a {} dump in {} ...", config.engine, path.display());
    let path = create_snapshot(config, &path)?;

    let remote_cutoff = options.cleanup_remote.then(|| {
        let hours = prune::retention_hours("remote", options.remote_timeout.as_deref());
        prune::cutoff(Utc::now(), hours)
    });
    let local_cutoff = options.cleanup_local.then(|| {
        let hours = prune::retention_hours("local", options.local_timeout.as_deref());
        prune::cutoff(Utc::now(), hours)
    });

    if options.to_remote || remote_cutoff.is_some() {
        let settings = config.storage.remote_settings()?;
        let store = connect(settings).await?;

        if options.to_remote {
            upload_snapshot(&store, &path).await?;
        }
        if let Some(cutoff) = remote_cutoff {
            prune_remote(&store, cutoff).await?;
        }
    }

    if let Some(cutoff) = local_cutoff {
        prune_local(&config.paths, cutoff)?;
    }

    Ok(path)
}
