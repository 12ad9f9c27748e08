// bacman/src/prune/local.rs
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::info;
use walkdir::WalkDir;

use crate::config::SnapshotPaths;
use crate::errors::{AppError, Result};

/// Deletes snapshot files in the directory whose names start with the prefix
/// and whose modification time is strictly before `cutoff`.
///
/// Only the top level of the directory is considered. Returns the deleted
/// paths.
pub fn prune_local(paths: &SnapshotPaths, cutoff: DateTime<Utc>) -> Result<Vec<PathBuf>> {
    info!(
        "Removing snapshots older than {} from {} ...",
        cutoff,
        paths.directory.display()
    );
    let mut removed = Vec::new();

    for entry in WalkDir::new(&paths.directory).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(&paths.directory).to_path_buf();
            AppError::directory(path, e.into())
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        if !entry.file_name().to_string_lossy().starts_with(paths.prefix.as_str()) {
            continue;
        }

        let path = entry.path();
        let modified = match fs::metadata(path).and_then(|m| m.modified()) {
            Ok(modified) => DateTime::<Utc>::from(modified),
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(AppError::directory(path, e)),
        };

        if modified < cutoff {
            info!("Deleting {} (modified {})", path.display(), modified);
            match fs::remove_file(path) {
                Ok(()) => removed.push(path.to_path_buf()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(AppError::directory(path, e)),
            }
        }
    }

    info!(
        "Removed {} old snapshot(s) from {}",
        removed.len(),
        paths.directory.display()
    );
    Ok(removed)
}
