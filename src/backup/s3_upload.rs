// bacman/src/backup/s3_upload.rs
use std::path::Path;

use tracing::info;

use crate::errors::{AppError, Result};
use crate::storage::ObjectStore;

/// Remote key for a snapshot: its file name, directories dropped.
pub fn object_key_for(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| AppError::Upload(format!("{} has no file name", path.display())))
}

/// Uploads a finished snapshot file and returns the key it was stored under.
pub async fn upload_snapshot(store: &dyn ObjectStore, path: &Path) -> Result<String> {
    let key = object_key_for(path)?;
    info!(
        "Uploading {} to bucket {} as {} ...",
        path.display(),
        store.bucket(),
        key
    );

    store.put_file(&key, path).await?;

    info!("✅ Uploaded {} to bucket {}", key, store.bucket());
    Ok(key)
}
