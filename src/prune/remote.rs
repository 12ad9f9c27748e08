// bacman/src/prune/remote.rs
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::errors::Result;
use crate::storage::ObjectStore;

/// Deletes every object in the bucket last modified strictly before `cutoff`.
///
/// All objects are candidates, whatever prefix created them. The first failed
/// delete aborts the pass. Returns the deleted keys.
pub async fn prune_remote(store: &dyn ObjectStore, cutoff: DateTime<Utc>) -> Result<Vec<String>> {
    info!(
        "Removing snapshots older than {} from bucket {} ...",
        cutoff,
        store.bucket()
    );
    let objects = store.list_objects().await?;
    let mut removed = Vec::new();

    for object in objects {
        let Some(last_modified) = object.last_modified else {
            warn!("Skipping {}: no last-modified timestamp", object.key);
            continue;
        };
        if last_modified < cutoff {
            info!("Deleting {} from bucket {}", object.key, store.bucket());
            store.delete_object(&object.key).await?;
            removed.push(object.key);
        }
    }

    info!(
        "Removed {} old snapshot(s) from bucket {}",
        removed.len(),
        store.bucket()
    );
    Ok(removed)
}
