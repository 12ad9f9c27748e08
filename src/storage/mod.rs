// bacman/src/storage/mod.rs
pub(crate) mod s3;
#[cfg(test)]
pub(crate) mod memory;

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::Result;

pub use s3::S3Store;

/// An entry returned by a bucket listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    pub key: String,
    pub last_modified: Option<DateTime<Utc>>,
}

/// The minimal blob-store surface snapshots need.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    fn bucket(&self) -> &str;

    /// Lists every object in the bucket, following pagination to the end.
    async fn list_objects(&self) -> Result<Vec<RemoteObject>>;

    /// Uploads the full contents of `path` under `key`.
    async fn put_file(&self, key: &str, path: &Path) -> Result<()>;

    async fn delete_object(&self, key: &str) -> Result<()>;
}
