// In-memory bucket used by tests.
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{ObjectStore, RemoteObject};
use crate::errors::{AppError, Result};

#[derive(Default)]
struct Bucket {
    objects: BTreeMap<String, (Vec<u8>, Option<DateTime<Utc>>)>,
    failing_deletes: HashSet<String>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Bucket>>,
}

impl MemoryStore {
    pub fn insert(&self, key: &str, bytes: &[u8], last_modified: Option<DateTime<Utc>>) {
        let mut bucket = self.inner.lock().unwrap();
        bucket
            .objects
            .insert(key.to_string(), (bytes.to_vec(), last_modified));
    }

    pub fn fail_delete_of(&self, key: &str) {
        self.inner.lock().unwrap().failing_deletes.insert(key.to_string());
    }

    pub fn keys(&self) -> Vec<String> {
        self.inner.lock().unwrap().objects.keys().cloned().collect()
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.inner
            .lock()
            .unwrap()
            .objects
            .get(key)
            .map(|(bytes, _)| bytes.clone())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn bucket(&self) -> &str {
        "memory"
    }

    async fn list_objects(&self) -> Result<Vec<RemoteObject>> {
        let bucket = self.inner.lock().unwrap();
        Ok(bucket
            .objects
            .iter()
            .map(|(key, (_, last_modified))| RemoteObject {
                key: key.clone(),
                last_modified: *last_modified,
            })
            .collect())
    }

    async fn put_file(&self, key: &str, path: &Path) -> Result<()> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::Upload(format!("cannot read {}: {}", path.display(), e)))?;
        self.insert(key, &bytes, Some(Utc::now()));
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        let mut bucket = self.inner.lock().unwrap();
        if bucket.failing_deletes.contains(key) {
            return Err(AppError::StorageDelete {
                key: key.to_string(),
                reason: "access denied".to_string(),
            });
        }
        bucket.objects.remove(key);
        Ok(())
    }
}
