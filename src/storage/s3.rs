// bacman/src/storage/s3.rs
use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3 as s3;
use chrono::{DateTime, Utc};
use s3::config::Region;
use s3::error::DisplayErrorContext;
use s3::primitives::ByteStream;
use tracing::debug;

use super::{ObjectStore, RemoteObject};
use crate::config::RemoteSettings;
use crate::errors::{AppError, Result};

/// S3 (or S3-compatible) bucket client.
pub struct S3Store {
    client: s3::Client,
    bucket: String,
}

impl S3Store {
    /// Builds a client with static credentials. A custom endpoint switches
    /// to path-style addressing, which most S3-compatible services expect.
    pub async fn connect(settings: RemoteSettings) -> Result<Self> {
        if settings.access_key.is_empty() || settings.secret_key.is_empty() {
            return Err(AppError::StorageAuth(
                "access key and secret key must not be empty".to_string(),
            ));
        }

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .credentials_provider(s3::config::Credentials::new(
                &settings.access_key,
                &settings.secret_key,
                None,
                None,
                "Static",
            ));
        if let Some(endpoint) = &settings.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let s3_config = s3::config::Builder::from(&sdk_config)
            .force_path_style(settings.endpoint_url.is_some())
            .build();

        debug!(
            "Connected S3 client for bucket {} in {}",
            settings.bucket_name, settings.region
        );
        Ok(S3Store {
            client: s3::Client::from_conf(s3_config),
            bucket: settings.bucket_name,
        })
    }
}

fn to_utc(timestamp: &s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
}

#[async_trait]
impl ObjectStore for S3Store {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn list_objects(&self) -> Result<Vec<RemoteObject>> {
        let mut objects = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                AppError::StorageList(format!("bucket {}: {}", self.bucket, DisplayErrorContext(&e)))
            })?;
            for object in page.contents() {
                let Some(key) = object.key() else { continue };
                objects.push(RemoteObject {
                    key: key.to_string(),
                    last_modified: object.last_modified().and_then(to_utc),
                });
            }
        }

        Ok(objects)
    }

    async fn put_file(&self, key: &str, path: &Path) -> Result<()> {
        let body = ByteStream::from_path(path).await.map_err(|e| {
            AppError::Upload(format!("cannot read {}: {}", path.display(), e))
        })?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                AppError::Upload(format!(
                    "{} to bucket {} as {}: {}",
                    path.display(),
                    self.bucket,
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::StorageDelete {
                key: key.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> RemoteSettings {
        RemoteSettings {
            access_key: "AKIAEXAMPLE".to_string(),
            secret_key: "secret".to_string(),
            bucket_name: "snapshots".to_string(),
            region: "eu-west-1".to_string(),
            endpoint_url: Some("http://127.0.0.1:9000".to_string()),
        }
    }

    #[test]
    fn converts_sdk_timestamps() {
        let ts = s3::primitives::DateTime::from_secs_and_nanos(1_704_164_645, 123_456_000);
        let converted = to_utc(&ts).unwrap();
        assert_eq!(converted.to_rfc3339(), "2024-01-02T03:04:05.123456+00:00");
    }

    #[tokio::test]
    async fn connect_keeps_bucket_name() -> anyhow::Result<()> {
        let store = S3Store::connect(settings()).await?;
        assert_eq!(store.bucket(), "snapshots");
        Ok(())
    }

    #[tokio::test]
    async fn connect_rejects_empty_credentials() {
        let mut bad = settings();
        bad.secret_key.clear();
        assert!(matches!(
            S3Store::connect(bad).await,
            Err(AppError::StorageAuth(_))
        ));
    }
}
