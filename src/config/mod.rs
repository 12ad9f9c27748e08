// bacman/src/config/mod.rs
use std::env;
use std::fmt;
use std::path::PathBuf;

use percent_encoding::percent_decode_str;
use tracing::warn;
use url::Url;

use crate::backup::db_dump::Engine;
use crate::errors::{AppError, Result};

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const BACMAN_BUCKET: &str = "BACMAN_BUCKET";
pub const BACMAN_REGION: &str = "BACMAN_REGION";
pub const BACMAN_ENDPOINT_URL: &str = "BACMAN_ENDPOINT_URL";
pub const BACMAN_DIRECTORY: &str = "BACMAN_DIRECTORY";
pub const BACMAN_PREFIX: &str = "BACMAN_PREFIX";
pub const BACMAN_DUMP_BINARY: &str = "BACMAN_DUMP_BINARY";

pub const DEFAULT_REGION: &str = "eu-west-1";
pub const DEFAULT_DIRECTORY: &str = "/tmp/bacman";
const DEFAULT_HOST: &str = "localhost";

/// Connection parameters decomposed from `DATABASE_URL`.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: Option<u16>,
    pub name: String,
}

impl DatabaseConfig {
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw).map_err(|e| {
            AppError::Configuration(format!("{} is not a valid URL: {}", DATABASE_URL, e))
        })?;

        let name = decode(url.path().trim_start_matches('/'));
        if name.is_empty() {
            return Err(AppError::Configuration(format!(
                "{} does not name a database",
                DATABASE_URL
            )));
        }

        Ok(DatabaseConfig {
            user: decode(url.username()),
            password: url.password().map(decode).unwrap_or_default(),
            host: url
                .host_str()
                .filter(|h| !h.is_empty())
                .unwrap_or(DEFAULT_HOST)
                .to_string(),
            port: url.port(),
            name,
        })
    }
}

// Keep the password out of logs.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("user", &self.user)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .finish()
    }
}

fn decode(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

/// Remote storage settings as read from the environment. Any of them may be
/// missing; `remote_settings` enforces what remote operations need.
#[derive(Clone, Default)]
pub struct StorageConfig {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub bucket_name: Option<String>,
    pub region: String,
    pub endpoint_url: Option<String>,
}

/// Fully resolved settings for connecting to the bucket.
#[derive(Clone)]
pub struct RemoteSettings {
    pub access_key: String,
    pub secret_key: String,
    pub bucket_name: String,
    pub region: String,
    pub endpoint_url: Option<String>,
}

impl StorageConfig {
    pub fn remote_settings(&self) -> Result<RemoteSettings> {
        let (Some(access_key), Some(secret_key)) = (&self.access_key, &self.secret_key) else {
            return Err(AppError::StorageAuth(format!(
                "{} and {} must be set for remote operations",
                AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY
            )));
        };
        let bucket_name = self.bucket_name.clone().ok_or_else(|| {
            AppError::Configuration(format!("{} must be set for remote operations", BACMAN_BUCKET))
        })?;

        Ok(RemoteSettings {
            access_key: access_key.clone(),
            secret_key: secret_key.clone(),
            bucket_name,
            region: self.region.clone(),
            endpoint_url: self.endpoint_url.clone(),
        })
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "***"))
            .field("bucket_name", &self.bucket_name)
            .field("region", &self.region)
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}

impl fmt::Debug for RemoteSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSettings")
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .field("bucket_name", &self.bucket_name)
            .field("region", &self.region)
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}

/// Where snapshots live on disk and how they are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPaths {
    pub directory: PathBuf,
    pub prefix: String,
    pub suffix: &'static str,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub engine: Engine,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub paths: SnapshotPaths,
    pub dump_binary: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env(engine: Engine) -> Result<Self> {
        Self::from_lookup(engine, |key| env::var(key).ok())
    }

    /// Resolves the configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(engine: Engine, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_url = get(DATABASE_URL)
            .ok_or_else(|| AppError::Configuration(format!("{} must be set", DATABASE_URL)))?;
        let database = DatabaseConfig::parse(&raw_url)?;

        match detect_engine(&raw_url) {
            Some(detected) if detected != engine => warn!(
                "{} looks like a {} URL but the {} engine was selected",
                DATABASE_URL, detected, engine
            ),
            _ => {}
        }

        let storage = StorageConfig {
            access_key: get(AWS_ACCESS_KEY_ID),
            secret_key: get(AWS_SECRET_ACCESS_KEY),
            bucket_name: get(BACMAN_BUCKET),
            region: get(BACMAN_REGION).unwrap_or_else(|| DEFAULT_REGION.to_string()),
            endpoint_url: get(BACMAN_ENDPOINT_URL),
        };

        let paths = SnapshotPaths {
            directory: PathBuf::from(
                get(BACMAN_DIRECTORY).unwrap_or_else(|| DEFAULT_DIRECTORY.to_string()),
            ),
            prefix: get(BACMAN_PREFIX).unwrap_or_else(|| engine.default_prefix().to_string()),
            suffix: engine.suffix(),
        };

        Ok(AppConfig {
            engine,
            database,
            storage,
            paths,
            dump_binary: get(BACMAN_DUMP_BINARY).map(PathBuf::from),
        })
    }
}

/// The engine given on the command line, else the one named by the
/// `DATABASE_URL` scheme.
pub fn resolve_engine<F>(explicit: Option<Engine>, lookup: F) -> Result<Engine>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(engine) = explicit {
        return Ok(engine);
    }
    let raw_url = lookup(DATABASE_URL)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Configuration(format!("{} must be set", DATABASE_URL)))?;
    detect_engine(&raw_url).ok_or_else(|| {
        AppError::Configuration(format!(
            "Cannot tell the database engine from {}; pass `postgres` or `mysql`",
            DATABASE_URL
        ))
    })
}

/// Picks the engine from the scheme of a database URL.
pub fn detect_engine(raw_url: &str) -> Option<Engine> {
    let scheme = raw_url.split_once("://")?.0;
    Engine::from_scheme(&scheme.to_ascii_lowercase())
}
