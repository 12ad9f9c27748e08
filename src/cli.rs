use clap::Parser;

use crate::backup::BackupOptions;
use crate::backup::db_dump::Engine;

/// bacman: take a database snapshot, optionally ship it to S3 and prune old ones
#[derive(Parser, Debug)]
#[command(name = "bacman", version, about = "Snapshot a Postgres or MySQL database to local disk and S3.", long_about = None)]
pub struct Cli {
    /// Database engine (detected from the DATABASE_URL scheme when omitted)
    #[arg(value_enum)]
    pub engine: Option<Engine>,

    /// Upload the new snapshot to the configured bucket
    #[arg(long)]
    pub to_remote: bool,

    /// Delete objects in the bucket older than the remote timeout
    #[arg(long)]
    pub cleanup_remote: bool,

    /// Delete local snapshots older than the local timeout
    #[arg(long)]
    pub cleanup_local: bool,

    /// Remote retention in hours (default 720)
    #[arg(long, value_name = "HOURS", allow_hyphen_values = true)]
    pub remote_timeout: Option<String>,

    /// Local retention in hours (default 720)
    #[arg(long, value_name = "HOURS", allow_hyphen_values = true)]
    pub local_timeout: Option<String>,
}

impl Cli {
    pub fn backup_options(&self) -> BackupOptions {
        BackupOptions {
            to_remote: self.to_remote,
            cleanup_remote: self.cleanup_remote,
            cleanup_local: self.cleanup_local,
            remote_timeout: self.remote_timeout.clone(),
            local_timeout: self.local_timeout.clone(),
        }
    }
}
