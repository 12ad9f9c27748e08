use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Local directory operation failed for {}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not invoke dump program {program}: {reason}")]
    DumpInvocation { program: String, reason: String },

    // The dump program ran but reported failure.
    #[error("Dump program {program} exited with {status}")]
    DumpFailed { program: String, status: ExitStatus },

    #[error("Storage authentication error: {0}")]
    StorageAuth(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Failed to list remote objects: {0}")]
    StorageList(String),

    #[error("Failed to delete remote object {key}: {reason}")]
    StorageDelete { key: String, reason: String },
}

impl AppError {
    pub fn directory(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Directory {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
