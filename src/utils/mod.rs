use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use which::which;

use crate::errors::{AppError, Result};

/// Finds a client utility such as `pg_dump` in the system PATH.
pub fn find_executable(program: &str) -> Result<PathBuf> {
    which(program).map_err(|e| AppError::DumpInvocation {
        program: program.to_string(),
        reason: format!(
            "not found in PATH ({}). Install the database client tools or set BACMAN_DUMP_BINARY",
            e
        ),
    })
}

/// Installs the global log subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_program_is_reported() {
        let err = find_executable("bacman-no-such-dump-tool").unwrap_err();
        match err {
            AppError::DumpInvocation { program, reason } => {
                assert_eq!(program, "bacman-no-such-dump-tool");
                assert!(reason.contains("BACMAN_DUMP_BINARY"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
