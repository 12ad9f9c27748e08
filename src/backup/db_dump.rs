// bacman/src/backup/db_dump.rs
use std::ffi::OsString;
use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info, warn};

use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{AppError, Result};
use crate::utils::find_executable;

/// Database engine whose native dump utility produces the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Engine {
    Postgres,
    #[value(name = "mysql")]
    MySql,
}

impl Engine {
    /// Maps a `DATABASE_URL` scheme to an engine.
    pub fn from_scheme(scheme: &str) -> Option<Engine> {
        match scheme {
            "postgres" | "postgresql" | "pgsql" | "postgis" => Some(Engine::Postgres),
            "mysql" | "mysql2" | "mysqlgis" => Some(Engine::MySql),
            _ => None,
        }
    }

    pub fn program(self) -> &'static str {
        match self {
            Engine::Postgres => "pg_dump",
            Engine::MySql => "mysqldump",
        }
    }

    pub fn default_prefix(self) -> &'static str {
        match self {
            Engine::Postgres => "pgdump",
            Engine::MySql => "mysqldump",
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Engine::Postgres => "bak",
            Engine::MySql => "sql",
        }
    }

    /// Builds the dump invocation writing to `path`.
    ///
    /// The password never appears in the argument vector; it travels in an
    /// environment variable set on the child process only.
    pub fn dump_command(self, db: &DatabaseConfig, path: &Path) -> DumpCommand {
        let mut args: Vec<OsString> = Vec::new();
        let mut env = Vec::new();
        let mut stdout = None;

        match self {
            Engine::Postgres => {
                args.push("-Fc".into());
                if !db.user.is_empty() {
                    args.push("-U".into());
                    args.push(db.user.clone().into());
                }
                args.push("-h".into());
                args.push(db.host.clone().into());
                if let Some(port) = db.port {
                    args.push("-p".into());
                    args.push(port.to_string().into());
                }
                args.push("-f".into());
                args.push(path.as_os_str().to_owned());
                // A name starting with '-' must not be read as an option.
                args.push("--".into());
                args.push(db.name.clone().into());
                if !db.password.is_empty() {
                    env.push(("PGPASSWORD", db.password.clone()));
                }
            }
            Engine::MySql => {
                if !db.user.is_empty() {
                    args.push("-u".into());
                    args.push(db.user.clone().into());
                }
                args.push("-h".into());
                args.push(db.host.clone().into());
                if let Some(port) = db.port {
                    args.push("-P".into());
                    args.push(port.to_string().into());
                }
                args.push("--".into());
                args.push(db.name.clone().into());
                if !db.password.is_empty() {
                    env.push(("MYSQL_PWD", db.password.clone()));
                }
                stdout = Some(path.to_path_buf());
            }
        }

        DumpCommand {
            program: self.program(),
            args,
            env,
            stdout,
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::Postgres => f.write_str("postgres"),
            Engine::MySql => f.write_str("mysql"),
        }
    }
}

/// A fully specified dump invocation: argument vector, child environment and
/// an optional file that receives the program's stdout.
#[derive(Clone, PartialEq, Eq)]
pub struct DumpCommand {
    pub program: &'static str,
    pub args: Vec<OsString>,
    pub env: Vec<(&'static str, String)>,
    pub stdout: Option<PathBuf>,
}

impl fmt::Display for DumpCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, _) in &self.env {
            write!(f, "{}=*** ", name)?;
        }
        f.write_str(self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        if let Some(out) = &self.stdout {
            write!(f, " > {}", out.display())?;
        }
        Ok(())
    }
}

impl fmt::Debug for DumpCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DumpCommand({})", self)
    }
}

fn resolve_program(config: &AppConfig) -> Result<PathBuf> {
    match &config.dump_binary {
        Some(path) => Ok(path.clone()),
        None => find_executable(config.engine.program()),
    }
}

// Removes whatever the dump left behind at `path`.
fn discard_partial(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            warn!("Could not remove incomplete snapshot {}: {}", path.display(), e);
        }
    }
}

/// Runs the engine's dump utility into `path` and blocks until it exits.
pub fn create_snapshot(config: &AppConfig, path: &Path) -> Result<PathBuf> {
    let command = config.engine.dump_command(&config.database, path);
    let program = resolve_program(config)?;
    debug!("Dump command: {}", command);

    let mut child = Command::new(&program);
    child
        .args(&command.args)
        .envs(command.env.iter().map(|(k, v)| (*k, v.as_str())))
        .stdin(Stdio::null());

    if let Some(out) = &command.stdout {
        let file = File::create(out).map_err(|e| AppError::directory(out, e))?;
        child.stdout(Stdio::from(file));
    }

    info!(
        "Running {} for database {} on {}",
        program.display(),
        config.database.name,
        config.database.host
    );
    let status = match child.status() {
        Ok(status) => status,
        Err(e) => {
            discard_partial(path);
            return Err(AppError::DumpInvocation {
                program: program.display().to_string(),
                reason: e.to_string(),
            });
        }
    };

    if !status.success() {
        discard_partial(path);
        return Err(AppError::DumpFailed {
            program: program.display().to_string(),
            status,
        });
    }

    info!("✓ Snapshot written to {}", path.display());
    Ok(path.to_path_buf())
}
