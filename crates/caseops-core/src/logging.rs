//! Tracing subscriber setup.
//!
//! The dashboard owns the terminal, so log output goes to `logging.file`
//! when configured and is discarded otherwise.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Environment variable holding an `EnvFilter` directive; wins over
/// `logging.level`.
pub const ENV_LOG: &str = "CASEOPS_LOG";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter {directive:?}: {message}")]
    Filter { directive: String, message: String },
    #[error("open log file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("install subscriber: {0}")]
    Install(String),
}

/// Install the global subscriber.
pub fn init(cfg: &LoggingConfig) -> Result<(), LoggingError> {
    let env_value = std::env::var(ENV_LOG).ok();
    let filter = build_filter(env_value.as_deref(), &cfg.level)?;
    let file = cfg.file.as_deref().map(open_log_file).transpose()?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true);

    let installed = match (cfg.format, file) {
        (LogFormat::Json, Some(file)) => builder.json().with_writer(Mutex::new(file)).try_init(),
        (LogFormat::Json, None) => builder.json().with_writer(io::sink).try_init(),
        (LogFormat::Console, Some(file)) => builder.with_writer(Mutex::new(file)).try_init(),
        (LogFormat::Console, None) => builder.with_writer(io::sink).try_init(),
    };
    installed.map_err(|err| LoggingError::Install(err.to_string()))?;
    tracing::debug!(format = ?cfg.format, file = ?cfg.file, "logging initialized");
    Ok(())
}

/// `CASEOPS_LOG` if set and non-blank, else the configured level.
pub fn build_filter(env_value: Option<&str>, level: &str) -> Result<EnvFilter, LoggingError> {
    let directive = env_value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(level)
        .to_string();
    EnvFilter::try_new(&directive).map_err(|err| LoggingError::Filter {
        message: err.to_string(),
        directive,
    })
}

/// Open `path` for appending, creating parent directories.
pub fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    let open_err = |source| LoggingError::Open {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(open_err)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(open_err)
}

#[cfg(test)]
mod tests {
    use super::{build_filter, open_log_file};
    use std::io::Write;

    #[test]
    fn env_directive_wins_over_level() {
        let filter = match build_filter(Some("caseops_client=debug"), "info") {
            Ok(filter) => filter,
            Err(err) => panic!("filter: {err}"),
        };
        assert_eq!(filter.to_string(), "caseops_client=debug");
    }

    #[test]
    fn blank_env_falls_back_to_level() {
        let filter = match build_filter(Some("  "), "warn") {
            Ok(filter) => filter,
            Err(err) => panic!("filter: {err}"),
        };
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn log_file_is_created_with_parents_and_appended() {
        let dir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(err) => panic!("tempdir: {err}"),
        };
        let path = dir.path().join("nested").join("caseops.log");
        for line in ["one\n", "two\n"] {
            let mut file = match open_log_file(&path) {
                Ok(file) => file,
                Err(err) => panic!("open: {err}"),
            };
            if let Err(err) = file.write_all(line.as_bytes()) {
                panic!("write: {err}");
            }
        }
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => panic!("read: {err}"),
        };
        assert_eq!(text, "one\ntwo\n");
    }
}
