//! Dashboard configuration.
//!
//! Precedence: built-in defaults < YAML config file < environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

pub const ENV_API_BASE_URL: &str = "CASEOPS_API_BASE_URL";
pub const ENV_DOWNLOAD_DIR: &str = "CASEOPS_DOWNLOAD_DIR";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api: ApiConfig,
    pub downloads: DownloadsConfig,
    pub logging: LoggingConfig,
    pub tui: TuiConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    /// Transport-level bound; `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadsConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Console,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "console" | "text" => Ok(Self::Console),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Invalid(format!(
                "logging.format must be console or json, got {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    /// Log destination. The TUI owns the terminal, so without a file logs
    /// are discarded.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuiConfig {
    pub theme: String,
}

impl Config {
    #[must_use]
    pub fn default_from_env() -> Self {
        let home = std::env::var("HOME").unwrap_or_default();
        let dir = if home.is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(&home).join("Downloads")
        };
        Self {
            api: ApiConfig {
                base_url: "http://localhost:8080".to_string(),
                request_timeout: None,
            },
            downloads: DownloadsConfig { dir },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Console,
                file: None,
            },
            tui: TuiConfig {
                theme: "dark".to_string(),
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    #[serde(default)]
    api: PartialApiConfig,
    #[serde(default)]
    downloads: PartialDownloadsConfig,
    #[serde(default)]
    logging: PartialLoggingConfig,
    #[serde(default)]
    tui: PartialTuiConfig,
}

#[derive(Debug, Default, Deserialize)]
struct PartialApiConfig {
    #[serde(default)]
    base_url: String,
    #[serde(default)]
    request_timeout_secs: u64,
}

#[derive(Debug, Default, Deserialize)]
struct PartialDownloadsConfig {
    #[serde(default)]
    dir: String,
}

#[derive(Debug, Default, Deserialize)]
struct PartialLoggingConfig {
    #[serde(default)]
    level: String,
    #[serde(default)]
    format: String,
    #[serde(default)]
    file: String,
}

#[derive(Debug, Default, Deserialize)]
struct PartialTuiConfig {
    #[serde(default)]
    theme: String,
}

/// Load config from the process environment. An explicit path must be
/// readable; the default path is optional.
pub fn load_config(config_file: Option<&str>) -> Result<(Config, Option<PathBuf>), ConfigError> {
    load_config_with(config_file, default_config_path(), |key| {
        std::env::var(key).ok()
    })
}

/// Same as [`load_config`] with the default path and environment supplied.
pub fn load_config_with<E>(
    config_file: Option<&str>,
    default_path: Option<PathBuf>,
    env: E,
) -> Result<(Config, Option<PathBuf>), ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    let mut cfg = Config::default_from_env();

    let explicit = config_file
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from);

    let (path_to_try, used) = match explicit {
        Some(path) => (Some(path), true),
        None => (default_path, false),
    };

    let mut loaded_from = None;
    if let Some(path) = path_to_try {
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                let parsed: PartialConfig = if text.trim().is_empty() {
                    PartialConfig::default()
                } else {
                    serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
                        path: path.clone(),
                        source,
                    })?
                };
                apply_partial(&mut cfg, parsed)?;
                loaded_from = Some(path);
            }
            Err(source) => {
                if used {
                    return Err(ConfigError::Read { path, source });
                }
            }
        }
    }

    apply_env(&mut cfg, env)?;
    validate(&cfg)?;
    Ok((cfg, loaded_from))
}

fn default_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.trim().is_empty() {
            return Some(PathBuf::from(xdg).join("caseops").join("config.yaml"));
        }
    }
    if let Ok(home) = std::env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(
                PathBuf::from(home)
                    .join(".config")
                    .join("caseops")
                    .join("config.yaml"),
            );
        }
    }
    None
}

fn apply_partial(cfg: &mut Config, partial: PartialConfig) -> Result<(), ConfigError> {
    if !partial.api.base_url.trim().is_empty() {
        cfg.api.base_url = partial.api.base_url.trim().to_string();
    }
    if partial.api.request_timeout_secs > 0 {
        cfg.api.request_timeout = Some(Duration::from_secs(partial.api.request_timeout_secs));
    }
    if !partial.downloads.dir.trim().is_empty() {
        cfg.downloads.dir = expand_tilde(partial.downloads.dir.trim())?;
    }
    if !partial.logging.level.trim().is_empty() {
        cfg.logging.level = partial.logging.level.trim().to_string();
    }
    if !partial.logging.format.trim().is_empty() {
        cfg.logging.format = LogFormat::parse(partial.logging.format.trim())?;
    }
    if !partial.logging.file.trim().is_empty() {
        cfg.logging.file = Some(expand_tilde(partial.logging.file.trim())?);
    }
    if !partial.tui.theme.trim().is_empty() {
        cfg.tui.theme = partial.tui.theme.trim().to_string();
    }
    Ok(())
}

fn apply_env<E>(cfg: &mut Config, env: E) -> Result<(), ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    if let Some(url) = env(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
        cfg.api.base_url = url.trim().to_string();
    }
    if let Some(dir) = env(ENV_DOWNLOAD_DIR).filter(|v| !v.trim().is_empty()) {
        cfg.downloads.dir = expand_tilde(dir.trim())?;
    }
    Ok(())
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let url = cfg.api.base_url.as_str();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::Invalid(format!(
            "api.base_url must be an http(s) URL, got {url:?}"
        )));
    }
    Ok(())
}

fn expand_tilde(input: &str) -> Result<PathBuf, ConfigError> {
    let home = || {
        std::env::var("HOME").map_err(|_| ConfigError::Invalid("failed to resolve HOME".into()))
    };
    if input == "~" {
        return Ok(PathBuf::from(home()?));
    }
    if let Some(rest) = input.strip_prefix("~/") {
        return Ok(PathBuf::from(home()?).join(rest));
    }
    Ok(Path::new(input).to_path_buf())
}
