//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$MAILLOG_CONFIG` (environment variable)
//! 2. `~/.config/maillog/config.toml` (Linux/macOS)
//!    `%APPDATA%\maillog\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

/// Backend base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Backend connection settings.
    pub api: ApiConfig,
    /// Export defaults.
    pub export: ExportConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// `strftime` format string for dates in the log list.
    pub date_format: String,
    /// Override cache directory for log files.
    pub cache_dir: Option<PathBuf>,
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Language for CLI output and digests: "en" or "it". Unset = system locale.
    pub lang: Option<String>,
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the backend; `/logs` is appended.
    pub base_url: String,
    /// Request timeout in seconds. `None` leaves the HTTP client default (no timeout).
    pub timeout_secs: Option<u64>,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

/// Export defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Default export format: "csv", "json", "txt".
    pub default_format: String,
    /// CSV field separator character.
    pub csv_separator: char,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d %H:%M".to_string(),
            cache_dir: None,
            log_level: "warn".to_string(),
            lang: None,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: None,
            user_agent: concat!("maillog/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_format: "csv".to_string(),
            csv_separator: ',',
        }
    }
}

// ── Validation ──────────────────────────────────────────────────

impl Config {
    /// Replace values that would fail at use time with their defaults.
    pub fn sanitized(mut self) -> Self {
        if !is_valid_date_format(&self.general.date_format) {
            tracing::warn!(
                date_format = %self.general.date_format,
                "Invalid date_format, using default"
            );
            self.general.date_format = GeneralConfig::default().date_format;
        }
        self
    }
}

/// `true` if every `strftime` specifier in `fmt` is one chrono understands.
pub fn is_valid_date_format(fmt: &str) -> bool {
    !StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error))
}

// ── Load / save ─────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    let Some(path) = config_file_path() else {
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str::<Config>(&contents) {
            Ok(cfg) => {
                tracing::info!(path = %path.display(), "Loaded config");
                cfg.sanitized()
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to parse config, using defaults"
                );
                Config::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to read config file, using defaults"
            );
            Config::default()
        }
    }
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("MAILLOG_CONFIG") {
        return Some(PathBuf::from(env_path));
    }
    dirs::config_dir().map(|d| d.join("maillog").join("config.toml"))
}

/// Return the cache directory used for log files.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("maillog")
}
