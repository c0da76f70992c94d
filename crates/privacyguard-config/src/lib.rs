//! Configuration for the PrivacyGuard dashboard.
//!
//! TOML file + `PRIVACYGUARD_*` environment layering via figment, platform
//! paths for the config file and the local key/value store, and
//! translation to `privacyguard_core::DashboardConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use privacyguard_core::DashboardConfig;

const STORE_FILE: &str = "store.json";
const FADE_MILLIS: u64 = 400;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub refresh: RefreshSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiSettings {
    /// Control API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Accept self-signed certificates.
    #[serde(default)]
    pub insecure: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            insecure: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RefreshSettings {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// How long a toast stays fully visible before fading.
    #[serde(default = "default_toast")]
    pub toast_secs: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            toast_secs: default_toast(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageSettings {
    /// Override for the key/value store file.
    pub path: Option<PathBuf>,
}

fn default_base_url() -> String {
    privacyguard_core::config::DEFAULT_API_URL.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_interval() -> u64 {
    30
}
fn default_toast() -> u64 {
    4
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "privacyguard", "privacyguard")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default location of the local key/value store.
pub fn data_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share").join(STORE_FILE),
        |dirs| dirs.data_dir().join(STORE_FILE),
    )
}

fn dirs_fallback(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(base);
    p.push("privacyguard");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file (missing is fine) layered with
/// `PRIVACYGUARD_*` variables, e.g. `PRIVACYGUARD_API__BASE_URL`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PRIVACYGUARD_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it cannot be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

impl Config {
    /// Build the engine configuration, validating the URL and intervals.
    pub fn to_dashboard_config(&self) -> Result<DashboardConfig, ConfigError> {
        let url: url::Url = self
            .api
            .base_url
            .parse()
            .map_err(|e| ConfigError::Validation {
                field: "api.base_url".into(),
                reason: format!("invalid URL '{}': {e}", self.api.base_url),
            })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::Validation {
                field: "api.base_url".into(),
                reason: format!("'{url}' cannot carry a path"),
            });
        }
        if self.refresh.interval_secs == 0 {
            return Err(ConfigError::Validation {
                field: "refresh.interval_secs".into(),
                reason: "must be at least 1".into(),
            });
        }

        let mut config = DashboardConfig::new(url);
        config.timeout = Duration::from_secs(self.api.timeout_secs);
        config.accept_invalid_certs = self.api.insecure;
        config.refresh_interval = Duration::from_secs(self.refresh.interval_secs);
        config.toast_duration = Duration::from_secs(self.refresh.toast_secs);
        config.fade_duration = Duration::from_millis(FADE_MILLIS);
        Ok(config)
    }

    /// Where the local key/value store lives.
    pub fn store_path(&self) -> PathBuf {
        self.storage.path.clone().unwrap_or_else(data_path)
    }
}
