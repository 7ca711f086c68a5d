//! Configuration for fieldsync tools.
//!
//! TOML profiles (one per monitoring deployment) layered with
//! `FIELDSYNC_`-prefixed environment variables, and translation to
//! `fieldsync_core::SyncConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fieldsync_core::{DEFAULT_POLLING_INTERVAL, SyncConfig, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in {path}")]
    UnknownProfile { name: String, path: String },

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
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named deployments.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_polling_interval")]
    pub polling_interval_secs: u64,

    /// CA certificate trusted for every profile.
    pub ca_cert: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            polling_interval_secs: default_polling_interval(),
            ca_cert: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_polling_interval() -> u64 {
    DEFAULT_POLLING_INTERVAL.as_secs()
}

/// One monitoring service deployment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Service base URL (e.g., "https://sensors.example.com/api").
    pub api_url: String,

    /// Override `defaults.polling_interval_secs`.
    pub polling_interval_secs: Option<u64>,

    /// Override `defaults.ca_cert`.
    pub ca_cert: Option<PathBuf>,
}

impl Profile {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            polling_interval_secs: None,
            ca_cert: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "fieldsync", "fieldsync").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("fieldsync");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load defaults, then `path` (if it exists), then `FIELDSYNC_*` env vars.
///
/// Nested keys use a double underscore, e.g. `FIELDSYNC_DEFAULTS__OUTPUT`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("FIELDSYNC_").split("__"));

    Ok(figment.extract()?)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML at the canonical path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile resolution ──────────────────────────────────────────────

/// Pick the named profile, else the configured default, else `"default"`.
pub fn resolve_profile<'a>(
    cfg: &'a Config,
    name: Option<&str>,
) -> Result<(String, &'a Profile), ConfigError> {
    let name = name
        .or(cfg.default_profile.as_deref())
        .unwrap_or("default")
        .to_owned();
    match cfg.profiles.get(&name) {
        Some(profile) => Ok((name, profile)),
        None => Err(ConfigError::UnknownProfile {
            name,
            path: config_path().display().to_string(),
        }),
    }
}

/// Build a `SyncConfig` from a profile, filling gaps from `defaults`.
pub fn profile_to_sync_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<SyncConfig, ConfigError> {
    let url: url::Url = profile
        .api_url
        .parse()
        .map_err(|e| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("{e}: {}", profile.api_url),
        })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("expected an http(s) URL, got '{}'", profile.api_url),
        });
    }

    let interval_secs = profile
        .polling_interval_secs
        .unwrap_or(defaults.polling_interval_secs);
    if interval_secs == 0 {
        return Err(ConfigError::Validation {
            field: "polling_interval_secs".into(),
            reason: "must be at least 1".into(),
        });
    }

    let tls = profile
        .ca_cert
        .as_ref()
        .or(defaults.ca_cert.as_ref())
        .map_or(TlsVerification::SystemDefaults, |path| {
            TlsVerification::CustomCa(path.clone())
        });

    let mut config = SyncConfig::new(url);
    config.tls = tls;
    config.polling_interval = Duration::from_secs(interval_secs);
    Ok(config)
}
