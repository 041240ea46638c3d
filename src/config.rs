//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/partynet/partynet.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `PARTYNET_*` prefix, `__` between sections
//!    (e.g. `PARTYNET_STORE__PATH`)

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("environment override: {0}")]
    Env(#[from] config::ConfigError),

    #[error("invalid value '{value}' for {key}")]
    Invalid { key: String, value: String },

    #[error("render settings: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Which store backend to open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local, lost on exit
    Memory,
    /// JSON document on disk
    #[default]
    Json,
}

impl FromStr for StoreBackend {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "json" => Ok(StoreBackend::Json),
            _ => Err(SettingsError::Invalid {
                key: "store.backend".into(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Memory => f.write_str("memory"),
            StoreBackend::Json => f.write_str("json"),
        }
    }
}

/// Store configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreSettings {
    /// Backend to open
    pub backend: StoreBackend,
    /// Data file for the json backend
    pub path: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_store_path(),
        }
    }
}

/// Raw store config for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawStoreSettings {
    pub backend: Option<StoreBackend>,
    pub path: Option<PathBuf>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub store: RawStoreSettings,
}

/// Unified configuration for partynet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// Unit store settings
    pub store: StoreSettings,
}

/// Default data file (`$XDG_DATA_HOME/partynet/units.json`).
fn default_store_path() -> PathBuf {
    ProjectDirs::from("", "", "partynet")
        .map(|dirs| dirs.data_dir().join("units.json"))
        .unwrap_or_else(|| PathBuf::from("~/.partynet/units.json"))
}

/// Get the XDG config directory for partynet.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "partynet").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("partynet.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}`; unknown variables leave the path as is.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            store: StoreSettings {
                backend: overlay.store.backend.unwrap_or(self.store.backend),
                path: overlay
                    .store
                    .path
                    .clone()
                    .unwrap_or_else(|| self.store.path.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist
    pub fn load(config_file: Option<&Path>) -> Result<Self, SettingsError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = config_file {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.store.path = expand_path(&current.store.path);

        Ok(current)
    }

    /// Load from one file on top of compiled defaults, ignoring the global
    /// config and the environment.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let mut settings = Self::default().merge_with(&load_raw_settings(path)?);
        settings.store.path = expand_path(&settings.store.path);
        Ok(settings)
    }

    /// Apply PARTYNET_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, SettingsError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("PARTYNET")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        if let Ok(val) = config.get_string("store.backend") {
            settings.store.backend = val.parse()?;
        }
        if let Ok(val) = config.get_string("store.path") {
            settings.store.path = PathBuf::from(val);
        }

        Ok(settings)
    }

    /// Render as TOML, as it would appear in a config file.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
