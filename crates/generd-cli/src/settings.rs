//! User settings read from `~/.generdconfig/config.toml`.

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const CONFIG_DIR_NAME: &str = ".generdconfig";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not determine the home directory")]
    NoHomeDir,
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("invalid config {path}: {source}")]
    Decode {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid settings: {0}")]
    Invalid(String),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Locations under the generd config directory.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub root: PathBuf,
    pub config_path: PathBuf,
}

impl ConfigPaths {
    pub fn new(root: PathBuf) -> Self {
        let config_path = root.join("config.toml");
        Self { root, config_path }
    }

    pub fn from_home() -> SettingsResult<Self> {
        let home = dirs::home_dir().ok_or(SettingsError::NoHomeDir)?;
        Ok(Self::new(home.join(CONFIG_DIR_NAME)))
    }

    /// Use an explicit settings file; the artifact default stays in the home config dir.
    pub fn with_config_file(config_path: PathBuf) -> SettingsResult<Self> {
        let mut paths = Self::from_home()?;
        paths.config_path = config_path;
        Ok(paths)
    }

    pub fn default_artifact_path(&self) -> PathBuf {
        self.root.join("metadata.json")
    }
}

/// On-disk shape; every key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    output_path: Option<PathBuf>,
    port: Option<u16>,
    log_filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub output_path: PathBuf,
    pub port: u16,
    pub log_filter: String,
}

impl Settings {
    pub fn defaults(paths: &ConfigPaths) -> Self {
        Self {
            output_path: paths.default_artifact_path(),
            port: DEFAULT_PORT,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    /// Load the settings file, falling back to defaults when it does not exist.
    pub fn load(paths: &ConfigPaths) -> SettingsResult<Self> {
        let path = &paths.config_path;
        if !path.exists() {
            return Ok(Self::defaults(paths));
        }

        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content, paths).map_err(|err| match err {
            SettingsError::Decode { source, .. } => SettingsError::Decode {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml(content: &str, paths: &ConfigPaths) -> SettingsResult<Self> {
        let file: SettingsFile = toml::from_str(content).map_err(|source| SettingsError::Decode {
            path: "<inline>".to_string(),
            source,
        })?;
        let defaults = Self::defaults(paths);

        let port = file.port.unwrap_or(defaults.port);
        if port == 0 {
            return Err(SettingsError::Invalid(
                "port must be between 1 and 65535".to_string(),
            ));
        }

        let log_filter = file.log_filter.unwrap_or(defaults.log_filter);
        if let Err(err) = EnvFilter::try_new(&log_filter) {
            return Err(SettingsError::Invalid(format!(
                "log_filter `{log_filter}` is not a valid filter: {err}"
            )));
        }

        Ok(Self {
            output_path: file.output_path.unwrap_or(defaults.output_path),
            port,
            log_filter,
        })
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, output_path: Option<PathBuf>, port: Option<u16>) -> Self {
        if let Some(path) = output_path {
            self.output_path = path;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }
}
