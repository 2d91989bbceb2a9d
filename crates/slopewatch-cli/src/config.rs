//! Configuration management for the CLI.
//!
//! The CLI reads one TOML file holding display settings plus the monitoring
//! service's own sections:
//!
//! ```toml
//! [settings]
//! color = true
//! format = "table"
//!
//! [storage]
//! backend = "file"
//! path = "/home/me/.slopewatch/data"
//! ```

use crate::error::{CliError, Result};
use serde::Deserialize;
use slopewatch_monitor::{BackendKind, MonitorConfig};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Display settings
    #[serde(default)]
    pub settings: Settings,

    /// Monitoring service configuration
    #[serde(flatten)]
    pub monitor: MonitorConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Directory holding the default config and data.
    pub fn home() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".slopewatch"))
    }

    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::home()?.join("config.toml"))
    }

    /// Load configuration from `path`, or from the default location.
    ///
    /// Readings go to `~/.slopewatch/data` unless the file names a storage
    /// backend. An explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Some(Self::path()?).filter(|p| p.exists()),
        };
        Self::load_from(path.as_deref(), Self::home()?.join("data"))
    }

    /// Load configuration from `path`, keeping readings in `data_dir`
    /// unless the file names a storage backend.
    ///
    /// With no file at all the defaults are used.
    pub fn load_from(path: Option<&Path>, data_dir: PathBuf) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path, data_dir)?,
            None => {
                tracing::debug!("No config file found, using defaults");
                Self::with_data_dir(data_dir)
            }
        };

        config.monitor.validate()?;
        if config.monitor.storage.backend == BackendKind::Memory {
            tracing::warn!("Memory backend configured; readings will not outlive this process");
        }
        Ok(config)
    }

    /// Parse a configuration file.
    ///
    /// When the file has no `storage.backend`, readings are kept as files
    /// under `storage.path`, or under `data_dir` if that is unset too.
    pub fn from_file(path: &Path, data_dir: PathBuf) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let mut config: Config = toml::from_str(&contents)?;

        let raw: toml::Table = toml::from_str(&contents)?;
        let backend_named = raw
            .get("storage")
            .and_then(|storage| storage.get("backend"))
            .is_some();
        if !backend_named {
            let storage = &mut config.monitor.storage;
            storage.backend = BackendKind::File;
            if storage.path.is_none() {
                storage.path = Some(data_dir);
            }
        }

        tracing::debug!(
            path = %path.display(),
            backend = ?config.monitor.storage.backend,
            "Loaded config file"
        );
        Ok(config)
    }

    /// Default configuration storing readings as files under `dir`.
    pub fn with_data_dir(dir: PathBuf) -> Self {
        let mut config = Self::default();
        config.monitor.storage.backend = BackendKind::File;
        config.monitor.storage.path = Some(dir);
        config
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
