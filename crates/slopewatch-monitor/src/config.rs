//! Configuration for the monitoring service
//!
//! Loaded from TOML. Every field has a default, so an empty file is valid.
//!
//! ```toml
//! [storage]
//! backend = "sqlite"          # memory | file | sqlite
//! path = "/var/lib/slopewatch/readings.db"
//! key = "readings"
//! max_append_attempts = 3
//!
//! [thresholds]
//! high_moisture = 70.0
//! high_angle = 45.0
//! moderate_moisture = 50.0
//! moderate_angle = 30.0
//!
//! [intake]
//! moisture_min = 0.0
//! moisture_max = 100.0
//! angle_min = 0.0
//! angle_max = 90.0
//! ```

use crate::validator::IntakeLimits;
use serde::{Deserialize, Serialize};
use slopewatch_domain::{
    RiskThresholds, HIGH_ANGLE_THRESHOLD, HIGH_MOISTURE_THRESHOLD, MODERATE_ANGLE_THRESHOLD,
    MODERATE_MOISTURE_THRESHOLD,
};
use slopewatch_store::{
    AnyBlobStore, BackendError, FileBlobStore, MemoryBlobStore, ReadingStore, SqliteBlobStore,
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("Failed to serialize config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A value fails validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Storage backend could not be opened
    #[error("Failed to open storage backend: {0}")]
    Backend(#[from] BackendError),
}

/// Which backend holds the reading log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Lost when the process exits
    Memory,
    /// One JSON file per key in a directory
    File,
    /// SQLite database file
    Sqlite,
}

/// Storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend to use
    #[serde(default = "default_backend")]
    pub backend: BackendKind,

    /// Directory (file backend) or database file (sqlite backend)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Key the log is stored under
    #[serde(default = "default_key")]
    pub key: String,

    /// Read-modify-write attempts before an append reports a conflict
    #[serde(default = "default_max_append_attempts")]
    pub max_append_attempts: u32,
}

/// Classifier cutoffs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Moisture above which risk is High
    #[serde(default = "default_high_moisture")]
    pub high_moisture: f64,
    /// Angle above which risk is High
    #[serde(default = "default_high_angle")]
    pub high_angle: f64,
    /// Moisture above which risk is at least Moderate
    #[serde(default = "default_moderate_moisture")]
    pub moderate_moisture: f64,
    /// Angle above which risk is at least Moderate
    #[serde(default = "default_moderate_angle")]
    pub moderate_angle: f64,
}

/// Top-level monitoring configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Classifier cutoffs
    #[serde(default)]
    pub thresholds: ThresholdConfig,

    /// Intake limits
    #[serde(default)]
    pub intake: IntakeLimits,
}

fn default_backend() -> BackendKind {
    BackendKind::Memory
}

fn default_key() -> String {
    ReadingStore::<MemoryBlobStore>::DEFAULT_KEY.to_string()
}

fn default_max_append_attempts() -> u32 {
    ReadingStore::<MemoryBlobStore>::DEFAULT_MAX_APPEND_ATTEMPTS
}

fn default_high_moisture() -> f64 {
    HIGH_MOISTURE_THRESHOLD
}

fn default_high_angle() -> f64 {
    HIGH_ANGLE_THRESHOLD
}

fn default_moderate_moisture() -> f64 {
    MODERATE_MOISTURE_THRESHOLD
}

fn default_moderate_angle() -> f64 {
    MODERATE_ANGLE_THRESHOLD
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: None,
            key: default_key(),
            max_append_attempts: default_max_append_attempts(),
        }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        RiskThresholds::default().into()
    }
}

impl From<RiskThresholds> for ThresholdConfig {
    fn from(t: RiskThresholds) -> Self {
        Self {
            high_moisture: t.high_moisture,
            high_angle: t.high_angle,
            moderate_moisture: t.moderate_moisture,
            moderate_angle: t.moderate_angle,
        }
    }
}

impl From<ThresholdConfig> for RiskThresholds {
    fn from(c: ThresholdConfig) -> Self {
        Self {
            high_moisture: c.high_moisture,
            high_angle: c.high_angle,
            moderate_moisture: c.moderate_moisture,
            moderate_angle: c.moderate_angle,
        }
    }
}

impl StorageConfig {
    /// Open the configured backend
    pub fn open_backend(&self) -> Result<AnyBlobStore, ConfigError> {
        let backend = match self.backend {
            BackendKind::Memory => AnyBlobStore::from(MemoryBlobStore::new()),
            BackendKind::File => AnyBlobStore::from(FileBlobStore::new(self.require_path()?)?),
            BackendKind::Sqlite => AnyBlobStore::from(SqliteBlobStore::new(self.require_path()?)?),
        };
        tracing::debug!(backend = backend.kind(), key = %self.key, "Opened storage backend");
        Ok(backend)
    }

    /// Open the configured backend wrapped in a reading store
    pub fn open_store(&self) -> Result<ReadingStore<AnyBlobStore>, ConfigError> {
        Ok(ReadingStore::with_key(self.open_backend()?, self.key.clone())
            .with_max_append_attempts(self.max_append_attempts))
    }

    fn require_path(&self) -> Result<&Path, ConfigError> {
        self.path.as_deref().ok_or_else(|| {
            ConfigError::Invalid(format!(
                "storage.path is required for the {:?} backend",
                self.backend
            ))
        })
    }
}

impl MonitorConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: MonitorConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every section for consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.key.is_empty() {
            return Err(ConfigError::Invalid("storage.key must not be empty".to_string()));
        }
        if self.storage.max_append_attempts == 0 {
            return Err(ConfigError::Invalid(
                "storage.max_append_attempts must be at least 1".to_string(),
            ));
        }
        if self.storage.backend != BackendKind::Memory && self.storage.path.is_none() {
            return Err(ConfigError::Invalid(format!(
                "storage.path is required for the {:?} backend",
                self.storage.backend
            )));
        }
        self.risk_thresholds()
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("thresholds: {}", e)))?;
        self.intake
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("intake: {}", e)))?;
        Ok(())
    }

    /// Threshold table for the classifier
    pub fn risk_thresholds(&self) -> RiskThresholds {
        self.thresholds.into()
    }
}
