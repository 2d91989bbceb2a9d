//! SlopeWatch Monitoring Service
//!
//! The application layer between a user interface and the reading log.
//!
//! The service provides:
//! - Intake validation (moisture 0–100 %, angle 0–90°, finite values only)
//! - Id and timestamp assignment for new readings
//! - Latest reading, current risk and history queries
//! - Configuration loading from TOML
//!
//! # Examples
//!
//! ```
//! use slopewatch_domain::RiskLevel;
//! use slopewatch_monitor::MonitoringService;
//! use slopewatch_store::{MemoryBlobStore, ReadingStore};
//!
//! let service = MonitoringService::new(ReadingStore::new(MemoryBlobStore::new()));
//! assert_eq!(service.current_risk().unwrap(), None);
//!
//! service.record_reading(85.0, 10.0, None).unwrap();
//! assert_eq!(service.current_risk().unwrap(), Some(RiskLevel::High));
//! ```

#![warn(missing_docs)]

mod clock;
mod config;
mod error;
mod service;
mod validator;

pub use clock::{ManualClock, SystemClock};
pub use config::{BackendKind, ConfigError, MonitorConfig, StorageConfig, ThresholdConfig};
pub use error::{MonitorError, ValidationError};
pub use service::{MonitoringService, RiskSummary};
pub use validator::{
    normalize_observation, parse_measurement, IntakeLimits, IntakeValidator, Measurement,
};
