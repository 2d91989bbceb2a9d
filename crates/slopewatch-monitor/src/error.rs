//! Monitoring service error types

use crate::validator::Measurement;
use slopewatch_store::StoreError;
use thiserror::Error;

/// Intake rejected; the caller corrects the input and resubmits
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value outside the accepted range
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Offending measurement
        field: Measurement,
        /// Value supplied
        value: f64,
        /// Inclusive lower bound
        min: f64,
        /// Inclusive upper bound
        max: f64,
    },

    /// NaN or infinite value
    #[error("{field} must be a finite number")]
    NotFinite {
        /// Offending measurement
        field: Measurement,
    },

    /// Text that does not parse as a number
    #[error("{field} must be a number, got '{input}'")]
    NotNumeric {
        /// Offending measurement
        field: Measurement,
        /// Raw text supplied
        input: String,
    },
}

/// Errors returned by [`MonitoringService`](crate::MonitoringService)
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Input failed validation; nothing was written
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Storage layer failure
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl MonitorError {
    /// Whether the user can fix this by correcting their input
    pub fn is_user_recoverable(&self) -> bool {
        matches!(self, MonitorError::Validation(_))
    }
}
