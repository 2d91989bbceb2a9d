//! Intake validation for new readings

use crate::ValidationError;
use serde::{Deserialize, Serialize};
use slopewatch_domain::{SLOPE_ANGLE_MAX, SLOPE_ANGLE_MIN, SOIL_MOISTURE_MAX, SOIL_MOISTURE_MIN};
use std::fmt;

/// The measurements a reading carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measurement {
    /// Soil moisture, percent
    SoilMoisture,
    /// Slope angle, degrees
    SlopeAngle,
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measurement::SoilMoisture => f.write_str("soil moisture"),
            Measurement::SlopeAngle => f.write_str("slope angle"),
        }
    }
}

/// Accepted ranges for each measurement, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntakeLimits {
    /// Lowest accepted moisture
    #[serde(default = "default_moisture_min")]
    pub moisture_min: f64,
    /// Highest accepted moisture
    #[serde(default = "default_moisture_max")]
    pub moisture_max: f64,
    /// Lowest accepted angle
    #[serde(default = "default_angle_min")]
    pub angle_min: f64,
    /// Highest accepted angle
    #[serde(default = "default_angle_max")]
    pub angle_max: f64,
}

fn default_moisture_min() -> f64 {
    SOIL_MOISTURE_MIN
}

fn default_moisture_max() -> f64 {
    SOIL_MOISTURE_MAX
}

fn default_angle_min() -> f64 {
    SLOPE_ANGLE_MIN
}

fn default_angle_max() -> f64 {
    SLOPE_ANGLE_MAX
}

impl Default for IntakeLimits {
    fn default() -> Self {
        Self {
            moisture_min: SOIL_MOISTURE_MIN,
            moisture_max: SOIL_MOISTURE_MAX,
            angle_min: SLOPE_ANGLE_MIN,
            angle_max: SLOPE_ANGLE_MAX,
        }
    }
}

impl IntakeLimits {
    /// Check the limits are ordered and lie within the physical ranges
    ///
    /// Limits may be tightened but never widened, since the store rejects
    /// out-of-range readings when it loads the log.
    pub fn validate(&self) -> Result<(), String> {
        let within = |lo: f64, hi: f64, min: f64, max: f64| lo >= min && hi <= max && lo <= hi;

        if !within(self.moisture_min, self.moisture_max, SOIL_MOISTURE_MIN, SOIL_MOISTURE_MAX) {
            return Err(format!(
                "moisture limits [{}, {}] must be ordered and within [{}, {}]",
                self.moisture_min, self.moisture_max, SOIL_MOISTURE_MIN, SOIL_MOISTURE_MAX
            ));
        }
        if !within(self.angle_min, self.angle_max, SLOPE_ANGLE_MIN, SLOPE_ANGLE_MAX) {
            return Err(format!(
                "angle limits [{}, {}] must be ordered and within [{}, {}]",
                self.angle_min, self.angle_max, SLOPE_ANGLE_MIN, SLOPE_ANGLE_MAX
            ));
        }
        Ok(())
    }
}

/// Validates raw measurements before a reading is created
#[derive(Debug, Clone, Default)]
pub struct IntakeValidator {
    limits: IntakeLimits,
}

impl IntakeValidator {
    /// Create a validator with the given limits
    pub fn new(limits: IntakeLimits) -> Self {
        Self { limits }
    }

    /// Limits in effect
    pub fn limits(&self) -> &IntakeLimits {
        &self.limits
    }

    /// Validate both measurements, reporting the first failure
    pub fn validate(&self, moisture: f64, angle: f64) -> Result<(), ValidationError> {
        check_range(
            Measurement::SoilMoisture,
            moisture,
            self.limits.moisture_min,
            self.limits.moisture_max,
        )?;
        check_range(
            Measurement::SlopeAngle,
            angle,
            self.limits.angle_min,
            self.limits.angle_max,
        )
    }
}

fn check_range(field: Measurement, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Parse a measurement typed by the user
///
/// Surrounding whitespace is ignored. Text that is not a number, including
/// `"NaN"` and `"inf"`, is rejected.
pub fn parse_measurement(field: Measurement, input: &str) -> Result<f64, ValidationError> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(ValidationError::NotFinite { field }),
        Err(_) => Err(ValidationError::NotNumeric {
            field,
            input: input.to_string(),
        }),
    }
}

/// Collapse a blank observation to `None`
pub fn normalize_observation(observation: Option<String>) -> Option<String> {
    observation.filter(|o| !o.trim().is_empty())
}
