//! Reading module - one recorded environmental observation

use chrono::{DateTime, Utc};
use std::fmt;

/// Lowest accepted soil moisture, in percent
pub const SOIL_MOISTURE_MIN: f64 = 0.0;
/// Highest accepted soil moisture, in percent
pub const SOIL_MOISTURE_MAX: f64 = 100.0;
/// Lowest accepted slope angle, in degrees
pub const SLOPE_ANGLE_MIN: f64 = 0.0;
/// Highest accepted slope angle, in degrees
pub const SLOPE_ANGLE_MAX: f64 = 90.0;

/// Unique identifier for a reading based on UUIDv7
///
/// UUIDv7 provides:
/// - Chronological sortability, matching the log's insertion order
/// - 128-bit uniqueness without coordination
/// - A canonical 36-character string form for the persisted record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReadingId(u128);

impl ReadingId {
    /// Generate a new UUIDv7-based ReadingId
    ///
    /// # Examples
    ///
    /// ```
    /// use slopewatch_domain::ReadingId;
    ///
    /// let id = ReadingId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a ReadingId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a ReadingId from its hyphenated string form
    ///
    /// Any valid UUID is accepted so that logs written by older clients
    /// (which used random v4 ids) remain readable.
    ///
    /// # Examples
    ///
    /// ```
    /// use slopewatch_domain::ReadingId;
    ///
    /// let id = ReadingId::new();
    /// let parsed = ReadingId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid reading id '{}': {}", s, e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for ReadingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReadingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// A single field reading: soil moisture, slope angle and an optional note
///
/// Readings are immutable once recorded. The id and timestamp are assigned
/// by the monitoring service at intake, never by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// Unique identifier
    pub id: ReadingId,

    /// Instant the reading was recorded
    pub timestamp: DateTime<Utc>,

    /// Soil moisture percentage, within [0, 100]
    pub soil_moisture: f64,

    /// Slope angle in degrees, within [0, 90]
    pub slope_angle: f64,

    /// Free-text observation
    pub observation: Option<String>,
}

impl Reading {
    /// Create a new reading
    pub fn new(
        id: ReadingId,
        timestamp: DateTime<Utc>,
        soil_moisture: f64,
        slope_angle: f64,
        observation: Option<String>,
    ) -> Self {
        Self {
            id,
            timestamp,
            soil_moisture,
            slope_angle,
            observation,
        }
    }

    /// Check both measurements against their physical ranges
    ///
    /// NaN fails both comparisons and is therefore rejected.
    pub fn has_valid_measurements(&self) -> bool {
        (SOIL_MOISTURE_MIN..=SOIL_MOISTURE_MAX).contains(&self.soil_moisture)
            && (SLOPE_ANGLE_MIN..=SLOPE_ANGLE_MAX).contains(&self.slope_angle)
    }
}
