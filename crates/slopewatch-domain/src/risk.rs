//! Landslide risk classification
//!
//! A single canonical threshold table drives every classification. Both
//! measurements are compared with strict `>` and combined with OR: either one
//! crossing its cutoff is enough to raise the level.
//!
//! | Level    | Condition                                   |
//! |----------|---------------------------------------------|
//! | High     | moisture > 70 OR angle > 45                 |
//! | Moderate | (not High) AND (moisture > 50 OR angle > 30)|
//! | Low      | otherwise                                   |
//!
//! Risk is never stored next to a reading. It is recomputed from the raw
//! measurements whenever it is needed, so recalibrating the table reclassifies
//! history consistently.

use std::fmt;

/// Soil moisture (percent) above which risk is High
pub const HIGH_MOISTURE_THRESHOLD: f64 = 70.0;
/// Slope angle (degrees) above which risk is High
pub const HIGH_ANGLE_THRESHOLD: f64 = 45.0;
/// Soil moisture (percent) above which risk is at least Moderate
pub const MODERATE_MOISTURE_THRESHOLD: f64 = 50.0;
/// Slope angle (degrees) above which risk is at least Moderate
pub const MODERATE_ANGLE_THRESHOLD: f64 = 30.0;

/// Derived landslide risk level
///
/// Variants are declared in ascending order so `Ord` compares severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskLevel {
    /// No threshold exceeded
    Low,
    /// A moderate threshold exceeded
    Moderate,
    /// A high threshold exceeded
    High,
}

impl RiskLevel {
    /// Get the level as a lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
        }
    }

    /// Whether mitigation actions should be offered at this level
    pub fn requires_mitigation(&self) -> bool {
        matches!(self, RiskLevel::Moderate | RiskLevel::High)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        };
        f.write_str(label)
    }
}

/// Threshold table used by the classifier
///
/// `Default` yields the canonical table. Custom tables exist so the cutoffs
/// can be recalibrated from configuration without touching the logic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskThresholds {
    /// Moisture cutoff for High
    pub high_moisture: f64,
    /// Angle cutoff for High
    pub high_angle: f64,
    /// Moisture cutoff for Moderate
    pub moderate_moisture: f64,
    /// Angle cutoff for Moderate
    pub moderate_angle: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high_moisture: HIGH_MOISTURE_THRESHOLD,
            high_angle: HIGH_ANGLE_THRESHOLD,
            moderate_moisture: MODERATE_MOISTURE_THRESHOLD,
            moderate_angle: MODERATE_ANGLE_THRESHOLD,
        }
    }
}

impl RiskThresholds {
    /// Check that every cutoff is finite and no moderate cutoff exceeds its high cutoff
    pub fn validate(&self) -> Result<(), String> {
        let cutoffs = [
            ("high_moisture", self.high_moisture),
            ("high_angle", self.high_angle),
            ("moderate_moisture", self.moderate_moisture),
            ("moderate_angle", self.moderate_angle),
        ];
        for (name, value) in cutoffs {
            if !value.is_finite() {
                return Err(format!("{} must be a finite number, got {}", name, value));
            }
        }

        if self.moderate_moisture > self.high_moisture {
            return Err(format!(
                "moderate_moisture ({}) exceeds high_moisture ({})",
                self.moderate_moisture, self.high_moisture
            ));
        }
        if self.moderate_angle > self.high_angle {
            return Err(format!(
                "moderate_angle ({}) exceeds high_angle ({})",
                self.moderate_angle, self.high_angle
            ));
        }

        Ok(())
    }

    /// Classify a pair of measurements against this table
    pub fn classify(&self, moisture: f64, angle: f64) -> RiskLevel {
        if moisture > self.high_moisture || angle > self.high_angle {
            RiskLevel::High
        } else if moisture > self.moderate_moisture || angle > self.moderate_angle {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

/// Classify measurements with the canonical threshold table
///
/// # Examples
///
/// ```
/// use slopewatch_domain::{classify, RiskLevel};
///
/// assert_eq!(classify(85.0, 10.0), RiskLevel::High);
/// assert_eq!(classify(20.0, 35.0), RiskLevel::Moderate);
/// assert_eq!(classify(10.0, 10.0), RiskLevel::Low);
/// ```
pub fn classify(moisture: f64, angle: f64) -> RiskLevel {
    RiskThresholds::default().classify(moisture, angle)
}
