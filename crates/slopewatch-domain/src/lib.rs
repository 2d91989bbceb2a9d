//! SlopeWatch Domain Layer
//!
//! This crate contains the core data model and rules for SlopeWatch, a field
//! tool for recording slope readings and assessing landslide risk.
//!
//! ## Key Concepts
//!
//! - **Reading**: one immutable observation (soil moisture, slope angle, note)
//! - **Risk Level**: Low / Moderate / High, derived from a reading and never stored
//! - **Threshold table**: the canonical cutoffs used by the classifier
//! - **Mitigation actions**: advice offered once risk is elevated
//!
//! ## Architecture
//!
//! - Pure business logic only, no I/O
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod mitigation;
pub mod reading;
pub mod risk;
pub mod traits;

// Re-exports for convenience
pub use mitigation::{mitigation_actions, MITIGATION_ACTIONS};
pub use reading::{
    Reading, ReadingId, SLOPE_ANGLE_MAX, SLOPE_ANGLE_MIN, SOIL_MOISTURE_MAX, SOIL_MOISTURE_MIN,
};
pub use risk::{
    classify, RiskLevel, RiskThresholds, HIGH_ANGLE_THRESHOLD, HIGH_MOISTURE_THRESHOLD,
    MODERATE_ANGLE_THRESHOLD, MODERATE_MOISTURE_THRESHOLD,
};
pub use traits::{BlobStore, Clock};
