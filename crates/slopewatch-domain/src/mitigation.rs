//! Mitigation advice offered alongside an elevated risk level

use crate::RiskLevel;

/// Field actions recommended when risk is Moderate or High
pub const MITIGATION_ACTIONS: [&str; 5] = [
    "Monitor soil moisture with suitable sensors",
    "Avoid deforestation on slopes",
    "Promote efficient rainwater drainage",
    "Build retaining walls where necessary",
    "Run community education and evacuation campaigns",
];

/// Get the mitigation actions to present for a risk level
///
/// Low risk has nothing to act on and yields an empty slice.
pub fn mitigation_actions(level: RiskLevel) -> &'static [&'static str] {
    if level.requires_mitigation() {
        &MITIGATION_ACTIONS
    } else {
        &[]
    }
}
