use crate::scoring::ScoreBreakdown;

pub const EMERGENCY_PREPAREDNESS: &str =
    "High evacuation history - prioritize for emergency preparedness programs";
pub const LIVELIHOOD_ASSISTANCE: &str =
    "Low income household - consider for livelihood assistance programs";
pub const BULK_RELIEF: &str = "Large family size - prioritize for bulk relief goods distribution";
pub const HOUSING_ASSISTANCE: &str =
    "Vulnerable housing materials - recommend housing improvement assistance";
pub const EARLY_WARNING: &str =
    "High-risk terrain - ensure early warning systems reach this household";
pub const STANDARD_ALLOCATION: &str = "Standard relief allocation recommended";

/// Advisory strings for one resident, in a fixed factor order. Checks run on
/// the breakdown, not the weighted total.
pub fn resident_recommendations(breakdown: &ScoreBreakdown) -> Vec<String> {
    let checks = [
        (breakdown.evacuation > 70.0, EMERGENCY_PREPAREDNESS),
        (breakdown.income > 80.0, LIVELIHOOD_ASSISTANCE),
        (breakdown.family > 70.0, BULK_RELIEF),
        (breakdown.housing > 70.0, HOUSING_ASSISTANCE),
        (breakdown.terrain > 60.0, EARLY_WARNING),
    ];

    let recommendations: Vec<String> = checks
        .iter()
        .filter(|(triggered, _)| *triggered)
        .map(|(_, text)| text.to_string())
        .collect();

    if recommendations.is_empty() {
        vec![STANDARD_ALLOCATION.to_string()]
    } else {
        recommendations
    }
}
