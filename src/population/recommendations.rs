use crate::population::BarangayMetrics;
use crate::residents::HouseMaterial;

pub const NO_RESIDENT_DATA: &str = "No resident data available";
pub const INCREASE_ALLOCATION: &str =
    "High vulnerability index - increase relief allocation for this barangay";
pub const DISASTER_RISK_REDUCTION: &str =
    "Frequent evacuations - implement disaster risk reduction programs";
pub const LIVELIHOOD_DEVELOPMENT: &str =
    "Low average income - prioritize livelihood development programs";
pub const HOUSING_IMPROVEMENT: &str =
    "High proportion of nipa houses - recommend housing improvement programs";
pub const MAINTAIN_STANDARD: &str = "Maintain standard relief allocation protocols";

pub fn barangay_recommendations(
    metrics: &BarangayMetrics,
    vulnerability_index: f64,
    total_residents: usize,
) -> Vec<String> {
    let residents = total_residents as f64;
    let nipa_count = metrics.housing_count(HouseMaterial::Nipa) as f64;
    let checks = [
        (vulnerability_index > 70.0, INCREASE_ALLOCATION),
        (
            metrics.total_evacuations as f64 > residents * 3.0,
            DISASTER_RISK_REDUCTION,
        ),
        (metrics.average_income < 8_000.0, LIVELIHOOD_DEVELOPMENT),
        (nipa_count > residents * 0.4, HOUSING_IMPROVEMENT),
    ];

    let recommendations: Vec<String> = checks
        .iter()
        .filter(|(triggered, _)| *triggered)
        .map(|(_, text)| text.to_string())
        .collect();

    if recommendations.is_empty() {
        vec![MAINTAIN_STANDARD.to_string()]
    } else {
        recommendations
    }
}
