pub mod factors;
pub mod model;
pub mod recommendations;
pub mod scorer;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PriorityLevel {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Medium,
    High,
    Critical,
}

impl PriorityLevel {
    /// Lower bounds are inclusive: 90 is Critical, 89.99 is High.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::Critical
        } else if score >= 75.0 {
            Self::High
        } else if score >= 50.0 {
            Self::Medium
        } else if score >= 25.0 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }

    pub fn is_high_priority(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl Display for PriorityLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ScoreBreakdown {
    pub evacuation: f64,
    pub income: f64,
    pub family: f64,
    pub housing: f64,
    pub terrain: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriorityResult {
    pub total_score: f64,
    pub breakdown: ScoreBreakdown,
    pub priority_level: PriorityLevel,
    pub recommendations: Vec<String>,
}

/// A priority result paired with the identifying fields of its resident.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoredResident {
    pub name: Option<String>,
    pub barangay: Option<String>,
    #[serde(flatten)]
    pub result: PriorityResult,
}

impl ScoredResident {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed)")
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_level_boundaries_are_inclusive_lower_bounds() {
        assert_eq!(PriorityLevel::from_score(100.0), PriorityLevel::Critical);
        assert_eq!(PriorityLevel::from_score(90.0), PriorityLevel::Critical);
        assert_eq!(PriorityLevel::from_score(89.99), PriorityLevel::High);
        assert_eq!(PriorityLevel::from_score(75.0), PriorityLevel::High);
        assert_eq!(PriorityLevel::from_score(74.99), PriorityLevel::Medium);
        assert_eq!(PriorityLevel::from_score(50.0), PriorityLevel::Medium);
        assert_eq!(PriorityLevel::from_score(49.99), PriorityLevel::Low);
        assert_eq!(PriorityLevel::from_score(25.0), PriorityLevel::Low);
        assert_eq!(PriorityLevel::from_score(24.99), PriorityLevel::VeryLow);
        assert_eq!(PriorityLevel::from_score(0.0), PriorityLevel::VeryLow);
    }

    #[test]
    fn very_low_serializes_with_space() {
        let json = serde_json::to_string(&PriorityLevel::VeryLow).expect("serializes");
        assert_eq!(json, "\"Very Low\"");
    }

    #[test]
    fn round2_matches_two_decimal_rounding() {
        assert_eq!(round2(68.754), 68.75);
        assert_eq!(round2(33.333_333), 33.33);
        assert_eq!(round2(0.0), 0.0);
    }
}
