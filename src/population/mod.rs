pub mod aggregator;
pub mod grouping;
pub mod recommendations;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::residents::HouseMaterial;
use crate::scoring::{PriorityLevel, PriorityResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BarangayMetrics {
    pub total_evacuations: u64,
    pub average_income: f64,
    pub total_family_members: u64,
    /// Every category is present, including those with no residents.
    pub housing_type_distribution: BTreeMap<HouseMaterial, usize>,
}

impl Default for BarangayMetrics {
    fn default() -> Self {
        Self {
            total_evacuations: 0,
            average_income: 0.0,
            total_family_members: 0,
            housing_type_distribution: HouseMaterial::ALL.iter().map(|m| (*m, 0)).collect(),
        }
    }
}

impl BarangayMetrics {
    pub fn housing_count(&self, material: HouseMaterial) -> usize {
        self.housing_type_distribution
            .get(&material)
            .copied()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BarangayAggregate {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub barangay: Option<String>,
    pub average_score: f64,
    pub vulnerability_index: f64,
    pub total_residents: usize,
    pub high_priority_count: usize,
    pub resident_scores: Vec<PriorityResult>,
    pub metrics: BarangayMetrics,
    pub priority_level: PriorityLevel,
    pub recommendations: Vec<String>,
}

impl BarangayAggregate {
    pub fn display_name(&self) -> &str {
        self.barangay.as_deref().unwrap_or("(all residents)")
    }
}
