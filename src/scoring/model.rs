use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::residents::{HouseMaterial, Terrain};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Factor weights. The defaults sum to 1.0; overrides are not forced to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreWeights {
    pub evacuation_history: f64,
    pub income_level: f64,
    pub family_size: f64,
    pub housing_condition: f64,
    pub terrain: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            evacuation_history: 0.35,
            income_level: 0.25,
            family_size: 0.15,
            housing_condition: 0.15,
            terrain: 0.10,
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.evacuation_history
            + self.income_level
            + self.family_size
            + self.housing_condition
            + self.terrain
    }

    pub fn validate(&self) -> Result<(), WeightsError> {
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightsError::SumMismatch { sum });
        }
        Ok(())
    }

    pub fn merge(&mut self, update: &WeightsUpdate) {
        if let Some(v) = update.evacuation_history {
            self.evacuation_history = v;
        }
        if let Some(v) = update.income_level {
            self.income_level = v;
        }
        if let Some(v) = update.family_size {
            self.family_size = v;
        }
        if let Some(v) = update.housing_condition {
            self.housing_condition = v;
        }
        if let Some(v) = update.terrain {
            self.terrain = v;
        }
    }
}

/// Partial weight override; absent keys keep their current value.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeightsUpdate {
    #[serde(default, alias = "evacuation_history")]
    pub evacuation_history: Option<f64>,
    #[serde(default, alias = "income_level")]
    pub income_level: Option<f64>,
    #[serde(default, alias = "family_size")]
    pub family_size: Option<f64>,
    #[serde(default, alias = "housing_condition")]
    pub housing_condition: Option<f64>,
    #[serde(default)]
    pub terrain: Option<f64>,
}

impl WeightsUpdate {
    pub fn is_empty(&self) -> bool {
        self.evacuation_history.is_none()
            && self.income_level.is_none()
            && self.family_size.is_none()
            && self.housing_condition.is_none()
            && self.terrain.is_none()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum WeightsError {
    #[error("factor weights sum to {sum:.4}, expected 1.0")]
    SumMismatch { sum: f64 },
}

/// Weights plus the fixed terrain and housing lookup tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScoreModel {
    weights: ScoreWeights,
}

impl ScoreModel {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn get_weights(&self) -> ScoreWeights {
        self.weights
    }

    /// Merges the supplied keys. An inconsistent sum is logged, not rejected;
    /// the weighted total is clamped to [0, 100] regardless.
    pub fn update_weights(&mut self, update: &WeightsUpdate) -> ScoreWeights {
        self.weights.merge(update);
        match self.weights.validate() {
            Ok(()) => debug!(weights = ?self.weights, "updated factor weights"),
            Err(err) => warn!(weights = ?self.weights, "{err}"),
        }
        self.weights
    }

    pub fn terrain_multiplier(terrain: Terrain) -> f64 {
        match terrain {
            Terrain::Highland => 1.3,
            Terrain::Lowland => 1.1,
            Terrain::Coastal => 1.5,
            Terrain::Urban => 0.9,
            Terrain::Rural => 1.2,
        }
    }

    pub fn housing_base_score(material: HouseMaterial) -> f64 {
        match material {
            HouseMaterial::Nipa => 3.0,
            HouseMaterial::Mixed => 2.0,
            HouseMaterial::Concrete => 1.0,
            HouseMaterial::Other => 2.5,
        }
    }
}
