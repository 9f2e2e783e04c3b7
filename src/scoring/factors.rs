//! Per-factor sub-scores. Each returns a value in [0, 100].

use crate::residents::{HouseMaterial, Terrain};
use crate::scoring::model::ScoreModel;

pub fn evacuation_score(count: u32) -> f64 {
    match count {
        0 => 10.0,
        1..=2 => 30.0,
        3..=5 => 60.0,
        6..=10 => 85.0,
        _ => 100.0,
    }
}

/// Zero income is the most vulnerable case and is checked before the
/// lowest income band.
pub fn income_score(income: f64) -> f64 {
    if income == 0.0 {
        100.0
    } else if income <= 5_000.0 {
        85.0
    } else if income <= 10_000.0 {
        60.0
    } else if income <= 20_000.0 {
        35.0
    } else if income <= 40_000.0 {
        15.0
    } else {
        5.0
    }
}

pub fn family_score(members: u32) -> f64 {
    match members {
        0 | 1 => 20.0,
        2..=3 => 40.0,
        4..=5 => 65.0,
        6..=8 => 85.0,
        _ => 100.0,
    }
}

pub fn housing_score(material: HouseMaterial) -> f64 {
    (ScoreModel::housing_base_score(material) / 3.0) * 100.0
}

/// Urban (0.9) maps to 0 and Coastal (1.5) to 100.
pub fn terrain_score(terrain: Terrain) -> f64 {
    let multiplier = ScoreModel::terrain_multiplier(terrain);
    ((multiplier - 0.9) * 100.0 / 0.6).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evacuation_bands() {
        assert_eq!(evacuation_score(0), 10.0);
        assert_eq!(evacuation_score(1), 30.0);
        assert_eq!(evacuation_score(2), 30.0);
        assert_eq!(evacuation_score(3), 60.0);
        assert_eq!(evacuation_score(5), 60.0);
        assert_eq!(evacuation_score(6), 85.0);
        assert_eq!(evacuation_score(10), 85.0);
        assert_eq!(evacuation_score(11), 100.0);
    }

    #[test]
    fn income_bands() {
        assert_eq!(income_score(0.0), 100.0);
        assert_eq!(income_score(0.01), 85.0);
        assert_eq!(income_score(5_000.0), 85.0);
        assert_eq!(income_score(5_000.01), 60.0);
        assert_eq!(income_score(10_000.0), 60.0);
        assert_eq!(income_score(20_000.0), 35.0);
        assert_eq!(income_score(40_000.0), 15.0);
        assert_eq!(income_score(50_000.0), 5.0);
    }

    #[test]
    fn family_bands() {
        assert_eq!(family_score(1), 20.0);
        assert_eq!(family_score(3), 40.0);
        assert_eq!(family_score(5), 65.0);
        assert_eq!(family_score(8), 85.0);
        assert_eq!(family_score(9), 100.0);
    }

    #[test]
    fn housing_scores_scale_base_to_hundred() {
        assert_eq!(housing_score(HouseMaterial::Nipa), 100.0);
        assert!((housing_score(HouseMaterial::Concrete) - 33.333).abs() < 0.01);
        assert!((housing_score(HouseMaterial::Mixed) - 66.667).abs() < 0.01);
        assert!((housing_score(HouseMaterial::Other) - 83.333).abs() < 0.01);
    }

    #[test]
    fn terrain_scores_span_urban_to_coastal() {
        assert_eq!(terrain_score(Terrain::Urban), 0.0);
        assert_eq!(terrain_score(Terrain::Coastal), 100.0);
        assert!((terrain_score(Terrain::Rural) - 50.0).abs() < 1e-9);
        assert!((terrain_score(Terrain::Highland) - 66.667).abs() < 0.01);
        assert!((terrain_score(Terrain::Lowland) - 33.333).abs() < 0.01);
    }
}
