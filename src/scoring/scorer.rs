use crate::residents::ResidentRecord;
use crate::scoring::factors::{
    evacuation_score, family_score, housing_score, income_score, terrain_score,
};
use crate::scoring::model::ScoreModel;
use crate::scoring::recommendations::resident_recommendations;
use crate::scoring::{round2, PriorityLevel, PriorityResult, ScoreBreakdown, ScoredResident};

/// Scores residents against a borrowed model. Cheap to construct; holds no
/// state of its own.
#[derive(Debug, Clone, Copy)]
pub struct ResidentScorer<'a> {
    model: &'a ScoreModel,
}

impl<'a> ResidentScorer<'a> {
    pub fn new(model: &'a ScoreModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &'a ScoreModel {
        self.model
    }

    pub fn breakdown(&self, resident: &ResidentRecord) -> ScoreBreakdown {
        ScoreBreakdown {
            evacuation: evacuation_score(resident.evacuations()),
            income: income_score(resident.income()),
            family: family_score(resident.household_size()),
            housing: housing_score(resident.material()),
            terrain: terrain_score(resident.resolved_terrain()),
        }
    }

    pub fn weighted_total(&self, breakdown: &ScoreBreakdown) -> f64 {
        let weights = self.model.get_weights();
        let raw = breakdown.evacuation * weights.evacuation_history
            + breakdown.income * weights.income_level
            + breakdown.family * weights.family_size
            + breakdown.housing * weights.housing_condition
            + breakdown.terrain * weights.terrain;
        let clamped = if raw.is_finite() {
            raw.clamp(0.0, 100.0)
        } else {
            0.0
        };
        round2(clamped)
    }

    pub fn score(&self, resident: &ResidentRecord) -> PriorityResult {
        let breakdown = self.breakdown(resident);
        let total_score = self.weighted_total(&breakdown);
        PriorityResult {
            total_score,
            breakdown,
            priority_level: PriorityLevel::from_score(total_score),
            recommendations: resident_recommendations(&breakdown),
        }
    }

    pub fn score_named(&self, resident: &ResidentRecord) -> ScoredResident {
        ScoredResident {
            name: resident.name.clone(),
            barangay: resident.barangay.clone(),
            result: self.score(resident),
        }
    }

    pub fn score_all<'r, I>(&self, residents: I) -> Vec<ScoredResident>
    where
        I: IntoIterator<Item = &'r ResidentRecord>,
    {
        residents
            .into_iter()
            .map(|resident| self.score_named(resident))
            .collect()
    }
}
