use std::collections::BTreeMap;

use crate::allocation::distribute::allocate;
use crate::allocation::ranking::rank;
use crate::allocation::{AllocationError, AllocationPlan, RankLevel, Ranked};
use crate::population::aggregator::PopulationAggregator;
use crate::population::grouping::aggregate_by_barangay;
use crate::population::BarangayAggregate;
use crate::residents::ResidentRecord;
use crate::scoring::model::ScoreModel;
use crate::scoring::scorer::ResidentScorer;
use crate::scoring::ScoredResident;

pub fn rank_residents(
    model: &ScoreModel,
    residents: &[ResidentRecord],
    limit: usize,
) -> Vec<Ranked<ScoredResident>> {
    let scored = ResidentScorer::new(model).score_all(residents);
    rank(scored, limit)
}

pub fn rank_barangays(
    model: &ScoreModel,
    residents: &[ResidentRecord],
    limit: usize,
) -> Vec<Ranked<BarangayAggregate>> {
    let aggregator = PopulationAggregator::new(ResidentScorer::new(model));
    rank(aggregate_by_barangay(&aggregator, residents), limit)
}

/// Ranks at the requested level, keeps the top `top` (everyone when `None`),
/// and splits `resources` across them.
pub fn plan_allocation(
    model: &ScoreModel,
    residents: &[ResidentRecord],
    level: RankLevel,
    top: Option<usize>,
    resources: &BTreeMap<String, u64>,
) -> Result<AllocationPlan, AllocationError> {
    if top == Some(0) {
        return Err(AllocationError::EmptySelection);
    }
    let limit = top.unwrap_or(usize::MAX);
    match level {
        RankLevel::Resident => allocate(&rank_residents(model, residents, limit), resources),
        RankLevel::Barangay => allocate(&rank_barangays(model, residents, limit), resources),
    }
}
