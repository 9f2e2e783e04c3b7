use tracing::debug;

use crate::population::recommendations::{barangay_recommendations, NO_RESIDENT_DATA};
use crate::population::{BarangayAggregate, BarangayMetrics};
use crate::residents::ResidentRecord;
use crate::scoring::scorer::ResidentScorer;
use crate::scoring::{round2, PriorityLevel};

#[derive(Debug, Clone, Copy)]
pub struct PopulationAggregator<'a> {
    scorer: ResidentScorer<'a>,
}

impl<'a> PopulationAggregator<'a> {
    pub fn new(scorer: ResidentScorer<'a>) -> Self {
        Self { scorer }
    }

    /// Scores every resident (input order is preserved in `resident_scores`)
    /// and summarizes the batch. An empty batch yields a zeroed aggregate.
    pub fn aggregate<'r, I>(&self, residents: I) -> BarangayAggregate
    where
        I: IntoIterator<Item = &'r ResidentRecord>,
    {
        let residents: Vec<&ResidentRecord> = residents.into_iter().collect();
        if residents.is_empty() {
            return empty_aggregate();
        }

        let resident_scores: Vec<_> = residents
            .iter()
            .map(|resident| self.scorer.score(resident))
            .collect();
        let total_residents = resident_scores.len();
        let count = total_residents as f64;

        let score_sum: f64 = resident_scores.iter().map(|r| r.total_score).sum();
        let average_score = round2(score_sum / count);
        let high_priority_count = resident_scores
            .iter()
            .filter(|r| r.priority_level.is_high_priority())
            .count();
        let vulnerability_index = round2(high_priority_count as f64 / count * 100.0);

        let metrics = collect_metrics(&residents);
        let recommendations =
            barangay_recommendations(&metrics, vulnerability_index, total_residents);

        debug!(
            total_residents,
            average_score, vulnerability_index, "aggregated resident batch"
        );

        BarangayAggregate {
            barangay: None,
            average_score,
            vulnerability_index,
            total_residents,
            high_priority_count,
            resident_scores,
            metrics,
            priority_level: PriorityLevel::from_score(average_score),
            recommendations,
        }
    }

    pub fn aggregate_named<'r, I>(&self, barangay: impl Into<String>, residents: I) -> BarangayAggregate
    where
        I: IntoIterator<Item = &'r ResidentRecord>,
    {
        let mut aggregate = self.aggregate(residents);
        aggregate.barangay = Some(barangay.into());
        aggregate
    }
}

fn empty_aggregate() -> BarangayAggregate {
    BarangayAggregate {
        barangay: None,
        average_score: 0.0,
        vulnerability_index: 0.0,
        total_residents: 0,
        high_priority_count: 0,
        resident_scores: Vec::new(),
        metrics: BarangayMetrics::default(),
        priority_level: PriorityLevel::VeryLow,
        recommendations: vec![NO_RESIDENT_DATA.to_string()],
    }
}

/// Raw field totals, not sub-scores.
fn collect_metrics(residents: &[&ResidentRecord]) -> BarangayMetrics {
    let mut metrics = BarangayMetrics::default();
    let mut income_sum = 0.0;
    for resident in residents {
        metrics.total_evacuations += u64::from(resident.evacuations());
        metrics.total_family_members += u64::from(resident.household_size());
        income_sum += resident.income();
        *metrics
            .housing_type_distribution
            .entry(resident.material())
            .or_insert(0) += 1;
    }
    if !residents.is_empty() {
        metrics.average_income = income_sum / residents.len() as f64;
    }
    metrics
}
