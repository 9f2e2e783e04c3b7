use tracing::info;

use crate::population::aggregator::PopulationAggregator;
use crate::population::BarangayAggregate;
use crate::residents::ResidentRecord;

pub const UNASSIGNED_BARANGAY: &str = "Unassigned";

/// Groups residents by barangay in first-seen order. Names are matched
/// case-insensitively; the first spelling seen is kept.
pub fn group_by_barangay(residents: &[ResidentRecord]) -> Vec<(String, Vec<&ResidentRecord>)> {
    let mut groups: Vec<(String, Vec<&ResidentRecord>)> = Vec::new();
    for resident in residents {
        let name = resident
            .barangay
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(UNASSIGNED_BARANGAY);
        match groups
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some((_, members)) => members.push(resident),
            None => groups.push((name.to_string(), vec![resident])),
        }
    }
    groups
}

pub fn aggregate_by_barangay(
    aggregator: &PopulationAggregator<'_>,
    residents: &[ResidentRecord],
) -> Vec<BarangayAggregate> {
    let groups = group_by_barangay(residents);
    info!(
        barangays = groups.len(),
        residents = residents.len(),
        "aggregating residents by barangay"
    );
    groups
        .into_iter()
        .map(|(name, members)| aggregator.aggregate_named(name, members))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::model::ScoreModel;
    use crate::scoring::scorer::ResidentScorer;

    fn residents() -> Vec<ResidentRecord> {
        vec![
            ResidentRecord::new("A", "Poblacion"),
            ResidentRecord::new("B", "San Roque"),
            ResidentRecord::new("C", "poblacion "),
            ResidentRecord {
                name: Some("D".to_string()),
                ..ResidentRecord::default()
            },
        ]
    }

    #[test]
    fn groups_in_first_seen_order() {
        let residents = residents();
        let groups = group_by_barangay(&residents);
        let names: Vec<&str> = groups.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Poblacion", "San Roque", UNASSIGNED_BARANGAY]);
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn aggregates_each_group() {
        let model = ScoreModel::default();
        let aggregator = PopulationAggregator::new(ResidentScorer::new(&model));
        let residents = residents();
        let aggregates = aggregate_by_barangay(&aggregator, &residents);
        assert_eq!(aggregates.len(), 3);
        assert_eq!(aggregates[0].barangay.as_deref(), Some("Poblacion"));
        assert_eq!(aggregates[0].total_residents, 2);
        assert_eq!(aggregates[2].total_residents, 1);
    }
}
