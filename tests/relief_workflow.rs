use std::collections::BTreeMap;
use std::io::Write;

use relief_priority::allocation::plan::{plan_allocation, rank_barangays, rank_residents};
use relief_priority::allocation::RankLevel;
use relief_priority::output::csv::allocation_to_csv;
use relief_priority::population::aggregator::PopulationAggregator;
use relief_priority::population::grouping::aggregate_by_barangay;
use relief_priority::residents::loader::load_residents;
use relief_priority::scoring::model::{ScoreModel, WeightsUpdate};
use relief_priority::scoring::scorer::ResidentScorer;
use relief_priority::scoring::PriorityLevel;

fn write_population() -> tempfile::NamedTempFile {
    let mut csv = String::from(
        "name,barangay,evacueeHistory,monthlyIncome,familyMembers,houseMaterial,terrain\n",
    );
    for idx in 0..15 {
        csv.push_str(&format!(
            "Resident {idx},Barangay {idx},{},{},{},{},{}\n",
            idx,
            idx * 3_000,
            1 + idx % 9,
            ["Nipa", "Mixed", "Concrete"][idx % 3],
            ["Coastal", "Highland", "Lowland", "Rural", "Urban"][idx % 5],
        ));
    }
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("temp file");
    file.write_all(csv.as_bytes()).expect("write csv");
    file
}

#[test]
fn csv_population_flows_through_ranking_and_allocation() {
    let file = write_population();
    let residents = load_residents(file.path()).expect("loads");
    assert_eq!(residents.len(), 15);

    let model = ScoreModel::default();
    let scored = ResidentScorer::new(&model).score_all(&residents);
    assert!(scored
        .iter()
        .all(|r| (0.0..=100.0).contains(&r.result.total_score)));

    let aggregator = PopulationAggregator::new(ResidentScorer::new(&model));
    let barangays = aggregate_by_barangay(&aggregator, &residents);
    assert_eq!(barangays.len(), 15);

    let top = rank_barangays(&model, &residents, 10);
    assert_eq!(top.len(), 10);
    assert!(top
        .windows(2)
        .all(|pair| pair[0].item.average_score >= pair[1].item.average_score));
    assert_eq!(top.iter().map(|r| r.rank).collect::<Vec<_>>(), (1..=10).collect::<Vec<_>>());

    let resources: BTreeMap<String, u64> = [("rice".to_string(), 500), ("shirts".to_string(), 120)]
        .into_iter()
        .collect();
    let plan = plan_allocation(&model, &residents, RankLevel::Barangay, Some(10), &resources)
        .expect("allocates");
    assert_eq!(plan.entries.len(), 10);
    for (name, available) in &resources {
        let given: u64 = plan.entries.iter().map(|e| e.allocation[name]).sum();
        assert!(given <= *available);
        assert_eq!(given + plan.undistributed[name], *available);
    }

    let csv = allocation_to_csv(&plan).expect("csv renders");
    assert!(csv.starts_with("Rank,Name,Priority Score,Allocation Ratio"));
    assert_eq!(csv.lines().count(), 11);
}

#[test]
fn reweighting_changes_the_resident_order() {
    let file = write_population();
    let residents = load_residents(file.path()).expect("loads");

    let baseline = rank_residents(&ScoreModel::default(), &residents, 1);

    let mut income_only = ScoreModel::default();
    income_only.update_weights(&WeightsUpdate {
        evacuation_history: Some(0.0),
        income_level: Some(1.0),
        family_size: Some(0.0),
        housing_condition: Some(0.0),
        terrain: Some(0.0),
    });
    let reweighted = rank_residents(&income_only, &residents, 1);

    assert_eq!(reweighted[0].item.name.as_deref(), Some("Resident 0"));
    assert_eq!(reweighted[0].item.result.total_score, 100.0);
    assert_eq!(
        reweighted[0].item.result.priority_level,
        PriorityLevel::Critical
    );
    assert_ne!(baseline[0].item.name, reweighted[0].item.name);
}
