use anyhow::Result;

use crate::allocation::{AllocationPlan, Ranked, Scored};
use crate::population::BarangayAggregate;
use crate::scoring::ScoredResident;

pub const RESIDENT_COLUMNS: [&str; 9] = [
    "Name",
    "Barangay",
    "Priority Score",
    "Priority Level",
    "Evacuation Score",
    "Income Score",
    "Family Score",
    "Housing Score",
    "Terrain Score",
];

pub const BARANGAY_COLUMNS: [&str; 6] = [
    "Barangay",
    "Average Score",
    "Vulnerability Index",
    "Total Residents",
    "High Priority Count",
    "Priority Level",
];

pub fn residents_to_csv(residents: &[ScoredResident]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(RESIDENT_COLUMNS)?;
    for resident in residents {
        writer.write_record(resident_row(resident))?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn ranked_residents_to_csv(ranked: &[Ranked<ScoredResident>]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    let mut header = vec!["Rank"];
    header.extend(RESIDENT_COLUMNS);
    writer.write_record(&header)?;
    for entry in ranked {
        let mut row = vec![entry.rank.to_string()];
        row.extend(resident_row(&entry.item));
        writer.write_record(&row)?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn barangays_to_csv(aggregates: &[BarangayAggregate]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(BARANGAY_COLUMNS)?;
    for aggregate in aggregates {
        writer.write_record(barangay_row(aggregate))?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn ranked_barangays_to_csv(ranked: &[Ranked<BarangayAggregate>]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    let mut header = vec!["Rank"];
    header.extend(BARANGAY_COLUMNS);
    writer.write_record(&header)?;
    for entry in ranked {
        let mut row = vec![entry.rank.to_string()];
        row.extend(barangay_row(&entry.item));
        writer.write_record(&row)?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

/// One row per recipient, one column per resource in name order.
pub fn allocation_to_csv(plan: &AllocationPlan) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    let resources = plan.resource_names();
    let mut header = vec!["Rank", "Name", "Priority Score", "Allocation Ratio"];
    header.extend(resources.iter().copied());
    writer.write_record(&header)?;
    for entry in &plan.entries {
        let mut row = vec![
            entry.rank.map(|r| r.to_string()).unwrap_or_default(),
            entry.name.clone(),
            format!("{:.2}", entry.total_score),
            format!("{:.2}", entry.allocation_ratio),
        ];
        for resource in &resources {
            row.push(
                entry
                    .allocation
                    .get(*resource)
                    .copied()
                    .unwrap_or(0)
                    .to_string(),
            );
        }
        writer.write_record(&row)?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

fn resident_row(resident: &ScoredResident) -> Vec<String> {
    let breakdown = &resident.result.breakdown;
    vec![
        resident.name.clone().unwrap_or_default(),
        resident.barangay.clone().unwrap_or_default(),
        format!("{:.2}", resident.priority_score()),
        resident.result.priority_level.to_string(),
        format!("{:.2}", breakdown.evacuation),
        format!("{:.2}", breakdown.income),
        format!("{:.2}", breakdown.family),
        format!("{:.2}", breakdown.housing),
        format!("{:.2}", breakdown.terrain),
    ]
}

fn barangay_row(aggregate: &BarangayAggregate) -> Vec<String> {
    vec![
        aggregate.barangay.clone().unwrap_or_default(),
        format!("{:.2}", aggregate.average_score),
        format!("{:.2}", aggregate.vulnerability_index),
        aggregate.total_residents.to_string(),
        aggregate.high_priority_count.to_string(),
        aggregate.priority_level.to_string(),
    ]
}
