use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::allocation::{AllocationPlan, Ranked};
use crate::population::BarangayAggregate;
use crate::scoring::model::ScoreWeights;
use crate::scoring::{PriorityLevel, ScoredResident};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn level_cell(level: PriorityLevel) -> Cell {
    let cell = Cell::new(level.label());
    match level {
        PriorityLevel::Critical => cell.fg(Color::Red),
        PriorityLevel::High => cell.fg(Color::DarkYellow),
        PriorityLevel::Medium => cell.fg(Color::Yellow),
        PriorityLevel::Low | PriorityLevel::VeryLow => cell.fg(Color::Green),
    }
}

fn resident_cells(resident: &ScoredResident) -> Vec<Cell> {
    let b = &resident.result.breakdown;
    vec![
        Cell::new(resident.display_name()),
        Cell::new(resident.barangay.as_deref().unwrap_or("-")),
        Cell::new(format!("{:.2}", resident.result.total_score)),
        level_cell(resident.result.priority_level),
        Cell::new(format!(
            "{:.0}/{:.0}/{:.0}/{:.0}/{:.0}",
            b.evacuation, b.income, b.family, b.housing, b.terrain
        )),
        Cell::new(resident.result.recommendations.join("\n")),
    ]
}

const RESIDENT_HEADER: [&str; 6] = [
    "Name",
    "Barangay",
    "Score",
    "Level",
    "Evac/Inc/Fam/House/Terr",
    "Recommendations",
];

pub fn render_residents_table(residents: &[ScoredResident]) -> String {
    let mut table = new_table();
    table.set_header(RESIDENT_HEADER.to_vec());
    for resident in residents {
        table.add_row(Row::from(resident_cells(resident)));
    }
    table.to_string()
}

pub fn render_ranked_residents_table(ranked: &[Ranked<ScoredResident>]) -> String {
    let mut table = new_table();
    let mut header = vec!["Rank"];
    header.extend(RESIDENT_HEADER);
    table.set_header(header);
    for entry in ranked {
        let mut cells = vec![Cell::new(entry.rank)];
        cells.extend(resident_cells(&entry.item));
        table.add_row(Row::from(cells));
    }
    table.to_string()
}

fn barangay_cells(aggregate: &BarangayAggregate) -> Vec<Cell> {
    vec![
        Cell::new(aggregate.display_name()),
        Cell::new(aggregate.total_residents),
        Cell::new(format!("{:.2}", aggregate.average_score)),
        Cell::new(format!("{:.2}%", aggregate.vulnerability_index)),
        Cell::new(aggregate.high_priority_count),
        level_cell(aggregate.priority_level),
        Cell::new(aggregate.recommendations.join("\n")),
    ]
}

const BARANGAY_HEADER: [&str; 7] = [
    "Barangay",
    "Residents",
    "Avg Score",
    "Vulnerability",
    "High Priority",
    "Level",
    "Recommendations",
];

pub fn render_barangays_table(aggregates: &[BarangayAggregate]) -> String {
    let mut table = new_table();
    table.set_header(BARANGAY_HEADER.to_vec());
    for aggregate in aggregates {
        table.add_row(Row::from(barangay_cells(aggregate)));
    }
    table.to_string()
}

pub fn render_ranked_barangays_table(ranked: &[Ranked<BarangayAggregate>]) -> String {
    let mut table = new_table();
    let mut header = vec!["Rank"];
    header.extend(BARANGAY_HEADER);
    table.set_header(header);
    for entry in ranked {
        let mut cells = vec![Cell::new(entry.rank)];
        cells.extend(barangay_cells(&entry.item));
        table.add_row(Row::from(cells));
    }
    table.to_string()
}

pub fn render_allocation_table(plan: &AllocationPlan) -> String {
    let mut table = new_table();
    let resources = plan.resource_names();
    let mut header = vec!["Rank", "Recipient", "Score", "Share"];
    header.extend(resources.iter().copied());
    table.set_header(header);

    for entry in &plan.entries {
        let mut row = vec![
            entry
                .rank
                .map(|r| r.to_string())
                .unwrap_or_else(|| "-".to_string()),
            entry.name.clone(),
            format!("{:.2}", entry.total_score),
            format!("{:.2}%", entry.allocation_ratio),
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
        table.add_row(row);
    }

    let mut out = table.to_string();
    for resource in &resources {
        let available = plan.available.get(*resource).copied().unwrap_or(0);
        let left = plan.undistributed.get(*resource).copied().unwrap_or(0);
        out.push_str(&format!(
            "\n{resource}: {} of {available} distributed, {left} undistributed",
            available.saturating_sub(left)
        ));
    }
    out
}

pub fn render_weights_table(weights: &ScoreWeights) -> String {
    let mut table = new_table();
    table.set_header(vec!["Factor", "Weight"]);
    let rows = [
        ("Evacuation history", weights.evacuation_history),
        ("Income level", weights.income_level),
        ("Family size", weights.family_size),
        ("Housing condition", weights.housing_condition),
        ("Terrain", weights.terrain),
    ];
    for (factor, weight) in rows {
        table.add_row(vec![factor.to_string(), format!("{weight:.2}")]);
    }
    let sum = weights.sum();
    let sum_cell = if weights.validate().is_ok() {
        Cell::new(format!("{sum:.2}")).fg(Color::Green)
    } else {
        Cell::new(format!("{sum:.2}")).fg(Color::Red)
    };
    table.add_row(Row::from(vec![Cell::new("Total"), sum_cell]));
    table.to_string()
}
