use std::collections::BTreeMap;

use chrono::Utc;
use tracing::info;

use crate::allocation::{AllocationEntry, AllocationError, AllocationPlan, Scored};
use crate::scoring::round2;

/// Splits each resource in proportion to score share, rounding every share
/// down. Whatever the floors leave behind is reported in `undistributed`
/// and stays there.
pub fn allocate<T: Scored>(
    priorities: &[T],
    available: &BTreeMap<String, u64>,
) -> Result<AllocationPlan, AllocationError> {
    let total_score: f64 = priorities.iter().map(T::priority_score).sum();
    if !total_score.is_finite() || total_score <= 0.0 {
        return Err(AllocationError::ZeroTotalScore {
            recipients: priorities.len(),
        });
    }

    let mut distributed: BTreeMap<String, u64> =
        available.keys().map(|name| (name.clone(), 0)).collect();
    let mut entries = Vec::with_capacity(priorities.len());

    for priority in priorities {
        let ratio = priority.priority_score() / total_score;
        let mut allocation = BTreeMap::new();
        for (resource, quantity) in available {
            let given = distributed.entry(resource.clone()).or_insert(0);
            // f64 rounding can push a floored share past what is left of the pool.
            let share = ((*quantity as f64 * ratio).floor() as u64).min(quantity - *given);
            *given += share;
            allocation.insert(resource.clone(), share);
        }
        entries.push(AllocationEntry {
            rank: priority.rank(),
            name: priority.label().to_string(),
            total_score: priority.priority_score(),
            allocation_ratio: round2(ratio * 100.0),
            allocation,
        });
    }

    let undistributed = available
        .iter()
        .map(|(resource, quantity)| {
            let given = distributed.get(resource).copied().unwrap_or(0);
            (resource.clone(), quantity.saturating_sub(given))
        })
        .collect();

    info!(
        recipients = entries.len(),
        resources = available.len(),
        "computed relief allocation"
    );

    Ok(AllocationPlan {
        generated_at: Utc::now(),
        total_score,
        available: available.clone(),
        entries,
        distributed,
        undistributed,
    })
}
