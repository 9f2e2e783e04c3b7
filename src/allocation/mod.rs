pub mod distribute;
pub mod plan;
pub mod ranking;

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::population::BarangayAggregate;
use crate::scoring::ScoredResident;

/// Whether ranking and allocation work on individual households or on
/// whole barangays.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RankLevel {
    Resident,
    #[default]
    Barangay,
}

impl Display for RankLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resident => write!(f, "resident"),
            Self::Barangay => write!(f, "barangay"),
        }
    }
}

/// Anything that can be ranked and receive a share of relief goods.
pub trait Scored {
    fn priority_score(&self) -> f64;
    fn label(&self) -> &str;
    fn rank(&self) -> Option<usize> {
        None
    }
}

impl Scored for ScoredResident {
    fn priority_score(&self) -> f64 {
        self.result.total_score
    }

    fn label(&self) -> &str {
        self.display_name()
    }
}

impl Scored for BarangayAggregate {
    fn priority_score(&self) -> f64 {
        self.average_score
    }

    fn label(&self) -> &str {
        self.display_name()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ranked<T> {
    pub rank: usize,
    #[serde(flatten)]
    pub item: T,
}

impl<T: Scored> Scored for Ranked<T> {
    fn priority_score(&self) -> f64 {
        self.item.priority_score()
    }

    fn label(&self) -> &str {
        self.item.label()
    }

    fn rank(&self) -> Option<usize> {
        Some(self.rank)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllocationEntry {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rank: Option<usize>,
    pub name: String,
    pub total_score: f64,
    /// Share of the summed score, as a percentage rounded to 2 decimals.
    pub allocation_ratio: f64,
    pub allocation: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllocationPlan {
    pub generated_at: DateTime<Utc>,
    pub total_score: f64,
    pub available: BTreeMap<String, u64>,
    pub entries: Vec<AllocationEntry>,
    pub distributed: BTreeMap<String, u64>,
    /// Units lost to floor truncation; never redistributed.
    pub undistributed: BTreeMap<String, u64>,
}

impl AllocationPlan {
    pub fn resource_names(&self) -> Vec<&str> {
        self.available.keys().map(String::as_str).collect()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum AllocationError {
    #[error("cannot allocate: total priority score across {recipients} recipients is zero")]
    ZeroTotalScore { recipients: usize },
    #[error("cannot allocate: top must select at least one recipient")]
    EmptySelection,
}

#[derive(Debug, Error, PartialEq)]
pub enum ResourceParseError {
    #[error("resource must look like NAME=QUANTITY: {0}")]
    Format(String),
    #[error("invalid quantity for resource {name}: {raw}")]
    Quantity { name: String, raw: String },
    #[error("total quantity for resource {name} overflows")]
    Overflow { name: String },
}

/// Parses `rice=100` style resource arguments.
pub fn parse_resource(raw: &str) -> Result<(String, u64), ResourceParseError> {
    let Some((name, quantity)) = raw.split_once('=') else {
        return Err(ResourceParseError::Format(raw.to_string()));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(ResourceParseError::Format(raw.to_string()));
    }
    let quantity = quantity
        .trim()
        .replace([',', '_'], "")
        .parse::<u64>()
        .map_err(|_| ResourceParseError::Quantity {
            name: name.to_string(),
            raw: quantity.trim().to_string(),
        })?;
    Ok((name.to_string(), quantity))
}

/// Parses repeated resource arguments into one pool. Repeats of the same
/// name are summed.
pub fn parse_resources<I, S>(raws: I) -> Result<BTreeMap<String, u64>, ResourceParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut pool = BTreeMap::new();
    for raw in raws {
        let (name, quantity) = parse_resource(raw.as_ref())?;
        let total: &mut u64 = pool.entry(name.clone()).or_insert(0);
        *total = total
            .checked_add(quantity)
            .ok_or(ResourceParseError::Overflow { name })?;
    }
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_resource_arguments() {
        assert_eq!(parse_resource("rice=100"), Ok(("rice".to_string(), 100)));
        assert_eq!(
            parse_resource(" canned goods = 1,200 "),
            Ok(("canned goods".to_string(), 1200))
        );
        assert!(matches!(
            parse_resource("rice"),
            Err(ResourceParseError::Format(_))
        ));
        assert!(matches!(
            parse_resource("rice=-4"),
            Err(ResourceParseError::Quantity { .. })
        ));
    }

    #[test]
    fn repeated_resources_are_summed() {
        let pool = parse_resources(["rice=100", "shirts=5", "rice=50"]).expect("parses");
        assert_eq!(pool.get("rice"), Some(&150));
        assert_eq!(pool.get("shirts"), Some(&5));
    }

    #[test]
    fn repeated_resources_that_overflow_are_rejected() {
        let max = format!("rice={}", u64::MAX);
        let err = parse_resources([max.as_str(), "rice=1"]).expect_err("overflows");
        assert_eq!(
            err,
            ResourceParseError::Overflow {
                name: "rice".to_string()
            }
        );
    }
}
