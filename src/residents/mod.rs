pub mod lenient;
pub mod loader;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::residents::lenient::{lenient_number, lenient_text};

/// Dwelling construction category, ordered from most to least vulnerable
/// in the housing lookup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HouseMaterial {
    Nipa,
    Mixed,
    Concrete,
    Other,
}

impl HouseMaterial {
    pub const ALL: [HouseMaterial; 4] = [
        HouseMaterial::Nipa,
        HouseMaterial::Mixed,
        HouseMaterial::Concrete,
        HouseMaterial::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nipa => "Nipa",
            Self::Mixed => "Mixed",
            Self::Concrete => "Concrete",
            Self::Other => "Other",
        }
    }
}

impl Display for HouseMaterial {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown house material: {0}")]
pub struct HouseMaterialParseError(pub String);

impl FromStr for HouseMaterial {
    type Err = HouseMaterialParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "nipa" => Ok(Self::Nipa),
            "mixed" => Ok(Self::Mixed),
            "concrete" => Ok(Self::Concrete),
            "other" => Ok(Self::Other),
            _ => Err(HouseMaterialParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Terrain {
    Highland,
    Lowland,
    Coastal,
    Urban,
    Rural,
}

impl Terrain {
    pub const ALL: [Terrain; 5] = [
        Terrain::Highland,
        Terrain::Lowland,
        Terrain::Coastal,
        Terrain::Urban,
        Terrain::Rural,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Highland => "Highland",
            Self::Lowland => "Lowland",
            Self::Coastal => "Coastal",
            Self::Urban => "Urban",
            Self::Rural => "Rural",
        }
    }
}

impl Display for Terrain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown terrain: {0}")]
pub struct TerrainParseError(pub String);

impl FromStr for Terrain {
    type Err = TerrainParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "highland" => Ok(Self::Highland),
            "lowland" => Ok(Self::Lowland),
            "coastal" => Ok(Self::Coastal),
            "urban" => Ok(Self::Urban),
            "rural" => Ok(Self::Rural),
            _ => Err(TerrainParseError(s.to_string())),
        }
    }
}

/// A resident row as exported by the registration database.
///
/// Every field is optional and stored as received. The accessor methods
/// resolve the scoring defaults, so a record with no fields at all still
/// scores as a single-member, zero-income household in a Rural barangay.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResidentRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub barangay: Option<String>,
    #[serde(
        default,
        alias = "evacuee_history",
        deserialize_with = "lenient_number"
    )]
    pub evacuee_history: Option<f64>,
    #[serde(default, alias = "monthly_income", deserialize_with = "lenient_number")]
    pub monthly_income: Option<f64>,
    #[serde(default, alias = "family_members", deserialize_with = "lenient_number")]
    pub family_members: Option<f64>,
    #[serde(default, alias = "house_material", deserialize_with = "lenient_text")]
    pub house_material: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub terrain: Option<String>,
    #[serde(default, alias = "barangay_terrain", deserialize_with = "lenient_text")]
    pub barangay_terrain: Option<String>,
}

impl ResidentRecord {
    pub fn new(name: impl Into<String>, barangay: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            barangay: Some(barangay.into()),
            ..Self::default()
        }
    }

    pub fn with_evacuations(mut self, count: u32) -> Self {
        self.evacuee_history = Some(f64::from(count));
        self
    }

    pub fn with_income(mut self, income: f64) -> Self {
        self.monthly_income = Some(income);
        self
    }

    pub fn with_family_members(mut self, members: u32) -> Self {
        self.family_members = Some(f64::from(members));
        self
    }

    pub fn with_house_material(mut self, material: HouseMaterial) -> Self {
        self.house_material = Some(material.to_string());
        self
    }

    pub fn with_terrain(mut self, terrain: Terrain) -> Self {
        self.terrain = Some(terrain.to_string());
        self
    }

    /// Past evacuations; negative or missing counts resolve to 0.
    pub fn evacuations(&self) -> u32 {
        self.evacuee_history
            .filter(|v| v.is_finite() && *v > 0.0)
            .map(|v| v.trunc().min(f64::from(u32::MAX)) as u32)
            .unwrap_or(0)
    }

    pub fn income(&self) -> f64 {
        self.monthly_income
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(0.0)
    }

    /// Household size; anything below one resolves to a single member.
    pub fn household_size(&self) -> u32 {
        self.family_members
            .filter(|v| v.is_finite() && *v >= 1.0)
            .map(|v| v.trunc().min(f64::from(u32::MAX)) as u32)
            .unwrap_or(1)
    }

    pub fn material(&self) -> HouseMaterial {
        self.house_material
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(HouseMaterial::Other)
    }

    /// Resident terrain, then the barangay terrain, then Rural. A terrain
    /// value that does not parse counts as absent.
    pub fn resolved_terrain(&self) -> Terrain {
        self.terrain
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .or_else(|| {
                self.barangay_terrain
                    .as_deref()
                    .and_then(|raw| raw.parse().ok())
            })
            .unwrap_or(Terrain::Rural)
    }

    pub fn matches_barangay(&self, barangay: &str) -> bool {
        self.barangay
            .as_deref()
            .map(|b| b.trim().eq_ignore_ascii_case(barangay.trim()))
            .unwrap_or(false)
    }
}
