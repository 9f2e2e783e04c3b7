use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::residents::ResidentRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            _ => Err(anyhow!(
                "unsupported resident file (expected .csv or .json): {}",
                path.display()
            )),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonResidents {
    List(Vec<ResidentRecord>),
    Wrapped { residents: Vec<ResidentRecord> },
}

pub fn load_residents(path: &Path) -> Result<Vec<ResidentRecord>> {
    let format = SourceFormat::from_path(path)?;
    let file = File::open(path)
        .with_context(|| format!("failed opening resident file: {}", path.display()))?;
    let residents = match format {
        SourceFormat::Csv => residents_from_csv(file),
        SourceFormat::Json => residents_from_json(file),
    }
    .with_context(|| format!("failed reading residents from {}", path.display()))?;
    info!(count = residents.len(), path = %path.display(), "loaded residents");
    Ok(residents)
}

pub fn residents_from_csv<R: Read>(reader: R) -> Result<Vec<ResidentRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut residents = Vec::new();
    for (idx, row) in reader.deserialize::<ResidentRecord>().enumerate() {
        let record = row.with_context(|| format!("malformed CSV row {}", idx + 1))?;
        residents.push(record);
    }
    debug!(count = residents.len(), "parsed resident CSV");
    Ok(residents)
}

pub fn residents_from_json<R: Read>(reader: R) -> Result<Vec<ResidentRecord>> {
    let parsed: JsonResidents =
        serde_json::from_reader(reader).context("resident JSON must be an array of records")?;
    Ok(match parsed {
        JsonResidents::List(residents) => residents,
        JsonResidents::Wrapped { residents } => residents,
    })
}

/// The registration store is queried by barangay; this is the file-backed
/// equivalent of that query.
pub fn filter_by_barangay(residents: Vec<ResidentRecord>, barangay: &str) -> Vec<ResidentRecord> {
    residents
        .into_iter()
        .filter(|resident| resident.matches_barangay(barangay))
        .collect()
}
