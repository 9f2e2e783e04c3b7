//! Need-based priority scoring for barangay relief distribution.
//!
//! Residents are scored on five factors (evacuation history, income, family
//! size, housing material, terrain), aggregated per barangay, ranked, and
//! used to split a finite pool of relief goods in proportion to need.

pub mod allocation;
pub mod config;
pub mod output;
pub mod population;
pub mod residents;
pub mod scoring;
pub mod server;
pub mod telemetry;
