use anyhow::{Context, Result};
use serde::Serialize;

/// Pretty JSON in the camelCase shape the relief dashboard reads.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed serializing output as JSON")
}
