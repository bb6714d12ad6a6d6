//! The seed series.
//!
//! The channel's reference series ships as a JSON data file embedded at
//! build time. A different seed can be loaded from disk with the same shape.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;

use super::series::Series;

/// Raw JSON of the built-in seed series
pub const BUILTIN_SEED_JSON: &str = include_str!("../../data/seed_series.json");

/// Parse the built-in seed series
pub fn builtin_seed() -> Result<Series> {
    Series::from_json(BUILTIN_SEED_JSON).context("Built-in seed series is not valid JSON")
}

/// Load a seed series from a JSON file
pub async fn load_seed_file(path: &Path) -> Result<Series> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read seed file: {}", path.display()))?;

    Series::from_json(&content)
        .with_context(|| format!("Failed to parse seed file: {}", path.display()))
}

/// Resolve the seed: the file when one is configured, otherwise the built-in
pub async fn resolve_seed(path: Option<&Path>) -> Result<Series> {
    match path {
        Some(path) => {
            tracing::debug!("Loading seed series from {}", path.display());
            load_seed_file(path).await
        }
        None => builtin_seed(),
    }
}
