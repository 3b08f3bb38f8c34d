use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub db_path: Option<String>,
    pub default_limit: Option<usize>,
    pub exclude_suspended: Option<bool>,
    pub group_span_hours: Option<u64>,

    pub pagination: Option<PaginationConfig>,
}

/// `[pagination]` table; see `PaginationSettings` for the meaning of each field.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct PaginationConfig {
    pub initial_window: Option<usize>,
    pub window_growth_factor: Option<usize>,
    pub max_window: Option<usize>,
    pub max_limit: Option<usize>,
    pub use_store_grouping: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
