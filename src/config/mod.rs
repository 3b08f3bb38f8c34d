mod file_config;

pub use file_config::{FileConfig, PaginationConfig};

use crate::notifications::{PaginationSettings, DEFAULT_GROUP_SPAN_HOURS, MAX_GROUP_SPAN_HOURS};
use anyhow::{anyhow, bail, Result};
use std::path::PathBuf;

pub const DEFAULT_PAGE_LIMIT: usize = 40;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub default_limit: usize,
    pub exclude_suspended: bool,
    pub group_span_hours: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            default_limit: DEFAULT_PAGE_LIMIT,
            exclude_suspended: true,
            group_span_hours: DEFAULT_GROUP_SPAN_HOURS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub default_limit: usize,
    pub exclude_suspended: bool,
    pub group_span_hours: u64,
    pub pagination: PaginationSettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| anyhow!("db_path must be specified on the command line or in config file"))?;

        let default_limit = file.default_limit.unwrap_or(cli.default_limit);
        if default_limit == 0 {
            bail!("default_limit must be greater than zero");
        }
        let exclude_suspended = file.exclude_suspended.unwrap_or(cli.exclude_suspended);
        let group_span_hours = file.group_span_hours.unwrap_or(cli.group_span_hours);
        if group_span_hours == 0 {
            bail!("group_span_hours must be greater than zero");
        }
        if group_span_hours > MAX_GROUP_SPAN_HOURS {
            bail!(
                "group_span_hours must be at most {}, got {}",
                MAX_GROUP_SPAN_HOURS,
                group_span_hours
            );
        }

        let defaults = PaginationSettings::default();
        let p = file.pagination.unwrap_or_default();
        let pagination = PaginationSettings {
            initial_window: p.initial_window.unwrap_or(defaults.initial_window),
            window_growth_factor: p
                .window_growth_factor
                .unwrap_or(defaults.window_growth_factor),
            max_window: p.max_window.unwrap_or(defaults.max_window),
            max_limit: p.max_limit.unwrap_or(defaults.max_limit),
            use_store_grouping: p.use_store_grouping.unwrap_or(defaults.use_store_grouping),
        };
        validate_pagination(&pagination)?;

        Ok(Self {
            db_path,
            default_limit,
            exclude_suspended,
            group_span_hours,
            pagination,
        })
    }
}

fn validate_pagination(settings: &PaginationSettings) -> Result<()> {
    if settings.initial_window == 0 {
        bail!("pagination.initial_window must be greater than zero");
    }
    if settings.max_limit == 0 {
        bail!("pagination.max_limit must be greater than zero");
    }
    if settings.window_growth_factor < 2 {
        bail!(
            "pagination.window_growth_factor must be at least 2, got {}",
            settings.window_growth_factor
        );
    }
    if settings.max_window < settings.initial_window {
        bail!(
            "pagination.max_window ({}) must not be smaller than pagination.initial_window ({})",
            settings.max_window,
            settings.initial_window
        );
    }
    Ok(())
}
