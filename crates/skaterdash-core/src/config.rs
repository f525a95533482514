// Configuration loading and parsing (config/dashboard.toml).

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::catalog::{Catalog, ConfigurationError, StatCatalog, TeamColors};
use crate::chart::Theme;
use crate::profile::AssetTemplates;

pub const CONFIG_FILE: &str = "dashboard.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// dashboard.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub assets: AssetTemplates,
    /// Label overrides and additions, keyed by statistic.
    #[serde(default)]
    pub labels: HashMap<String, String>,
    /// Color overrides and additions, keyed by team abbreviation.
    #[serde(default)]
    pub team_colors: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub path: String,
    pub season_label: String,
    #[serde(default)]
    pub source_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    pub top_n: usize,
    pub ranking_stat: String,
    pub default_stat_x: String,
    pub default_stat_y: String,
    #[serde(default)]
    pub theme: Theme,
    /// Restrict or reorder the selectable statistics. Omit for the full list.
    #[serde(default)]
    pub stats: Option<Vec<String>>,
}

impl Config {
    /// Build the validated statistic catalog and team colors.
    pub fn catalog(&self) -> Result<Catalog, ConfigurationError> {
        let keys = self
            .dashboard
            .stats
            .clone()
            .unwrap_or_else(StatCatalog::builtin_keys);
        let mut labels = StatCatalog::builtin_labels();
        labels.extend(self.labels.iter().map(|(k, v)| (k.clone(), v.clone())));
        let stats = StatCatalog::from_parts(&keys, &labels)?;
        let teams = TeamColors::with_overrides(&self.team_colors)?;
        Ok(Catalog { stats, teams })
    }

    pub fn data_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.data.path)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/dashboard.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config = parse_config(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

pub fn parse_config(text: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(text)
}

/// Copy `defaults/dashboard.toml` to `config/` unless a config file is
/// already there. Returns the path written, if any.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no {} in {}/config or {}/defaults; run from the project root",
                CONFIG_FILE,
                base_dir.display(),
                base_dir.display()
            ),
        });
    }

    let copy = || -> std::io::Result<()> {
        std::fs::create_dir_all(base_dir.join("config"))?;
        std::fs::copy(&source, &target)?;
        Ok(())
    };
    copy().map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {}: {e}", source.display()),
    })?;
    info!("Copied default config to {}", target.display());
    Ok(Some(target))
}

/// Load config from `base_dir`, copying the default file into `config/`
/// first when needed.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_file(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validation(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.data.path.trim().is_empty() {
        return Err(validation("data.path", "must not be empty"));
    }

    let dash = &config.dashboard;
    if dash.top_n == 0 {
        return Err(validation("dashboard.top_n", "must be greater than 0"));
    }
    if dash.ranking_stat.trim().is_empty() {
        return Err(validation("dashboard.ranking_stat", "must not be empty"));
    }

    let allowed: Vec<String> = dash.stats.clone().unwrap_or_else(StatCatalog::builtin_keys);
    for (field, key) in [
        ("dashboard.default_stat_x", &dash.default_stat_x),
        ("dashboard.default_stat_y", &dash.default_stat_y),
    ] {
        if !allowed.contains(key) {
            return Err(validation(
                field,
                format!("`{key}` is not in the statistic list"),
            ));
        }
    }

    if config.assets.placeholder_image.trim().is_empty() {
        return Err(validation("assets.placeholder_image", "must not be empty"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
