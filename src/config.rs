//! Configuration file handling.
//!
//! Settings come from an optional `retail_eda.toml`; every key has a default
//! so a partial (or missing) file is fine.

use crate::stats::{DEFAULT_DISCRETE_THRESHOLD, DEFAULT_HISTOGRAM_BINS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "retail_eda.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Input dataset settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path of the retail CSV.
    #[serde(default = "default_data_path")]
    pub path: PathBuf,

    /// Rows inspected when inferring column types.
    #[serde(default = "default_infer_schema_length")]
    pub infer_schema_length: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            infer_schema_length: default_infer_schema_length(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("SampleSuperstore.csv")
}

fn default_infer_schema_length() -> usize {
    10_000
}

/// Parameters of the computed insights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Numeric fields with fewer distinct values are discrete.
    #[serde(default = "default_discrete_threshold")]
    pub discrete_threshold: usize,

    /// Bins per continuous-field histogram.
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,

    /// Cities shown in the deal-count ranking.
    #[serde(default = "default_top_deal_cities")]
    pub top_deal_cities: usize,

    /// Cities shown in each of the loss and profit rankings.
    #[serde(default = "default_top_profit_cities")]
    pub top_profit_cities: usize,

    /// States listed in the conclusion headline.
    #[serde(default = "default_headline_states")]
    pub headline_states: usize,

    /// States broken down by category and sub-category.
    #[serde(default = "default_turnover_states")]
    pub turnover_states: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            discrete_threshold: default_discrete_threshold(),
            histogram_bins: default_histogram_bins(),
            top_deal_cities: default_top_deal_cities(),
            top_profit_cities: default_top_profit_cities(),
            headline_states: default_headline_states(),
            turnover_states: default_turnover_states(),
        }
    }
}

fn default_discrete_threshold() -> usize {
    DEFAULT_DISCRETE_THRESHOLD
}

fn default_histogram_bins() -> usize {
    DEFAULT_HISTOGRAM_BINS
}

fn default_top_deal_cities() -> usize {
    50
}

fn default_top_profit_cities() -> usize {
    30
}

fn default_headline_states() -> usize {
    3
}

fn default_turnover_states() -> Vec<String> {
    vec!["California", "Mississippi", "Texas", "Washington", "Arizona"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Static chart export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_width() -> u32 {
    1400
}

fn default_height() -> u32 {
    900
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load `explicit` if given, else `retail_eda.toml` if it exists, else defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Default configuration rendered as TOML.
    pub fn default_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default()).context("Failed to serialize default config")
    }

    /// Write the default configuration to `path`, refusing to overwrite.
    pub fn write_default(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("{} already exists", path.display());
        }
        std::fs::write(path, Self::default_toml()?)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.analysis.discrete_threshold, 25);
        assert_eq!(config.analysis.histogram_bins, 50);
        assert_eq!(config.analysis.turnover_states.len(), 5);
        assert_eq!(config.data.path, PathBuf::from("SampleSuperstore.csv"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[analysis]\nhistogram_bins = 20\n\n[data]\npath = \"sales.csv\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.analysis.histogram_bins, 20);
        assert_eq!(config.analysis.top_profit_cities, 30);
        assert_eq!(config.data.path, PathBuf::from("sales.csv"));
        assert_eq!(config.export.width, 1400);
    }

    #[test]
    fn test_default_toml_round_trips() {
        let parsed: Config = toml::from_str(&Config::default_toml().unwrap()).unwrap();
        assert_eq!(parsed.analysis.top_deal_cities, 50);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[analysis]\nhistogram_bins = \"many\"").unwrap();
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_write_default_to_custom_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");

        Config::write_default(&path).unwrap();
        let written = Config::load(&path).unwrap();
        assert_eq!(written.analysis.histogram_bins, 50);

        assert!(Config::write_default(&path).is_err());
    }
}
