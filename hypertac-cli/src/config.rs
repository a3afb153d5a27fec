//! Configuration loading and parsing

use anyhow::{Context, Result};
use hypertac_core::{ColumnMapping, ExtractorConfig, GridConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub columns: ColumnMapping,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    #[serde(default)]
    pub files: Vec<PathBuf>,
    /// Delimiter for .csv inputs
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_delimiter() -> char {
    ','
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            delimiter: default_delimiter(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Txt,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Txt => "txt",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PolicyConfig {
    /// Accept inputs with headers but no valid rows
    #[serde(default)]
    pub allow_empty: bool,
}

impl AppConfig {
    /// Extractor settings derived from the column and policy sections
    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig::new()
            .with_columns(self.columns.clone())
            .with_allow_empty(self.policy.allow_empty)
            .with_delimiter(self.input.delimiter)
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .grid
        .validate()
        .with_context(|| format!("Invalid [grid] section in {:?}", path))?;

    Ok(config)
}
