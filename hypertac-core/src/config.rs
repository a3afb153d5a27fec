//! Mapper configuration types
//!
//! Grid dimensions for the Hypertac block and the column layout expected from
//! the input sheet. Both are plain values: each mapping run reads them and
//! builds its own grid.

use crate::types::{HypertacError, Result};
use serde::{Deserialize, Serialize};

/// Default number of grid rows in a Hypertac block
pub const DEFAULT_ROWS: usize = 18;

/// Default number of grid columns in a Hypertac block
pub const DEFAULT_COLS: usize = 5;

/// Largest grid accepted by [`GridConfig::validate`]
pub const MAX_TOTAL_SLOTS: usize = 1 << 20;

/// Dimensions of the conceptual slot grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_rows")]
    pub rows: usize,
    #[serde(default = "default_cols")]
    pub cols: usize,
}

fn default_rows() -> usize {
    DEFAULT_ROWS
}

fn default_cols() -> usize {
    DEFAULT_COLS
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
        }
    }
}

impl GridConfig {
    /// Create a grid configuration with the default 18x5 layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set rows and columns
    pub fn with_dimensions(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Total number of slots (`rows * cols`, saturating)
    pub fn total_slots(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// Reject zero-sized grids and grids larger than [`MAX_TOTAL_SLOTS`]
    pub fn validate(&self) -> Result<()> {
        let total = self.rows.checked_mul(self.cols);
        match total {
            Some(total) if total > 0 && total <= MAX_TOTAL_SLOTS => Ok(()),
            _ => Err(HypertacError::InvalidGridDimensions {
                rows: self.rows,
                cols: self.cols,
            }),
        }
    }
}

/// Header names of the input columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    #[serde(default = "default_signal_name")]
    pub signal_name: String,
    #[serde(default = "default_ecu_name")]
    pub ecu_name: String,
    #[serde(default = "default_ecu_pin")]
    pub ecu_pin: String,
    #[serde(default = "default_connector_name")]
    pub connector_name: String,
    #[serde(default = "default_connector_pin")]
    pub connector_pin: String,
}

fn default_signal_name() -> String {
    "Signalname".to_string()
}

fn default_ecu_name() -> String {
    "ECU Name".to_string()
}

fn default_ecu_pin() -> String {
    "ECU Pin".to_string()
}

fn default_connector_name() -> String {
    "HE Name".to_string()
}

fn default_connector_pin() -> String {
    "HE Pin".to_string()
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            signal_name: default_signal_name(),
            ecu_name: default_ecu_name(),
            ecu_pin: default_ecu_pin(),
            connector_name: default_connector_name(),
            connector_pin: default_connector_pin(),
        }
    }
}

/// Configuration for the row extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    #[serde(default)]
    pub columns: ColumnMapping,

    /// Accept a sheet with headers but no valid rows (yields an empty grid)
    #[serde(default)]
    pub allow_empty: bool,

    /// Field delimiter for `.csv` inputs (`.tsv` always uses a tab)
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_delimiter() -> char {
    ','
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            allow_empty: false,
            delimiter: default_delimiter(),
        }
    }
}

impl ExtractorConfig {
    /// Create an extractor configuration with default headers
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: replace the column mapping
    pub fn with_columns(mut self, columns: ColumnMapping) -> Self {
        self.columns = columns;
        self
    }

    /// Builder method: accept sheets without valid rows
    pub fn with_allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    /// Builder method: set the CSV delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_defaults() {
        let grid = GridConfig::new();
        assert_eq!(grid.rows, 18);
        assert_eq!(grid.cols, 5);
        assert_eq!(grid.total_slots(), 90);
        assert!(grid.validate().is_ok());
    }

    #[test]
    fn test_grid_validation() {
        assert!(GridConfig::new().with_dimensions(0, 5).validate().is_err());
        assert!(GridConfig::new().with_dimensions(4, 0).validate().is_err());
        assert!(GridConfig::new().with_dimensions(1, 1).validate().is_ok());
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let overflow = GridConfig::new().with_dimensions(usize::MAX, 2);
        assert!(matches!(
            overflow.validate(),
            Err(HypertacError::InvalidGridDimensions { cols: 2, .. })
        ));
        assert_eq!(overflow.total_slots(), usize::MAX);

        let huge = GridConfig::new().with_dimensions(MAX_TOTAL_SLOTS, 2);
        assert!(huge.validate().is_err());
        assert!(GridConfig::new()
            .with_dimensions(MAX_TOTAL_SLOTS, 1)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_extractor_config_builder() {
        let columns = ColumnMapping {
            signal_name: "Signal".to_string(),
            ..ColumnMapping::default()
        };
        let config = ExtractorConfig::new()
            .with_columns(columns)
            .with_allow_empty(true)
            .with_delimiter(';');

        assert_eq!(config.columns.signal_name, "Signal");
        assert_eq!(config.columns.ecu_name, "ECU Name");
        assert!(config.allow_empty);
        assert_eq!(config.delimiter, ';');
    }

    #[test]
    fn test_partial_deserialization() {
        let grid: GridConfig = serde_json::from_str(r#"{"rows": 2}"#).unwrap();
        assert_eq!(grid, GridConfig { rows: 2, cols: 5 });

        let extractor: ExtractorConfig =
            serde_json::from_str(r#"{"columns": {"connector_pin": "Pin"}}"#).unwrap();
        assert_eq!(extractor.columns.connector_pin, "Pin");
        assert_eq!(extractor.columns.connector_name, "HE Name");
        assert_eq!(extractor.delimiter, ',');
    }
}
