//! Row extraction from wiring spreadsheets
//!
//! Turns a tabular input file into an ordered list of [`SignalRow`] records.
//! Each extractor maps columns by header name, trims every cell, skips rows
//! without a signal or ECU name, and keeps the zero-based record index of
//! every row it emits. Blank sheet rows count towards that index.

use crate::config::{ColumnMapping, ExtractorConfig};
use crate::types::{non_blank, HypertacError, Result, SignalRow};
use std::path::Path;

pub mod delimited;
pub mod workbook;

pub use delimited::{extract_from_reader, DelimitedExtractor};
pub use workbook::{extract_from_range, WorkbookExtractor};

/// Common trait for all row extractors
pub trait RowExtractor {
    /// Read all valid signal rows from a file, in source order
    fn extract(&self, path: &Path) -> Result<Vec<SignalRow>>;
}

/// Extract rows from a file, choosing the extractor by extension
///
/// Supported: `.csv` (configured delimiter), `.tsv` (tab) and the
/// spreadsheet formats `.xlsx`, `.xlsm`, `.xlsb`, `.xls` and `.ods`
/// (first worksheet).
pub fn extract_rows(path: &Path, config: &ExtractorConfig) -> Result<Vec<SignalRow>> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());

    match extension.as_deref() {
        Some("csv") => {
            log::debug!("Detected CSV input");
            DelimitedExtractor::new(config.clone()).extract(path)
        }
        Some("tsv") => {
            log::debug!("Detected TSV input");
            DelimitedExtractor::new(config.clone().with_delimiter('\t')).extract(path)
        }
        Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => {
            log::debug!("Detected spreadsheet input");
            WorkbookExtractor::new(config.clone()).extract(path)
        }
        _ => Err(HypertacError::UnsupportedFormat(format!(
            "{:?} (expected .csv, .tsv, .xlsx, .xlsm, .xlsb, .xls or .ods)",
            path
        ))),
    }
}

/// Column positions resolved from the header row
#[derive(Debug)]
struct ColumnIndices {
    signal_name: usize,
    ecu_name: usize,
    ecu_pin: Option<usize>,
    connector_name: Option<usize>,
    connector_pin: Option<usize>,
}

impl ColumnIndices {
    fn resolve<S: AsRef<str>>(headers: &[S], columns: &ColumnMapping) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.as_ref().trim().eq_ignore_ascii_case(name.trim()))
        };

        let signal_name = find(columns.signal_name.as_str())
            .ok_or_else(|| HypertacError::MissingColumn(columns.signal_name.clone()))?;
        let ecu_name = find(columns.ecu_name.as_str())
            .ok_or_else(|| HypertacError::MissingColumn(columns.ecu_name.clone()))?;

        Ok(Self {
            signal_name,
            ecu_name,
            ecu_pin: find(columns.ecu_pin.as_str()),
            connector_name: find(columns.connector_name.as_str()),
            connector_pin: find(columns.connector_pin.as_str()),
        })
    }
}

/// Rows collected from one sheet under the shared trim and skip rules
struct SheetRows<'a> {
    config: &'a ExtractorConfig,
    indices: ColumnIndices,
    /// 1-based sheet line holding the header
    header_line: usize,
    rows: Vec<SignalRow>,
}

impl<'a> SheetRows<'a> {
    /// Resolve the header cells; blank headers mean an empty source
    fn new<S: AsRef<str>>(
        headers: &[S],
        header_line: usize,
        config: &'a ExtractorConfig,
    ) -> Result<Self> {
        if headers.iter().all(|h| h.as_ref().trim().is_empty()) {
            return Err(HypertacError::EmptySource);
        }

        let indices = ColumnIndices::resolve(headers, &config.columns)?;
        log::debug!("Resolved input columns: {:?}", indices);

        Ok(Self {
            config,
            indices,
            header_line,
            rows: Vec::new(),
        })
    }

    /// Add the data record at zero-based `index` (counted from the line after the header)
    fn push<S: AsRef<str>>(&mut self, index: usize, cells: &[S]) {
        if cells.iter().all(|c| c.as_ref().trim().is_empty()) {
            log::trace!("Skipping blank record {}", index);
            return;
        }

        let cell = |column: Option<usize>| {
            column
                .and_then(|c| cells.get(c))
                .and_then(|value| non_blank(Some(value.as_ref())))
                .map(str::to_string)
        };

        match (cell(Some(self.indices.signal_name)), cell(Some(self.indices.ecu_name))) {
            (Some(signal_name), Some(ecu_name)) => {
                log::trace!("Record {}: {} -> {}", index, signal_name, ecu_name);
                self.rows.push(SignalRow {
                    signal_name,
                    ecu_name,
                    ecu_pin: cell(self.indices.ecu_pin),
                    connector_name: cell(self.indices.connector_name),
                    connector_pin: cell(self.indices.connector_pin),
                    source_index: Some(index),
                });
            }
            _ => {
                log::warn!(
                    "Skipping row {} due to missing mandatory data ({} or {})",
                    self.header_line + 1 + index,
                    self.config.columns.signal_name,
                    self.config.columns.ecu_name
                );
            }
        }
    }

    fn finish(self) -> Result<Vec<SignalRow>> {
        if self.rows.is_empty() && !self.config.allow_empty {
            return Err(HypertacError::NoValidRows);
        }
        Ok(self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_extension() {
        let result = extract_rows(Path::new("wiring.pdf"), &ExtractorConfig::new());
        assert!(matches!(result, Err(HypertacError::UnsupportedFormat(_))));

        let result = extract_rows(Path::new("no_extension"), &ExtractorConfig::new());
        assert!(matches!(result, Err(HypertacError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_spreadsheet_is_io_error() {
        let result = extract_rows(Path::new("does/not/exist.XLSX"), &ExtractorConfig::new());
        let err = result.unwrap_err();
        assert!(matches!(err, HypertacError::Io(_)));
        assert_eq!(err.status(), "error");
    }

    #[test]
    fn test_sheet_rows_rules() {
        let config = ExtractorConfig::new();
        let mut sheet = SheetRows::new(&["ECU Name", "Signalname"], 1, &config).unwrap();
        sheet.push(0, &[" BCM ", " CAN_H "]);
        sheet.push(1, &["", ""]);
        sheet.push(2, &["ECM", ""]);
        sheet.push(3, &["GW"]);
        sheet.push(4, &["ECM", "KL30"]);

        let rows = sheet.finish().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], SignalRow::new("CAN_H", "BCM").with_source_index(0));
        assert_eq!(rows[1], SignalRow::new("KL30", "ECM").with_source_index(4));
    }
}
