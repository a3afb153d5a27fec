//! Delimited-text (CSV/TSV) extractor

use super::{RowExtractor, SheetRows};
use crate::config::ExtractorConfig;
use crate::types::{HypertacError, Result, SignalRow};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Extractor for comma- or tab-separated exports of the wiring sheet
pub struct DelimitedExtractor {
    config: ExtractorConfig,
}

impl DelimitedExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }
}

impl RowExtractor for DelimitedExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<SignalRow>> {
        log::info!("Reading signal rows from {:?}", path);
        let file = File::open(path)?;
        let rows = extract_from_reader(file, &self.config)?;
        log::info!("Extracted {} signal rows from {:?}", rows.len(), path);
        Ok(rows)
    }
}

/// Extract signal rows from any reader holding delimited text
///
/// The first line is the header row. Data records are numbered from zero
/// starting at the line after the header, and blank lines still count, so
/// [`SignalRow::source_index`] lines up with the sheet row the record came
/// from.
pub fn extract_from_reader<R: Read>(reader: R, config: &ExtractorConfig) -> Result<Vec<SignalRow>> {
    let delimiter = u8::try_from(config.delimiter).map_err(|_| {
        HypertacError::UnsupportedFormat(format!(
            "delimiter {:?} is not a single-byte character",
            config.delimiter
        ))
    })?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    let mut sheet = SheetRows::new(&headers, 1, config)?;

    for (ordinal, record) in csv_reader.records().enumerate() {
        let record = record?;
        // The csv reader drops empty lines; its line position keeps them
        let index = record
            .position()
            .map_or(ordinal, |pos| pos.line().saturating_sub(2) as usize);
        let cells: Vec<&str> = record.iter().collect();
        sheet.push(index, &cells);
    }

    sheet.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnMapping;

    fn extract(text: &str) -> Result<Vec<SignalRow>> {
        extract_from_reader(text.as_bytes(), &ExtractorConfig::new())
    }

    #[test]
    fn test_full_columns() {
        let rows = extract(
            "Signalname,ECU Name,ECU Pin,HE Name,HE Pin\n\
             CAN_H, BCM ,12,HYP01_05_02,A01\n\
             KL30,ECM,,,\n",
        )
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].signal_name, "CAN_H");
        assert_eq!(rows[0].ecu_name, "BCM");
        assert_eq!(rows[0].ecu_pin.as_deref(), Some("12"));
        assert_eq!(
            rows[0].physical_connector_id().as_deref(),
            Some("HYP01_05_02-A01")
        );
        assert_eq!(rows[0].source_index, Some(0));

        assert_eq!(rows[1].ecu_pin, None);
        assert_eq!(rows[1].connector_name, None);
        assert_eq!(rows[1].source_index, Some(1));
    }

    #[test]
    fn test_headers_are_case_insensitive_and_reordered() {
        let rows = extract(" ecu name ,he pin,SIGNALNAME\nBCM,B02,LIN1\n").unwrap();
        assert_eq!(rows[0].signal_name, "LIN1");
        assert_eq!(rows[0].ecu_name, "BCM");
        assert_eq!(rows[0].connector_pin.as_deref(), Some("B02"));
        assert_eq!(rows[0].connector_name, None);
    }

    #[test]
    fn test_missing_mandatory_column() {
        let result = extract("Signalname,ECU Pin\nA,1\n");
        match result {
            Err(HypertacError::MissingColumn(name)) => assert_eq!(name, "ECU Name"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_source() {
        assert!(matches!(extract(""), Err(HypertacError::EmptySource)));
        assert!(matches!(extract(" , \n"), Err(HypertacError::EmptySource)));
    }

    #[test]
    fn test_malformed_rows_skipped_index_kept() {
        let rows = extract(
            "Signalname,ECU Name\n\
             ,BCM\n\
             A,\n\
             ,\n\
             B,ECM\n",
        )
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].signal_name, "B");
        assert_eq!(rows[0].source_index, Some(3));
    }

    #[test]
    fn test_blank_lines_keep_sheet_position() {
        let rows = extract("Signalname,ECU Name\nA,E1\n\nB,E2\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].source_index, Some(0));
        assert_eq!(rows[1].signal_name, "B");
        assert_eq!(rows[1].source_index, Some(2));

        let rows = extract("Signalname,ECU Name\r\n\r\n\r\nC,E3\r\n").unwrap();
        assert_eq!(rows[0].source_index, Some(2));
    }

    #[test]
    fn test_no_valid_rows() {
        let text = "Signalname,ECU Name\n,BCM\n";
        assert!(matches!(extract(text), Err(HypertacError::NoValidRows)));

        let config = ExtractorConfig::new().with_allow_empty(true);
        let rows = extract_from_reader(text.as_bytes(), &config).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_ragged_records() {
        let rows = extract("Signalname,ECU Name,ECU Pin,HE Name,HE Pin\nA,BCM\n").unwrap();
        assert_eq!(rows[0].ecu_pin, None);
        assert_eq!(rows[0].connector_pin, None);
    }

    #[test]
    fn test_custom_columns_and_delimiter() {
        let columns = ColumnMapping {
            signal_name: "Signal".to_string(),
            ecu_name: "Unit".to_string(),
            ..ColumnMapping::default()
        };
        let config = ExtractorConfig::new()
            .with_columns(columns)
            .with_delimiter(';');

        let rows = extract_from_reader("Signal;Unit\nWAKE;GW\n".as_bytes(), &config).unwrap();
        assert_eq!(rows[0].signal_name, "WAKE");
        assert_eq!(rows[0].ecu_name, "GW");
    }

    #[test]
    fn test_multibyte_delimiter_rejected() {
        let config = ExtractorConfig::new().with_delimiter('→');
        let result = extract_from_reader("a→b\n".as_bytes(), &config);
        assert!(matches!(result, Err(HypertacError::UnsupportedFormat(_))));
    }
}
