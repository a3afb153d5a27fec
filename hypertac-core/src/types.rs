//! Core types for the Hypertac slot mapper
//!
//! This module defines the records flowing through the mapper: the signal rows
//! read from a wiring spreadsheet, the conceptual slots of the connector grid,
//! and the visualization result handed to presenters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for mapper operations
pub type Result<T> = std::result::Result<T, HypertacError>;

/// One signal-to-ECU wiring record from the input sheet
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalRow {
    /// Signal name ("Signalname" column)
    pub signal_name: String,
    /// ECU the signal is wired to ("ECU Name" column)
    pub ecu_name: String,
    /// ECU pin ("ECU Pin" column)
    pub ecu_pin: Option<String>,
    /// Physical connector name ("HE Name" column)
    pub connector_name: Option<String>,
    /// Physical connector pin ("HE Pin" column)
    pub connector_pin: Option<String>,
    /// Zero-based index of the data record in the source sheet
    pub source_index: Option<usize>,
}

impl SignalRow {
    /// Create a row with just the mandatory fields
    pub fn new(signal_name: impl Into<String>, ecu_name: impl Into<String>) -> Self {
        Self {
            signal_name: signal_name.into(),
            ecu_name: ecu_name.into(),
            ..Self::default()
        }
    }

    /// Builder method: set the ECU pin
    pub fn with_ecu_pin(mut self, pin: impl Into<String>) -> Self {
        self.ecu_pin = Some(pin.into());
        self
    }

    /// Builder method: set the physical connector name and pin
    pub fn with_connector(mut self, name: impl Into<String>, pin: impl Into<String>) -> Self {
        self.connector_name = Some(name.into());
        self.connector_pin = Some(pin.into());
        self
    }

    /// Builder method: set the source record index
    pub fn with_source_index(mut self, index: usize) -> Self {
        self.source_index = Some(index);
        self
    }

    /// Compound physical connector id ("{name}-{pin}"), only when both parts are present
    pub fn physical_connector_id(&self) -> Option<String> {
        let name = non_blank(self.connector_name.as_deref())?;
        let pin = non_blank(self.connector_pin.as_deref())?;
        Some(format!("{}-{}", name, pin))
    }
}

/// Trim an optional cell value, treating blank as absent
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// One conceptual position in the Hypertac connector grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    /// Conceptual id, e.g. "R1C1"
    pub id: String,
    /// 1-based row
    pub row: usize,
    /// 1-based column
    pub col: usize,
    pub is_used: bool,
    pub signal_name: Option<String>,
    pub ecu_name: Option<String>,
    pub ecu_pin: Option<String>,
    /// "{connector name}-{connector pin}", metadata only
    pub physical_connector_id: Option<String>,
    /// True if the signal occupies more than one slot
    pub is_reused: bool,
    /// Zero-based index of the row that filled this slot
    pub source_row_index: Option<usize>,
}

impl Slot {
    /// Create an empty slot at the given 1-based position
    pub fn empty(row: usize, col: usize) -> Self {
        Self {
            id: format!("R{}C{}", row, col),
            row,
            col,
            is_used: false,
            signal_name: None,
            ecu_name: None,
            ecu_pin: None,
            physical_connector_id: None,
            is_reused: false,
            source_row_index: None,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.signal_name, &self.ecu_name) {
            (Some(signal), Some(ecu)) if self.is_used => write!(f, "{} {} -> {}", self.id, signal, ecu),
            _ => write!(f, "{} <empty>", self.id),
        }
    }
}

/// Output of one mapping run: the populated grid plus summary counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationResult {
    /// All slots in row-major order
    pub slots: Vec<Slot>,
    /// Slots holding a signal
    pub used_count: usize,
    /// Distinct signal names from the input that ended up on no slot
    pub unused_from_source_count: usize,
    /// Slots left empty
    pub empty_slot_count: usize,
    pub status_message: String,
}

impl VisualizationResult {
    /// Total number of slots in the grid
    pub fn total_slots(&self) -> usize {
        self.slots.len()
    }

    /// Iterate over the slots holding a signal
    pub fn used_slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|slot| slot.is_used)
    }
}

/// Errors that can occur while extracting rows or mapping them onto the grid
#[derive(Debug, thiserror::Error)]
pub enum HypertacError {
    #[error("Invalid grid dimensions: {rows}x{cols} (rows and cols must be at least 1 and the grid at most {max} slots)", max = crate::config::MAX_TOTAL_SLOTS)]
    InvalidGridDimensions { rows: usize, cols: usize },

    #[error("Hypertac slots initialization error: expected {expected} slots, found {actual}")]
    GridIntegrity { expected: usize, actual: usize },

    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("Input file is empty or has no headers")]
    EmptySource,

    #[error("Missing mandatory column: \"{0}\"")]
    MissingColumn(String),

    #[error("No valid signal data found in the input. Ensure required columns are present and data is not empty.")]
    NoValidRows,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HypertacError {
    /// True for problems with the caller's input (bad file, missing columns),
    /// false for internal failures
    pub fn is_client_error(&self) -> bool {
        match self {
            HypertacError::UnsupportedFormat(_)
            | HypertacError::EmptySource
            | HypertacError::MissingColumn(_)
            | HypertacError::NoValidRows => true,
            HypertacError::Csv(e) => !matches!(e.kind(), csv::ErrorKind::Io(_)),
            HypertacError::Workbook(e) => !matches!(e, calamine::Error::Io(_)),
            HypertacError::InvalidGridDimensions { .. }
            | HypertacError::GridIntegrity { .. }
            | HypertacError::Io(_) => false,
        }
    }

    /// Envelope status string: "fail" for client errors, "error" otherwise
    pub fn status(&self) -> &'static str {
        if self.is_client_error() {
            "fail"
        } else {
            "error"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physical_connector_id() {
        let row = SignalRow::new("CAN_H", "BCM").with_connector("HYP01", "A01");
        assert_eq!(row.physical_connector_id().as_deref(), Some("HYP01-A01"));

        let mut half = SignalRow::new("CAN_H", "BCM");
        half.connector_name = Some("HYP01".to_string());
        assert_eq!(half.physical_connector_id(), None);

        let blank = SignalRow::new("CAN_H", "BCM").with_connector("HYP01", "  ");
        assert_eq!(blank.physical_connector_id(), None);
    }

    #[test]
    fn test_empty_slot() {
        let slot = Slot::empty(3, 5);
        assert_eq!(slot.id, "R3C5");
        assert!(!slot.is_used);
        assert!(slot.signal_name.is_none());
        assert_eq!(format!("{}", slot), "R3C5 <empty>");
    }

    #[test]
    fn test_slot_serializes_camel_case() {
        let json = serde_json::to_value(Slot::empty(1, 1)).unwrap();
        assert_eq!(json["id"], "R1C1");
        assert_eq!(json["isUsed"], false);
        assert!(json["physicalConnectorId"].is_null());
        assert!(json["sourceRowIndex"].is_null());
    }

    #[test]
    fn test_error_classification() {
        assert!(HypertacError::MissingColumn("ECU Name".into()).is_client_error());
        assert_eq!(HypertacError::EmptySource.status(), "fail");

        let integrity = HypertacError::GridIntegrity { expected: 90, actual: 89 };
        assert!(!integrity.is_client_error());
        assert_eq!(integrity.status(), "error");

        let corrupt = HypertacError::Workbook(calamine::Error::Msg("not a zip archive"));
        assert_eq!(corrupt.status(), "fail");
        let unreadable = HypertacError::Workbook(calamine::Error::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        )));
        assert_eq!(unreadable.status(), "error");
    }

    #[test]
    fn test_error_display() {
        let err = HypertacError::MissingColumn("Signalname".to_string());
        assert_eq!(format!("{}", err), "Missing mandatory column: \"Signalname\"");

        let err = HypertacError::InvalidGridDimensions { rows: 0, cols: 5 };
        assert!(format!("{}", err).contains("0x5"));
    }
}
