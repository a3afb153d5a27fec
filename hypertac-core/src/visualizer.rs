//! Main mapper API
//!
//! [`compute_visualization`] is the pure entry point: rows in, populated grid
//! out. [`Visualizer`] bundles the grid and extractor configuration for callers
//! that start from a file.

use crate::assignment::assign_rows;
use crate::config::{ExtractorConfig, GridConfig};
use crate::extract::extract_rows;
use crate::grid::initialize_slots;
use crate::summary::{status_message, summarize};
use crate::types::{Result, SignalRow, Slot, VisualizationResult};
use std::collections::HashSet;
use std::path::Path;

/// Map signal rows onto a freshly built grid and summarize the result
///
/// Data problems (missing names, more rows than slots) never fail the call;
/// only an invalid grid configuration or a grid integrity violation does.
///
/// # Example
/// ```
/// use hypertac_core::{compute_visualization, GridConfig, SignalRow};
///
/// let rows = vec![
///     SignalRow::new("CAN_H", "BCM").with_connector("HYP01", "A01"),
///     SignalRow::new("CAN_H", "ECM"),
/// ];
/// let result = compute_visualization(&rows, &GridConfig::new()).unwrap();
///
/// assert_eq!(result.used_count, 2);
/// assert_eq!(result.empty_slot_count, 88);
/// assert!(result.slots[0].is_reused);
/// assert_eq!(result.slots[0].physical_connector_id.as_deref(), Some("HYP01-A01"));
/// ```
pub fn compute_visualization(rows: &[SignalRow], grid: &GridConfig) -> Result<VisualizationResult> {
    let mut slots = initialize_slots(grid)?;
    let outcome = assign_rows(&mut slots, rows, grid)?;
    let summary = summarize(&mut slots, rows, &outcome);

    log::info!(
        "Mapped {} rows: {} slots used, {} empty, {} signals unplaced",
        rows.len(),
        summary.used_count,
        summary.empty_slot_count,
        summary.unused_from_source_count
    );

    Ok(VisualizationResult {
        status_message: status_message(&summary, slots.len(), rows.len()),
        slots,
        used_count: summary.used_count,
        unused_from_source_count: summary.unused_from_source_count,
        empty_slot_count: summary.empty_slot_count,
    })
}

/// Unique signal-to-ECU connection strings for the used slots, in slot order
///
/// Format: `"{signal} -> {ecu}"`, then `" (Pin: {pin})"` and
/// `" [Hypertac: {id}]"` when present.
pub fn unique_connections(slots: &[Slot]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut connections = Vec::new();

    for slot in slots.iter().filter(|s| s.is_used) {
        let mut line = format!(
            "{} -> {}",
            slot.signal_name.as_deref().unwrap_or_default(),
            slot.ecu_name.as_deref().unwrap_or_default()
        );
        if let Some(pin) = &slot.ecu_pin {
            line.push_str(&format!(" (Pin: {})", pin));
        }
        if let Some(id) = &slot.physical_connector_id {
            line.push_str(&format!(" [Hypertac: {}]", id));
        }
        if seen.insert(line.clone()) {
            connections.push(line);
        }
    }

    connections
}

/// Convenience front end holding the mapper configuration
///
/// Holds no grid state; every call builds its own grid, so one instance can
/// serve several inputs, including from multiple threads.
#[derive(Debug, Clone, Default)]
pub struct Visualizer {
    grid: GridConfig,
    extractor: ExtractorConfig,
}

impl Visualizer {
    /// Create a visualizer for the default 18x5 grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the grid configuration
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    /// Builder method: set the extractor configuration
    pub fn with_extractor(mut self, extractor: ExtractorConfig) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    /// Map already extracted rows
    pub fn visualize(&self, rows: &[SignalRow]) -> Result<VisualizationResult> {
        compute_visualization(rows, &self.grid)
    }

    /// Extract rows from a spreadsheet export, then map them
    pub fn visualize_file(&self, path: &Path) -> Result<(Vec<SignalRow>, VisualizationResult)> {
        let rows = extract_rows(path, &self.extractor)?;
        let result = self.visualize(&rows)?;
        Ok((rows, result))
    }
}
