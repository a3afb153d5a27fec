//! Assignment engine
//!
//! Places signal rows onto the grid in input order. Each valid row takes the
//! next free slot found by a forward-only cursor; rows that are invalid or that
//! arrive after the grid is full are skipped with a warning, never an error.

use crate::config::GridConfig;
use crate::types::{non_blank, HypertacError, Result, SignalRow, Slot};
use std::collections::{HashMap, HashSet};

/// Bookkeeping produced by one assignment pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentOutcome {
    /// Signal name -> number of slots it occupies
    pub usage: HashMap<String, usize>,
    /// Signal names that landed on at least one slot
    pub assigned: HashSet<String>,
    /// Rows skipped for a missing signal or ECU name
    pub skipped_invalid: usize,
    /// Valid rows dropped because the grid was full
    pub dropped_overflow: usize,
}

impl AssignmentOutcome {
    /// Number of slots holding `signal_name`
    pub fn usage_of(&self, signal_name: &str) -> usize {
        self.usage.get(signal_name).copied().unwrap_or(0)
    }
}

/// Assign rows to free slots in input order
///
/// Fails only if `slots` does not hold exactly `grid.total_slots()` entries.
pub fn assign_rows(
    slots: &mut [Slot],
    rows: &[SignalRow],
    grid: &GridConfig,
) -> Result<AssignmentOutcome> {
    let total_slots = grid.total_slots();
    if slots.len() != total_slots {
        return Err(HypertacError::GridIntegrity {
            expected: total_slots,
            actual: slots.len(),
        });
    }

    let mut outcome = AssignmentOutcome::default();
    let mut cursor = 0usize;

    for (position, row) in rows.iter().enumerate() {
        let source_index = row.source_index.unwrap_or(position);

        let (signal_name, ecu_name) = match (
            non_blank(Some(row.signal_name.as_str())),
            non_blank(Some(row.ecu_name.as_str())),
        ) {
            (Some(signal), Some(ecu)) => (signal, ecu),
            _ => {
                log::warn!(
                    "Skipping row {} due to missing Signalname or ECU Name",
                    source_index
                );
                outcome.skipped_invalid += 1;
                continue;
            }
        };

        // Advance to the next free slot; the cursor never rewinds
        while cursor < total_slots && slots[cursor].is_used {
            cursor += 1;
        }
        let Some(slot) = slots.get_mut(cursor) else {
            log::warn!(
                "No available conceptual Hypertac slot found for signal \"{}\" (row {}). Skipping.",
                signal_name,
                source_index
            );
            outcome.dropped_overflow += 1;
            continue;
        };

        slot.is_used = true;
        slot.signal_name = Some(signal_name.to_string());
        slot.ecu_name = Some(ecu_name.to_string());
        slot.ecu_pin = non_blank(row.ecu_pin.as_deref()).map(str::to_string);
        slot.physical_connector_id = row.physical_connector_id();
        slot.source_row_index = Some(source_index);
        log::debug!("Assigned signal {} -> {}", signal_name, slot.id);

        *outcome.usage.entry(signal_name.to_string()).or_insert(0) += 1;
        outcome.assigned.insert(signal_name.to_string());
    }

    if outcome.skipped_invalid > 0 || outcome.dropped_overflow > 0 {
        log::info!(
            "Assignment finished: {} invalid rows skipped, {} rows dropped on overflow",
            outcome.skipped_invalid,
            outcome.dropped_overflow
        );
    }

    Ok(outcome)
}
