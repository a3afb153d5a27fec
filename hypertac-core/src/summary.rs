//! Summary calculation over a populated grid

use crate::assignment::AssignmentOutcome;
use crate::types::{non_blank, SignalRow, Slot};
use std::collections::HashSet;

/// Aggregate counts for a populated grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub used_count: usize,
    pub empty_slot_count: usize,
    pub unused_from_source_count: usize,
}

/// Flag reused signals and count used, empty and unplaced entries
///
/// `is_reused` is set on every used slot whose signal occupies more than one
/// slot. The unplaced count is over distinct signal names seen in `rows`.
pub fn summarize(slots: &mut [Slot], rows: &[SignalRow], outcome: &AssignmentOutcome) -> Summary {
    let mut used_count = 0;
    for slot in slots.iter_mut() {
        match (slot.is_used, slot.signal_name.as_deref()) {
            (true, Some(signal)) => {
                slot.is_reused = outcome.usage_of(signal) > 1;
                used_count += 1;
            }
            _ => slot.is_reused = false,
        }
    }

    let unused_from_source_count = rows
        .iter()
        .filter_map(|row| non_blank(Some(row.signal_name.as_str())))
        .filter(|signal| !outcome.assigned.contains(*signal))
        .collect::<HashSet<_>>()
        .len();

    Summary {
        used_count,
        empty_slot_count: slots.len() - used_count,
        unused_from_source_count,
    }
}

/// Human-readable status line for a finished run
pub fn status_message(summary: &Summary, total_slots: usize, row_count: usize) -> String {
    if row_count == 0 {
        "Hypertac simulation complete: no signals to map.".to_string()
    } else {
        format!(
            "Hypertac simulation complete: {} of {} slots used.",
            summary.used_count, total_slots
        )
    }
}
