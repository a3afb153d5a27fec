//! Plain-text report: grid drawing, summary and connection list

use anyhow::Result;
use chrono::Utc;
use hypertac_core::{unique_connections, Slot, VisualizationResult};
use std::fmt::{self, Write};
use std::path::Path;

const RULE: &str = "═══════════════════════════════════════════════";

pub fn render(input: &Path, outcome: &Result<VisualizationResult>) -> Result<String> {
    let mut out = String::new();
    write_report(&mut out, input, outcome)?;
    Ok(out)
}

fn write_report(
    out: &mut String,
    input: &Path,
    outcome: &Result<VisualizationResult>,
) -> fmt::Result {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "  Hypertac Slot Map: {}", input.display())?;
    writeln!(out, "  Generated: {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(out, "{}\n", RULE)?;

    match outcome {
        Ok(result) => write_result(out, result),
        Err(error) => writeln!(out, "✗ {:#}", error),
    }
}

fn write_result(out: &mut String, result: &VisualizationResult) -> fmt::Result {
    write_grid(out, &result.slots)?;

    writeln!(out, "\n📊 Summary:")?;
    writeln!(out, "  Slots used:            {}", result.used_count)?;
    writeln!(out, "  Slots empty:           {}", result.empty_slot_count)?;
    writeln!(out, "  Signals not placed:    {}", result.unused_from_source_count)?;
    let reused = result.used_slots().filter(|s| s.is_reused).count();
    writeln!(out, "  Slots with reused signal: {}", reused)?;

    let connections = unique_connections(&result.slots);
    if !connections.is_empty() {
        writeln!(out, "\n🔌 Connections:")?;
        for connection in connections {
            writeln!(out, "  {}", connection)?;
        }
    }

    writeln!(out, "\n{}", result.status_message)
}

/// Cell label: signal name, `*` suffix when reused, `-` when empty
fn cell_label(slot: &Slot) -> String {
    match (&slot.signal_name, slot.is_used) {
        (Some(name), true) if slot.is_reused => format!("{}*", name),
        (Some(name), true) => name.clone(),
        _ => "-".to_string(),
    }
}

fn write_grid(out: &mut String, slots: &[Slot]) -> fmt::Result {
    let cols = slots.iter().map(|s| s.col).max().unwrap_or(0);
    if cols == 0 {
        return Ok(());
    }

    let width = slots
        .iter()
        .map(|s| cell_label(s).chars().count())
        .max()
        .unwrap_or(1)
        .max(3);

    write!(out, "{:>5} ", "")?;
    for col in 1..=cols {
        write!(out, "| {:<width$} ", format!("C{}", col), width = width)?;
    }
    writeln!(out, "|")?;

    for row in slots.chunks(cols) {
        write!(out, "{:>5} ", format!("R{}", row[0].row))?;
        for slot in row {
            write!(out, "| {:<width$} ", cell_label(slot), width = width)?;
        }
        writeln!(out, "|")?;
    }

    writeln!(out, "\n  (* = signal occupies more than one slot, - = empty)")
}
