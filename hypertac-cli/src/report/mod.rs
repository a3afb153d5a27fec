//! Report generation
//!
//! Renders a mapping outcome as a JSON envelope or as a plain-text grid.

pub mod json;
pub mod txt;

use crate::config::OutputFormat;
use anyhow::Result;
use hypertac_core::VisualizationResult;
use std::path::Path;

/// Render one input's outcome in the requested format
pub fn render(
    format: OutputFormat,
    input: &Path,
    outcome: &Result<VisualizationResult>,
) -> Result<String> {
    match format {
        OutputFormat::Json => json::render(outcome),
        OutputFormat::Txt => txt::render(input, outcome),
    }
}
