//! Per-file processing: extract, map, post-check
//!
//! Each input gets its own grid. Several inputs are processed in parallel on
//! the rayon pool; results come back in input order.

use anyhow::{Context, Result};
use hypertac_core::{HypertacError, SignalRow, VisualizationResult, Visualizer};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Failures raised by the pipeline's own checks (not by the mapper)
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("No signals could be successfully mapped to Hypertac slots from the provided data. Please check the input format and data.")]
    NoSignalsMapped,
}

impl PipelineError {
    /// Envelope status string; every pipeline check is a client failure
    pub fn status(&self) -> &'static str {
        "fail"
    }
}

/// Mapper plus the checks applied around it
#[derive(Debug, Clone)]
pub struct Pipeline {
    visualizer: Visualizer,
}

/// Outcome for one input file
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub result: Result<VisualizationResult>,
}

impl Pipeline {
    pub fn new(visualizer: Visualizer) -> Self {
        Self { visualizer }
    }

    /// Extract and map a single file
    pub fn process_file(&self, path: &Path) -> Result<VisualizationResult> {
        log::info!("Processing {:?}", path);
        let (rows, result) = self
            .visualizer
            .visualize_file(path)
            .with_context(|| format!("Failed to process {:?}", path))?;

        check_mapped(&rows, &result)?;
        Ok(result)
    }

    /// Process every input in parallel, keeping input order
    pub fn process_all(&self, inputs: &[PathBuf]) -> Vec<FileOutcome> {
        inputs
            .par_iter()
            .map(|input| FileOutcome {
                input: input.clone(),
                result: self.process_file(input),
            })
            .collect()
    }
}

/// Reject a run where rows were supplied but none reached a slot
///
/// Rows from the extractor always carry a signal and an ECU name, and a valid
/// grid has at least one slot, so for file inputs this never trips. It guards
/// callers that hand [`Visualizer::visualize`] rows of their own.
pub fn check_mapped(
    rows: &[SignalRow],
    result: &VisualizationResult,
) -> std::result::Result<(), PipelineError> {
    if !rows.is_empty() && result.used_count == 0 {
        log::warn!("{} rows supplied but no slot was used", rows.len());
        return Err(PipelineError::NoSignalsMapped);
    }
    Ok(())
}

/// Envelope status for a failed input: "fail" for bad input, "error" otherwise
///
/// Takes the status of the first mapper or pipeline error in the chain;
/// anything else (config, report I/O) is an internal error.
pub fn error_status(error: &anyhow::Error) -> &'static str {
    error
        .chain()
        .find_map(|cause| {
            cause
                .downcast_ref::<HypertacError>()
                .map(HypertacError::status)
                .or_else(|| cause.downcast_ref::<PipelineError>().map(PipelineError::status))
        })
        .unwrap_or("error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use hypertac_core::{compute_visualization, ExtractorConfig, GridConfig};
    use std::fs;

    #[test]
    fn test_check_mapped() {
        let grid = GridConfig::new().with_dimensions(1, 1);
        let rows = vec![SignalRow::new("A", "E1")];
        let result = compute_visualization(&rows, &grid).unwrap();
        assert!(check_mapped(&rows, &result).is_ok());

        // rows present, nothing placed
        let invalid = vec![SignalRow::new("A", " ")];
        let result = compute_visualization(&invalid, &grid).unwrap();
        assert!(matches!(
            check_mapped(&invalid, &result),
            Err(PipelineError::NoSignalsMapped)
        ));

        // no rows at all is fine
        let result = compute_visualization(&[], &grid).unwrap();
        assert!(check_mapped(&[], &result).is_ok());
    }

    #[test]
    fn test_process_all_keeps_order_and_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.csv");
        let bad = dir.path().join("bad.csv");
        let other = dir.path().join("other.csv");
        fs::write(&good, "Signalname,ECU Name\nA,E1\nB,E2\n").unwrap();
        fs::write(&bad, "Signalname\nA\n").unwrap();
        fs::write(&other, "Signalname,ECU Name\nC,E3\n").unwrap();

        let pipeline = Pipeline::new(Visualizer::new());
        let outcomes = pipeline.process_all(&[good.clone(), bad.clone(), other.clone()]);

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].input, good);
        assert_eq!(outcomes[0].result.as_ref().unwrap().used_count, 2);
        assert!(outcomes[1].result.is_err());
        assert_eq!(error_status(outcomes[1].result.as_ref().unwrap_err()), "fail");

        // each file got its own grid
        let third = outcomes[2].result.as_ref().unwrap();
        assert_eq!(third.slots[0].signal_name.as_deref(), Some("C"));
        assert_eq!(third.used_count, 1);
    }

    #[test]
    fn test_io_failure_is_not_client_error() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(Visualizer::new().with_extractor(ExtractorConfig::new()));

        let err = pipeline
            .process_file(&dir.path().join("missing.csv"))
            .unwrap_err();
        assert_eq!(error_status(&err), "error");
    }

    #[test]
    fn test_error_status_follows_mapper_classification() {
        let wrapped = anyhow::Error::from(HypertacError::EmptySource).context("Failed to process");
        assert_eq!(error_status(&wrapped), HypertacError::EmptySource.status());

        let internal = anyhow::Error::from(HypertacError::InvalidGridDimensions { rows: 0, cols: 1 });
        assert_eq!(error_status(&internal), "error");

        let unmapped = anyhow::Error::from(PipelineError::NoSignalsMapped);
        assert_eq!(error_status(&unmapped), "fail");

        assert_eq!(error_status(&anyhow::anyhow!("disk full")), "error");
    }

    #[test]
    fn test_allow_empty_sheet_is_not_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("headers.csv");
        fs::write(&input, "Signalname,ECU Name\n,BCM\n").unwrap();

        let pipeline = Pipeline::new(
            Visualizer::new().with_extractor(ExtractorConfig::new().with_allow_empty(true)),
        );
        let result = pipeline.process_file(&input).unwrap();
        assert_eq!(result.used_count, 0);
        assert_eq!(result.empty_slot_count, 90);
    }
}
