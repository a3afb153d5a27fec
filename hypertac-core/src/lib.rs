//! Hypertac Slot Mapper Library
//!
//! Maps signal-to-ECU wiring rows from a spreadsheet onto the fixed slot grid
//! of a Hypertac connector block and reports which slots are occupied, by which
//! signal, and which signals occupy more than one slot.
//!
//! # Architecture
//!
//! - `extract`: reads the wiring sheet (workbook or CSV/TSV export) into [`SignalRow`]s
//! - `grid`: builds the empty row-major slot grid
//! - `assignment`: places rows into the next free slot, in input order
//! - `summary`: flags reused signals and computes the summary counts
//!
//! The mapping itself is a pure function of its inputs. Every call builds and
//! returns its own grid; nothing is shared between calls.
//!
//! # Example Usage
//!
//! ```no_run
//! use hypertac_core::{ExtractorConfig, GridConfig, Visualizer};
//! use std::path::Path;
//!
//! let visualizer = Visualizer::new()
//!     .with_grid(GridConfig::new().with_dimensions(18, 5))
//!     .with_extractor(ExtractorConfig::new().with_allow_empty(true));
//!
//! let (_rows, result) = visualizer.visualize_file(Path::new("wiring.csv")).unwrap();
//!
//! for slot in result.used_slots() {
//!     println!("{}", slot);
//! }
//! println!("{}", result.status_message);
//! ```

// Public modules
pub mod assignment;
pub mod config;
pub mod extract;
pub mod grid;
pub mod summary;
pub mod types;
pub mod visualizer;

// Re-export main types for convenience
pub use assignment::{assign_rows, AssignmentOutcome};
pub use config::{ColumnMapping, ExtractorConfig, GridConfig};
pub use extract::{
    extract_from_range, extract_from_reader, extract_rows, DelimitedExtractor, RowExtractor,
    WorkbookExtractor,
};
pub use grid::initialize_slots;
pub use summary::{summarize, Summary};
pub use types::{HypertacError, Result, SignalRow, Slot, VisualizationResult};
pub use visualizer::{compute_visualization, unique_connections, Visualizer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
