//! Spreadsheet workbook extractor (xlsx, xlsm, xlsb, xls, ods)
//!
//! Reads the first worksheet only. The first non-empty row is the header;
//! every row below it is a data record, blank rows included.

use super::{RowExtractor, SheetRows};
use crate::config::ExtractorConfig;
use crate::types::{HypertacError, Result, SignalRow};
use calamine::{open_workbook, Data, Range, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Extractor for native spreadsheet files
pub struct WorkbookExtractor {
    config: ExtractorConfig,
}

impl WorkbookExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }
}

impl RowExtractor for WorkbookExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<SignalRow>> {
        log::info!("Reading signal rows from {:?}", path);
        // calamine nests I/O failures inside its format errors
        File::open(path)?;
        let mut workbook = open_sheets(path)?;

        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range?,
            None => {
                log::warn!("Workbook {:?} has no worksheet", path);
                return Err(HypertacError::EmptySource);
            }
        };

        let rows = extract_from_range(&range, &self.config)?;
        log::info!("Extracted {} signal rows from {:?}", rows.len(), path);
        Ok(rows)
    }
}

/// Open a workbook, picking the reader from the (case-insensitive) extension
fn open_sheets(path: &Path) -> std::result::Result<Sheets<BufReader<File>>, calamine::Error> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());

    let sheets = match extension.as_deref() {
        Some("xls") => Sheets::Xls(open_workbook(path)?),
        Some("xlsb") => Sheets::Xlsb(open_workbook(path)?),
        Some("ods") => Sheets::Ods(open_workbook(path)?),
        _ => Sheets::Xlsx(open_workbook(path)?),
    };
    Ok(sheets)
}

/// Extract signal rows from an already loaded worksheet range
pub fn extract_from_range(range: &Range<Data>, config: &ExtractorConfig) -> Result<Vec<SignalRow>> {
    let mut records = range.rows();
    let headers: Vec<String> = match records.next() {
        Some(header) => header.iter().map(Data::to_string).collect(),
        None => return Err(HypertacError::EmptySource),
    };

    let header_line = range.start().map_or(1, |(row, _)| row as usize + 1);
    let mut sheet = SheetRows::new(&headers, header_line, config)?;

    for (index, record) in records.enumerate() {
        let cells: Vec<String> = record.iter().map(Data::to_string).collect();
        sheet.push(index, &cells);
    }

    sheet.finish()
}
