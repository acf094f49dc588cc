//! Delimited text backend
//!
//! Reads `.csv` / `.tsv` exports of a template into a [`Grid`]. There is no
//! header row: row 0 of the file is row 0 of the grid. The delimiter is
//! sniffed from the first non-blank line.

use crate::format::InputFormat;
use crate::traits::{read_file, GridSource};
use chainsheet_core::{Cell, ChainsheetError, Grid, Result};
use std::path::Path;

const DELIMITERS: [char; 4] = [',', ';', '\t', '|'];
const UTF8_BOM: &str = "\u{feff}";

/// Delimited text grid source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CsvBackend;

impl CsvBackend {
    /// Create a new CSV backend instance
    #[inline]
    #[must_use = "creates a backend instance that should be used for loading"]
    pub const fn new() -> Self {
        Self
    }

    /// Pick the candidate delimiter occurring most often on the first
    /// non-blank line; ties and lines without any candidate fall back to `,`
    #[inline]
    fn detect_delimiter(content: &str) -> char {
        let first_line = content
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or_default();

        let mut best_delimiter = ',';
        let mut max_count = 0;
        for delim in DELIMITERS {
            let count = first_line.matches(delim).count();
            if count > max_count {
                max_count = count;
                best_delimiter = delim;
            }
        }
        best_delimiter
    }

    fn read_rows(content: &str, delimiter: char) -> Result<Vec<Vec<Cell>>> {
        let content = keep_blank_lines(content, delimiter);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter as u8)
            .flexible(true)
            .has_headers(false)
            .from_reader(content.as_bytes());

        reader
            .records()
            .map(|result| {
                result
                    .map(|record| record.iter().map(field_to_cell).collect())
                    .map_err(|e| ChainsheetError::Workbook(format!("Failed to read CSV record: {e}")))
            })
            .collect()
    }
}

/// The csv reader skips blank lines, which would shift every row below them.
/// A blank line outside a quoted field gets a lone delimiter so it reads back
/// as an empty row.
fn keep_blank_lines(content: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(content.len());
    let mut in_quotes = false;
    for line in content.split_inclusive('\n') {
        if !in_quotes && line.trim_end_matches(['\n', '\r']).is_empty() {
            out.push(delimiter);
        }
        out.push_str(line);
        if line.matches('"').count() % 2 == 1 {
            in_quotes = !in_quotes;
        }
    }
    out
}

impl GridSource for CsvBackend {
    #[inline]
    fn format(&self) -> InputFormat {
        InputFormat::Csv
    }

    fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<Grid> {
        let path = path.as_ref();
        let data = read_file(path)?;
        self.load_bytes(&data).map_err(|err| match err {
            ChainsheetError::Workbook(msg) => ChainsheetError::workbook(path, msg),
            other => other,
        })
    }

    fn load_bytes(&self, data: &[u8]) -> Result<Grid> {
        let content = std::str::from_utf8(data).map_err(|e| {
            ChainsheetError::Workbook(format!("CSV content must be valid UTF-8: {e}"))
        })?;
        let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);

        let delimiter = Self::detect_delimiter(content);
        log::debug!("reading CSV with delimiter {delimiter:?}");
        Ok(Grid::new(Self::read_rows(content, delimiter)?))
    }
}

/// Blank fields are empty, finite numbers are numeric, anything else is text
fn field_to_cell(field: &str) -> Cell {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Cell::Empty;
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Cell::Number(n),
        _ => Cell::Text(field.to_string()),
    }
}
