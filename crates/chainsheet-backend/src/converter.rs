//! File-level entry points: pick a grid source by extension, load, parse

use crate::csv::CsvBackend;
use crate::format::InputFormat;
use crate::traits::GridSource;
use crate::xlsx::XlsxBackend;
use chainsheet_core::{parse_grid_with, Grid, ParsedSheet, Result, TemplateSchema};
use std::path::Path;

/// Load the first sheet of a file as a grid, choosing the decoder from the
/// file extension
///
/// # Errors
///
/// Returns [`UnsupportedFormat`](chainsheet_core::ChainsheetError::UnsupportedFormat)
/// for unknown extensions, and read or decode errors from the chosen source.
pub fn load_grid<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let path = path.as_ref();
    let format = InputFormat::from_path(path)?;
    log::info!("loading {} as {format}", path.display());

    let grid = if XlsxBackend.can_handle(format) {
        XlsxBackend::new().load_file(path)?
    } else {
        CsvBackend::new().load_file(path)?
    };
    log::debug!(
        "{}: {}x{} grid",
        path.display(),
        grid.row_count(),
        grid.col_count()
    );
    Ok(grid)
}

/// Load a file and run every extractor over it.
///
/// This is the only step that can fail: once a grid is loaded, missing
/// sections degrade to empty results.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded as a grid.
pub fn parse_file<P: AsRef<Path>>(path: P, schema: &TemplateSchema) -> Result<ParsedSheet> {
    let grid = load_grid(path)?;
    Ok(parse_grid_with(&grid, schema))
}
