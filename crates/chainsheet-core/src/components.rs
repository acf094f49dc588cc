//! Material component breakdown
//!
//! Two layout families are recognised and tried in order; the first that
//! yields at least one component wins and the other is never consulted.
//!
//! - **Vertical**: a `Component Breakdown` label heads four adjacent columns
//!   (name, percent, origin, remarks). Rows are read until the name is blank.
//! - **Horizontal**: a cell containing `Major Fabric Breakdown` heads the name
//!   column, and companion labels further right on the same row locate the
//!   percent, origin and remarks columns. Rows are read while the name is
//!   non-blank text.

use crate::classify::normalize_percent;
use crate::grid::Grid;
use serde::{Deserialize, Serialize};

const VERTICAL_LABEL: &str = "Component Breakdown";
const HORIZONTAL_MARKER: &str = "Major Fabric Breakdown";

/// One material component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Component name
    pub name: String,
    /// Share on the 0–100 scale
    pub percent: Option<f64>,
    /// Country or region of origin
    pub origin: Option<String>,
    /// Free-text remarks
    pub remarks: Option<String>,
}

impl Component {
    fn from_row(grid: &Grid, row: usize, columns: &ColumnMap) -> Self {
        // unmapped columns read as an out-of-bounds (empty) cell
        let cell = |col: Option<usize>| grid.get(row, col.unwrap_or(usize::MAX));
        Self {
            name: grid
                .get(row, columns.name)
                .display_text()
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
            percent: normalize_percent(cell(columns.percent)),
            origin: cell(columns.origin).display_clean(),
            remarks: cell(columns.remarks).display_clean(),
        }
    }
}

/// Column positions of one breakdown table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    name: usize,
    percent: Option<usize>,
    origin: Option<usize>,
    remarks: Option<usize>,
}

/// Locate and read the component breakdown, vertical layout first
#[must_use]
pub fn extract_components(grid: &Grid) -> Vec<Component> {
    let vertical = extract_vertical(grid);
    if !vertical.is_empty() {
        log::debug!("component breakdown: vertical layout, {} rows", vertical.len());
        return vertical;
    }
    let horizontal = extract_horizontal(grid);
    if horizontal.is_empty() {
        log::debug!("component breakdown: no layout matched");
    } else {
        log::debug!(
            "component breakdown: horizontal layout, {} rows",
            horizontal.len()
        );
    }
    horizontal
}

fn extract_vertical(grid: &Grid) -> Vec<Component> {
    for row in 0..grid.row_count() {
        let Some(col) = grid.find_label_in_row(row, VERTICAL_LABEL) else {
            continue;
        };
        let columns = ColumnMap {
            name: col,
            percent: Some(col + 1),
            origin: Some(col + 2),
            remarks: Some(col + 3),
        };
        let components: Vec<Component> = (row + 1..grid.row_count())
            .take_while(|&r| !grid.get(r, col).is_blank())
            .map(|r| Component::from_row(grid, r, &columns))
            .collect();
        if !components.is_empty() {
            return components;
        }
        log::trace!("{VERTICAL_LABEL:?} at ({row}, {col}) has no rows beneath it");
    }
    Vec::new()
}

fn extract_horizontal(grid: &Grid) -> Vec<Component> {
    let header = (0..grid.row_count()).find_map(|row| {
        grid.find_in_row(row, |cell| {
            cell.as_text()
                .is_some_and(|s| s.contains(HORIZONTAL_MARKER))
        })
        .map(|col| (row, col))
    });
    let Some((header_row, name_col)) = header else {
        return Vec::new();
    };

    let columns = map_companion_columns(grid, header_row, name_col);
    if columns.percent.is_none() {
        log::warn!("{HORIZONTAL_MARKER:?} header at row {header_row} has no percent column");
    }

    (header_row + 1..grid.row_count())
        .take_while(|&r| grid.get(r, name_col).clean_text().is_some())
        .map(|r| Component::from_row(grid, r, &columns))
        .collect()
}

/// Scan the header row right of the name column for companion labels.
/// A later label of the same kind replaces an earlier one.
fn map_companion_columns(grid: &Grid, row: usize, name_col: usize) -> ColumnMap {
    let mut columns = ColumnMap {
        name: name_col,
        percent: None,
        origin: None,
        remarks: None,
    };
    for col in name_col + 1..grid.col_count() {
        let Some(label) = grid.get(row, col).as_text() else {
            continue;
        };
        let label = label.trim().to_lowercase();
        if label.ends_with('%') {
            columns.percent = Some(col);
        } else if label.starts_with("origin") {
            columns.origin = Some(col);
        } else if label.starts_with("remarks") {
            columns.remarks = Some(col);
        }
    }
    columns
}
