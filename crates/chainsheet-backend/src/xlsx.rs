//! Workbook backend using calamine
//!
//! Decodes the first worksheet of an Excel or `OpenDocument` workbook into a
//! [`Grid`]. Templates are scanned by absolute position, so the used range is
//! placed at its real offset from A1 and the rows and columns before it are
//! left empty.
//!
//! Value mapping:
//!
//! | calamine          | Cell                                  |
//! |-------------------|---------------------------------------|
//! | `Int`, `Float`    | `Number`                              |
//! | `String`          | `Text`                                |
//! | `DateTime`        | `Date` (text when out of range)       |
//! | `DateTimeIso`     | `Date` when parseable, else `Text`    |
//! | `DurationIso`     | `Text`                                |
//! | `Bool`            | `Text` (`true` / `false`)             |
//! | `Error`           | `Text` of the error code, e.g. `#N/A` |
//! | `Empty`           | `Empty`                               |

use crate::format::InputFormat;
use crate::traits::GridSource;
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use chainsheet_core::{Cell, ChainsheetError, Grid, GridBuilder, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Workbook grid source (.xlsx, .xlsm, .xls, .xlsb, .ods)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct XlsxBackend;

impl XlsxBackend {
    /// Create a new workbook backend instance
    #[inline]
    #[must_use = "creates a backend instance that should be used for loading"]
    pub const fn new() -> Self {
        Self
    }

    /// Read the first worksheet of an open workbook
    fn first_sheet<RS: Read + Seek>(workbook: &mut Sheets<RS>, origin: &Path) -> Result<Grid> {
        if let Some(name) = workbook.sheet_names().first() {
            log::debug!("reading worksheet {name:?} of {}", origin.display());
        }
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ChainsheetError::EmptyWorkbook(origin.to_path_buf()))?
            .map_err(|e| ChainsheetError::workbook(origin, format!("Failed to read worksheet: {e}")))?;
        Ok(range_to_grid(&range))
    }
}

impl GridSource for XlsxBackend {
    #[inline]
    fn format(&self) -> InputFormat {
        InputFormat::Xlsx
    }

    fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<Grid> {
        let path = path.as_ref();
        std::fs::metadata(path).map_err(|e| ChainsheetError::read_error(path, e))?;

        let mut workbook = open_workbook_auto(path)
            .map_err(|e| ChainsheetError::workbook(path, format!("Failed to open workbook: {e}")))?;
        Self::first_sheet(&mut workbook, path)
    }

    fn load_bytes(&self, data: &[u8]) -> Result<Grid> {
        let origin = Path::new("<bytes>");
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(data.to_vec()))
            .map_err(|e| ChainsheetError::workbook(origin, format!("Failed to open workbook: {e}")))?;
        Self::first_sheet(&mut workbook, origin)
    }

    fn can_handle(&self, format: InputFormat) -> bool {
        format.is_workbook()
    }
}

/// Place a calamine range into a grid at its absolute position
fn range_to_grid(range: &Range<Data>) -> Grid {
    let Some((row0, col0)) = range.start() else {
        return Grid::default();
    };
    let (row0, col0) = (row0 as usize, col0 as usize);
    let (height, width) = range.get_size();

    let mut builder = GridBuilder::with_size(row0 + height, col0 + width);
    for (row, col, data) in range.used_cells() {
        builder.set(row0 + row, col0 + col, data_to_cell(data));
    }
    log::trace!(
        "worksheet range starts at ({row0}, {col0}), size {height}x{width}"
    );
    builder.build()
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(i) => Cell::from(*i),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map_or_else(|| Cell::Text(dt.to_string()), Cell::Date),
        Data::DateTimeIso(s) => {
            parse_iso_datetime(s).map_or_else(|| Cell::Text(s.clone()), Cell::Date)
        }
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}

/// Parse an ISO 8601 date or date-time as written by `OpenDocument` files
fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    s.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| s.parse::<NaiveDate>().ok().and_then(|d| d.and_hms_opt(0, 0, 0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{CellErrorType, ExcelDateTime, ExcelDateTimeType};

    #[test]
    fn test_xlsx_backend_format() {
        let backend = XlsxBackend::new();
        assert_eq!(backend.format(), InputFormat::Xlsx);
        assert!(backend.can_handle(InputFormat::Ods));
        assert!(backend.can_handle(InputFormat::Xls));
        assert!(!backend.can_handle(InputFormat::Csv));
    }

    #[test]
    fn test_range_keeps_absolute_positions() {
        let mut range: Range<Data> = Range::new((2, 1), (3, 2));
        range.set_value((2, 1), Data::String("Vendor Number".to_string()));
        range.set_value((2, 2), Data::Int(1001));
        range.set_value((3, 2), Data::Float(0.5));

        let grid = range_to_grid(&range);
        assert_eq!(grid.row_count(), 4);
        assert_eq!(grid.col_count(), 3);
        assert!(grid.get(0, 0).is_empty());
        assert_eq!(grid.get(2, 1).as_text(), Some("Vendor Number"));
        assert_eq!(grid.get(2, 2), &Cell::Number(1001.0));
        assert_eq!(grid.get(3, 2), &Cell::Number(0.5));
        assert!(grid.get(3, 1).is_empty());
    }

    #[test]
    fn test_empty_range() {
        let range: Range<Data> = Range::empty();
        assert!(range_to_grid(&range).is_empty());
    }

    #[test]
    fn test_value_mapping() {
        assert_eq!(data_to_cell(&Data::Empty), Cell::Empty);
        assert_eq!(data_to_cell(&Data::Bool(true)), Cell::Text("true".into()));
        assert_eq!(
            data_to_cell(&Data::Error(CellErrorType::NA)),
            Cell::Text("#N/A".into())
        );
        assert_eq!(
            data_to_cell(&Data::DurationIso("PT1H".into())),
            Cell::Text("PT1H".into())
        );
    }

    #[test]
    fn test_numeric_values() {
        assert_eq!(data_to_cell(&Data::Int(42)), Cell::Number(42.0));
        assert_eq!(data_to_cell(&Data::Int(-7)), Cell::Number(-7.0));
        assert_eq!(data_to_cell(&Data::Float(0.95)), Cell::Number(0.95));
        assert_eq!(data_to_cell(&Data::Float(1200.0)), Cell::Number(1200.0));
    }

    #[test]
    fn test_native_dates() {
        let serial = ExcelDateTime::new(45000.0, ExcelDateTimeType::DateTime, false);
        let expected = NaiveDate::from_ymd_opt(2023, 3, 15).unwrap();
        assert_eq!(data_to_cell(&Data::DateTime(serial)), Cell::from(expected));

        let afternoon = ExcelDateTime::new(45000.5, ExcelDateTimeType::DateTime, false);
        assert_eq!(
            data_to_cell(&Data::DateTime(afternoon)).as_date(),
            expected.and_hms_opt(12, 0, 0).as_ref()
        );
    }

    #[test]
    fn test_native_date_in_range_resolves_as_iso() {
        let mut range: Range<Data> = Range::new((0, 0), (0, 1));
        range.set_value((0, 0), Data::String("Ship Date:".to_string()));
        range.set_value(
            (0, 1),
            Data::DateTime(ExcelDateTime::new(45000.0, ExcelDateTimeType::DateTime, false)),
        );

        let grid = range_to_grid(&range);
        let header = chainsheet_core::extract_header(&grid);
        assert_eq!(
            header.ship_date,
            Some(chainsheet_core::HeaderValue::Text("2023-03-15".into()))
        );
    }

    #[test]
    fn test_iso_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            data_to_cell(&Data::DateTimeIso("2024-03-01".into())),
            Cell::from(expected)
        );
        assert_eq!(
            data_to_cell(&Data::DateTimeIso("2024-03-01T08:30:00".into())).as_date(),
            expected.and_hms_opt(8, 30, 0).as_ref()
        );
        assert_eq!(
            data_to_cell(&Data::DateTimeIso("March 1st".into())),
            Cell::Text("March 1st".into())
        );
    }

    #[test]
    fn test_load_bytes_rejects_garbage() {
        let err = XlsxBackend::new().load_bytes(b"not a workbook").unwrap_err();
        assert!(matches!(err, ChainsheetError::Workbook(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = XlsxBackend::new()
            .load_file("/nonexistent/dir/map.xlsx")
            .unwrap_err();
        assert!(matches!(err, ChainsheetError::ReadError { .. }));
    }
}
