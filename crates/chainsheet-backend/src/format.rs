//! Input format detection

use chainsheet_core::{ChainsheetError, Result};
use std::path::Path;

/// File formats a grid can be loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputFormat {
    /// Excel 2007+ workbook (.xlsx, .xlsm)
    Xlsx,
    /// Excel 97-2003 workbook (.xls)
    Xls,
    /// Excel binary workbook (.xlsb)
    Xlsb,
    /// `OpenDocument` spreadsheet (.ods)
    Ods,
    /// Delimited text (.csv, .tsv)
    Csv,
}

impl InputFormat {
    /// Detect format from a file extension, case-insensitively
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "xlsx" | "xlsm" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            "xlsb" => Some(Self::Xlsb),
            "ods" => Some(Self::Ods),
            "csv" | "tsv" => Some(Self::Csv),
            _ => None,
        }
    }

    /// Detect format from a path's extension
    ///
    /// # Errors
    ///
    /// Returns [`ChainsheetError::UnsupportedFormat`] when the path has no
    /// extension or an unknown one.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| ChainsheetError::UnsupportedFormat(path.display().to_string()))
    }

    /// True for formats decoded as workbooks rather than delimited text
    #[inline]
    #[must_use]
    pub const fn is_workbook(self) -> bool {
        !matches!(self, Self::Csv)
    }
}

impl std::fmt::Display for InputFormat {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Xlsx => "XLSX",
            Self::Xls => "XLS",
            Self::Xlsb => "XLSB",
            Self::Ods => "ODS",
            Self::Csv => "CSV",
        };
        f.write_str(s)
    }
}
