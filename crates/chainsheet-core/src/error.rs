//! Error types for sheet extraction
//!
//! Only structural failures are errors. A label that cannot be found, an empty
//! cell, or a layout that does not match degrades to `None`, an empty list, or
//! the `"none"` sentinel inside the extracted values instead.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for chainsheet operations
pub type Result<T> = std::result::Result<T, ChainsheetError>;

/// Fatal errors raised while building a grid or handling extraction results
#[derive(Error, Debug)]
pub enum ChainsheetError {
    /// Failed to read the input file from disk
    #[error("Failed to read {path}: {source}")]
    ReadError {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The spreadsheet decoder rejected the file
    #[error("Unreadable spreadsheet: {0}")]
    Workbook(String),

    /// The workbook contains no worksheet to scan
    #[error("Workbook has no worksheets: {}", .0.display())]
    EmptyWorkbook(PathBuf),

    /// The file extension does not map to a known grid source
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// Encoding or decoding a serialized result failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A template schema or configuration value is inconsistent
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ChainsheetError {
    /// Create a read error
    #[inline]
    #[must_use = "returns ChainsheetError for file read failures"]
    pub fn read_error<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a workbook decoding error with the offending path attached
    #[inline]
    #[must_use = "returns ChainsheetError for undecodable workbooks"]
    pub fn workbook<P: AsRef<Path>>(path: P, message: impl std::fmt::Display) -> Self {
        Self::Workbook(format!("{message}: {}", path.as_ref().display()))
    }
}
