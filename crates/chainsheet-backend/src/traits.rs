//! Core trait definitions for grid sources

use crate::format::InputFormat;
use chainsheet_core::{ChainsheetError, Grid, Result};
use std::path::Path;

/// A decoder that turns one input file into a [`Grid`]
pub trait GridSource: Send + Sync {
    /// Get the primary format this source handles
    fn format(&self) -> InputFormat;

    /// Load the first sheet of a file as a grid
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or decoded.
    fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<Grid>;

    /// Load a grid from in-memory bytes
    ///
    /// # Errors
    /// Returns an error if the bytes cannot be decoded.
    fn load_bytes(&self, data: &[u8]) -> Result<Grid>;

    /// Check if this source can handle the given format
    fn can_handle(&self, format: InputFormat) -> bool {
        self.format() == format
    }
}

/// Read a whole file, attaching the path to I/O failures
pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| ChainsheetError::read_error(path, e))
}
