//! Upload records: the hand-off to persistence and presentation
//!
//! A record pairs an uploaded file with the outcome of parsing it. Each of the
//! four extracted values is stored as its own JSON text blob, so storage can
//! keep them in plain text columns and a viewer can decode them independently.

use crate::error::Result;
use crate::parse::ParsedSheet;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Timestamp prefix of stored file names
const STORED_NAME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Outcome of one upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    /// Parsed successfully
    Completed,
    /// The file could not be read as a spreadsheet
    Failed,
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// One uploaded file and its serialized extraction results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRecord {
    /// Sanitized name the file was uploaded under
    pub original_filename: String,
    /// Timestamped name the file is stored under
    pub stored_filename: String,
    /// When the upload was processed
    pub created_at: DateTime<Utc>,
    /// Parse outcome
    pub status: UploadStatus,
    /// Header as JSON text
    pub header_json: Option<String>,
    /// Components as JSON text
    pub components_json: Option<String>,
    /// Nodes as JSON text
    pub nodes_json: Option<String>,
    /// Detail blocks as JSON text
    pub details_json: Option<String>,
    /// Failure cause for `Failed` records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadRecord {
    /// Record a successful parse
    ///
    /// # Errors
    ///
    /// Returns [`ChainsheetError::Json`](crate::ChainsheetError::Json) if a
    /// result cannot be serialized.
    pub fn completed(
        original: &str,
        created_at: DateTime<Utc>,
        parsed: &ParsedSheet,
    ) -> Result<Self> {
        let original_filename = sanitize_filename(original);
        Ok(Self {
            stored_filename: stored_name(&original_filename, created_at),
            original_filename,
            created_at,
            status: UploadStatus::Completed,
            header_json: Some(serde_json::to_string(&parsed.header)?),
            components_json: Some(serde_json::to_string(&parsed.components)?),
            nodes_json: Some(serde_json::to_string(&parsed.nodes)?),
            details_json: Some(serde_json::to_string(&parsed.details)?),
            error: None,
        })
    }

    /// Record a failed parse; no result blobs are stored
    #[must_use]
    pub fn failed(original: &str, created_at: DateTime<Utc>, error: impl ToString) -> Self {
        let original_filename = sanitize_filename(original);
        Self {
            stored_filename: stored_name(&original_filename, created_at),
            original_filename,
            created_at,
            status: UploadStatus::Failed,
            header_json: None,
            components_json: None,
            nodes_json: None,
            details_json: None,
            error: Some(error.to_string()),
        }
    }

    /// Decode the stored blobs; a missing blob decodes to an empty value
    ///
    /// # Errors
    ///
    /// Returns [`ChainsheetError::Json`](crate::ChainsheetError::Json) if a
    /// stored blob is not valid JSON for its type.
    pub fn decode(&self) -> Result<ParsedSheet> {
        Ok(ParsedSheet {
            header: decode_blob(self.header_json.as_deref())?,
            components: decode_blob(self.components_json.as_deref())?,
            nodes: decode_blob(self.nodes_json.as_deref())?,
            details: decode_blob(self.details_json.as_deref())?,
        })
    }
}

fn decode_blob<T: DeserializeOwned + Default>(blob: Option<&str>) -> Result<T> {
    match blob {
        Some(text) if !text.is_empty() => Ok(serde_json::from_str(text)?),
        _ => Ok(T::default()),
    }
}

/// Dashboard counters over a set of records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UploadSummary {
    /// All records
    pub total: usize,
    /// Records with status `completed`
    pub completed: usize,
    /// Records with status `failed`
    pub failed: usize,
}

impl UploadSummary {
    /// Count records by status
    #[must_use]
    pub fn from_records(records: &[UploadRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, record| {
            acc.total += 1;
            match record.status {
                UploadStatus::Completed => acc.completed += 1,
                UploadStatus::Failed => acc.failed += 1,
            }
            acc
        })
    }
}

/// Storage name for an upload: `YYYYmmddHHMMSS_<sanitized name>`
#[must_use]
pub fn stored_name(original: &str, timestamp: DateTime<Utc>) -> String {
    format!(
        "{}_{}",
        timestamp.format(STORED_NAME_FORMAT),
        sanitize_filename(original)
    )
}

/// Reduce a client-supplied file name to a safe ASCII name.
///
/// Path components are discarded, whitespace becomes `_`, characters other
/// than ASCII alphanumerics, `.`, `-` and `_` are dropped, and leading dots
/// and underscores are stripped.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let mapped: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    mapped.trim_start_matches(['.', '_']).to_string()
}
