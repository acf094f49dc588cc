//! Template schema: where the fixed-position parts of a sheet live
//!
//! The node flow sits at fixed rows of the template and detail blocks read
//! their fields at fixed offsets below their title. Those positions are
//! collected here instead of being scattered as literals, and can be
//! overridden from configuration when a template family shifts its rows.
//!
//! All rows are 0-based grid indices.

use crate::error::{ChainsheetError, Result};
use serde::{Deserialize, Serialize};

/// Complete layout description for one template family
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSchema {
    /// Row layout of the document-group flow
    pub nodes: NodeLayout,
    /// Offsets inside a `(Role)` detail block
    pub details: DetailLayout,
}

impl TemplateSchema {
    /// Check that every range in the schema is non-empty
    ///
    /// # Errors
    ///
    /// Returns [`ChainsheetError::Config`] naming the first inconsistent field.
    pub fn validate(&self) -> Result<()> {
        self.nodes.validate()?;
        self.details.validate()
    }
}

/// Rows of the document-group flow
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeLayout {
    /// Row holding the material handled at each group
    pub material_row: usize,
    /// Row holding company types and the `Document Group` anchors
    pub company_type_row: usize,
    /// Row holding company names
    pub company_name_row: usize,
    /// Row holding company locations
    pub location_row: usize,
    /// Row holding remarks
    pub remarks_row: usize,
    /// Columns searched either side of the anchor for remarks
    pub remarks_window: usize,
    /// First row searched for a date
    pub date_row: usize,
    /// Number of rows searched for a date, starting at `date_row`
    pub date_window: usize,
    /// Row holding the quantity
    pub quantity_row: usize,
    /// First row of the document list
    pub documents_start_row: usize,
    /// Last row of the document list, inclusive
    pub documents_end_row: usize,
    /// A resolved date longer than this many characters is narrative text
    pub narrative_date_len: usize,
}

impl Default for NodeLayout {
    fn default() -> Self {
        Self {
            material_row: 9,
            company_type_row: 11,
            company_name_row: 12,
            location_row: 13,
            remarks_row: 15,
            remarks_window: 1,
            date_row: 16,
            date_window: 3,
            quantity_row: 17,
            documents_start_row: 18,
            documents_end_row: 27,
            narrative_date_len: 40,
        }
    }
}

impl NodeLayout {
    fn validate(&self) -> Result<()> {
        if self.documents_start_row > self.documents_end_row {
            return Err(ChainsheetError::Config(format!(
                "nodes.documents_start_row ({}) is after nodes.documents_end_row ({})",
                self.documents_start_row, self.documents_end_row
            )));
        }
        if self.date_window == 0 {
            return Err(ChainsheetError::Config(
                "nodes.date_window must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Rows searched for a node date
    #[inline]
    #[must_use]
    pub const fn date_rows(&self) -> std::ops::Range<usize> {
        self.date_row..self.date_row + self.date_window
    }

    /// Rows holding the document list
    #[inline]
    #[must_use]
    pub const fn document_rows(&self) -> std::ops::RangeInclusive<usize> {
        self.documents_start_row..=self.documents_end_row
    }
}

/// Offsets below a detail block title row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailLayout {
    /// Offset of the party name
    pub name_offset: usize,
    /// Offset of the party location
    pub location_offset: usize,
    /// First offset searched for a date
    pub date_start_offset: usize,
    /// Last offset searched for a date, inclusive
    pub date_end_offset: usize,
    /// Offset where the document scan begins
    pub documents_offset: usize,
}

impl Default for DetailLayout {
    fn default() -> Self {
        Self {
            name_offset: 1,
            location_offset: 2,
            date_start_offset: 4,
            date_end_offset: 8,
            documents_offset: 5,
        }
    }
}

impl DetailLayout {
    fn validate(&self) -> Result<()> {
        if self.date_start_offset > self.date_end_offset {
            return Err(ChainsheetError::Config(format!(
                "details.date_start_offset ({}) is after details.date_end_offset ({})",
                self.date_start_offset, self.date_end_offset
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema_is_valid() {
        let schema = TemplateSchema::default();
        assert!(schema.validate().is_ok());
        assert_eq!(schema.nodes.date_rows(), 16..19);
        assert_eq!(schema.nodes.document_rows(), 18..=27);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let schema: TemplateSchema =
            serde_json::from_str(r#"{"nodes": {"quantity_row": 20}}"#).unwrap();
        assert_eq!(schema.nodes.quantity_row, 20);
        assert_eq!(schema.nodes.material_row, 9);
        assert_eq!(schema.details, DetailLayout::default());
    }

    #[test]
    fn test_inverted_document_rows_rejected() {
        let mut schema = TemplateSchema::default();
        schema.nodes.documents_start_row = 30;
        let err = schema.validate().unwrap_err();
        assert!(err.to_string().contains("documents_start_row"));
    }

    #[test]
    fn test_zero_date_window_rejected() {
        let mut schema = TemplateSchema::default();
        schema.nodes.date_window = 0;
        assert!(matches!(schema.validate(), Err(ChainsheetError::Config(_))));
    }

    #[test]
    fn test_inverted_detail_dates_rejected() {
        let mut schema = TemplateSchema::default();
        schema.details.date_start_offset = 9;
        assert!(schema.validate().is_err());
    }
}
