//! Orchestrator: run every extractor over one grid

use crate::components::{extract_components, Component};
use crate::details::{extract_detail_blocks, DetailBlock};
use crate::grid::Grid;
use crate::header::{extract_header, Header};
use crate::nodes::{extract_nodes, Node};
use crate::template::TemplateSchema;
use serde::{Deserialize, Serialize};

/// Everything extracted from one sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedSheet {
    /// Vendor header fields
    #[serde(default)]
    pub header: Header,
    /// Material composition
    #[serde(default)]
    pub components: Vec<Component>,
    /// Document-group chain, left to right
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Evidence blocks, column-major
    #[serde(default)]
    pub details: Vec<DetailBlock>,
}

impl ParsedSheet {
    /// Split into `(header, components, nodes, details)`
    #[must_use]
    pub fn into_parts(self) -> (Header, Vec<Component>, Vec<Node>, Vec<DetailBlock>) {
        (self.header, self.components, self.nodes, self.details)
    }
}

/// Parse a grid with the default template schema
#[must_use]
pub fn parse_grid(grid: &Grid) -> ParsedSheet {
    parse_grid_with(grid, &TemplateSchema::default())
}

/// Parse a grid with an explicit template schema.
///
/// The extractors are independent; each reads the same grid and none sees
/// another's output. Missing sections come back empty rather than failing.
#[must_use]
pub fn parse_grid_with(grid: &Grid, schema: &TemplateSchema) -> ParsedSheet {
    log::debug!(
        "parsing {}x{} grid",
        grid.row_count(),
        grid.col_count()
    );
    let parsed = ParsedSheet {
        header: extract_header(grid),
        components: extract_components(grid),
        nodes: extract_nodes(grid, &schema.nodes),
        details: extract_detail_blocks(grid, &schema.details),
    };
    log::info!(
        "extracted {} component(s), {} node(s), {} detail block(s)",
        parsed.components.len(),
        parsed.nodes.len(),
        parsed.details.len()
    );
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_grid_degrades_to_empty_result() {
        let parsed = parse_grid(&Grid::default());
        assert_eq!(parsed, ParsedSheet::default());
        assert!(parsed.header.is_empty());
    }

    #[test]
    fn test_into_parts_order() {
        let grid = Grid::from_text_rows(&[
            &["Vendor Number", "V-1"],
            &["Component Breakdown", ""],
            &["Cotton", "100%"],
        ]);
        let (header, components, nodes, details) = parse_grid(&grid).into_parts();
        assert!(header.vendor_number.is_some());
        assert_eq!(components.len(), 1);
        assert!(nodes.is_empty());
        assert!(details.is_empty());
    }

    #[test]
    fn test_missing_sections_deserialize_as_empty() {
        let parsed: ParsedSheet = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, ParsedSheet::default());
    }
}
