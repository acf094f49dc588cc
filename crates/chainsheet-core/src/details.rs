//! Free-floating `(Role)` evidence blocks
//!
//! Below the node flow, templates carry any number of evidence blocks, each
//! titled by a parenthesised role such as `(Manufacturer)`. Blocks may start
//! in any column, so the whole grid is scanned column by column.

use crate::classify::resolve_date;
use crate::grid::Grid;
use crate::template::DetailLayout;
use crate::NONE_SENTINEL;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static TITLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(.+?\)$").expect("Invalid detail title regex"));

/// One evidence block
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DetailBlock {
    /// Role named by the title, without parentheses
    #[serde(rename = "type")]
    pub block_type: String,
    /// Party name, one row under the title
    pub name: Option<String>,
    /// Party location, two rows under the title
    pub location: Option<String>,
    /// Record date, or `"none"`
    pub date: String,
    /// The first line mentioning "record"
    pub doc_title: Option<String>,
    /// Remaining document lines, in sheet order
    pub documents: Vec<String>,
}

/// Extract every detail block in column-major order.
///
/// Blocks with neither a document title nor any document line are dropped.
#[must_use]
pub fn extract_detail_blocks(grid: &Grid, layout: &DetailLayout) -> Vec<DetailBlock> {
    let mut blocks = Vec::new();
    for col in 0..grid.col_count() {
        for row in 0..grid.row_count() {
            let Some(title) = grid.get(row, col).as_text().map(str::trim) else {
                continue;
            };
            if !TITLE_PATTERN.is_match(title) {
                continue;
            }
            match read_block(grid, layout, row, col, title) {
                Some(block) => {
                    log::debug!("detail block {:?} at ({row}, {col})", block.block_type);
                    blocks.push(block);
                }
                None => log::trace!("detail title {title:?} at ({row}, {col}) has no documents"),
            }
        }
    }
    blocks
}

fn read_block(
    grid: &Grid,
    layout: &DetailLayout,
    row: usize,
    col: usize,
    title: &str,
) -> Option<DetailBlock> {
    let rows = grid.row_count();

    let date = (row + layout.date_start_offset..=row + layout.date_end_offset)
        .take_while(|&r| r < rows)
        .find_map(|r| resolve_date(grid.get(r, col)))
        .unwrap_or_else(|| NONE_SENTINEL.to_string());

    let (doc_title, documents) = collect_documents(grid, row + layout.documents_offset, col);
    if doc_title.is_none() && documents.is_empty() {
        return None;
    }

    Some(DetailBlock {
        block_type: title.trim_matches(['(', ')']).trim().to_string(),
        name: grid.get(row + layout.name_offset, col).display_clean(),
        location: grid.get(row + layout.location_offset, col).display_clean(),
        date,
        doc_title,
        documents,
    })
}

/// Skip down to the first non-blank text cell at or below `start`, then
/// collect consecutive non-blank text lines. The first line mentioning
/// "record" becomes the title.
fn collect_documents(grid: &Grid, start: usize, col: usize) -> (Option<String>, Vec<String>) {
    let line_at = |r: usize| grid.get(r, col).clean_text();

    let Some(first) = (start..grid.row_count()).find(|&r| line_at(r).is_some()) else {
        return (None, Vec::new());
    };

    let mut doc_title = None;
    let mut documents = Vec::new();
    for text in (first..grid.row_count()).map_while(line_at) {
        if doc_title.is_none() && text.to_lowercase().contains("record") {
            doc_title = Some(text.to_string());
        } else {
            documents.push(text.to_string());
        }
    }

    if doc_title.is_none()
        && documents
            .first()
            .is_some_and(|d| d.to_lowercase().contains("record"))
    {
        doc_title = Some(documents.remove(0));
    }
    (doc_title, documents)
}
