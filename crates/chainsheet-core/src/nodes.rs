//! Document-group flow
//!
//! The template lays the custody chain out left to right: on the company-type
//! row, every cell starting with `Document Group` is an anchor, flanked by an
//! upstream party box in the column to its left and a downstream party box in
//! the column to its right. Material, remarks, date, quantity and the
//! document list hang off fixed rows of the anchor column (see
//! [`NodeLayout`]).
//!
//! Adjacent groups share a party: the downstream box of one group is the
//! upstream box of the next. Only the first group reads its left box from the
//! sheet; every later group inherits the previous group's right box.
//!
//! ```text
//!   col:   c-1          c               c+1          c+2           c+3
//!  type:  [Farm]  [Document Group 1] [Gin]     [Document Group 2] [Mill]
//!  name:  [Acme]                     [Cotton Co]                  [Spin Ltd]
//! ```

use crate::cell::{split_lines, Cell};
use crate::classify::{is_quantity_like, resolve_date};
use crate::grid::Grid;
use crate::template::NodeLayout;
use crate::NONE_SENTINEL;
use serde::{Deserialize, Serialize};

const ANCHOR_PREFIX: &str = "Document Group";
const NARRATIVE_PHRASE: &str = "goods are shipped";

/// One trading-party handoff in the custody chain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    /// Anchor label, e.g. `Document Group 2`
    pub group: String,
    /// Material handled at this step
    pub material: Option<String>,
    /// Upstream company type
    pub left_type: Option<String>,
    /// Upstream company name and location
    pub left_party: Option<String>,
    /// Downstream company type
    pub right_type: Option<String>,
    /// Downstream company name and location
    pub right_party: Option<String>,
    /// Shipment date, or `"none"`
    pub date: String,
    /// Shipped quantity, or `"none"`
    pub quantity: String,
    /// Free-text remarks
    pub remarks: Option<String>,
    /// Supporting documents, one entry per line
    pub documents: Vec<String>,
}

/// A company box: type label plus combined name/location
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PartyBox {
    /// Company type, e.g. `Spinner`
    pub kind: Option<String>,
    /// `name, location`, or whichever of the two is present
    pub party: Option<String>,
}

impl PartyBox {
    /// Read the box in column `col`
    fn read(grid: &Grid, layout: &NodeLayout, col: usize) -> Self {
        Self {
            kind: clean(grid.get(layout.company_type_row, col)),
            party: combine_party(
                clean(grid.get(layout.company_name_row, col)),
                clean(grid.get(layout.location_row, col)),
            ),
        }
    }
}

/// An anchor cell on the company-type row
#[derive(Debug, Clone, PartialEq, Eq)]
struct Anchor {
    col: usize,
    label: String,
}

/// Extract every document group, ordered by anchor column
#[must_use]
pub fn extract_nodes(grid: &Grid, layout: &NodeLayout) -> Vec<Node> {
    let anchors = find_anchors(grid, layout);
    log::debug!("node flow: {} document group anchor(s)", anchors.len());

    let (nodes, _) = anchors.iter().fold(
        (Vec::with_capacity(anchors.len()), None::<PartyBox>),
        |(mut nodes, previous_right), anchor| {
            let node = build_node(grid, layout, anchor, previous_right);
            let right = PartyBox {
                kind: node.right_type.clone(),
                party: node.right_party.clone(),
            };
            nodes.push(node);
            (nodes, Some(right))
        },
    );
    nodes
}

fn find_anchors(grid: &Grid, layout: &NodeLayout) -> Vec<Anchor> {
    grid.row(layout.company_type_row)
        .iter()
        .enumerate()
        .filter_map(|(col, cell)| {
            cell.as_text()
                .filter(|s| s.starts_with(ANCHOR_PREFIX))
                .map(|label| Anchor {
                    col,
                    label: label.to_string(),
                })
        })
        .collect()
}

/// Build one node. `previous_right` is the right box of the node before it,
/// `None` only for the first node.
fn build_node(
    grid: &Grid,
    layout: &NodeLayout,
    anchor: &Anchor,
    previous_right: Option<PartyBox>,
) -> Node {
    let col = anchor.col;

    let left = previous_right.unwrap_or_else(|| {
        col.checked_sub(1)
            .map(|left_col| PartyBox::read(grid, layout, left_col))
            .unwrap_or_default()
    });
    let right = PartyBox::read(grid, layout, col + 1);

    let mut remarks = nearest_value(grid, layout.remarks_row, col, layout.remarks_window);
    let mut quantity = format_quantity(grid.get(layout.quantity_row, col));
    let mut date = find_date(grid, layout, col).unwrap_or_else(|| NONE_SENTINEL.to_string());

    if is_narrative(&date, layout.narrative_date_len) {
        log::warn!(
            "{}: date cell holds narrative text, moving it to remarks",
            anchor.label
        );
        if remarks.as_deref().map_or(true, str::is_empty) {
            remarks = Some(date);
        }
        date = NONE_SENTINEL.to_string();
    }

    let mut documents: Vec<String> = layout
        .document_rows()
        .filter_map(|row| grid.get(row, col).as_text())
        .flat_map(split_lines)
        .map(str::to_string)
        .collect();

    let quantity_missing =
        quantity.trim().is_empty() || quantity.trim().eq_ignore_ascii_case(NONE_SENTINEL);
    if quantity_missing && documents.first().is_some_and(|d| is_quantity_like(d)) {
        quantity = documents.remove(0);
        log::debug!(
            "{}: promoted first document line to quantity {quantity:?}",
            anchor.label
        );
    }

    Node {
        group: anchor.label.clone(),
        material: clean(grid.get(layout.material_row, col)),
        left_type: left.kind,
        left_party: left.party,
        right_type: right.kind,
        right_party: right.party,
        date,
        quantity,
        remarks,
        documents,
    }
}

fn clean(cell: &Cell) -> Option<String> {
    cell.clean_text().map(str::to_string)
}

/// Join a company name and location, dropping the name when the location
/// already contains it
fn combine_party(name: Option<String>, location: Option<String>) -> Option<String> {
    match (name, location) {
        (Some(name), Some(location)) if location.contains(name.as_str()) => Some(location),
        (Some(name), Some(location)) => Some(format!("{name}, {location}")),
        (name, location) => name.or(location),
    }
}

/// First non-empty value in `row` at `col`, then `col + 1`, `col - 1`, and so
/// on outward to `window` columns away
fn nearest_value(grid: &Grid, row: usize, col: usize, window: usize) -> Option<String> {
    (0..=window)
        .flat_map(|off| {
            let right = col.checked_add(off);
            let left = if off == 0 { None } else { col.checked_sub(off) };
            right.into_iter().chain(left)
        })
        .filter(|&c| c < grid.col_count())
        .find_map(|c| match grid.get(row, c) {
            Cell::Text(s) => Some(s.trim()).filter(|s| !s.is_empty()).map(str::to_string),
            other => other.display_text(),
        })
}

/// Render the quantity cell: integral numbers without a fraction, text only
/// when it holds a digit, otherwise the sentinel
fn format_quantity(cell: &Cell) -> String {
    match cell {
        Cell::Number(n) if !n.is_nan() => crate::cell::format_number(*n),
        Cell::Text(s) if s.trim().chars().any(char::is_numeric) => s.trim().to_string(),
        _ => NONE_SENTINEL.to_string(),
    }
}

/// Search the date window, anchor column first, then left, then right
fn find_date(grid: &Grid, layout: &NodeLayout, col: usize) -> Option<String> {
    layout.date_rows().find_map(|row| {
        [Some(col), col.checked_sub(1), Some(col + 1)]
            .into_iter()
            .flatten()
            .filter(|&c| c < grid.col_count())
            .find_map(|c| resolve_date(grid.get(row, c)))
    })
}

fn is_narrative(date: &str, max_len: usize) -> bool {
    date.chars().count() > max_len || date.to_lowercase().contains(NARRATIVE_PHRASE)
}
