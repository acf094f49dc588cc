//! Vendor header fields
//!
//! The header is a handful of labelled values (`Vendor Number`, `Item`, ...)
//! that may sit anywhere on the sheet. Each label is matched as an exact cell
//! value and its value is the cell immediately to the right.

use crate::cell::Cell;
use crate::grid::Grid;
use serde::{Deserialize, Serialize};

const VENDOR_NUMBER_LABEL: &str = "Vendor Number";
const ITEM_LABEL: &str = "Item";
const ITEM_NUMBER_LABEL: &str = "Item Number";
const SHIP_DATE_LABEL: &str = "Ship Date:";
const PO_QUANTITY_LABEL: &str = "PO Quantity:";

/// A header value: text or a number, as found on the sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    /// Numeric cell
    Number(f64),
    /// Text cell, or a date rendered as `YYYY-MM-DD`
    Text(String),
}

impl HeaderValue {
    /// Convert a cell; blank cells yield `None`, infinite numbers become text
    #[must_use]
    pub fn from_cell(cell: &Cell) -> Option<Self> {
        if cell.is_blank() {
            return None;
        }
        match cell {
            Cell::Number(n) if n.is_finite() => Some(Self::Number(*n)),
            Cell::Number(n) => Some(Self::Text(n.to_string())),
            Cell::Text(s) => Some(Self::Text(s.clone())),
            other => other.display_text().map(Self::Text),
        }
    }
}

impl std::fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => f.write_str(&crate::cell::format_number(*n)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Vendor header; absent fields are omitted when serialized
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Value right of `Vendor Number`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_number: Option<HeaderValue>,
    /// Value right of `Item`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<HeaderValue>,
    /// Value right of `Item Number`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_number: Option<HeaderValue>,
    /// Value right of `Ship Date:`; native dates become `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_date: Option<HeaderValue>,
    /// Value right of `PO Quantity:`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub po_quantity: Option<HeaderValue>,
}

impl Header {
    /// True when no field was found
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.vendor_number.is_none()
            && self.item.is_none()
            && self.item_number.is_none()
            && self.ship_date.is_none()
            && self.po_quantity.is_none()
    }

    fn slot(&mut self, label: &str) -> Option<&mut Option<HeaderValue>> {
        match label {
            VENDOR_NUMBER_LABEL => Some(&mut self.vendor_number),
            ITEM_LABEL => Some(&mut self.item),
            ITEM_NUMBER_LABEL => Some(&mut self.item_number),
            SHIP_DATE_LABEL => Some(&mut self.ship_date),
            PO_QUANTITY_LABEL => Some(&mut self.po_quantity),
            _ => None,
        }
    }
}

/// Scan every row for the header labels.
///
/// The first value found for a field wins; later rows only fill fields that
/// are still missing, so fields spread over several rows combine.
#[must_use]
pub fn extract_header(grid: &Grid) -> Header {
    const LABELS: [&str; 5] = [
        VENDOR_NUMBER_LABEL,
        ITEM_LABEL,
        ITEM_NUMBER_LABEL,
        SHIP_DATE_LABEL,
        PO_QUANTITY_LABEL,
    ];

    let mut header = Header::default();
    for row in 0..grid.row_count() {
        for label in LABELS {
            let Some(slot) = header.slot(label) else {
                continue;
            };
            if slot.is_some() {
                continue;
            }
            let Some(col) = grid.find_label_in_row(row, label) else {
                continue;
            };
            match HeaderValue::from_cell(grid.get(row, col + 1)) {
                Some(value) => {
                    log::debug!("header {label:?} at ({row}, {col}) = {value}");
                    *slot = Some(value);
                }
                None => log::trace!("header {label:?} at ({row}, {col}) has no value"),
            }
        }
    }
    header
}
