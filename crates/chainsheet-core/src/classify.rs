//! Cell classifier
//!
//! Every "does this look like X" decision the scanners make goes through here,
//! so the heuristics live in one place.

use crate::cell::{Cell, DATE_FORMAT};

/// Unit words that mark a line as a quantity
const QUANTITY_UNITS: [&str; 9] = [
    "kg",
    "kilogram",
    "metric ton",
    "metric tons",
    "mt",
    "bale",
    "bales",
    "tons",
    "ton",
];

/// Broad kind of a cell value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Missing or NaN
    Empty,
    /// Numeric
    Numeric,
    /// Native date or date-like text
    DateLike,
    /// Any other text
    Text,
}

/// Classify a cell into its [`CellKind`]
#[must_use]
pub fn kind_of(cell: &Cell) -> CellKind {
    match cell {
        c if c.is_blank() => CellKind::Empty,
        Cell::Number(_) => CellKind::Numeric,
        c if is_date_like(c) => CellKind::DateLike,
        _ => CellKind::Text,
    }
}

/// True for native dates, and for text that is non-blank, holds a digit,
/// and holds a `/` or `-`
#[must_use]
pub fn is_date_like(cell: &Cell) -> bool {
    match cell {
        Cell::Date(_) => true,
        Cell::Text(s) => is_date_like_text(s),
        Cell::Empty | Cell::Number(_) => false,
    }
}

/// Text half of [`is_date_like`]
#[must_use]
pub fn is_date_like_text(text: &str) -> bool {
    let s = text.trim();
    !s.is_empty() && s.chars().any(char::is_numeric) && s.contains(['/', '-'])
}

/// Resolve a cell to a date string: native dates render as `YYYY-MM-DD`,
/// date-like text is returned trimmed, anything else is `None`
#[must_use]
pub fn resolve_date(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Date(d) => Some(d.format(DATE_FORMAT).to_string()),
        Cell::Text(s) if is_date_like_text(s) => Some(s.trim().to_string()),
        _ => None,
    }
}

/// True when the text names a unit of weight or count, or failing that,
/// contains any digit
#[must_use]
pub fn is_quantity_like(text: &str) -> bool {
    let lower = text.to_lowercase();
    QUANTITY_UNITS.iter().any(|unit| lower.contains(unit))
        || lower.chars().any(char::is_numeric)
}

/// Normalize a percentage cell onto the 0–100 scale.
///
/// Text has any `%` removed and is parsed as-is. Numbers within `[0, 1]` are
/// taken as spreadsheet fractions and multiplied by 100; other numbers pass
/// through unchanged, without an upper clamp. Non-finite results are `None`.
#[must_use]
pub fn normalize_percent(cell: &Cell) -> Option<f64> {
    let percent = match cell {
        Cell::Text(s) => {
            let stripped = s.trim().replace('%', "");
            let stripped = stripped.trim();
            if stripped.is_empty() {
                return None;
            }
            stripped.parse::<f64>().ok()?
        }
        Cell::Number(f) if (0.0..=1.0).contains(f) => f * 100.0,
        Cell::Number(f) => *f,
        Cell::Empty | Cell::Date(_) => return None,
    };
    percent.is_finite().then_some(percent)
}
