//! Tagged cell values
//!
//! Spreadsheet decoders hand over four kinds of value: nothing, a number
//! (often a float even when the sheet shows an integer), text, or a native
//! date/time. [`Cell`] keeps that distinction explicit so the scanners never
//! have to guess at a value's type.

use chrono::{NaiveDate, NaiveDateTime};

/// Date rendering used for every date that leaves the engine
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single grid cell
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    /// Missing value
    #[default]
    Empty,
    /// Numeric value; NaN is treated as missing
    Number(f64),
    /// Free text, stored untrimmed
    Text(String),
    /// Native date/time value
    Date(NaiveDateTime),
}

impl Cell {
    /// True for `Empty` and NaN numbers
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Number(n) => n.is_nan(),
            Self::Text(_) | Self::Date(_) => false,
        }
    }

    /// True for empty cells and whitespace-only text
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            other => other.is_empty(),
        }
    }

    /// The raw text, only for `Text` cells
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Trimmed text of a `Text` cell, `None` when missing or blank
    #[inline]
    #[must_use]
    pub fn clean_text(&self) -> Option<&str> {
        self.as_text().map(str::trim).filter(|s| !s.is_empty())
    }

    /// The numeric value, excluding NaN
    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if !n.is_nan() => Some(*n),
            _ => None,
        }
    }

    /// The native date/time value
    #[inline]
    #[must_use]
    pub const fn as_date(&self) -> Option<&NaiveDateTime> {
        match self {
            Self::Date(d) => Some(d),
            _ => None,
        }
    }

    /// Render any non-empty cell as text.
    ///
    /// Integral numbers drop the fractional part, dates use [`DATE_FORMAT`],
    /// text is returned untouched.
    #[must_use]
    pub fn display_text(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Number(n) => (!n.is_nan()).then(|| format_number(*n)),
            Self::Text(s) => Some(s.clone()),
            Self::Date(d) => Some(d.format(DATE_FORMAT).to_string()),
        }
    }

    /// [`display_text`](Self::display_text) trimmed, `None` when blank
    #[must_use]
    pub fn display_clean(&self) -> Option<String> {
        self.display_text()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Cell {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(value: NaiveDateTime) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value.and_time(chrono::NaiveTime::MIN))
    }
}

/// Format a number without a trailing `.0` when it is integral
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_number(n: f64) -> String {
    // 2^53: beyond this an f64 no longer maps one-to-one onto integers
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if n.is_finite() && n.fract() == 0.0 && n.abs() < MAX_EXACT {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Split multi-line cell text into trimmed, non-empty lines.
///
/// Breaks on every Unicode line boundary a spreadsheet may embed, not only `\n`.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c| {
        matches!(
            c,
            '\n' | '\r'
                | '\u{0b}'
                | '\u{0c}'
                | '\u{1c}'
                | '\u{1d}'
                | '\u{1e}'
                | '\u{85}'
                | '\u{2028}'
                | '\u{2029}'
        )
    })
    .map(str::trim)
    .filter(|line| !line.is_empty())
}
