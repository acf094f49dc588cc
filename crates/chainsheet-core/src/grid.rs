//! Read-only cell matrix
//!
//! [`Grid`] is the single input every scanner works from. It is rectangular,
//! immutable once built, and forgiving: any coordinate outside the matrix
//! (including negative offsets from an anchor) reads as [`Cell::Empty`].

use crate::cell::Cell;

static EMPTY_CELL: Cell = Cell::Empty;

/// Immutable rectangular matrix of cells, stored row-major
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    cells: Vec<Cell>,
    rows: usize,
    cols: usize,
}

impl Grid {
    /// Build a grid from rows, padding ragged rows with empty cells
    #[must_use]
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let row_count = rows.len();
        let mut cells = Vec::with_capacity(row_count * cols);
        for mut row in rows {
            row.resize(cols, Cell::Empty);
            cells.extend(row);
        }
        Self {
            cells,
            rows: row_count,
            cols,
        }
    }

    /// Build a grid of text cells; empty strings become [`Cell::Empty`]
    #[must_use]
    pub fn from_text_rows(rows: &[&[&str]]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| {
                    row.iter()
                        .map(|s| {
                            if s.is_empty() {
                                Cell::Empty
                            } else {
                                Cell::from(*s)
                            }
                        })
                        .collect()
                })
                .collect(),
        )
    }

    /// Number of rows
    #[inline]
    #[must_use]
    pub const fn row_count(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    #[must_use]
    pub const fn col_count(&self) -> usize {
        self.cols
    }

    /// True when the grid holds no cells at all
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Cell at `(row, col)`, or `Empty` when out of bounds
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> &Cell {
        if row < self.rows && col < self.cols {
            &self.cells[row * self.cols + col]
        } else {
            &EMPTY_CELL
        }
    }

    /// Cell at a signed offset from `(row, col)`, or `Empty` when that lands
    /// outside the grid
    #[must_use]
    pub fn get_offset(&self, row: usize, col: usize, d_row: isize, d_col: isize) -> &Cell {
        match (row.checked_add_signed(d_row), col.checked_add_signed(d_col)) {
            (Some(r), Some(c)) => self.get(r, c),
            _ => &EMPTY_CELL,
        }
    }

    /// Cells of one row; empty slice when out of bounds
    #[must_use]
    pub fn row(&self, row: usize) -> &[Cell] {
        if row < self.rows {
            &self.cells[row * self.cols..(row + 1) * self.cols]
        } else {
            &[]
        }
    }

    /// Column of the first cell in `row` matching `pred`
    pub fn find_in_row<F>(&self, row: usize, pred: F) -> Option<usize>
    where
        F: FnMut(&Cell) -> bool,
    {
        self.row(row).iter().position(pred)
    }

    /// Column of the first `Text` cell in `row` equal to `label`
    #[must_use]
    pub fn find_label_in_row(&self, row: usize, label: &str) -> Option<usize> {
        self.find_in_row(row, |cell| cell.as_text() == Some(label))
    }
}

/// Incremental grid construction for decoders that see sparse cells
#[derive(Debug, Clone, Default)]
pub struct GridBuilder {
    rows: Vec<Vec<Cell>>,
}

impl GridBuilder {
    /// Create an empty builder
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Create a builder pre-sized to `rows` x `cols` empty cells
    #[must_use]
    pub fn with_size(rows: usize, cols: usize) -> Self {
        Self {
            rows: vec![vec![Cell::Empty; cols]; rows],
        }
    }

    /// Place a value, growing the matrix as needed
    pub fn set(&mut self, row: usize, col: usize, cell: impl Into<Cell>) -> &mut Self {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let target = &mut self.rows[row];
        if target.len() <= col {
            target.resize(col + 1, Cell::Empty);
        }
        target[col] = cell.into();
        self
    }

    /// Finish into a rectangular [`Grid`]
    #[must_use]
    pub fn build(self) -> Grid {
        Grid::new(self.rows)
    }
}
