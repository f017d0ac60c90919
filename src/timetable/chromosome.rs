//! The T×R timetable grid.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use super::code::SessionCode;

/// A rectangular sub-range of the grid. Scans are row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRegion {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl GridRegion {
    pub fn new(rows: Range<usize>, cols: Range<usize>) -> Self {
        Self { rows, cols }
    }

    /// The region covering a whole `rows × cols` grid.
    pub fn full(rows: usize, cols: usize) -> Self {
        Self::new(0..rows, 0..cols)
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.rows.contains(&row) && self.cols.contains(&col)
    }

    pub fn len(&self) -> usize {
        self.rows.len() * self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All `(row, col)` positions of the region in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows
            .clone()
            .flat_map(move |row| self.cols.clone().map(move |col| (row, col)))
    }
}

/// A timetable: `rows` time slots by `cols` rooms, each cell a raw session code or 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chromosome {
    rows: usize,
    cols: usize,
    cells: Vec<u32>,
}

impl Chromosome {
    /// An empty grid.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![0; rows * cols],
        }
    }

    /// Builds a grid from nested rows. Returns `None` when the rows are ragged.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return None;
        }
        Some(Self {
            rows: rows.len(),
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u32) {
        self.cells[row * self.cols + col] = value;
    }

    pub fn code_at(&self, row: usize, col: usize) -> Option<SessionCode> {
        SessionCode::from_raw(self.get(row, col))
    }

    pub fn row(&self, row: usize) -> &[u32] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    pub fn row_is_empty(&self, row: usize) -> bool {
        self.row(row).iter().all(|&v| v == 0)
    }

    /// Whether every occupied cell of `row` belongs to `subject`.
    /// An empty row is dedicated to any subject.
    pub fn row_dedicated_to(&self, row: usize, subject: u32) -> bool {
        self.row(row)
            .iter()
            .filter_map(|&v| SessionCode::from_raw(v))
            .all(|code| code.subject() == subject)
    }

    /// The first empty column of `row` among `cols`, in the given order.
    pub fn empty_col_in<I>(&self, row: usize, cols: I) -> Option<usize>
    where
        I: IntoIterator<Item = usize>,
    {
        cols.into_iter().find(|&col| self.get(row, col) == 0)
    }

    /// Row-major position of the first cell holding `code`.
    pub fn locate(&self, code: SessionCode) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .position(|&v| v == code.raw())
            .map(|idx| (idx / self.cols, idx % self.cols))
    }

    pub fn contains(&self, code: SessionCode) -> bool {
        self.cells.contains(&code.raw())
    }

    /// Number of occupied cells.
    pub fn count_nonzero(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }

    /// Multiset of the codes in the grid, empty cells excluded.
    pub fn code_counts(&self) -> HashMap<u32, usize> {
        let mut counts = HashMap::new();
        for &v in self.cells.iter().filter(|&&v| v != 0) {
            *counts.entry(v).or_insert(0) += 1;
        }
        counts
    }

    /// Iterates over `(row, col, code)` for every occupied cell, row-major.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, SessionCode)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(idx, &v)| {
            SessionCode::from_raw(v).map(|code| (idx / self.cols, idx % self.cols, code))
        })
    }

    /// Copies `region` from `other` into `self`. Both grids must share a shape.
    pub fn overwrite_region(&mut self, other: &Chromosome, region: &GridRegion) {
        debug_assert_eq!(self.shape(), other.shape());
        for (row, col) in region.cells() {
            self.set(row, col, other.get(row, col));
        }
    }

    /// Nested rows, as written to snapshot files.
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        self.cells.chunks(self.cols.max(1)).map(<[u32]>::to_vec).collect()
    }
}

impl fmt::Display for Chromosome {
    /// Bracketed integer-array literal, one row per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .cells
            .iter()
            .map(|v| v.to_string().len())
            .max()
            .unwrap_or(1);

        write!(f, "[")?;
        for row in 0..self.rows {
            if row > 0 {
                write!(f, ",\n ")?;
            }
            write!(f, "[")?;
            for (col, value) in self.row(row).iter().enumerate() {
                if col > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:>width$}", value, width = width)?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}
