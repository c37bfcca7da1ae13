//! Square obstacle/occupancy matrix and the optional aggro cost matrix.
//! This module exists to own matrix orientation and bounds handling in one place.
//! It does not decide traversal rules; pathing and the move handler interpret cell contents.

use crate::error::BoardError;
use crate::types::{Cell, CellContent, EMPTY};

/// Square board stored row-major with `y` ascending.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<u8>,
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self { size, cells: vec![EMPTY; size * size] }
    }

    /// Builds a board from rows listed top row first, the way boards are drawn.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, BoardError> {
        let size = rows.len();
        if size == 0 {
            return Err(BoardError::Empty);
        }
        let mut board = Self::new(size);
        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(BoardError::NotSquare {
                    row: row_index,
                    expected: size,
                    found: row.len(),
                });
            }
            let y = size - 1 - row_index;
            board.cells[y * size..(y + 1) * size].copy_from_slice(row);
        }
        Ok(board)
    }

    /// Inverse of [`Board::from_rows`].
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.size).rev().map(|y| self.cells[y * self.size..(y + 1) * self.size].to_vec()).collect()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.index(cell).is_some()
    }

    pub fn value(&self, cell: Cell) -> Option<u8> {
        self.index(cell).map(|idx| self.cells[idx])
    }

    pub fn content(&self, cell: Cell) -> Option<CellContent> {
        self.value(cell).map(CellContent::from_value)
    }

    pub fn is_empty_cell(&self, cell: Cell) -> bool {
        self.value(cell) == Some(EMPTY)
    }

    pub fn set(&mut self, cell: Cell, value: u8) {
        if let Some(idx) = self.index(cell) {
            self.cells[idx] = value;
        }
    }

    /// Cells in row-major scan order: `y` ascending, then `x` ascending.
    pub fn scan(&self) -> impl Iterator<Item = Cell> + '_ {
        let side = self.side();
        (0..side).flat_map(move |y| (0..side).map(move |x| Cell::new(x, y)))
    }

    fn side(&self) -> i32 {
        i32::try_from(self.size).unwrap_or(i32::MAX)
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        let x = usize::try_from(cell.x).ok()?;
        let y = usize::try_from(cell.y).ok()?;
        (x < self.size && y < self.size).then_some(y * self.size + x)
    }
}

/// Per-cell traversal cost multipliers; 1.0 means no threat.
#[derive(Clone, Debug, PartialEq)]
pub struct AggroBoard {
    size: usize,
    values: Vec<f64>,
}

impl AggroBoard {
    pub fn new(size: usize) -> Self {
        Self { size, values: vec![1.0; size * size] }
    }

    /// Rows listed top row first, mirroring [`Board::from_rows`].
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, BoardError> {
        let size = rows.len();
        if size == 0 {
            return Err(BoardError::Empty);
        }
        let mut aggro = Self::new(size);
        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(BoardError::NotSquare {
                    row: row_index,
                    expected: size,
                    found: row.len(),
                });
            }
            let y = size - 1 - row_index;
            aggro.values[y * size..(y + 1) * size].copy_from_slice(row);
        }
        Ok(aggro)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Multiplier for `cell`; cells off the board carry no threat.
    pub fn multiplier(&self, cell: Cell) -> f64 {
        self.index(cell).map_or(1.0, |idx| self.values[idx])
    }

    pub fn add(&mut self, cell: Cell, amount: f64) {
        if let Some(idx) = self.index(cell) {
            self.values[idx] += amount;
        }
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        let x = usize::try_from(cell.x).ok()?;
        let y = usize::try_from(cell.y).ok()?;
        (x < self.size && y < self.size).then_some(y * self.size + x)
    }
}
