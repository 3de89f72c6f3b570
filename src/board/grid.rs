//! Dense grid board.
//!
//! Stores one cell per intersection in a row-major `Vec`, with optional
//! per-column stone counts when gravity is enabled so the landing row of a
//! drop is an O(1) lookup. Row 0 is the top of the grid; in gravity mode
//! pieces land on the highest-index empty row of their column.
//!
//! The board is a plain value type: `clone()` is a deep, independent copy,
//! which is what speculative search relies on.

use super::player::Player;

/// Errors raised when constructing a board or game with bad parameters.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("board dimensions must be positive, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("win length {win_len} does not fit a {rows}x{cols} board")]
    InvalidWinLength {
        win_len: usize,
        rows: usize,
        cols: usize,
    },
}

/// Error raised by bounds-checked cell access.
#[derive(Debug, thiserror::Error)]
#[error("position ({row}, {col}) is outside the board")]
pub struct OutOfBounds {
    pub row: usize,
    pub col: usize,
}

/// A rectangular board of empty or player-owned cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Player>>,
    /// Stones per column; maintained only when gravity is enabled.
    column_heights: Option<Vec<usize>>,
}

impl Board {
    /// Creates an empty board. Fails if either dimension is zero.
    pub fn new(rows: usize, cols: usize, gravity: bool) -> Result<Board, ConfigError> {
        if rows == 0 || cols == 0 {
            return Err(ConfigError::InvalidDimensions { rows, cols });
        }
        Ok(Board {
            rows,
            cols,
            cells: vec![None; rows * cols],
            column_heights: gravity.then(|| vec![0; cols]),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns true when gravity applies to this board.
    pub fn gravity(&self) -> bool {
        self.column_heights.is_some()
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Bounds-checked cell read.
    pub fn get(&self, row: usize, col: usize) -> Result<Option<Player>, OutOfBounds> {
        if !self.in_bounds(row, col) {
            return Err(OutOfBounds { row, col });
        }
        Ok(self.cells[self.index(row, col)])
    }

    /// Unchecked cell read for hot paths. Callers must stay in bounds.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> Option<Player> {
        debug_assert!(self.in_bounds(row, col));
        self.cells[row * self.cols + col]
    }

    /// Bounds-checked cell write. Overwrites whatever was there.
    pub fn set(&mut self, row: usize, col: usize, value: Option<Player>) -> Result<(), OutOfBounds> {
        if !self.in_bounds(row, col) {
            return Err(OutOfBounds { row, col });
        }
        let idx = self.index(row, col);
        if let Some(heights) = &mut self.column_heights {
            // Keep the column count in sync with occupancy transitions.
            match (self.cells[idx].is_some(), value.is_some()) {
                (false, true) => heights[col] += 1,
                (true, false) => heights[col] -= 1,
                _ => {}
            }
        }
        self.cells[idx] = value;
        Ok(())
    }

    /// Number of stones placed on the board.
    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty_cell(&self, row: usize, col: usize) -> bool {
        self.in_bounds(row, col) && self.cell(row, col).is_none()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// Number of stones in a column.
    pub fn column_height(&self, col: usize) -> usize {
        match &self.column_heights {
            Some(heights) => heights[col],
            None => (0..self.rows).filter(|&r| self.cell(r, col).is_some()).count(),
        }
    }

    pub fn is_column_full(&self, col: usize) -> bool {
        col >= self.cols || self.column_height(col) == self.rows
    }

    /// Landing row for a drop in `col`, or `None` if the column is full.
    ///
    /// Only meaningful in gravity mode, but defined for any board: stones
    /// land on the highest-index empty row of the column.
    pub fn drop_row(&self, col: usize) -> Option<usize> {
        if col >= self.cols {
            return None;
        }
        let height = self.column_height(col);
        if height == self.rows {
            return None;
        }
        Some(self.rows - 1 - height)
    }

    /// Row-major flat snapshot: 0 = empty, 1 = player A, 2 = player B.
    pub fn snapshot(&self) -> Vec<u8> {
        self.cells
            .iter()
            .map(|c| c.map_or(0, Player::cell_code))
            .collect()
    }

    /// Clears every cell, keeping dimensions and mode.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
        if let Some(heights) = &mut self.column_heights {
            heights.iter_mut().for_each(|h| *h = 0);
        }
    }
}
