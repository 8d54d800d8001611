//! Grid: settled blocks. y=0 is top; rows are stored [0..height].

use crate::piece::PieceColor;
use std::collections::VecDeque;
use std::ops::{Index, IndexMut};
use thiserror::Error;

/// Playfield width in cells.
pub const GRID_WIDTH: usize = 10;
/// Playfield height in cells.
pub const GRID_HEIGHT: usize = 20;

/// Single cell: either empty or a settled block of a given colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(PieceColor),
}

impl Cell {
    #[inline]
    pub fn is_filled(self) -> bool {
        matches!(self, Self::Filled(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
}

/// Fixed-size grid of cells. Dimensions never change after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    /// rows[y][x] = cell. rows[0] is top.
    rows: VecDeque<Vec<Cell>>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        let rows = (0..height).map(|_| vec![Cell::Empty; width]).collect();
        Self {
            width,
            height,
            rows,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn check(&self, x: i32, y: i32) -> Result<(usize, usize), GridError> {
        if self.contains(x, y) {
            Ok((x as usize, y as usize))
        } else {
            Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Result<Cell, GridError> {
        let (x, y) = self.check(x, y)?;
        Ok(self.rows[y][x])
    }

    pub fn is_occupied(&self, x: i32, y: i32) -> Result<bool, GridError> {
        self.get(x, y).map(Cell::is_filled)
    }

    pub fn set(&mut self, x: i32, y: i32, color: PieceColor) -> Result<(), GridError> {
        let (x, y) = self.check(x, y)?;
        self.rows[y][x] = Cell::Filled(color);
        Ok(())
    }

    /// True if every cell in row `y` is filled.
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().all(|c| c.is_filled()))
    }

    /// Remove row `y` and push an empty row on top; rows above `y` shift down by one.
    /// Panics if `y` is outside the grid.
    pub fn clear_row(&mut self, y: usize) {
        assert!(y < self.height, "row {y} is outside the {}-row grid", self.height);
        self.rows.remove(y);
        self.rows.push_front(vec![Cell::Empty; self.width]);
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    #[cfg(test)]
    pub fn filled_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|c| c.is_filled()).count())
            .sum()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(GRID_WIDTH, GRID_HEIGHT)
    }
}

/// Unchecked access by `(x, y)`; panics outside the grid.
impl Index<(usize, usize)> for Grid {
    type Output = Cell;

    fn index(&self, (x, y): (usize, usize)) -> &Cell {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) is outside the {}x{} grid",
            self.width,
            self.height
        );
        &self.rows[y][x]
    }
}

impl IndexMut<(usize, usize)> for Grid {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Cell {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) is outside the {}x{} grid",
            self.width,
            self.height
        );
        &mut self.rows[y][x]
    }
}
