use serde::{Deserialize, Serialize};

use crate::*;

/// Fixed-size board addressing. Carries no game semantics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: Coord,
    cols: Coord,
}

impl Grid {
    pub(crate) const fn new(rows: Coord, cols: Coord) -> Self {
        Self { rows, cols }
    }

    pub const fn rows(&self) -> Coord {
        self.rows
    }

    pub const fn cols(&self) -> Coord {
        self.cols
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub(crate) fn shape(&self) -> [usize; 2] {
        [self.rows.into(), self.cols.into()]
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    pub fn validate(&self, cell: Cell) -> Result<Cell> {
        if self.in_bounds(cell) {
            Ok(cell)
        } else {
            Err(GameError::OutOfBounds(cell))
        }
    }

    /// In-bounds cells at Chebyshev distance 1, in row-major order.
    pub fn neighbors(&self, cell: Cell) -> NeighborIter {
        NeighborIter::new(cell, *self)
    }

    /// Every cell of the board, in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| Cell::new(row, col)))
    }
}

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `cell`, returning a value only when it remains in bounds.
fn apply_delta(cell: Cell, delta: (i8, i8), grid: Grid) -> Option<Cell> {
    let (d_row, d_col) = delta;

    let row = cell.row.checked_add_signed(d_row)?;
    if row >= grid.rows {
        return None;
    }

    let col = cell.col.checked_add_signed(d_col)?;
    if col >= grid.cols {
        return None;
    }

    Some(Cell::new(row, col))
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Cell,
    grid: Grid,
    index: u8,
}

impl NeighborIter {
    fn new(center: Cell, grid: Grid) -> Self {
        Self {
            center,
            grid,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Cell;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item = apply_delta(self.center, DISPLACEMENTS[usize::from(self.index)], self.grid);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}
