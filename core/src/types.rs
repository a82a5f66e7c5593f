use core::fmt;
use serde::{Deserialize, Serialize};

/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Shorthand for a `(row, col)` pair.
pub type Coord2 = (Coord, Coord);

/// A position on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: Coord,
    pub col: Coord,
}

impl Cell {
    pub const fn new(row: Coord, col: Coord) -> Self {
        Self { row, col }
    }

    pub(crate) fn to_nd_index(self) -> [usize; 2] {
        [self.row.into(), self.col.into()]
    }
}

impl From<Coord2> for Cell {
    fn from((row, col): Coord2) -> Self {
        Self::new(row, col)
    }
}

impl From<Cell> for Coord2 {
    fn from(cell: Cell) -> Self {
        (cell.row, cell.col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}
