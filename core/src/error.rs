use thiserror::Error;

use crate::{Cell, CellCount, Coord};

/// Invalid construction parameters. No engine is ever built from these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Board must have at least one row and one column, got {rows}x{cols}")]
    EmptyBoard { rows: Coord, cols: Coord },
    #[error("Too many mines, {mines} requested but the board has only {cells} cells")]
    TooManyMines { mines: CellCount, cells: CellCount },
}

/// A saved board whose parts disagree with each other.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Stored {what} count {stored} does not match the board, which has {actual}")]
    CountMismatch {
        what: &'static str,
        stored: CellCount,
        actual: CellCount,
    },
    #[error("Game state {0} does not match the revealed cells")]
    InconsistentState(&'static str),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown difficulty {0:?}")]
pub struct ParseDifficultyError(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Cell {0} is outside the board")]
    OutOfBounds(Cell),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

pub type Result<T> = std::result::Result<T, GameError>;
