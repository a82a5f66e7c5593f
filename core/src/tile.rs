use serde::{Deserialize, Serialize};

/// What a renderer should draw for a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Hidden,
    Flagged,
    Open(u8),
    /// Unflagged mine shown after a loss
    Mine,
    /// The mine that ended the game
    Exploded,
    /// Flag on a safe cell, shown after a loss
    WrongFlag,
}

impl Tile {
    // whether the tile is visually closed
    pub const fn is_closed(self) -> bool {
        use Tile::*;
        match self {
            Hidden => true,
            Flagged => true,
            Open(_) => false,
            Mine => false,
            Exploded => false,
            WrongFlag => true,
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::Hidden
    }
}
