//! Minesweeper board engine: mine placement, reveal/flag bookkeeping and flood-fill, with no
//! knowledge of how the board is drawn or how input arrives.
//!
//! ```
//! use minefield_core::{BoardEngine, Difficulty, RevealOutcome};
//!
//! let mut engine = BoardEngine::new_game(Difficulty::Beginner.config(), Some(7));
//! match engine.reveal((3, 4)).unwrap() {
//!     RevealOutcome::Lost => assert!(engine.is_lost()),
//!     RevealOutcome::Won => assert!(engine.is_won()),
//!     RevealOutcome::Continuing => assert!(engine.is_revealed((3, 4)).unwrap()),
//!     RevealOutcome::Rejected => unreachable!("fresh cell"),
//! }
//! ```

pub use config::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use marks::*;
pub use minefield::*;
pub use tile::*;
pub use types::*;

mod config;
mod engine;
mod error;
mod generator;
mod grid;
mod marks;
mod minefield;
mod tile;
mod types;
