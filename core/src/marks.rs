use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Player-visible state of a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    Hidden,
    Revealed,
    Flagged,
}

impl Default for Mark {
    fn default() -> Self {
        Self::Hidden
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Outcome of toggling a flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    Flagged,
    Unflagged,
    Rejected,
}

impl FlagOutcome {
    /// Change to apply to a displayed flag counter.
    pub const fn flag_delta(self) -> i8 {
        match self {
            Self::Flagged => 1,
            Self::Unflagged => -1,
            Self::Rejected => 0,
        }
    }

    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

/// Revealed/flagged bookkeeping. `Revealed` is sticky and never coexists with a flag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMarkState")]
pub struct MarkState {
    grid: Grid,
    marks: Array2<Mark>,
    revealed_count: CellCount,
    flagged_count: CellCount,
}

impl MarkState {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            marks: Array2::default(grid.shape()),
            revealed_count: 0,
            flagged_count: 0,
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn mark_at(&self, cell: Cell) -> Result<Mark> {
        let cell = self.grid.validate(cell)?;
        Ok(self[cell])
    }

    pub fn is_revealed(&self, cell: Cell) -> Result<bool> {
        Ok(self.mark_at(cell)? == Mark::Revealed)
    }

    pub fn is_flagged(&self, cell: Cell) -> Result<bool> {
        Ok(self.mark_at(cell)? == Mark::Flagged)
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// Hidden cells become revealed; revealed cells stay put and flagged cells are refused.
    pub fn reveal(&mut self, cell: Cell) -> Result<MarkOutcome> {
        let cell = self.grid.validate(cell)?;
        Ok(self.reveal_cell(cell))
    }

    /// Caller guarantees `cell` is in bounds.
    pub(crate) fn reveal_cell(&mut self, cell: Cell) -> MarkOutcome {
        let mark = &mut self.marks[cell.to_nd_index()];

        match *mark {
            Mark::Hidden => {
                *mark = Mark::Revealed;
                self.revealed_count += 1;
                MarkOutcome::Changed
            }
            Mark::Revealed | Mark::Flagged => MarkOutcome::NoChange,
        }
    }

    pub fn toggle_flag(&mut self, cell: Cell) -> Result<FlagOutcome> {
        let cell = self.grid.validate(cell)?;
        let mark = &mut self.marks[cell.to_nd_index()];

        Ok(match *mark {
            Mark::Hidden => {
                *mark = Mark::Flagged;
                self.flagged_count += 1;
                FlagOutcome::Flagged
            }
            Mark::Flagged => {
                *mark = Mark::Hidden;
                self.flagged_count -= 1;
                FlagOutcome::Unflagged
            }
            Mark::Revealed => FlagOutcome::Rejected,
        })
    }
}

#[derive(Deserialize)]
struct RawMarkState {
    grid: Grid,
    marks: Array2<Mark>,
    revealed_count: CellCount,
    flagged_count: CellCount,
}

impl TryFrom<RawMarkState> for MarkState {
    type Error = SnapshotError;

    fn try_from(raw: RawMarkState) -> core::result::Result<Self, Self::Error> {
        GameConfig::new(raw.grid.rows(), raw.grid.cols(), 0)?;
        if raw.marks.shape() != &raw.grid.shape()[..] {
            return Err(SnapshotError::InvalidBoardShape);
        }

        let count_of = |wanted: Mark| {
            let count = raw.marks.iter().filter(|&&mark| mark == wanted).count();
            CellCount::try_from(count).unwrap_or(CellCount::MAX)
        };
        for (what, wanted, stored) in [
            ("revealed", Mark::Revealed, raw.revealed_count),
            ("flagged", Mark::Flagged, raw.flagged_count),
        ] {
            let actual = count_of(wanted);
            if actual != stored {
                return Err(SnapshotError::CountMismatch { what, stored, actual });
            }
        }

        Ok(Self {
            grid: raw.grid,
            marks: raw.marks,
            revealed_count: raw.revealed_count,
            flagged_count: raw.flagged_count,
        })
    }
}

impl Index<Cell> for MarkState {
    type Output = Mark;

    fn index(&self, cell: Cell) -> &Self::Output {
        &self.marks[cell.to_nd_index()]
    }
}
