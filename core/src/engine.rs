use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::*;

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    InProgress,
    Won,
    Lost,
}

impl GameState {
    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::InProgress
    }
}

/// Outcome of revealing a cell
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    Continuing,
    Won,
    Lost,
    /// Flagged, already revealed, or the game is over; nothing changed
    Rejected,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

/// A single game from first reveal to win or loss. Start a new game by building a new engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBoardEngine")]
pub struct BoardEngine {
    minefield: MineField,
    seed: Option<u64>,
    marks: MarkState,
    cells_remaining: CellCount,
    state: GameState,
    triggered_mine: Option<Cell>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl BoardEngine {
    /// Random layout; pass a seed to reproduce a game.
    pub fn new_game(config: GameConfig, seed: Option<u64>) -> Self {
        let generator = match seed {
            Some(seed) => RandomMinefieldGenerator::new(seed),
            None => RandomMinefieldGenerator::from_entropy(),
        };
        let mut engine = Self::with_minefield(generator.generate(config));
        engine.seed = Some(generator.seed());
        engine
    }

    pub fn new_game_with_size(
        rows: Coord,
        cols: Coord,
        mines: CellCount,
        seed: Option<u64>,
    ) -> Result<Self> {
        let config = GameConfig::new(rows, cols, mines)?;
        Ok(Self::new_game(config, seed))
    }

    pub fn with_minefield(minefield: MineField) -> Self {
        let grid = minefield.grid();
        Self {
            cells_remaining: minefield.safe_cell_count(),
            marks: MarkState::new(grid),
            minefield,
            seed: None,
            state: Default::default(),
            triggered_mine: None,
            started_at: None,
            ended_at: None,
        }
    }

    /// Fresh game over the same mine layout.
    pub fn restart(&self) -> Self {
        log::debug!("Restarting game with the same minefield");
        let mut engine = Self::with_minefield(self.minefield.clone());
        engine.seed = self.seed;
        engine
    }

    /// Seed the mine layout was generated from, `None` for hand-built layouts.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn config(&self) -> GameConfig {
        self.minefield.config()
    }

    pub fn grid(&self) -> Grid {
        self.minefield.grid()
    }

    pub fn game_state(&self) -> GameState {
        self.state
    }

    pub fn is_won(&self) -> bool {
        self.state == GameState::Won
    }

    pub fn is_lost(&self) -> bool {
        self.state == GameState::Lost
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn total_mines(&self) -> CellCount {
        self.minefield.mine_count()
    }

    pub fn cells_remaining_to_reveal(&self) -> CellCount {
        self.cells_remaining
    }

    pub fn flag_count(&self) -> CellCount {
        self.marks.flagged_count()
    }

    /// How many mines have not been flagged yet, negative when over-flagged
    pub fn mines_left(&self) -> isize {
        (self.minefield.mine_count() as isize) - (self.marks.flagged_count() as isize)
    }

    pub fn triggered_mine(&self) -> Option<Cell> {
        self.triggered_mine
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// How many seconds have passed since game started, 0 if it hasn't started
    pub fn elapsed_secs(&self) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or_else(Utc::now) - started_at)
                .num_seconds()
                .clamp(0, u32::MAX.into()) as u32
        } else {
            0
        }
    }

    pub fn neighbor_mine_count(&self, cell: impl Into<Cell>) -> Result<u8> {
        self.minefield.neighbor_mine_count(cell.into())
    }

    pub fn has_mine(&self, cell: impl Into<Cell>) -> Result<bool> {
        self.minefield.has_mine(cell.into())
    }

    pub fn mark_at(&self, cell: impl Into<Cell>) -> Result<Mark> {
        self.marks.mark_at(cell.into())
    }

    pub fn is_revealed(&self, cell: impl Into<Cell>) -> Result<bool> {
        self.marks.is_revealed(cell.into())
    }

    pub fn is_flagged(&self, cell: impl Into<Cell>) -> Result<bool> {
        self.marks.is_flagged(cell.into())
    }

    /// Mine positions in row-major order, for showing the board once the game is over.
    pub fn mine_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.minefield.mine_cells()
    }

    /// Display state of a cell. Mines and wrong flags only surface once the game is over.
    pub fn tile_at(&self, cell: impl Into<Cell>) -> Result<Tile> {
        let cell = self.grid().validate(cell.into())?;
        let has_mine = self.minefield[cell];

        Ok(match (self.marks[cell], has_mine, self.state) {
            (Mark::Revealed, true, _) => Tile::Exploded,
            (Mark::Revealed, false, _) => Tile::Open(self.minefield.adjacent_mine_count(cell)),
            (Mark::Flagged, false, GameState::Lost) => Tile::WrongFlag,
            (Mark::Flagged, _, _) => Tile::Flagged,
            (Mark::Hidden, true, GameState::Lost) => Tile::Mine,
            (Mark::Hidden, true, GameState::Won) => Tile::Flagged,
            (Mark::Hidden, _, _) => Tile::Hidden,
        })
    }

    pub fn toggle_flag(&mut self, cell: impl Into<Cell>) -> Result<FlagOutcome> {
        let cell = self.grid().validate(cell.into())?;

        if self.state.is_finished() {
            return Ok(FlagOutcome::Rejected);
        }

        let outcome = self.marks.toggle_flag(cell)?;
        log::debug!("Toggle flag at {}: {:?}", cell, outcome);
        Ok(outcome)
    }

    /// Reveal a hidden cell, flood-filling outward when it has no adjacent mines
    pub fn reveal(&mut self, cell: impl Into<Cell>) -> Result<RevealOutcome> {
        let cell = self.grid().validate(cell.into())?;

        if self.state.is_finished() {
            return Ok(RevealOutcome::Rejected);
        }

        if !self.marks.reveal_cell(cell).has_update() {
            log::trace!("Reveal at {} rejected, cell is {:?}", cell, self.marks[cell]);
            return Ok(RevealOutcome::Rejected);
        }
        self.mark_started();

        if self.minefield[cell] {
            log::debug!("Revealed mine at {}", cell);
            self.triggered_mine = Some(cell);
            self.end_game(GameState::Lost);
            return Ok(RevealOutcome::Lost);
        }

        self.cells_remaining -= 1;
        let count = self.minefield.adjacent_mine_count(cell);
        log::debug!("Revealed cell at {}, mine count: {}", cell, count);

        if count == 0 {
            self.flood_fill(cell);
        }

        if self.cells_remaining == 0 {
            self.end_game(GameState::Won);
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Continuing)
        }
    }

    /// Breadth-first expansion from a revealed zero cell. Only hidden cells are opened, so each
    /// cell enters the queue at most once and flags are left alone.
    fn flood_fill(&mut self, origin: Cell) {
        let grid = self.grid();
        let mut to_visit = VecDeque::from([origin]);
        let mut opened: CellCount = 0;
        log::trace!("Starting flood-fill from {}", origin);

        while let Some(visit) = to_visit.pop_front() {
            for neighbor in grid.neighbors(visit) {
                if !self.marks.reveal_cell(neighbor).has_update() {
                    continue;
                }
                debug_assert!(!self.minefield[neighbor], "zero cell next to a mine");

                self.cells_remaining -= 1;
                opened += 1;

                let count = self.minefield.adjacent_mine_count(neighbor);
                log::trace!("Flood opened cell at {}, mine count: {}", neighbor, count);

                if count == 0 {
                    to_visit.push_back(neighbor);
                }
            }
        }

        log::debug!("Flood-fill from {} opened {} cells", origin, opened);
    }

    fn mark_started(&mut self) {
        if self.started_at.is_none() {
            let now = Utc::now();
            log::debug!("started at {}", now);
            self.started_at = Some(now);
        }
    }

    fn end_game(&mut self, state: GameState) {
        if self.state.is_finished() {
            return;
        }

        let now = Utc::now();
        log::debug!("Game ended at {}: {:?}", now, state);
        self.state = state;
        self.ended_at = Some(now);
    }
}

#[derive(Deserialize)]
struct RawBoardEngine {
    minefield: MineField,
    seed: Option<u64>,
    marks: MarkState,
    cells_remaining: CellCount,
    state: GameState,
    triggered_mine: Option<Cell>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl TryFrom<RawBoardEngine> for BoardEngine {
    type Error = SnapshotError;

    fn try_from(raw: RawBoardEngine) -> core::result::Result<Self, Self::Error> {
        let grid = raw.minefield.grid();
        if raw.marks.grid() != grid {
            return Err(SnapshotError::InvalidBoardShape);
        }

        let exploded: Vec<Cell> = grid
            .cells()
            .filter(|&cell| raw.marks[cell] == Mark::Revealed && raw.minefield[cell])
            .collect();
        let revealed_safe = raw.marks.revealed_count() - exploded.len() as CellCount;
        let remaining = raw.minefield.safe_cell_count() - revealed_safe;
        if remaining != raw.cells_remaining {
            return Err(SnapshotError::CountMismatch {
                what: "remaining cell",
                stored: raw.cells_remaining,
                actual: remaining,
            });
        }

        let consistent = match raw.state {
            GameState::InProgress => exploded.is_empty() && remaining > 0 && raw.triggered_mine.is_none(),
            GameState::Won => exploded.is_empty() && remaining == 0 && raw.triggered_mine.is_none(),
            GameState::Lost => exploded.len() == 1 && raw.triggered_mine == exploded.first().copied(),
        };
        if !consistent {
            return Err(SnapshotError::InconsistentState(match raw.state {
                GameState::InProgress => "InProgress",
                GameState::Won => "Won",
                GameState::Lost => "Lost",
            }));
        }

        Ok(Self {
            minefield: raw.minefield,
            seed: raw.seed,
            marks: raw.marks,
            cells_remaining: raw.cells_remaining,
            state: raw.state,
            triggered_mine: raw.triggered_mine,
            started_at: raw.started_at,
            ended_at: raw.ended_at,
        })
    }
}
