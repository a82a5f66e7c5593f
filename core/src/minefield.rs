use core::ops::Index;
use ndarray::Array2;
use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

use crate::*;

/// Mine placement for a single game. Never mutated once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMineField")]
pub struct MineField {
    grid: Grid,
    mines: Array2<bool>,
    count: CellCount,
}

impl MineField {
    /// Places exactly `config.mines()` mines on distinct cells drawn uniformly at random.
    pub fn generate<R: Rng>(config: GameConfig, rng: &mut R) -> Self {
        let grid = config.grid();
        let cols = usize::from(grid.cols());
        let mut mines: Array2<bool> = Array2::default(grid.shape());

        let picked = index::sample(rng, usize::from(config.total_cells()), usize::from(config.mines()));
        for position in picked {
            mines[[position / cols, position % cols]] = true;
        }

        let field = Self::from_mask(grid, mines);
        if field.count != config.mines() {
            log::warn!(
                "Generated minefield count mismatch, actual: {}, requested: {}",
                field.count,
                config.mines()
            );
        }
        field
    }

    /// Validates the parameters, then generates.
    pub fn try_generate<R: Rng>(
        rows: Coord,
        cols: Coord,
        mines: CellCount,
        rng: &mut R,
    ) -> Result<Self> {
        let config = GameConfig::new(rows, cols, mines)?;
        Ok(Self::generate(config, rng))
    }

    /// Builds a fixed layout. Duplicate cells count once.
    pub fn from_mine_cells(rows: Coord, cols: Coord, mine_cells: &[Cell]) -> Result<Self> {
        let grid = GameConfig::new(rows, cols, 0)?.grid();
        let mut mines: Array2<bool> = Array2::default(grid.shape());

        for &cell in mine_cells {
            let cell = grid.validate(cell)?;
            mines[cell.to_nd_index()] = true;
        }

        let field = Self::from_mask(grid, mines);
        GameConfig::new(rows, cols, field.count)?;
        Ok(field)
    }

    fn from_mask(grid: Grid, mines: Array2<bool>) -> Self {
        let count = mines.iter().filter(|&&has_mine| has_mine).count();
        Self {
            grid,
            mines,
            // bounded by the grid area, which always fits
            count: CellCount::try_from(count).unwrap_or(CellCount::MAX),
        }
    }

    pub fn config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.grid.rows(), self.grid.cols(), self.count)
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn mine_count(&self) -> CellCount {
        self.count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.grid.total_cells() - self.count
    }

    pub fn has_mine(&self, cell: Cell) -> Result<bool> {
        let cell = self.grid.validate(cell)?;
        Ok(self[cell])
    }

    pub fn neighbor_mine_count(&self, cell: Cell) -> Result<u8> {
        let cell = self.grid.validate(cell)?;
        Ok(self.adjacent_mine_count(cell))
    }

    /// Mine positions in row-major order.
    pub fn mine_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.grid.cells().filter(|&cell| self[cell])
    }

    /// Caller guarantees `cell` is in bounds.
    pub(crate) fn adjacent_mine_count(&self, cell: Cell) -> u8 {
        let mut count = 0;
        for neighbor in self.grid.neighbors(cell) {
            if self[neighbor] {
                count += 1;
            }
        }
        count
    }
}

#[derive(Deserialize)]
struct RawMineField {
    grid: Grid,
    mines: Array2<bool>,
    count: CellCount,
}

impl TryFrom<RawMineField> for MineField {
    type Error = SnapshotError;

    fn try_from(raw: RawMineField) -> core::result::Result<Self, Self::Error> {
        let (rows, cols) = (raw.grid.rows(), raw.grid.cols());
        GameConfig::new(rows, cols, 0)?;
        if raw.mines.shape() != &raw.grid.shape()[..] {
            return Err(SnapshotError::InvalidBoardShape);
        }

        let field = Self::from_mask(raw.grid, raw.mines);
        if field.count != raw.count {
            return Err(SnapshotError::CountMismatch {
                what: "mine",
                stored: raw.count,
                actual: field.count,
            });
        }
        GameConfig::new(rows, cols, field.count)?;
        Ok(field)
    }
}

impl Index<Cell> for MineField {
    type Output = bool;

    fn index(&self, cell: Cell) -> &Self::Output {
        &self.mines[cell.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn cells(coords: &[Coord2]) -> Vec<Cell> {
        coords.iter().copied().map(Cell::from).collect()
    }

    #[test]
    fn generate_places_exact_mine_count() {
        let mut rng = SmallRng::seed_from_u64(7);

        for difficulty in Difficulty::ALL {
            let config = difficulty.config();
            let field = MineField::generate(config, &mut rng);

            assert_eq!(field.mine_count(), config.mines());
            assert_eq!(field.mine_cells().count(), usize::from(config.mines()));
        }
    }

    #[test]
    fn generate_fills_all_but_one_cell() {
        let mut rng = SmallRng::seed_from_u64(99);
        let config = GameConfig::new(3, 3, 8).unwrap();

        let field = MineField::generate(config, &mut rng);

        assert_eq!(field.mine_count(), 8);
        assert_eq!(field.safe_cell_count(), 1);
    }

    #[test]
    fn generate_fills_large_board_almost_entirely() {
        let mut rng = SmallRng::seed_from_u64(3);
        let config = GameConfig::new(255, 255, 65024).unwrap();

        let field = MineField::generate(config, &mut rng);

        assert_eq!(field.mine_count(), 65024);
        assert_eq!(field.safe_cell_count(), 1);
    }

    #[test]
    fn generate_is_deterministic_for_a_seed() {
        let config = Difficulty::Intermediate.config();

        let a = MineField::generate(config, &mut SmallRng::seed_from_u64(1234));
        let b = MineField::generate(config, &mut SmallRng::seed_from_u64(1234));

        assert_eq!(a, b);
    }

    #[test]
    fn try_generate_rejects_bad_parameters() {
        let mut rng = SmallRng::seed_from_u64(0);

        assert_eq!(
            MineField::try_generate(0, 4, 1, &mut rng),
            Err(GameError::Config(ConfigError::EmptyBoard { rows: 0, cols: 4 }))
        );
        assert_eq!(
            MineField::try_generate(3, 3, 9, &mut rng),
            Err(GameError::Config(ConfigError::TooManyMines { mines: 9, cells: 9 }))
        );
    }

    #[test]
    fn from_mine_cells_collapses_duplicates() {
        let field = MineField::from_mine_cells(3, 3, &cells(&[(0, 0), (2, 1), (0, 0)])).unwrap();

        assert_eq!(field.mine_count(), 2);
        assert_eq!(field.mine_cells().collect::<Vec<_>>(), cells(&[(0, 0), (2, 1)]));
    }

    #[test]
    fn from_mine_cells_rejects_out_of_bounds_and_full_boards() {
        assert_eq!(
            MineField::from_mine_cells(2, 2, &cells(&[(2, 0)])),
            Err(GameError::OutOfBounds(Cell::new(2, 0)))
        );
        assert_eq!(
            MineField::from_mine_cells(1, 2, &cells(&[(0, 0), (0, 1)])),
            Err(GameError::Config(ConfigError::TooManyMines { mines: 2, cells: 2 }))
        );
    }

    #[test]
    fn neighbor_mine_count_handles_edges() {
        let field = MineField::from_mine_cells(3, 3, &cells(&[(0, 0), (0, 2), (2, 2)])).unwrap();

        assert_eq!(field.neighbor_mine_count(Cell::new(1, 1)), Ok(3));
        assert_eq!(field.neighbor_mine_count(Cell::new(0, 1)), Ok(2));
        assert_eq!(field.neighbor_mine_count(Cell::new(2, 0)), Ok(0));
        assert_eq!(field.neighbor_mine_count(Cell::new(0, 0)), Ok(0));
    }

    #[test]
    fn queries_are_bounds_checked() {
        let field = MineField::from_mine_cells(2, 2, &[]).unwrap();

        assert_eq!(field.has_mine(Cell::new(1, 1)), Ok(false));
        assert_eq!(field.has_mine(Cell::new(0, 2)), Err(GameError::OutOfBounds(Cell::new(0, 2))));
        assert_eq!(
            field.neighbor_mine_count(Cell::new(5, 5)),
            Err(GameError::OutOfBounds(Cell::new(5, 5)))
        );
    }
}
