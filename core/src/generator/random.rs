use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::*;

/// Purely random placement driven by a reproducible seed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seeds from the thread-local generator.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> MineField {
        log::debug!(
            "Generating {}x{} minefield with {} mines, seed {}",
            config.rows(),
            config.cols(),
            config.mines(),
            self.seed
        );
        let mut rng = SmallRng::seed_from_u64(self.seed);
        MineField::generate(config, &mut rng)
    }
}
