use ndarray::Array2;

use super::*;

/// Draws per mine before the sampler stops rejecting and picks a free cell directly.
const ATTEMPTS_PER_CELL: u32 = 64;

/// Uniform placement by rejection sampling: draw a random cell until it is neither a
/// mine nor the start cell. Deterministic for a given seed.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
    attempts_per_cell: u32,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            attempts_per_cell: ATTEMPTS_PER_CELL,
        }
    }

    /// Overrides the draw budget; zero makes every mine come from the free-cell pick.
    pub fn with_attempts_per_cell(self, attempts_per_cell: u32) -> Self {
        Self {
            attempts_per_cell,
            ..self
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig, safe: Coord2) -> Result<MineLayout> {
        use rand::prelude::*;

        config.validate()?;
        if !config.contains(safe) {
            return Err(GameError::OutOfBounds);
        }

        let total_cells = config.total_cells();
        let max_attempts = u32::from(total_cells).saturating_mul(self.attempts_per_cell);
        let mut mines: Array2<bool> = Array2::default((config.size, config.size).to_nd_index());
        let mut rng = SmallRng::seed_from_u64(self.seed);

        for placed in 0..config.mines {
            let mut drawn = None;
            for _ in 0..max_attempts {
                let coords = (
                    rng.random_range(0..config.size),
                    rng.random_range(0..config.size),
                );
                if coords != safe && !mines[coords.to_nd_index()] {
                    drawn = Some(coords);
                    break;
                }
            }

            let coords = match drawn {
                Some(coords) => coords,
                None => {
                    // the start cell and every placed mine are taken
                    let free_cells = total_cells - 1 - placed;
                    log::warn!(
                        "Rejection sampling gave up after {} draws, picking among {} free cells",
                        max_attempts,
                        free_cells
                    );
                    let nth = rng.random_range(0..free_cells);
                    nth_free_cell(&mines, safe, nth).ok_or(GameError::TooManyMines)?
                }
            };
            mines[coords.to_nd_index()] = true;
        }

        let layout = MineLayout::from_mine_mask(mines);
        log::debug!(
            "Generated {} mines on a {}x{} board, seed {}, safe start at {:?}",
            layout.mine_count(),
            config.size,
            config.size,
            self.seed,
            safe
        );
        Ok(layout)
    }
}

fn nth_free_cell(mines: &Array2<bool>, safe: Coord2, nth: CellCount) -> Option<Coord2> {
    mines
        .indexed_iter()
        .filter(|&(_, &is_mine)| !is_mine)
        .filter_map(|((x, y), _)| Some((x.try_into().ok()?, y.try_into().ok()?)))
        .filter(|&coords| coords != safe)
        .nth(nth.into())
}
