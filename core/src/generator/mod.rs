use alloc::vec::Vec;

use crate::*;
pub use random::*;

mod random;

/// Produces the mine layout for a new game once the first revealed cell is known.
///
/// Implementations must place exactly `config.mines` mines and never mine `safe`.
pub trait MinefieldGenerator {
    fn generate(self, config: GameConfig, safe: Coord2) -> Result<MineLayout>;
}

/// Places mines at fixed coordinates, for replays and deterministic tests.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedMinefieldGenerator {
    mines: Vec<Coord2>,
}

impl FixedMinefieldGenerator {
    pub fn new(mines: impl Into<Vec<Coord2>>) -> Self {
        Self {
            mines: mines.into(),
        }
    }
}

impl MinefieldGenerator for FixedMinefieldGenerator {
    fn generate(self, config: GameConfig, safe: Coord2) -> Result<MineLayout> {
        config.validate()?;
        if !config.contains(safe) {
            return Err(GameError::OutOfBounds);
        }

        let layout = MineLayout::from_mine_coords(config.size, &self.mines)?;
        layout.check_fits(&config, safe)?;
        Ok(layout)
    }
}
