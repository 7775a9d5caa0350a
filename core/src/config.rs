use serde::{Deserialize, Serialize};

use crate::*;

pub const DEFAULT_SIZE: Coord = 16;
pub const DEFAULT_MINES: CellCount = 40;
pub const DEFAULT_CANVAS_SIZE: u32 = 720;

/// Frames the surprised face stays up after a reveal.
pub const SURPRISE_FRAMES: u8 = 30;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord,
    pub mines: CellCount,
    pub canvas_size: u32,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord, mines: CellCount) -> Self {
        Self {
            size,
            mines,
            canvas_size: DEFAULT_CANVAS_SIZE,
        }
    }

    /// Square board of side `size` holding `mines` mines.
    ///
    /// At least one cell must stay free so that the first reveal is never a mine.
    pub fn new(size: Coord, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, mines);
        config.validate()?;
        Ok(config)
    }

    pub const fn with_canvas_size(self, canvas_size: u32) -> Self {
        Self {
            canvas_size,
            ..self
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(GameError::InvalidSize);
        }
        if self.mines >= self.total_cells() {
            return Err(GameError::TooManyMines);
        }
        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        cell_area(self.size, self.size)
    }

    pub const fn safe_cell_count(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }

    /// Side length of one cell in pixels when the board fills the canvas.
    pub const fn cell_pixel_size(&self) -> u32 {
        if self.size == 0 {
            return 0;
        }
        self.canvas_size / self.size as u32
    }

    pub fn contains(&self, (x, y): Coord2) -> bool {
        x < self.size && y < self.size
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(DEFAULT_SIZE, DEFAULT_MINES)
    }
}
