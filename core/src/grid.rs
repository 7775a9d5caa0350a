use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// The N×N board. Owns every cell; knows nothing about the game phase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridSnapshot")]
pub struct Grid {
    config: GameConfig,
    cells: Array2<Cell>,
    generated: bool,
}

/// Unchecked shape of a serialized [`Grid`].
#[derive(Deserialize)]
struct GridSnapshot {
    config: GameConfig,
    cells: Array2<Cell>,
    generated: bool,
}

impl TryFrom<GridSnapshot> for Grid {
    type Error = GameError;

    fn try_from(snapshot: GridSnapshot) -> Result<Self> {
        let GridSnapshot {
            config,
            cells,
            generated,
        } = snapshot;
        config.validate()?;

        let side = usize::from(config.size);
        if cells.dim() != (side, side) {
            return Err(GameError::LayoutMismatch);
        }

        let mines = cells.iter().filter(|cell| cell.is_mine()).count();
        let expected = if generated { config.mines } else { 0 };
        if mines != usize::from(expected) {
            return Err(GameError::LayoutMismatch);
        }

        Ok(Self {
            config,
            cells,
            generated,
        })
    }
}

impl Grid {
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cells: empty_cells(config.size),
            generated: false,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn size(&self) -> Coord {
        self.config.size
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn cell(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(self.cells[coords.to_nd_index()])
    }

    /// Cells in `(x, y)` order along with their coordinates.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((x, y), &cell)| ((x as Coord, y as Coord), cell))
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.config.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> Result<u8> {
        let coords = self.validate_coords(coords)?;
        let count = self
            .cells
            .iter_adjacent(coords)
            .filter(|&pos| self.cells[pos.to_nd_index()].is_mine())
            .count();
        Ok(count as u8)
    }

    /// Places the mines with `generator`, keeping `safe` clear, then fills in the
    /// adjacency counts. Only the first call per game does anything.
    pub fn generate(
        &mut self,
        safe: Coord2,
        generator: impl MinefieldGenerator,
    ) -> Result<MarkOutcome> {
        let safe = self.validate_coords(safe)?;
        if self.generated {
            log::debug!("Grid already generated, ignoring generate at {:?}", safe);
            return Ok(MarkOutcome::NoChange);
        }

        let layout = generator.generate(self.config, safe)?;
        layout.check_fits(&self.config, safe)?;

        for ((x, y), cell) in self.cells.indexed_iter_mut() {
            let coords = (x as Coord, y as Coord);
            cell.set_value(if layout.contains_mine(coords) {
                CellValue::Mine
            } else {
                CellValue::Count(layout.adjacent_mine_count(coords))
            });
        }
        self.generated = true;

        Ok(MarkOutcome::Changed)
    }

    /// Reveals `coords`. A zero cell opens its orthogonal neighbors, repeating from
    /// every zero reached; flagged cells stop the spread. A mine reveals the whole
    /// board. Nothing happens before [`generate`](Self::generate).
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        if !self.generated {
            log::debug!("Grid not generated yet, ignoring reveal at {:?}", coords);
            return Ok(RevealOutcome::NoChange);
        }

        let cell = self.cells[coords.to_nd_index()];
        if cell.is_revealed() || cell.is_flagged() {
            return Ok(RevealOutcome::NoChange);
        }

        if cell.is_mine() {
            log::debug!("Mine revealed at {:?}", coords);
            self.reveal_all();
            return Ok(RevealOutcome::HitMine);
        }

        self.cells[coords.to_nd_index()].mark_revealed();
        let mut to_visit = Vec::from([coords]);

        while let Some(visit_coords) = to_visit.pop() {
            if self.cells[visit_coords.to_nd_index()].count() != Some(0) {
                continue;
            }

            for pos in self.cells.iter_orthogonal(visit_coords) {
                let neighbor = &mut self.cells[pos.to_nd_index()];
                if neighbor.is_revealed() || neighbor.is_flagged() {
                    continue;
                }

                neighbor.mark_revealed();
                log::trace!("Flood revealed {:?}, count {:?}", pos, neighbor.count());
                to_visit.push(pos);
            }
        }

        if self.unrevealed_count() == self.config.mines {
            Ok(RevealOutcome::BoardCleared)
        } else {
            Ok(RevealOutcome::Continue)
        }
    }

    /// Toggles the flag on a hidden cell; revealed cells are left alone.
    pub fn flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.validate_coords(coords)?;
        let cell = &mut self.cells[coords.to_nd_index()];

        if cell.is_revealed() {
            return Ok(MarkOutcome::NoChange);
        }

        cell.toggle_flag();
        Ok(MarkOutcome::Changed)
    }

    /// Flags every mine that is not flagged yet.
    pub fn flag_all_mines(&mut self) -> MarkOutcome {
        let mut outcome = MarkOutcome::NoChange;
        for cell in self.cells.iter_mut() {
            if cell.is_mine() && !cell.is_flagged() {
                cell.toggle_flag();
                outcome = MarkOutcome::Changed;
            }
        }
        outcome
    }

    pub fn unrevealed_count(&self) -> CellCount {
        self.count_cells(|cell| !cell.is_revealed())
    }

    pub fn flagged_mine_count(&self) -> CellCount {
        self.count_cells(|cell| cell.is_mine() && cell.is_flagged())
    }

    pub fn flagged_count(&self) -> CellCount {
        self.count_cells(Cell::is_flagged)
    }

    /// Starts over with a blank board of the same size and mine count.
    pub fn reset(&mut self) {
        self.cells = empty_cells(self.config.size);
        self.generated = false;
    }

    fn reveal_all(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.mark_revealed();
        }
    }

    fn count_cells(&self, predicate: impl Fn(Cell) -> bool) -> CellCount {
        let count = self.cells.iter().filter(|&&cell| predicate(cell)).count();
        // bounded by size², which fits
        count as CellCount
    }
}

fn empty_cells(size: Coord) -> Array2<Cell> {
    Array2::default((size, size).to_nd_index())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated(size: Coord, mines: &[Coord2], safe: Coord2) -> Grid {
        let config = GameConfig::new(size, mines.len() as CellCount).unwrap();
        let mut grid = Grid::new(config).unwrap();
        grid.generate(safe, FixedMinefieldGenerator::new(mines))
            .unwrap();
        grid
    }

    fn revealed(grid: &Grid, coords: Coord2) -> bool {
        grid.cell(coords).unwrap().is_revealed()
    }

    #[test]
    fn new_grid_is_blank() {
        let grid = Grid::new(GameConfig::default()).unwrap();

        assert!(!grid.is_generated());
        assert_eq!(grid.unrevealed_count(), 256);
        assert!(grid.iter_cells().all(|(_, cell)| cell == Cell::default()));
    }

    #[test]
    fn generate_writes_mines_and_counts() {
        let grid = generated(3, &[(2, 2)], (0, 0));

        assert!(grid.is_generated());
        assert_eq!(grid.cell((2, 2)).unwrap().value(), CellValue::Mine);
        assert_eq!(grid.cell((1, 1)).unwrap().value(), CellValue::Count(1));
        assert_eq!(grid.cell((2, 1)).unwrap().value(), CellValue::Count(1));
        assert_eq!(grid.cell((0, 0)).unwrap().value(), CellValue::Count(0));
        assert_eq!(grid.adjacent_mine_count((1, 2)), Ok(1));
    }

    #[test]
    fn second_generate_is_ignored() {
        let mut grid = generated(3, &[(2, 2)], (0, 0));

        let outcome = grid
            .generate((0, 0), FixedMinefieldGenerator::new([(1, 1)]))
            .unwrap();

        assert_eq!(outcome, MarkOutcome::NoChange);
        assert!(grid.cell((2, 2)).unwrap().is_mine());
        assert!(!grid.cell((1, 1)).unwrap().is_mine());
    }

    #[test]
    fn flood_fill_stops_at_numbers() {
        let mut grid = generated(3, &[(2, 2)], (0, 0));

        let outcome = grid.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::BoardCleared);
        for coords in [(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1), (0, 2), (1, 2)] {
            assert!(revealed(&grid, coords), "{:?} should be revealed", coords);
        }
        assert!(!revealed(&grid, (2, 2)));
    }

    #[test]
    fn flood_fill_does_not_open_diagonal_neighbors() {
        let mut grid = generated(3, &[(2, 0), (0, 2)], (0, 0));

        assert_eq!(grid.reveal((0, 0)).unwrap(), RevealOutcome::Continue);

        assert!(revealed(&grid, (0, 0)));
        assert!(revealed(&grid, (1, 0)));
        assert!(revealed(&grid, (0, 1)));
        // only reachable diagonally from the zero at (0, 0)
        assert!(!revealed(&grid, (1, 1)));
        assert_eq!(grid.unrevealed_count(), 6);
    }

    #[test]
    fn flood_fill_skips_flagged_cells() {
        let mut grid = generated(4, &[(3, 3)], (0, 0));
        grid.flag((0, 1)).unwrap();
        grid.flag((1, 0)).unwrap();

        assert_eq!(grid.reveal((0, 0)).unwrap(), RevealOutcome::Continue);

        assert!(revealed(&grid, (0, 0)));
        assert!(!revealed(&grid, (0, 1)));
        assert!(!revealed(&grid, (1, 0)));
        assert!(!revealed(&grid, (2, 2)));
    }

    #[test]
    fn nonzero_cell_reveals_alone() {
        let mut grid = generated(3, &[(2, 2)], (0, 0));

        assert_eq!(grid.reveal((1, 1)).unwrap(), RevealOutcome::Continue);
        assert_eq!(grid.unrevealed_count(), 8);
    }

    #[test]
    fn hitting_a_mine_reveals_everything() {
        let mut grid = generated(3, &[(2, 2)], (0, 0));
        grid.flag((1, 1)).unwrap();

        assert_eq!(grid.reveal((2, 2)).unwrap(), RevealOutcome::HitMine);
        assert_eq!(grid.unrevealed_count(), 0);
        assert!(grid.cell((1, 1)).unwrap().is_flagged());
    }

    #[test]
    fn reveal_on_revealed_or_flagged_is_no_change() {
        let mut grid = generated(3, &[(2, 2)], (0, 0));
        grid.reveal((1, 1)).unwrap();
        grid.flag((0, 0)).unwrap();

        assert_eq!(grid.reveal((1, 1)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(grid.reveal((0, 0)).unwrap(), RevealOutcome::NoChange);
    }

    #[test]
    fn reveal_before_generate_is_no_change() {
        let mut grid = Grid::new(GameConfig::new(4, 3).unwrap()).unwrap();

        assert_eq!(grid.reveal((1, 1)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(grid.unrevealed_count(), 16);

        grid.generate((1, 1), FixedMinefieldGenerator::new([(3, 3), (3, 2), (0, 3)]))
            .unwrap();
        assert_eq!(grid.reveal((1, 1)).unwrap(), RevealOutcome::Continue);
        assert!(grid.cell((1, 1)).unwrap().is_revealed());
    }

    #[test]
    fn snapshot_with_wrong_shape_or_mines_is_rejected() {
        let grid = generated(3, &[(2, 2)], (0, 0));
        let snapshot = |config: GameConfig, cells: Array2<Cell>, generated: bool| GridSnapshot {
            config,
            cells,
            generated,
        };

        let resized = GameConfig::new(16, 1).unwrap();
        assert_eq!(
            Grid::try_from(snapshot(resized, grid.cells.clone(), true)),
            Err(GameError::LayoutMismatch)
        );
        let more_mines = GameConfig::new(3, 2).unwrap();
        assert_eq!(
            Grid::try_from(snapshot(more_mines, grid.cells.clone(), true)),
            Err(GameError::LayoutMismatch)
        );
        assert_eq!(
            Grid::try_from(snapshot(grid.config, grid.cells.clone(), false)),
            Err(GameError::LayoutMismatch)
        );
        assert_eq!(
            Grid::try_from(snapshot(grid.config, grid.cells.clone(), true)),
            Ok(grid)
        );
    }

    #[test]
    fn flag_on_revealed_cell_is_rejected() {
        let mut grid = generated(3, &[(2, 2)], (0, 0));
        grid.reveal((1, 1)).unwrap();

        assert_eq!(grid.flag((1, 1)).unwrap(), MarkOutcome::NoChange);
        assert!(!grid.cell((1, 1)).unwrap().is_flagged());
    }

    #[test]
    fn flagged_mine_count_ignores_wrong_flags() {
        let mut grid = generated(3, &[(2, 2), (0, 2)], (0, 0));
        grid.flag((2, 2)).unwrap();
        grid.flag((1, 1)).unwrap();

        assert_eq!(grid.flagged_mine_count(), 1);
        assert_eq!(grid.flagged_count(), 2);

        assert_eq!(grid.flag_all_mines(), MarkOutcome::Changed);
        assert_eq!(grid.flagged_mine_count(), 2);
        assert_eq!(grid.flag_all_mines(), MarkOutcome::NoChange);
    }

    #[test]
    fn out_of_bounds_is_an_error() {
        let mut grid = generated(3, &[(2, 2)], (0, 0));

        assert_eq!(grid.reveal((3, 0)), Err(GameError::OutOfBounds));
        assert_eq!(grid.flag((0, 3)), Err(GameError::OutOfBounds));
        assert_eq!(grid.cell((9, 9)), Err(GameError::OutOfBounds));
        assert_eq!(grid.adjacent_mine_count((3, 3)), Err(GameError::OutOfBounds));

        let mut blank = Grid::new(GameConfig::new(3, 1).unwrap()).unwrap();
        assert_eq!(
            blank.generate((3, 0), RandomMinefieldGenerator::new(1)),
            Err(GameError::OutOfBounds)
        );
        assert!(!blank.is_generated());
    }

    #[test]
    fn reset_restores_blank_board() {
        let mut grid = generated(3, &[(2, 2)], (0, 0));
        grid.flag((2, 2)).unwrap();
        grid.reveal((0, 0)).unwrap();

        grid.reset();

        assert!(!grid.is_generated());
        assert_eq!(grid.size(), 3);
        assert_eq!(grid.mine_count(), 1);
        assert!(grid.iter_cells().all(|(_, cell)| cell == Cell::default()));
    }

    #[test]
    fn single_cell_board_without_mines_clears_at_once() {
        let mut grid = Grid::new(GameConfig::new(1, 0).unwrap()).unwrap();

        grid.generate((0, 0), RandomMinefieldGenerator::new(0))
            .unwrap();

        assert_eq!(grid.reveal((0, 0)).unwrap(), RevealOutcome::BoardCleared);
        assert_eq!(grid.cell((0, 0)).unwrap().value(), CellValue::Count(0));
        assert_eq!(grid.unrevealed_count(), 0);
    }
}
