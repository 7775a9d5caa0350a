use ndarray::Array2;

/// Position along one board axis; a side holds at most 255 cells.
pub type Coord = u8;

/// Tally of cells or mines. A full 255×255 board still fits.
pub type CellCount = u16;

/// Board position as `(x, y)`, `x` being the column.
pub type Coord2 = (Coord, Coord);

/// Turns a board position into the index `ndarray` expects.
pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        let (x, y) = self;
        [usize::from(x), usize::from(y)]
    }
}

/// Number of cells on a `width` × `height` board.
pub const fn cell_area(width: Coord, height: Coord) -> CellCount {
    (width as CellCount).saturating_mul(height as CellCount)
}

pub trait NeighborIterExt {
    /// All in-bounds cells of the 8-neighborhood.
    fn iter_adjacent(&self, index: Coord2) -> NeighborIter;

    /// In-bounds cells to the north, south, east and west.
    fn iter_orthogonal(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_adjacent(&self, index: Coord2) -> NeighborIter {
        NeighborIter::new(index, bounds_of(self), &ADJACENT)
    }

    fn iter_orthogonal(&self, index: Coord2) -> NeighborIter {
        NeighborIter::new(index, bounds_of(self), &ORTHOGONAL)
    }
}

fn bounds_of<T>(array: &Array2<T>) -> Coord2 {
    let (x, y) = array.dim();
    (clamp_dim(x), clamp_dim(y))
}

fn clamp_dim(dim: usize) -> Coord {
    dim.try_into().unwrap_or(Coord::MAX)
}

const ADJACENT: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const ORTHOGONAL: [(i8, i8); 4] = [(-1, 0), (0, 1), (0, -1), (1, 0)];

/// Shifts `coords` by `delta`, or `None` when that steps off the board.
fn offset((x, y): Coord2, (dx, dy): (i8, i8), (width, height): Coord2) -> Option<Coord2> {
    let x = x.checked_add_signed(dx).filter(|&x| x < width)?;
    let y = y.checked_add_signed(dy).filter(|&y| y < height)?;
    Some((x, y))
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    displacements: &'static [(i8, i8)],
    index: u8,
}

impl NeighborIter {
    fn new(center: Coord2, bounds: Coord2, displacements: &'static [(i8, i8)]) -> Self {
        Self {
            center,
            bounds,
            displacements,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *self.displacements.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = offset(self.center, delta, self.bounds) {
                return Some(next_item);
            }
        }
    }
}
