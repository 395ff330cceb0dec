use std::num::NonZero;

use ndarray::Ix;
use strum::VariantArray;

/// One coordinate of a board position.
pub type Coord = usize;
/// A board dimension, which is never zero.
pub type Dimension = NonZero<Coord>;

/// A `(row, col)` position in bordered board space.
///
/// Interior (playable) cells are 1-indexed: rows `1..=rows` and columns `1..=cols`.
/// Row 0, column 0, row `rows + 1`, and column `cols + 1` form the sentinel border,
/// which is permanently empty and addressable so path scans can route through it.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Location(pub Coord, pub Coord);

impl Location {
    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.0, self.1)
    }

    /// The row of this position, counted from the top border.
    pub fn row(&self) -> Coord {
        self.0
    }

    /// The column of this position, counted from the left border.
    pub fn col(&self) -> Coord {
        self.1
    }
}

impl From<(Ix, Ix)> for Location {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.0, value.1)
    }
}

/// Scan axes for the two-turn detour search, in priority order: the row scan
/// must run to exhaustion before the column scan starts.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug)]
pub(crate) enum Axis {
    Row,
    Col,
}
