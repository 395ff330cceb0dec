use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use itertools::Itertools;
use ndarray::Array2;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;
use unordered_pair::UnorderedPair;

use crate::cell::{Cell, KindId};
use crate::location::{Coord, Dimension, Location};

/// Ways a pair removal can violate its contract.
///
/// These are caller bugs, not gameplay states; validate with
/// [`find_path`](Board::find_path) before removing.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PairError {
    /// Both positions refer to the same cell.
    SamePosition,
    /// At least one of the cells holds no tile.
    EmptyCell,
    /// The two cells hold tiles of different kinds.
    KindMismatch,
}

/// A bordered tile board.
///
/// Storage is `(rows + 2) × (cols + 2)`; the outer ring is a permanent empty
/// sentinel, so path scans can cross the frame without bounds branching.
/// Interior positions are 1-indexed, see [`Location`].
///
/// Boards come from [`Board::generate`] (random fill for play) or from a
/// [`BoardBuilder`](crate::builder::BoardBuilder) (authored layouts).
///
/// Positions outside the bordered range are programming errors; accessors
/// panic on them.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) cells: Array2<Cell>,
    // interior (rows, cols)
    pub(crate) dims: (Dimension, Dimension),
    pub(crate) kind_displays: Vec<char>,
}

pub(crate) fn interior_locations(rows: Coord, cols: Coord) -> impl Iterator<Item = Location> {
    (1..=rows).cartesian_product(1..=cols).map(|(r, c)| Location(r, c))
}

impl Board {
    /// Fill a fresh board of the given interior dimensions with randomly placed pairs.
    ///
    /// `floor(rows * cols / 2)` pairs are drawn by cycling freshly shuffled copies of
    /// `roster`, so a board may need more pairs than there are distinct kinds. Symbols
    /// land on a random subset of interior cells; for odd interior counts one cell
    /// stays empty. Every kind therefore appears an even number of times.
    ///
    /// Panics if `roster` is empty.
    pub fn generate(dims: (Dimension, Dimension), roster: &[char], rng: &mut impl Rng) -> Self {
        assert!(!roster.is_empty(), "kind roster must not be empty");

        let (rows, cols) = (dims.0.get(), dims.1.get());
        let pair_count = rows * cols / 2;

        let mut draws: Vec<KindId> = Vec::with_capacity(pair_count);
        while draws.len() < pair_count {
            let mut batch = (0..roster.len()).collect_vec();
            batch.shuffle(rng);
            batch.truncate(pair_count - draws.len());
            draws.extend(batch);
        }

        let mut symbols = draws.iter().flat_map(|kind| [*kind, *kind]).collect_vec();
        symbols.shuffle(rng);

        let mut positions = interior_locations(rows, cols).collect_vec();
        positions.shuffle(rng);

        let mut cells: Array2<Cell> = Array2::default((rows + 2, cols + 2));
        for (location, kind) in positions.into_iter().zip(symbols) {
            cells[location.as_index()] = Cell::Tile { kind };
        }

        debug!(rows, cols, pairs = pair_count, "generated board");

        Self {
            cells,
            dims,
            kind_displays: roster.to_vec(),
        }
    }

    /// Interior row count.
    pub fn rows(&self) -> Coord {
        self.dims.0.get()
    }

    /// Interior column count.
    pub fn cols(&self) -> Coord {
        self.dims.1.get()
    }

    /// The cell at `location` in bordered space.
    pub fn cell(&self, location: Location) -> Cell {
        self.cells[location.as_index()]
    }

    /// All interior positions, row-major.
    pub fn interior(&self) -> impl Iterator<Item = Location> {
        interior_locations(self.rows(), self.cols())
    }

    /// How many tiles remain on the board.
    pub fn tile_count(&self) -> usize {
        self.interior().filter(|loc| !self.cell(*loc).is_empty()).count()
    }

    /// The display character for a kind, as passed at generation or build time.
    pub fn kind_display(&self, kind: KindId) -> char {
        self.kind_displays[kind]
    }

    /// Check the removal contract for two positions: distinct cells, both
    /// occupied, equal kinds. Returns the shared kind.
    pub(crate) fn pair_kind(&self, pair: UnorderedPair<Location>) -> Result<KindId, PairError> {
        let UnorderedPair(a, b) = pair;
        if a == b {
            return Err(PairError::SamePosition);
        }
        match (self.cell(a).kind(), self.cell(b).kind()) {
            (Some(ka), Some(kb)) if ka == kb => Ok(ka),
            (Some(_), Some(_)) => Err(PairError::KindMismatch),
            _ => Err(PairError::EmptyCell),
        }
    }

    /// Remove a matching pair of tiles, leaving both cells empty.
    ///
    /// Returns the removed kind, or a [`PairError`] without touching the board
    /// if the positions do not hold equal non-empty kinds.
    pub fn remove_pair(&mut self, pair: UnorderedPair<Location>) -> Result<KindId, PairError> {
        let kind = self.pair_kind(pair)?;
        self.clear_pair(pair);
        Ok(kind)
    }

    pub(crate) fn clear_pair(&mut self, pair: UnorderedPair<Location>) {
        let UnorderedPair(a, b) = pair;
        self.cells[a.as_index()] = Cell::Empty;
        self.cells[b.as_index()] = Cell::Empty;
    }

    /// Redistribute the symbols of all remaining tiles across the currently
    /// occupied cells. The multiset of kinds and the set of occupied positions
    /// are both preserved; only the assignment changes.
    pub fn shuffle_tiles(&mut self, rng: &mut impl Rng) {
        let occupied = self
            .interior()
            .filter(|loc| !self.cell(*loc).is_empty())
            .collect_vec();
        let mut symbols = occupied
            .iter()
            .filter_map(|loc| self.cell(*loc).kind())
            .collect_vec();
        symbols.shuffle(rng);

        for (location, kind) in occupied.into_iter().zip(symbols) {
            self.cells[location.as_index()] = Cell::Tile { kind };
        }
    }

    /// Remaining tile positions grouped by kind. Kinds come out in ascending
    /// id order and positions row-major, so scans over the result are
    /// deterministic.
    pub(crate) fn kind_positions(&self) -> BTreeMap<KindId, Vec<Location>> {
        let mut buckets: BTreeMap<KindId, Vec<Location>> = BTreeMap::new();
        for location in self.interior() {
            if let Some(kind) = self.cell(location).kind() {
                buckets.entry(kind).or_default().push(location);
            }
        }
        buckets
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for r in 1..=self.rows() {
            for c in 1..=self.cols() {
                let ch = match self.cell(Location(r, c)) {
                    Cell::Tile { kind } => self.kind_displays[kind],
                    Cell::Empty => '.',
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
