use std::num::NonZero;

use ndarray::Array2;
use unordered_pair::UnorderedPair;

use crate::board::Board;
use crate::cell::{Cell, KindId};
use crate::location::{Dimension, Location};

/// Reasons a builder may become invalid while building.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BuilderInvalidReason {
    /// A tile was placed outside the interior of the board; the sentinel
    /// border and anything beyond it must stay empty.
    FeatureOutOfBounds,
    /// At [`build`](BoardBuilder::build) time, some kind appeared an odd
    /// number of times, so the board could never be cleared.
    UnpairedKind,
}

/// A builder for authored board layouts, as used by tests and by embedders
/// that ship fixed puzzles. Random boards for play come from
/// [`Board::generate`] instead.
///
/// Builders mutate themselves while building but can be [`Clone`]d to save
/// their state at some point.
#[derive(Clone)]
pub struct BoardBuilder {
    // interior (rows, cols)
    dims: (Dimension, Dimension),
    cells: Array2<Cell>,
    kind_displays: Vec<char>,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl Default for BoardBuilder {
    fn default() -> Self {
        Self::with_dims((NonZero::new(4).unwrap(), NonZero::new(4).unwrap()))
    }
}

impl BoardBuilder {
    /// Construct a new builder for an empty board with the specified interior
    /// dimensions, in `(rows, cols)` order.
    pub fn with_dims(dims: (Dimension, Dimension)) -> Self {
        Self {
            dims,
            cells: Array2::default((dims.0.get() + 2, dims.1.get() + 2)),
            kind_displays: Vec::new(),
            invalid_reasons: Vec::new(),
        }
    }

    fn kind_for(&mut self, display: char) -> KindId {
        match self.kind_displays.iter().position(|d| *d == display) {
            Some(kind) => kind,
            None => {
                self.kind_displays.push(display);
                self.kind_displays.len() - 1
            }
        }
    }

    /// Place a single tile showing `display` at `location`. Repeated display
    /// characters share a kind.
    ///
    /// May cause the builder to enter a
    /// [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid
    /// state if `location` is not an interior cell.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn place(&mut self, display: char, location: Location) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !(1..=self.dims.0.get()).contains(&location.0)
            || !(1..=self.dims.1.get()).contains(&location.1)
        {
            self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds);
            return self;
        }

        let kind = self.kind_for(display);
        self.cells[location.as_index()] = Cell::Tile { kind };
        self
    }

    /// Place a matching pair of tiles. The order in which the `locations` are
    /// specified does not matter.
    ///
    /// Same invalidation conditions as [`place`](BoardBuilder::place).
    pub fn place_pair(&mut self, display: char, locations: UnorderedPair<Location>) -> &mut Self {
        self.place(display, locations.0).place(display, locations.1)
    }

    /// Check the validity of this builder, ensuring no
    /// [`BuilderInvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`Board`].
    ///
    /// Fails with [`UnpairedKind`](BuilderInvalidReason::UnpairedKind) if any
    /// kind appears an odd number of times, or with the accumulated reasons if
    /// the builder was already invalid.
    pub fn build(&self) -> Result<Board, Vec<BuilderInvalidReason>> {
        if !self.invalid_reasons.is_empty() {
            return Err(self.invalid_reasons.clone());
        }

        for kind in 0..self.kind_displays.len() {
            let count = self
                .cells
                .iter()
                .filter(|cell| cell.kind() == Some(kind))
                .count();
            if count % 2 != 0 {
                return Err(vec![BuilderInvalidReason::UnpairedKind]);
            }
        }

        Ok(Board {
            cells: self.cells.clone(),
            dims: self.dims,
            kind_displays: self.kind_displays.clone(),
        })
    }
}
