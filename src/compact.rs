use itertools::Itertools;
use ndarray::Array2;

use crate::board::Board;
use crate::cell::Cell;
use crate::location::Location;

/// One tile's movement in a settle pass. Tiles that stay put are reported
/// with `from == to`, so a mapping always covers every occupied cell.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TileMove {
    /// Where the tile currently sits.
    pub from: Location,
    /// Where the tile ends up after gravity and left-fill.
    pub to: Location,
}

impl TileMove {
    /// Whether this move actually displaces the tile.
    pub fn is_displacement(&self) -> bool {
        self.from != self.to
    }
}

impl Board {
    /// Compute the repacking mapping after removals: per column, tiles slide
    /// toward the bottom row preserving top-to-bottom order; then per row of
    /// that intermediate layout, tiles slide toward the leftmost column
    /// preserving left-to-right order.
    ///
    /// The board is not touched; the presentation layer can animate each tile
    /// from `from` to `to` before committing with [`settle`](Board::settle).
    /// On an already-settled board every move has `from == to`.
    pub fn settle_mapping(&self) -> Vec<TileMove> {
        let occupied = self
            .interior()
            .filter(|loc| !self.cell(*loc).is_empty())
            .collect_vec();

        // gravity: bottom-anchored per column
        let mut after_gravity: Vec<(Location, Location)> = Vec::with_capacity(occupied.len());
        for c in 1..=self.cols() {
            let column = occupied
                .iter()
                .filter(|loc| loc.col() == c)
                .sorted_by_key(|loc| std::cmp::Reverse(loc.row()));
            let mut write = self.rows();
            for src in column {
                after_gravity.push((*src, Location(write, c)));
                write -= 1;
            }
        }

        // left-fill: per row of the post-gravity layout
        let mut mapping = Vec::with_capacity(occupied.len());
        for r in 1..=self.rows() {
            let row = after_gravity
                .iter()
                .filter(|(_, mid)| mid.row() == r)
                .sorted_by_key(|(_, mid)| mid.col());
            let mut write = 1;
            for (src, _) in row {
                mapping.push(TileMove {
                    from: *src,
                    to: Location(r, write),
                });
                write += 1;
            }
        }

        mapping
    }

    /// Repack the board according to [`settle_mapping`](Board::settle_mapping),
    /// rebuilding the grid fresh from the mapping, and return the moves.
    pub fn settle(&mut self) -> Vec<TileMove> {
        let mapping = self.settle_mapping();

        let mut cells: Array2<Cell> = Array2::default(self.cells.raw_dim());
        for m in &mapping {
            cells[m.to.as_index()] = self.cells[m.from.as_index()];
        }
        self.cells = cells;

        mapping
    }

    /// Reduced-motion variant: apply gravity then left-fill directly in place,
    /// without computing a mapping. The resulting layout is identical to
    /// [`settle`](Board::settle).
    pub fn settle_in_place(&mut self) {
        for c in 1..=self.cols() {
            let mut write = self.rows();
            for r in (1..=self.rows()).rev() {
                if !self.cell(Location(r, c)).is_empty() {
                    if r != write {
                        self.cells[(write, c)] = self.cells[(r, c)];
                        self.cells[(r, c)] = Cell::Empty;
                    }
                    write -= 1;
                }
            }
        }

        for r in 1..=self.rows() {
            let mut write = 1;
            for c in 1..=self.cols() {
                if !self.cell(Location(r, c)).is_empty() {
                    if c != write {
                        self.cells[(r, write)] = self.cells[(r, c)];
                        self.cells[(r, c)] = Cell::Empty;
                    }
                    write += 1;
                }
            }
        }
    }
}
