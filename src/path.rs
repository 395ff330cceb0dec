use strum::VariantArray;

use crate::board::Board;
use crate::location::{Axis, Coord, Location};

// Connectivity questions are always asked about one candidate pair, so the
// scan state carries the two endpoints: they count as empty for clearance
// checks (a tile never blocks a path to itself).
struct PathScan<'a> {
    board: &'a Board,
    a: Location,
    b: Location,
}

impl PathScan<'_> {
    fn passable(&self, location: Location) -> bool {
        location == self.a || location == self.b || self.board.cell(location).is_empty()
    }

    // strictly-between cells of a horizontal segment; endpoints excluded
    fn clear_row(&self, row: Coord, c1: Coord, c2: Coord) -> bool {
        let (lo, hi) = if c1 <= c2 { (c1, c2) } else { (c2, c1) };
        (lo + 1..hi).all(|c| self.passable(Location(row, c)))
    }

    fn clear_col(&self, col: Coord, r1: Coord, r2: Coord) -> bool {
        let (lo, hi) = if r1 <= r2 { (r1, r2) } else { (r2, r1) };
        (lo + 1..hi).all(|r| self.passable(Location(r, col)))
    }

    fn straight(&self) -> Option<Vec<Location>> {
        let (Location(r1, c1), Location(r2, c2)) = (self.a, self.b);

        if r1 == r2 && self.clear_row(r1, c1, c2) {
            return Some(vec![self.a, self.b]);
        }
        if c1 == c2 && self.clear_col(c1, r1, r2) {
            return Some(vec![self.a, self.b]);
        }
        None
    }

    fn one_turn(&self) -> Option<Vec<Location>> {
        let (Location(r1, c1), Location(r2, c2)) = (self.a, self.b);

        // pivot at (r1, c2)
        let pivot = Location(r1, c2);
        if self.passable(pivot) && self.clear_row(r1, c1, c2) && self.clear_col(c2, r1, r2) {
            return Some(vec![self.a, pivot, self.b]);
        }

        // pivot at (r2, c1)
        let pivot = Location(r2, c1);
        if self.passable(pivot) && self.clear_col(c1, r1, r2) && self.clear_row(r2, c1, c2) {
            return Some(vec![self.a, pivot, self.b]);
        }

        None
    }

    // Z- and U-shaped routes: a connecting segment at some row (or column),
    // including the sentinel border, joined to each endpoint by a perpendicular
    // segment. The row scan runs first; within an axis, lower indices win.
    fn two_turns(&self, axis: Axis) -> Option<Vec<Location>> {
        let (Location(r1, c1), Location(r2, c2)) = (self.a, self.b);

        match axis {
            Axis::Row => (0..self.board.rows() + 2).find_map(|r| {
                (self.passable(Location(r, c1))
                    && self.passable(Location(r, c2))
                    && self.clear_col(c1, r, r1)
                    && self.clear_row(r, c1, c2)
                    && self.clear_col(c2, r, r2))
                .then(|| vec![self.a, Location(r, c1), Location(r, c2), self.b])
            }),
            Axis::Col => (0..self.board.cols() + 2).find_map(|c| {
                (self.passable(Location(r1, c))
                    && self.passable(Location(r2, c))
                    && self.clear_row(r1, c, c1)
                    && self.clear_col(c, r1, r2)
                    && self.clear_row(r2, c, c2))
                .then(|| vec![self.a, Location(r1, c), Location(r2, c), self.b])
            }),
        }
    }
}

impl Board {
    /// Find a route between two matching tiles with at most two right-angle
    /// turns through empty cells, trying 0-turn, then 1-turn, then 2-turn
    /// connections and returning the first found (valid, not shortest).
    ///
    /// The returned waypoints start at `a` and end at `b`; consecutive
    /// waypoints share a row or column, and all cells strictly between them
    /// are empty. Routes may pass through the sentinel border.
    ///
    /// Returns [`None`] if the positions coincide, either cell is empty, or
    /// the kinds differ.
    pub fn find_path(&self, a: Location, b: Location) -> Option<Vec<Location>> {
        if a == b {
            return None;
        }
        match (self.cell(a).kind(), self.cell(b).kind()) {
            (Some(ka), Some(kb)) if ka == kb => {}
            _ => return None,
        }

        let scan = PathScan { board: self, a, b };
        scan.straight()
            .or_else(|| scan.one_turn())
            .or_else(|| Axis::VARIANTS.iter().find_map(|axis| scan.two_turns(*axis)))
    }
}
