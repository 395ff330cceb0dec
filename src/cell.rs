/// Index into a board's kind roster, identifying one tile symbol.
pub type KindId = usize;

/// One cell of a board: either a tile of some kind or empty.
///
/// Border cells are always [`Empty`](Cell::Empty).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Cell {
    /// A tile bearing the symbol identified by `kind`.
    Tile {
        /// Which symbol this tile shows.
        kind: KindId,
    },
    /// No tile here.
    #[default]
    Empty,
}

impl Cell {
    /// Whether this cell holds no tile.
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// The kind of the tile here, or [`None`] for an empty cell.
    pub fn kind(&self) -> Option<KindId> {
        match self {
            Cell::Tile { kind } => Some(*kind),
            Cell::Empty => None,
        }
    }
}
