#![warn(missing_docs)]

//! # `shisen`
//!
//! A board engine for Shisen-Sho style tile matching: players clear a grid by
//! connecting two identical tiles with a path of at most two right-angle turns
//! through empty cells. This crate owns the parts with algorithmic content —
//! the bordered grid, path connectivity, post-removal gravity and compaction,
//! deadlock detection with reshuffle recovery, and level-progression sizing —
//! and leaves rendering, animation timing, audio, and input devices to the
//! embedding layer.
//!
//! Start a game with [`Session::new`], feed it clicks via
//! [`select`](Session::select), and complete each match transition with
//! [`settle`](Session::settle). Hand-authored layouts come from a
//! [`BoardBuilder`](builder::BoardBuilder); random boards for play from
//! [`Board::generate`].
//!
//! # Internals
//!
//! The grid is stored with a permanent one-cell empty border around the
//! playable interior. Path scans treat the frame as ordinary empty cells, so
//! routes may leave the visible grid (the standard rule variant for this
//! genre) and the two-turn detour scan needs no edge-case branching.
//!
//! Connectivity tries increasingly complex shapes — straight, one pivot,
//! then a detour segment along every row and then every column — and returns
//! the first valid route rather than the shortest one.
//!
//! After a removal, tiles fall to the bottom of their column and then pack
//! to the left of their row. The repacking is computed as a pure
//! source-to-destination mapping so the presentation layer can animate each
//! tile before the swap commits; a reduced-motion variant applies the same
//! two passes in place.
//!
//! Dead boards (tiles remaining, no connectable pair) are recovered by
//! reshuffling the remaining symbols over the occupied cells, up to a fixed
//! ceiling of attempts. This is a pragmatic bound, not a solvability proof;
//! see [`Reshuffle::GaveUp`].

pub use board::{Board, PairError};
pub use builder::BoardBuilder;
pub use cell::{Cell, KindId};
pub use compact::TileMove;
pub use level::{size_for_level, AspectBucket, Caps, GridSize, Viewport};
pub use location::{Coord, Dimension, Location};
pub use session::{Scoring, SelectOutcome, Session, Settled, Stats};
pub use solvable::{Reshuffle, SHUFFLE_RETRY_CEILING};

pub(crate) mod board;
pub mod builder;
pub(crate) mod cell;
pub(crate) mod compact;
pub mod level;
pub(crate) mod location;
pub(crate) mod path;
pub mod session;
pub(crate) mod solvable;
mod tests;
#[cfg(feature = "wasm")]
pub mod wasm;
