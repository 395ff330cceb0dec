//! Browser bindings: a thin numeric protocol over [`Session`] for the
//! rendering layer. Positions cross the boundary as `(row, col)` pairs in
//! bordered space; outcomes as small integer codes.

use js_sys::Array;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

use crate::compact::TileMove;
use crate::level::Viewport;
use crate::location::Location;
use crate::session::{Scoring, SelectOutcome, Session, Settled};
use crate::solvable::Reshuffle;

/// A complete game session owned by the JS side.
#[wasm_bindgen]
pub struct Game {
    inner: Session<SmallRng>,
    last_path: Vec<Location>,
    last_moves: Vec<TileMove>,
}

fn viewport(width: f64, height: f64) -> Viewport {
    Viewport { width, height }
}

#[wasm_bindgen]
impl Game {
    /// Start a session with a caller-provided seed (so replays are possible)
    /// and one display character per tile kind in `roster`.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, start_level: u32, width: f64, height: f64, roster: &str) -> Game {
        let inner = Session::new(
            roster.chars().collect(),
            Scoring::default(),
            start_level,
            viewport(width, height),
            SmallRng::seed_from_u64(seed),
        );
        Game {
            inner,
            last_path: Vec::new(),
            last_moves: Vec::new(),
        }
    }

    /// Interior row count of the current board.
    pub fn rows(&self) -> usize {
        self.inner.board().rows()
    }

    /// Interior column count of the current board.
    pub fn cols(&self) -> usize {
        self.inner.board().cols()
    }

    /// Current level.
    pub fn level(&self) -> u32 {
        self.inner.stats().level
    }

    /// Current score.
    pub fn score(&self) -> u32 {
        self.inner.stats().score
    }

    /// Pairs matched on the current board.
    pub fn matches(&self) -> u32 {
        self.inner.stats().matches
    }

    /// Tiles remaining on the current board.
    pub fn remaining(&self) -> usize {
        self.inner.stats().remaining
    }

    /// Whether the score has been exhausted.
    pub fn game_over(&self) -> bool {
        self.inner.is_over()
    }

    /// Whether a match transition is pending and input is locked.
    pub fn in_transition(&self) -> bool {
        self.inner.in_transition()
    }

    /// The tile kind at an interior cell, shifted by one: 0 means empty.
    pub fn tile_at(&self, row: usize, col: usize) -> u32 {
        match self.inner.board().cell(Location(row, col)).kind() {
            Some(kind) => kind as u32 + 1,
            None => 0,
        }
    }

    /// The interior rendered as one line per row, kinds as their display
    /// characters and `.` for empty cells.
    pub fn render(&self) -> String {
        self.inner.board().to_string()
    }

    /// Click a cell. Returns 0 ignored, 1 selected, 2 deselected,
    /// 3 mismatch, 4 blocked, 5 matched. After a 5, read
    /// [`last_path`](Game::last_path) and [`last_moves`](Game::last_moves),
    /// animate, then call [`settle`](Game::settle).
    pub fn select(&mut self, row: usize, col: usize) -> u8 {
        match self.inner.select(Location(row, col)) {
            SelectOutcome::Ignored => 0,
            SelectOutcome::Selected => 1,
            SelectOutcome::Deselected => 2,
            SelectOutcome::Mismatch => 3,
            SelectOutcome::Blocked => 4,
            SelectOutcome::Matched { path, moves } => {
                self.last_path = path;
                self.last_moves = moves;
                5
            }
        }
    }

    /// Waypoints of the last connecting route, as an `Array` of
    /// `[row, col]` arrays.
    pub fn last_path(&self) -> Array {
        self.last_path
            .iter()
            .map(|loc| {
                let point = Array::new();
                point.push(&JsValue::from(loc.row() as u32));
                point.push(&JsValue::from(loc.col() as u32));
                point
            })
            .collect()
    }

    /// The last settle mapping, flattened as
    /// `[from_row, from_col, to_row, to_col, ...]` quads.
    pub fn last_moves(&self) -> Vec<u32> {
        self.last_moves
            .iter()
            .flat_map(|m| {
                [
                    m.from.row() as u32,
                    m.from.col() as u32,
                    m.to.row() as u32,
                    m.to.col() as u32,
                ]
            })
            .collect()
    }

    /// Complete the pending transition. Returns 0 still in play, 1 the board
    /// was dead and got reshuffled, 2 the guard gave up, 3 level cleared
    /// (follow with [`next_level`](Game::next_level)).
    pub fn settle(&mut self) -> u8 {
        match self.inner.settle() {
            Settled::InPlay {
                reshuffle: Reshuffle::NotNeeded,
            } => 0,
            Settled::InPlay {
                reshuffle: Reshuffle::Shuffled { .. },
            } => 1,
            Settled::InPlay {
                reshuffle: Reshuffle::GaveUp,
            } => 2,
            Settled::LevelCleared => 3,
        }
    }

    /// Advance to the next level.
    pub fn next_level(&mut self, width: f64, height: f64) {
        self.inner.next_level(viewport(width, height));
    }

    /// Start a fresh game at `start_level`.
    pub fn new_game(&mut self, start_level: u32, width: f64, height: f64) {
        self.inner.new_game(start_level, viewport(width, height));
    }

    /// Manual shuffle. Returns whether it ran (input may be locked).
    pub fn shuffle(&mut self) -> bool {
        self.inner.shuffle().is_some()
    }

    /// A connectable pair as `[r1, c1, r2, c2]`, or an empty vector if none
    /// exists or input is locked.
    pub fn hint(&self) -> Vec<u32> {
        match self.inner.hint() {
            Some(pair) => vec![
                pair.0.row() as u32,
                pair.0.col() as u32,
                pair.1.row() as u32,
                pair.1.col() as u32,
            ],
            None => Vec::new(),
        }
    }

    /// Re-evaluate the layout for a resized viewport (caller debounces).
    /// Returns whether the board was regenerated.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        self.inner.resize(viewport(width, height))
    }
}
