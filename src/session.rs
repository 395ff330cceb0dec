use rand::Rng;
use tracing::debug;
use unordered_pair::UnorderedPair;

use crate::board::{Board, PairError};
use crate::compact::TileMove;
use crate::level::{size_for_level, Viewport};
use crate::location::Location;
use crate::solvable::Reshuffle;

/// Score constants, owned by the embedding controller rather than the core.
/// The defaults mirror the classic progression: start at 50, +4 per match,
/// −2 per failed attempt, −5 per manual shuffle.
#[derive(Clone, Copy, Debug)]
pub struct Scoring {
    /// Score a new game starts with.
    pub start: u32,
    /// Reward for each matched pair.
    pub per_match: u32,
    /// Penalty for a mismatched or unconnectable attempt.
    pub fail_penalty: u32,
    /// Penalty for a manual shuffle.
    pub shuffle_penalty: u32,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            start: 50,
            per_match: 4,
            fail_penalty: 2,
            shuffle_penalty: 5,
        }
    }
}

/// Snapshot of session counters for the presentation layer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Stats {
    /// Current level, 1-based.
    pub level: u32,
    /// Current score.
    pub score: u32,
    /// Pairs matched on the current board.
    pub matches: u32,
    /// Tiles left on the current board; always even.
    pub remaining: usize,
}

/// What happened in response to a tile selection.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectOutcome {
    /// Input dropped: the session is locked in a transition, the game is
    /// over, or the clicked cell is empty. No penalty.
    Ignored,
    /// First tile of a pair selected.
    Selected,
    /// The pending selection was clicked again and cleared.
    Deselected,
    /// The second tile had a different kind; selection cleared, failure
    /// penalty applied.
    Mismatch,
    /// Kinds matched but no route exists within two turns; selection
    /// cleared, failure penalty applied.
    Blocked,
    /// The pair was removed and the board repacked. The session is now in
    /// transition; call [`Session::settle`] once the visual effect finishes.
    Matched {
        /// Waypoints of the connecting route, for drawing.
        path: Vec<Location>,
        /// Settle mapping for animating tiles to their new cells.
        moves: Vec<TileMove>,
    },
}

/// Result of completing the post-match transition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Settled {
    /// Tiles remain; the deadlock guard reports whether it had to reshuffle.
    InPlay {
        /// What the deadlock guard did.
        reshuffle: Reshuffle,
    },
    /// The board is clear; advance with [`Session::next_level`].
    LevelCleared,
}

/// One play-through of the game: the board plus the score, level, selection,
/// and lock state, owned together and mutated only through the methods below.
///
/// All randomness flows through the owned `rng`, so a seeded generator
/// reproduces a session exactly.
pub struct Session<R: Rng> {
    rng: R,
    board: Board,
    roster: Vec<char>,
    scoring: Scoring,
    level: u32,
    score: u32,
    matches: u32,
    selected: Option<Location>,
    game_over: bool,
    in_transition: bool,
}

impl<R: Rng> Session<R> {
    /// Start a new game at `start_level` (floored to 1) on the given viewport.
    ///
    /// Panics if `roster` is empty.
    pub fn new(
        roster: Vec<char>,
        scoring: Scoring,
        start_level: u32,
        viewport: Viewport,
        mut rng: R,
    ) -> Self {
        let level = start_level.max(1);
        let mut board = Board::generate(size_for_level(level, viewport).dims(), &roster, &mut rng);
        board.ensure_solvable(&mut rng);

        Self {
            rng,
            board,
            roster,
            scoring,
            level,
            score: scoring.start,
            matches: 0,
            selected: None,
            game_over: false,
            in_transition: false,
        }
    }

    fn generate_board(&mut self, viewport: Viewport) {
        let size = size_for_level(self.level, viewport);
        self.board = Board::generate(size.dims(), &self.roster, &mut self.rng);
        self.matches = 0;
        self.selected = None;
        self.board.ensure_solvable(&mut self.rng);
        debug!(level = self.level, rows = self.board.rows(), cols = self.board.cols(), "level ready");
    }

    /// Reset to a fresh game: score back to its starting value, board
    /// regenerated for `start_level`.
    pub fn new_game(&mut self, start_level: u32, viewport: Viewport) {
        self.level = start_level.max(1);
        self.score = self.scoring.start;
        self.game_over = false;
        self.in_transition = false;
        self.generate_board(viewport);
    }

    /// Advance to the next level, keeping the score.
    pub fn next_level(&mut self, viewport: Viewport) {
        self.level += 1;
        self.in_transition = false;
        self.generate_board(viewport);
    }

    /// Handle a click on a board position, running the full selection
    /// protocol. While a transition is pending or after defeat, input is
    /// dropped (never queued).
    pub fn select(&mut self, position: Location) -> SelectOutcome {
        if self.game_over || self.in_transition {
            return SelectOutcome::Ignored;
        }
        let Some(kind) = self.board.cell(position).kind() else {
            return SelectOutcome::Ignored;
        };

        let Some(previous) = self.selected else {
            self.selected = Some(position);
            return SelectOutcome::Selected;
        };

        if previous == position {
            self.selected = None;
            return SelectOutcome::Deselected;
        }

        self.selected = None;

        if self.board.cell(previous).kind() != Some(kind) {
            self.penalize(self.scoring.fail_penalty);
            return SelectOutcome::Mismatch;
        }

        match self.board.find_path(previous, position) {
            Some(path) => {
                let moves = self.commit_match(UnorderedPair(previous, position));
                SelectOutcome::Matched { path, moves }
            }
            None => {
                self.penalize(self.scoring.fail_penalty);
                SelectOutcome::Blocked
            }
        }
    }

    /// Whether two positions hold a connectable matching pair, and along
    /// which route. Pure query; never mutates or penalizes.
    pub fn attempt_match(&self, a: Location, b: Location) -> Option<Vec<Location>> {
        self.board.find_path(a, b)
    }

    /// Remove a validated pair and repack the board in one step, returning
    /// the settle mapping. The session enters its transition state; finish
    /// with [`settle`](Session::settle).
    ///
    /// Errs without side effects if the positions do not hold equal
    /// non-empty kinds — callers should validate with
    /// [`attempt_match`](Session::attempt_match) first.
    pub fn apply_match(
        &mut self,
        a: Location,
        b: Location,
    ) -> Result<Vec<TileMove>, PairError> {
        let pair = UnorderedPair(a, b);
        self.board.pair_kind(pair)?;
        Ok(self.commit_match(pair))
    }

    fn commit_match(&mut self, pair: UnorderedPair<Location>) -> Vec<TileMove> {
        self.board.clear_pair(pair);
        self.matches += 1;
        self.score += self.scoring.per_match;
        self.selected = None;
        self.in_transition = true;
        self.board.settle()
    }

    /// Complete the pending transition: release the input lock, then either
    /// report the level as cleared or run the deadlock guard.
    pub fn settle(&mut self) -> Settled {
        self.in_transition = false;

        if self.board.tile_count() == 0 {
            debug!(level = self.level, "level cleared");
            return Settled::LevelCleared;
        }

        let reshuffle = self.board.ensure_solvable(&mut self.rng);
        Settled::InPlay { reshuffle }
    }

    /// Player-invoked shuffle: applies the shuffle penalty, reshuffles once
    /// unconditionally, then runs the deadlock guard on the result. Returns
    /// [`None`] when the session is locked or over.
    pub fn shuffle(&mut self) -> Option<Reshuffle> {
        if self.game_over || self.in_transition {
            return None;
        }

        self.penalize(self.scoring.shuffle_penalty);
        self.selected = None;
        self.board.shuffle_tiles(&mut self.rng);
        Some(self.board.ensure_solvable(&mut self.rng))
    }

    /// A connectable pair to highlight, or [`None`] if locked, over, or dead.
    pub fn hint(&self) -> Option<UnorderedPair<Location>> {
        if self.game_over || self.in_transition {
            return None;
        }
        self.board.find_any_match()
    }

    /// Re-evaluate the layout after a viewport change (the caller debounces).
    /// If the computed dimensions differ from the current board, the current
    /// level is regenerated at the new size, keeping level and score; returns
    /// whether that happened.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        let size = size_for_level(self.level, viewport);
        let changed =
            size.rows.get() != self.board.rows() || size.cols.get() != self.board.cols();
        if changed {
            self.generate_board(viewport);
        }
        changed
    }

    fn penalize(&mut self, penalty: u32) {
        self.score = self.score.saturating_sub(penalty);
        if self.score == 0 && !self.game_over {
            self.game_over = true;
            debug!("score exhausted, game over");
        }
    }

    /// The current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Counter snapshot for display.
    pub fn stats(&self) -> Stats {
        Stats {
            level: self.level,
            score: self.score,
            matches: self.matches,
            remaining: self.board.tile_count(),
        }
    }

    /// The pending first selection, if any.
    pub fn selected(&self) -> Option<Location> {
        self.selected
    }

    /// Whether the score has been exhausted.
    pub fn is_over(&self) -> bool {
        self.game_over
    }

    /// Whether a match transition is pending and input is locked.
    pub fn in_transition(&self) -> bool {
        self.in_transition
    }
}
