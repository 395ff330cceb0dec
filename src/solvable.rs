use itertools::Itertools;
use rand::Rng;
use tracing::debug;
use unordered_pair::UnorderedPair;

use crate::board::Board;
use crate::location::Location;

/// How many whole-board shuffles the deadlock guard attempts before giving
/// up. A pragmatic bound, not a solvability proof.
pub const SHUFFLE_RETRY_CEILING: usize = 25;

/// Outcome of a deadlock check.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Reshuffle {
    /// A connectable pair already exists, or the board is clear; nothing changed.
    NotNeeded,
    /// The board was dead; shuffling `attempts` times produced a connectable pair.
    Shuffled {
        /// How many shuffles it took to reach a solvable arrangement.
        attempts: usize,
    },
    /// No solvable arrangement was found within [`SHUFFLE_RETRY_CEILING`]
    /// shuffles. The board keeps its last (possibly unsolvable) arrangement.
    GaveUp,
}

impl Reshuffle {
    /// Whether the guard changed the board at all.
    pub fn shuffled(&self) -> bool {
        !matches!(self, Reshuffle::NotNeeded)
    }
}

impl Board {
    /// Scan for any connectable pair, bucketing remaining tiles by kind and
    /// testing each same-kind pair with [`find_path`](Board::find_path).
    ///
    /// The scan is deterministic: kinds in ascending id order, positions
    /// within a kind row-major. Repeated calls on an unchanged board return
    /// the same pair, so a hint stays put until the board changes.
    pub fn find_any_match(&self) -> Option<UnorderedPair<Location>> {
        let buckets = self.kind_positions();
        buckets
            .values()
            .flat_map(|positions| positions.iter().tuple_combinations())
            .find(|(a, b)| self.find_path(**a, **b).is_some())
            .map(|(a, b)| UnorderedPair(*a, *b))
    }

    /// Detect deadlock and recover by reshuffling: if tiles remain but no
    /// pair is connectable, redistribute the remaining symbols across the
    /// occupied cells until some pair connects, up to
    /// [`SHUFFLE_RETRY_CEILING`] attempts.
    ///
    /// Never adds or removes tiles and never changes the multiset of kinds
    /// on the board. An empty board is a no-op (level completion is the
    /// caller's concern).
    pub fn ensure_solvable(&mut self, rng: &mut impl Rng) -> Reshuffle {
        if self.tile_count() == 0 || self.find_any_match().is_some() {
            return Reshuffle::NotNeeded;
        }

        debug!(remaining = self.tile_count(), "board is dead, reshuffling");
        for attempts in 1..=SHUFFLE_RETRY_CEILING {
            self.shuffle_tiles(rng);
            if self.find_any_match().is_some() {
                debug!(attempts, "reshuffle produced a solvable layout");
                return Reshuffle::Shuffled { attempts };
            }
        }

        debug!(
            ceiling = SHUFFLE_RETRY_CEILING,
            "no solvable layout found, keeping last arrangement"
        );
        Reshuffle::GaveUp
    }
}
