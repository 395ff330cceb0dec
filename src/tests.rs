#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::num::NonZero;

    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use unordered_pair::UnorderedPair;

    use crate::builder::{BoardBuilder, BuilderInvalidReason};
    use crate::level::{size_for_level, AspectBucket, Viewport};
    use crate::location::{Dimension, Location};
    use crate::session::{Scoring, SelectOutcome, Session, Settled};
    use crate::solvable::Reshuffle;
    use crate::{Board, KindId, PairError};

    fn dims(rows: usize, cols: usize) -> (Dimension, Dimension) {
        (NonZero::new(rows).unwrap(), NonZero::new(cols).unwrap())
    }

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn kind_counts(board: &Board) -> HashMap<KindId, usize> {
        let mut counts = HashMap::new();
        for location in board.interior() {
            if let Some(kind) = board.cell(location).kind() {
                *counts.entry(kind).or_insert(0) += 1;
            }
        }
        counts
    }

    // the classic dead layout: both pairs diagonal, every route blocked by
    // the other kind
    fn checkerboard() -> Board {
        BoardBuilder::with_dims(dims(2, 2))
            .place_pair('a', UnorderedPair(Location(1, 1), Location(2, 2)))
            .place_pair('b', UnorderedPair(Location(1, 2), Location(2, 1)))
            .build()
            .unwrap()
    }

    fn assert_path_valid(board: &Board, path: &[Location], a: Location, b: Location) {
        assert_eq!(*path.first().unwrap(), a);
        assert_eq!(*path.last().unwrap(), b);
        for pair in path.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            assert!(
                from.row() == to.row() || from.col() == to.col(),
                "waypoints {from:?} and {to:?} share no axis"
            );
            if from.row() == to.row() {
                let (lo, hi) = (from.col().min(to.col()), from.col().max(to.col()));
                for c in lo + 1..hi {
                    let loc = Location(from.row(), c);
                    assert!(
                        loc == a || loc == b || board.cell(loc).is_empty(),
                        "path crosses occupied cell {loc:?}"
                    );
                }
            } else {
                let (lo, hi) = (from.row().min(to.row()), from.row().max(to.row()));
                for r in lo + 1..hi {
                    let loc = Location(r, from.col());
                    assert!(
                        loc == a || loc == b || board.cell(loc).is_empty(),
                        "path crosses occupied cell {loc:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn builder_renders_interior() {
        let board = BoardBuilder::with_dims(dims(3, 4))
            .place_pair('a', UnorderedPair(Location(1, 1), Location(3, 4)))
            .place_pair('b', UnorderedPair(Location(2, 2), Location(2, 3)))
            .build()
            .unwrap();

        assert_eq!(format!("{}", board), "a...
.bb.
...a
");
        assert_eq!(board.tile_count(), 4);
    }

    #[test]
    fn builder_rejects_border_placement() {
        let mut builder = BoardBuilder::with_dims(dims(3, 3));
        builder.place('a', Location(0, 1));
        assert!(builder.is_valid().is_some());
        assert_eq!(
            builder.build().unwrap_err(),
            vec![BuilderInvalidReason::FeatureOutOfBounds]
        );
    }

    #[test]
    fn builder_rejects_unpaired_kinds() {
        let result = BoardBuilder::with_dims(dims(3, 3))
            .place('a', Location(1, 1))
            .place('a', Location(2, 2))
            .place('a', Location(3, 3))
            .build();
        assert_eq!(result.unwrap_err(), vec![BuilderInvalidReason::UnpairedKind]);
    }

    #[test]
    fn generate_places_even_kind_counts() {
        // 3 distinct kinds for 8 pairs forces the roster to cycle
        let board = Board::generate(dims(4, 4), &['a', 'b', 'c'], &mut rng(7));

        assert_eq!(board.tile_count(), 16);
        for (kind, count) in kind_counts(&board) {
            assert!(count % 2 == 0, "kind {kind} appears {count} times");
        }
    }

    #[test]
    fn generate_leaves_one_empty_on_odd_interiors() {
        let board = Board::generate(dims(5, 5), &['a', 'b', 'c', 'd'], &mut rng(11));
        // 25 cells hold floor(25 / 2) pairs, so exactly one stays empty
        assert_eq!(board.tile_count(), 24);
    }

    #[test]
    fn straight_path_in_clear_row() {
        let board = BoardBuilder::with_dims(dims(1, 4))
            .place_pair('a', UnorderedPair(Location(1, 1), Location(1, 4)))
            .build()
            .unwrap();

        assert_eq!(
            board.find_path(Location(1, 1), Location(1, 4)),
            Some(vec![Location(1, 1), Location(1, 4)])
        );
    }

    #[test]
    fn l_path_through_empty_pivot() {
        let board = BoardBuilder::with_dims(dims(3, 3))
            .place_pair('a', UnorderedPair(Location(1, 1), Location(2, 2)))
            .place_pair('b', UnorderedPair(Location(2, 1), Location(3, 1)))
            .build()
            .unwrap();

        assert_eq!(
            board.find_path(Location(1, 1), Location(2, 2)),
            Some(vec![Location(1, 1), Location(1, 2), Location(2, 2)])
        );
    }

    #[test]
    fn detour_routes_over_border() {
        // interior row is fully blocked, so the connection must leave the
        // visible grid; the row scan starts at the top border
        let board = BoardBuilder::with_dims(dims(1, 4))
            .place_pair('a', UnorderedPair(Location(1, 1), Location(1, 4)))
            .place_pair('b', UnorderedPair(Location(1, 2), Location(1, 3)))
            .build()
            .unwrap();

        assert_eq!(
            board.find_path(Location(1, 1), Location(1, 4)),
            Some(vec![
                Location(1, 1),
                Location(0, 1),
                Location(0, 4),
                Location(1, 4)
            ])
        );
    }

    #[test]
    fn no_path_on_checkerboard() {
        let board = checkerboard();
        assert_eq!(board.find_path(Location(1, 1), Location(2, 2)), None);
        assert_eq!(board.find_path(Location(1, 2), Location(2, 1)), None);
        assert_eq!(board.find_any_match(), None);
    }

    #[test]
    fn find_path_refuses_bad_preconditions() {
        let board = checkerboard();
        // kinds differ
        assert_eq!(board.find_path(Location(1, 1), Location(1, 2)), None);
        // empty endpoint (border cell)
        assert_eq!(board.find_path(Location(1, 1), Location(0, 1)), None);
        // identical positions
        assert_eq!(board.find_path(Location(1, 1), Location(1, 1)), None);
    }

    #[test]
    fn found_paths_never_cross_tiles() {
        for seed in 0..10 {
            let board = Board::generate(dims(6, 8), &['a', 'b', 'c', 'd', 'e'], &mut rng(seed));
            if let Some(UnorderedPair(a, b)) = board.find_any_match() {
                let path = board.find_path(a, b).unwrap();
                assert!(path.len() >= 2 && path.len() <= 4);
                assert_path_valid(&board, &path, a, b);
            }
        }
    }

    #[test]
    fn remove_pair_clears_matching_cells() {
        let mut board = BoardBuilder::with_dims(dims(1, 4))
            .place_pair('a', UnorderedPair(Location(1, 1), Location(1, 4)))
            .build()
            .unwrap();

        let kind = board
            .remove_pair(UnorderedPair(Location(1, 1), Location(1, 4)))
            .unwrap();
        assert_eq!(board.kind_display(kind), 'a');
        assert_eq!(board.tile_count(), 0);
        assert_eq!(format!("{}", board), "....\n");
    }

    #[test]
    fn remove_pair_enforces_contract() {
        let mut board = checkerboard();
        let before = format!("{}", board);

        assert_eq!(
            board.remove_pair(UnorderedPair(Location(1, 1), Location(1, 1))),
            Err(PairError::SamePosition)
        );
        assert_eq!(
            board.remove_pair(UnorderedPair(Location(1, 1), Location(1, 2))),
            Err(PairError::KindMismatch)
        );
        assert_eq!(
            board.remove_pair(UnorderedPair(Location(1, 1), Location(0, 0))),
            Err(PairError::EmptyCell)
        );
        // failed removals leave the board untouched
        assert_eq!(format!("{}", board), before);
    }

    #[test]
    fn settle_applies_gravity_then_left_fill() {
        let mut board = BoardBuilder::with_dims(dims(3, 3))
            .place_pair('a', UnorderedPair(Location(1, 1), Location(3, 2)))
            .place_pair('b', UnorderedPair(Location(1, 3), Location(3, 3)))
            .build()
            .unwrap();

        let moves = board.settle();

        assert_eq!(format!("{}", board), "...
b..
aab
");
        // every occupied source cell appears exactly once
        assert_eq!(moves.len(), 4);
        let move_for = |from| moves.iter().find(|m| m.from == from).unwrap().to;
        assert_eq!(move_for(Location(1, 1)), Location(3, 1));
        assert_eq!(move_for(Location(1, 3)), Location(2, 1));
        assert_eq!(move_for(Location(3, 2)), Location(3, 2));
        assert_eq!(move_for(Location(3, 3)), Location(3, 3));
    }

    #[test]
    fn settle_is_idempotent() {
        let mut board = Board::generate(dims(5, 6), &['a', 'b', 'c'], &mut rng(3));
        board.settle();
        let packed = format!("{}", board);

        let mapping = board.settle_mapping();
        assert!(mapping.iter().all(|m| !m.is_displacement()));
        board.settle();
        assert_eq!(format!("{}", board), packed);
    }

    #[test]
    fn settle_in_place_matches_mapping_variant() {
        let mut with_mapping = BoardBuilder::with_dims(dims(3, 4))
            .place_pair('a', UnorderedPair(Location(1, 1), Location(3, 1)))
            .place_pair('b', UnorderedPair(Location(1, 2), Location(1, 3)))
            .place_pair('c', UnorderedPair(Location(2, 2), Location(3, 2)))
            .build()
            .unwrap();
        let mut in_place = with_mapping.clone();

        with_mapping.settle();
        in_place.settle_in_place();

        assert_eq!(format!("{}", with_mapping), "b...
ac..
acb.
");
        assert_eq!(format!("{}", with_mapping), format!("{}", in_place));
    }

    #[test]
    fn guard_skips_solvable_boards() {
        let mut board = BoardBuilder::with_dims(dims(1, 4))
            .place_pair('a', UnorderedPair(Location(1, 1), Location(1, 2)))
            .build()
            .unwrap();
        let before = format!("{}", board);

        let outcome = board.ensure_solvable(&mut rng(0));
        assert_eq!(outcome, Reshuffle::NotNeeded);
        assert!(!outcome.shuffled());
        assert_eq!(format!("{}", board), before);
    }

    #[test]
    fn guard_skips_cleared_boards() {
        let board = BoardBuilder::with_dims(dims(2, 2)).build().unwrap();
        assert_eq!(board.clone().ensure_solvable(&mut rng(0)), Reshuffle::NotNeeded);
    }

    #[test]
    fn guard_reshuffles_dead_board_into_solvable_one() {
        let mut board = checkerboard();
        let counts_before = kind_counts(&board);

        let outcome = board.ensure_solvable(&mut rng(5));

        assert!(matches!(outcome, Reshuffle::Shuffled { attempts } if attempts >= 1));
        assert!(outcome.shuffled());
        assert!(board.find_any_match().is_some());
        // the guard only permutes: same tiles, same multiset of kinds
        assert_eq!(board.tile_count(), 4);
        assert_eq!(kind_counts(&board), counts_before);
    }

    #[test]
    fn find_any_match_is_stable_on_unchanged_boards() {
        let board = BoardBuilder::with_dims(dims(2, 4))
            .place_pair('a', UnorderedPair(Location(1, 1), Location(1, 3)))
            .place_pair('b', UnorderedPair(Location(1, 2), Location(1, 4)))
            .place_pair('c', UnorderedPair(Location(2, 1), Location(2, 3)))
            .place_pair('d', UnorderedPair(Location(2, 2), Location(2, 4)))
            .build()
            .unwrap();

        // lowest kind first, positions row-major: the 'a' pair, routed over
        // the top border
        let first = board.find_any_match().expect("border routes exist");
        assert_eq!(first, UnorderedPair(Location(1, 1), Location(1, 3)));
        for _ in 0..64 {
            assert_eq!(board.find_any_match(), Some(first));
        }
    }

    #[test]
    fn shuffle_preserves_kind_multiset() {
        let mut board = Board::generate(dims(4, 6), &['a', 'b', 'c'], &mut rng(13));
        let counts_before = kind_counts(&board);

        board.shuffle_tiles(&mut rng(14));

        assert_eq!(kind_counts(&board), counts_before);
        assert_eq!(board.tile_count(), 24);
    }

    #[test]
    fn sizer_is_deterministic() {
        let viewport = Viewport {
            width: 1180.0,
            height: 760.0,
        };
        assert_eq!(size_for_level(6, viewport), size_for_level(6, viewport));
    }

    #[test]
    fn sizer_starts_square_games_at_four_by_four() {
        let viewport = Viewport {
            width: 800.0,
            height: 800.0,
        };
        assert_eq!(AspectBucket::classify(viewport), AspectBucket::Square);

        let size = size_for_level(1, viewport);
        assert_eq!((size.rows.get(), size.cols.get()), (4, 4));
    }

    #[test]
    fn sizer_biases_orientation() {
        let landscape = size_for_level(3, Viewport {
            width: 1280.0,
            height: 800.0,
        });
        assert!(landscape.cols.get() > landscape.rows.get());

        let portrait = size_for_level(3, Viewport {
            width: 800.0,
            height: 1280.0,
        });
        assert!(portrait.rows.get() > portrait.cols.get());
    }

    #[test]
    fn sizer_respects_caps_across_progression() {
        let viewports = [
            Viewport { width: 1920.0, height: 1080.0 },
            Viewport { width: 1080.0, height: 1920.0 },
            Viewport { width: 900.0, height: 900.0 },
            // phone-sized, coarse caps
            Viewport { width: 390.0, height: 844.0 },
        ];

        for viewport in viewports {
            let caps = AspectBucket::classify(viewport).caps(viewport);
            for level in 1..=20 {
                let size = size_for_level(level, viewport);
                let (rows, cols) = (size.rows.get(), size.cols.get());
                assert!(
                    (caps.min_rows..=caps.max_rows).contains(&rows),
                    "level {level}: {rows} rows out of caps"
                );
                assert!(
                    (caps.min_cols..=caps.max_cols).contains(&cols),
                    "level {level}: {cols} cols out of caps"
                );
            }
        }
    }

    #[test]
    fn sizer_tightens_caps_on_small_devices() {
        let phone = Viewport {
            width: 390.0,
            height: 844.0,
        };
        let caps = AspectBucket::classify(phone).caps(phone);
        assert_eq!((caps.max_rows, caps.max_cols), (10, 7));
    }

    fn square_session(seed: u64) -> Session<StdRng> {
        Session::new(
            vec!['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'],
            Scoring::default(),
            1,
            Viewport {
                width: 800.0,
                height: 800.0,
            },
            rng(seed),
        )
    }

    #[test]
    fn session_selection_protocol() {
        let mut session = square_session(42);
        assert_eq!(session.stats().remaining, 16);
        assert_eq!(session.stats().score, 50);

        // border clicks land on empty cells and are dropped without penalty
        assert_eq!(session.select(Location(0, 0)), SelectOutcome::Ignored);

        assert_eq!(session.select(Location(1, 1)), SelectOutcome::Selected);
        assert_eq!(session.selected(), Some(Location(1, 1)));
        assert_eq!(session.select(Location(1, 1)), SelectOutcome::Deselected);
        assert_eq!(session.selected(), None);
        assert_eq!(session.stats().score, 50);
    }

    #[test]
    fn session_match_flow() {
        let mut session = square_session(42);

        let pair = session.hint().expect("fresh boards pass the guard");
        assert_eq!(session.select(pair.0), SelectOutcome::Selected);
        let outcome = session.select(pair.1);
        let SelectOutcome::Matched { path, moves } = outcome else {
            panic!("hinted pair did not match: {outcome:?}");
        };
        assert!(path.len() >= 2 && path.len() <= 4);
        assert!(!moves.is_empty());

        let stats = session.stats();
        assert_eq!(stats.matches, 1);
        assert_eq!(stats.remaining, 14);
        assert_eq!(stats.score, 54);

        // input is dropped, not queued, while the transition is pending
        assert!(session.in_transition());
        assert_eq!(session.select(Location(4, 1)), SelectOutcome::Ignored);
        assert_eq!(session.hint(), None);
        assert_eq!(session.shuffle(), None);

        assert!(matches!(session.settle(), Settled::InPlay { .. }));
        assert!(!session.in_transition());
    }

    #[test]
    fn session_penalizes_mismatch_and_shuffle() {
        let mut session = square_session(9);

        let board = session.board();
        let first = board
            .interior()
            .find(|loc| !board.cell(*loc).is_empty())
            .unwrap();
        let other = board
            .interior()
            .find(|loc| board.cell(*loc).kind().is_some_and(|k| Some(k) != board.cell(first).kind()))
            .unwrap();

        assert_eq!(session.select(first), SelectOutcome::Selected);
        assert_eq!(session.select(other), SelectOutcome::Mismatch);
        assert_eq!(session.stats().score, 48);
        assert_eq!(session.selected(), None);

        assert!(session.shuffle().is_some());
        assert_eq!(session.stats().score, 43);
    }

    #[test]
    fn session_apply_match_validates_contract() {
        let mut session = square_session(3);
        let before = session.stats();

        let board = session.board();
        let first = board
            .interior()
            .find(|loc| !board.cell(*loc).is_empty())
            .unwrap();
        let other = board
            .interior()
            .find(|loc| board.cell(*loc).kind().is_some_and(|k| Some(k) != board.cell(first).kind()))
            .unwrap();

        assert_eq!(session.apply_match(first, other), Err(PairError::KindMismatch));
        assert_eq!(session.apply_match(first, first), Err(PairError::SamePosition));
        assert_eq!(session.stats(), before);
        assert!(!session.in_transition());
    }

    #[test]
    fn session_clears_level_and_advances() {
        let mut session = square_session(1);

        let mut cleared = false;
        for _ in 0..8 {
            let pair = session.hint().expect("guard keeps the board solvable");
            assert_eq!(session.select(pair.0), SelectOutcome::Selected);
            assert!(matches!(session.select(pair.1), SelectOutcome::Matched { .. }));
            if session.settle() == Settled::LevelCleared {
                cleared = true;
                break;
            }
        }

        assert!(cleared);
        assert_eq!(session.stats().remaining, 0);
        let score_after_clear = session.stats().score;
        assert_eq!(score_after_clear, 50 + 8 * 4);

        session.next_level(Viewport {
            width: 800.0,
            height: 800.0,
        });
        let stats = session.stats();
        assert_eq!(stats.level, 2);
        assert_eq!(stats.matches, 0);
        // 5x5 target: odd interior leaves one cell empty
        assert_eq!(stats.remaining, 24);
        assert_eq!(stats.score, score_after_clear);
    }

    #[test]
    fn session_ends_when_score_runs_out() {
        let scoring = Scoring {
            start: 3,
            per_match: 4,
            fail_penalty: 2,
            shuffle_penalty: 5,
        };
        let mut session = Session::new(
            vec!['a', 'b', 'c', 'd'],
            scoring,
            1,
            Viewport {
                width: 800.0,
                height: 800.0,
            },
            rng(8),
        );

        let board = session.board();
        let first = board
            .interior()
            .find(|loc| !board.cell(*loc).is_empty())
            .unwrap();
        let other = board
            .interior()
            .find(|loc| board.cell(*loc).kind().is_some_and(|k| Some(k) != board.cell(first).kind()))
            .unwrap();

        assert_eq!(session.select(first), SelectOutcome::Selected);
        assert_eq!(session.select(other), SelectOutcome::Mismatch);
        assert!(!session.is_over());

        assert_eq!(session.select(first), SelectOutcome::Selected);
        assert_eq!(session.select(other), SelectOutcome::Mismatch);
        // score floors at zero and the game ends
        assert_eq!(session.stats().score, 0);
        assert!(session.is_over());
        assert_eq!(session.select(first), SelectOutcome::Ignored);
        assert_eq!(session.shuffle(), None);
        assert_eq!(session.hint(), None);
    }

    #[test]
    fn session_resize_regenerates_on_dimension_change() {
        let mut session = square_session(17);
        let square = Viewport {
            width: 800.0,
            height: 800.0,
        };
        let landscape = Viewport {
            width: 1280.0,
            height: 800.0,
        };

        assert!(!session.resize(square));

        assert!(session.resize(landscape));
        let board = session.board();
        assert!(board.cols() > board.rows());
        // level and score survive a layout change
        assert_eq!(session.stats().level, 1);
        assert_eq!(session.stats().score, 50);
    }

    #[test]
    fn session_new_game_resets_counters() {
        let mut session = square_session(23);
        session.shuffle();
        assert_eq!(session.stats().score, 45);

        session.new_game(3, Viewport {
            width: 800.0,
            height: 800.0,
        });
        let stats = session.stats();
        assert_eq!(stats.level, 3);
        assert_eq!(stats.score, 50);
        assert_eq!(stats.matches, 0);
        assert!(!session.is_over());
    }
}
