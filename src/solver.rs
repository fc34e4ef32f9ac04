//! Exhaustive depth-first search for a winning move sequence.
//!
//! Key points:
//! - Explicit LIFO work list instead of recursion, bounded by an iteration budget
//! - Move prefixes packed one byte per move in fixed-size arrays
//! - Each candidate carries the board its prefix produces, so popping one
//!   never replays the prefix from the initial board
//! - Optional FxHashSet of pushed boards to prune revisits

use std::time::{Duration, Instant};

use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use crate::board::{Board, Layout, MAX_CELLS};
use crate::config::SearchConfig;
use crate::error::ConfigError;
use crate::moves::{apply_unchecked, for_each_legal_move, Move, MoveSequence, PackedMove};

/// Longest possible move sequence: every jump removes one marble.
const MAX_MOVES: usize = MAX_CELLS;

/// How a search run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A popped sequence reached the goal board.
    Solved(MoveSequence),
    /// The work list ran dry: no solution is reachable.
    Exhausted,
    /// The iteration budget ran out first.
    BudgetExceeded,
}

/// Outcome plus the counters of one search run.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    /// Candidates popped, including the winning one.
    pub iterations: u64,
    /// Largest work-list length observed.
    pub peak_work_list: usize,
    pub elapsed: Duration,
}

impl SearchReport {
    /// The winning sequence, if one was found.
    pub fn solution(&self) -> Option<&[Move]> {
        match &self.outcome {
            SearchOutcome::Solved(moves) => Some(moves),
            _ => None,
        }
    }
}

/// A pending move prefix in the depth-first search.
///
/// Uses a fixed-size array so pushing never allocates per candidate.
#[derive(Clone, Copy)]
struct Candidate<const ROWS: usize, const COLS: usize> {
    /// Moves applied so far, packed.
    moves: [PackedMove; MAX_MOVES],
    /// Number of moves in `moves`.
    move_count: u8,
    /// Board reached by applying `moves` to the initial board.
    board: Board<ROWS, COLS>,
}

impl<const ROWS: usize, const COLS: usize> Candidate<ROWS, COLS> {
    fn root(board: Board<ROWS, COLS>) -> Self {
        Self {
            moves: [PackedMove::default(); MAX_MOVES],
            move_count: 0,
            board,
        }
    }

    #[inline]
    fn extended(&self, mv: Move, board: Board<ROWS, COLS>) -> Self {
        debug_assert!((self.move_count as usize) < MAX_MOVES);
        let mut next = *self;
        next.moves[self.move_count as usize] = PackedMove::pack::<COLS>(mv);
        next.move_count += 1;
        next.board = board;
        next
    }

    fn unpack_into(&self, moves: &mut MoveSequence) {
        moves.clear();
        moves.extend(
            self.moves[..self.move_count as usize]
                .iter()
                .map(|packed| packed.unpack::<COLS>()),
        );
    }

    fn to_sequence(&self) -> MoveSequence {
        let mut moves = Vec::with_capacity(self.move_count as usize);
        self.unpack_into(&mut moves);
        moves
    }
}

/// Depth-first solver for one layout.
///
/// Each run owns its own start time, so several solvers can run in one process.
pub struct Solver<const ROWS: usize, const COLS: usize> {
    layout: Layout<ROWS, COLS>,
    config: SearchConfig,
}

impl<const ROWS: usize, const COLS: usize> Solver<ROWS, COLS> {
    /// Rejects configs that `SearchConfig::validate` rejects.
    pub fn new(layout: Layout<ROWS, COLS>, config: SearchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { layout, config })
    }

    /// Runs the search to one of its terminal outcomes.
    pub fn run(&self) -> SearchReport {
        self.search(None)
    }

    /// Runs the search, handing every popped move sequence to `on_pop` in pop order.
    pub fn run_with(&self, mut on_pop: impl FnMut(&[Move])) -> SearchReport {
        self.search(Some(&mut on_pop))
    }

    fn search(&self, mut on_pop: Option<&mut dyn FnMut(&[Move])>) -> SearchReport {
        let start = Instant::now();
        let mask = self.layout.mask;
        let goal = self.layout.goal;
        let SearchConfig {
            max_iterations,
            progress_interval,
            prune_revisited,
        } = self.config;

        debug!(
            max_iterations,
            progress_interval, prune_revisited, "starting depth-first search"
        );

        let mut work_list = vec![Candidate::root(self.layout.initial)];
        let mut seen_boards: FxHashSet<Board<ROWS, COLS>> = FxHashSet::default();
        if prune_revisited {
            seen_boards.insert(self.layout.initial);
        }

        let mut iterations = 0u64;
        let mut peak_work_list = work_list.len();
        let mut popped_moves = MoveSequence::with_capacity(MAX_MOVES);

        let outcome = loop {
            if iterations == max_iterations {
                break SearchOutcome::BudgetExceeded;
            }
            let Some(candidate) = work_list.pop() else {
                break SearchOutcome::Exhausted;
            };
            let iteration = iterations;
            iterations += 1;

            if let Some(observer) = on_pop.as_deref_mut() {
                candidate.unpack_into(&mut popped_moves);
                observer(&popped_moves);
            }

            if candidate.board == goal {
                break SearchOutcome::Solved(candidate.to_sequence());
            }

            // push in generation order so the last legal move is explored first
            for_each_legal_move(&mask, &candidate.board, |mv| {
                let next_board = apply_unchecked(&candidate.board, mv);
                if prune_revisited && !seen_boards.insert(next_board) {
                    return;
                }
                work_list.push(candidate.extended(mv, next_board));
            });
            peak_work_list = peak_work_list.max(work_list.len());

            if iteration % progress_interval == 0 {
                info!(
                    iteration,
                    elapsed = ?start.elapsed(),
                    work_list = work_list.len(),
                    "search progress"
                );
            }
        };

        let elapsed = start.elapsed();
        match &outcome {
            SearchOutcome::Solved(moves) => {
                info!(iterations, moves = moves.len(), ?elapsed, "found winning sequence")
            }
            SearchOutcome::Exhausted => {
                info!(iterations, ?elapsed, "work list exhausted without a solution")
            }
            SearchOutcome::BudgetExceeded => {
                warn!(iterations, ?elapsed, "iteration budget exhausted without a solution")
            }
        }

        SearchReport {
            outcome,
            iterations,
            peak_work_list,
            elapsed,
        }
    }
}

/// Searches `layout` for a sequence from its initial board to its goal board.
pub fn solve<const ROWS: usize, const COLS: usize>(
    layout: &Layout<ROWS, COLS>,
    config: &SearchConfig,
) -> Result<SearchReport, ConfigError> {
    Ok(Solver::new(*layout, config.clone())?.run())
}

#[cfg(test)]
mod tests {
    use std::fmt;
    use std::sync::{Arc, Mutex};

    use tracing::field::{Field, Visit};
    use tracing::{Event, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    use super::*;
    use crate::board::{cell_to_idx, ValidMask, ENGLISH, ENGLISH_GOAL, ENGLISH_INITIAL, ENGLISH_MASK};
    use crate::moves::{legal_moves, replay, Direction, WINNING_MOVESET};

    fn budget(max_iterations: u64) -> SearchConfig {
        SearchConfig {
            max_iterations,
            ..SearchConfig::default()
        }
    }

    /// Fields of one progress event.
    #[derive(Debug, Default, PartialEq)]
    struct Progress {
        iteration: Option<u64>,
        work_list: Option<u64>,
        has_elapsed: bool,
    }

    impl Visit for Progress {
        fn record_u64(&mut self, field: &Field, value: u64) {
            match field.name() {
                "iteration" => self.iteration = Some(value),
                "work_list" => self.work_list = Some(value),
                _ => {}
            }
        }

        fn record_debug(&mut self, field: &Field, _value: &dyn fmt::Debug) {
            if field.name() == "elapsed" {
                self.has_elapsed = true;
            }
        }
    }

    /// Collects every event that carries an `iteration` field.
    #[derive(Clone, Default)]
    struct ProgressCapture(Arc<Mutex<Vec<Progress>>>);

    impl<S: Subscriber> Layer<S> for ProgressCapture {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut progress = Progress::default();
            event.record(&mut progress);
            if progress.iteration.is_some() {
                self.0.lock().unwrap().push(progress);
            }
        }
    }

    #[test]
    fn test_finds_reference_winning_sequence() {
        let report = solve(&ENGLISH, &SearchConfig::default()).unwrap();

        let solution = report.solution().expect("search should succeed within budget");
        assert_eq!(solution, &WINNING_MOVESET[..]);
        assert_eq!(report.iterations, 7_667_771);

        // replay move by move, each one legal when applied
        let mut board = ENGLISH_INITIAL;
        for &mv in solution {
            assert!(legal_moves(&ENGLISH_MASK, &board).contains(&mv));
            board = apply_unchecked(&board, mv);
        }
        assert_eq!(board, ENGLISH_GOAL);
    }

    #[test]
    fn test_pruning_reaches_same_solution_sooner() {
        let config = SearchConfig {
            prune_revisited: true,
            ..SearchConfig::default()
        };
        let report = solve(&ENGLISH, &config).unwrap();

        assert_eq!(report.solution(), Some(&WINNING_MOVESET[..]));
        assert_eq!(report.iterations, 10_846);
    }

    #[test]
    fn test_budget_exceeded_is_distinct_from_success() {
        let report = solve(&ENGLISH, &budget(1_000)).unwrap();

        assert_eq!(report.outcome, SearchOutcome::BudgetExceeded);
        assert_eq!(report.iterations, 1_000);
        assert!(report.solution().is_none());
    }

    #[test]
    fn test_unreachable_goal_exhausts_work_list() {
        // two adjacent marbles on the center row: either can jump, then nothing
        let mut initial: Board<7, 7> = Board::EMPTY;
        initial.set_idx(cell_to_idx::<7>(3, 3), true);
        initial.set_idx(cell_to_idx::<7>(3, 4), true);
        let layout = Layout::new(ENGLISH_MASK, initial, Board::EMPTY);

        let report = solve(&layout, &SearchConfig::default()).unwrap();

        assert_eq!(report.outcome, SearchOutcome::Exhausted);
        assert_eq!(report.iterations, 3);
        assert_eq!(report.peak_work_list, 2);
    }

    #[test]
    fn test_goal_equal_to_start_needs_no_moves() {
        let layout = Layout::new(ENGLISH_MASK, ENGLISH_INITIAL, ENGLISH_INITIAL);
        let report = solve(&layout, &SearchConfig::default()).unwrap();

        assert_eq!(report.outcome, SearchOutcome::Solved(Vec::new()));
        assert_eq!(report.iterations, 1);
    }

    #[test]
    fn test_pop_order_is_deterministic() {
        let solver = Solver::new(ENGLISH, budget(5_000)).unwrap();

        let mut first_run = Vec::new();
        let first = solver.run_with(|moves| first_run.push(moves.to_vec()));
        let mut second_run = Vec::new();
        let second = solver.run_with(|moves| second_run.push(moves.to_vec()));

        assert_eq!(first_run.len(), 5_000);
        assert_eq!(first_run, second_run);
        assert_eq!(first.outcome, second.outcome);
        assert_eq!(first.peak_work_list, second.peak_work_list);

        // the empty root comes first, then the last generated opening move
        assert!(first_run[0].is_empty());
        assert_eq!(first_run[1], vec![Move::new(5, 3, Direction::Left)]);
    }

    #[test]
    fn test_popped_sequences_replay_legally() {
        let solver = Solver::new(ENGLISH, budget(2_000)).unwrap();
        solver.run_with(|moves| {
            let board = replay(&ENGLISH_MASK, &ENGLISH_INITIAL, moves)
                .expect("search only extends with legal moves");
            assert_eq!(board.marble_count() as usize, 32 - moves.len());
        });
    }

    #[test]
    fn test_small_layout_solved() {
        // a single row: X X . X . .  ->  . . . . X .
        const ROW: ValidMask<1, 6> = ValidMask::from_grid([[true; 6]]);
        let initial = Board::from_grid([[true, true, false, true, false, false]]);
        let goal = Board::from_grid([[false, false, false, false, true, false]]);
        let layout = Layout::new(ROW, initial, goal);
        let report = solve(&layout, &SearchConfig::default()).unwrap();

        assert_eq!(
            report.solution(),
            Some(
                &[
                    Move::new(0, 0, Direction::Up),
                    Move::new(0, 2, Direction::Up),
                ][..]
            )
        );
    }

    #[test]
    fn test_zero_settings_rejected_before_searching() {
        let config = SearchConfig {
            progress_interval: 0,
            ..SearchConfig::default()
        };
        assert!(matches!(
            solve(&ENGLISH, &config),
            Err(ConfigError::Validation(_))
        ));
        assert!(Solver::new(ENGLISH, budget(0)).is_err());
    }

    #[test]
    fn test_progress_reported_at_every_interval_multiple() {
        let capture = ProgressCapture::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let config = SearchConfig {
            max_iterations: 250,
            progress_interval: 100,
            prune_revisited: false,
        };

        let report =
            tracing::subscriber::with_default(subscriber, || solve(&ENGLISH, &config)).unwrap();
        assert_eq!(report.outcome, SearchOutcome::BudgetExceeded);

        // work-list length after the popped candidate's children are pushed
        let events = capture.0.lock().unwrap();
        let reported: Vec<_> = events
            .iter()
            .map(|progress| (progress.iteration, progress.work_list))
            .collect();
        assert_eq!(
            reported,
            vec![(Some(0), Some(4)), (Some(100), Some(109)), (Some(200), Some(107))]
        );
        assert!(events.iter().all(|progress| progress.has_elapsed));
    }
}
