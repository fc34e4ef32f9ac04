//! Marble Solitaire Solver
//!
//! Searches the 33-hole English board for a sequence of jumps that leaves a
//! single marble in the center, starting from a board that is full except for
//! the center. The search is an exhaustive depth-first walk over move
//! sequences; a found (or the built-in known) solution can be stepped through
//! in the terminal.

mod replay;

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use marbles::board::{format_board, Board, ENGLISH};
use marbles::config::SearchConfig;
use marbles::moves::{legal_moves, replay as replay_sequence, Move, MoveSequence, WINNING_MOVESET};
use marbles::persistence::{self, SOLUTION_TXT};
use marbles::solver::{SearchOutcome, Solver};

/// Solves the English marble solitaire puzzle and replays the solution.
#[derive(Parser)]
#[command(name = "marbles")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Search for a winning sequence and save it to disk.
    Solve(SearchArgs),
    /// Step through a saved solution, or the built-in one.
    Replay {
        /// Solution file to replay instead of the built-in winning sequence.
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// List the legal moves of the starting board.
    Moves,
    /// Verify that the built-in winning sequence reaches the goal.
    Check,
}

#[derive(Args, Default)]
struct SearchArgs {
    /// TOML file with search settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Maximum number of candidates to examine.
    #[arg(long)]
    max_iterations: Option<u64>,
    /// Report progress every this many iterations.
    #[arg(long)]
    progress_interval: Option<u64>,
    /// Skip boards that were already queued (may find a different solution).
    #[arg(long)]
    prune_revisited: bool,
    /// Where to write the solution.
    #[arg(long, default_value = SOLUTION_TXT)]
    output: PathBuf,
}

impl SearchArgs {
    /// Merges the config file (if any) with command-line overrides.
    fn search_config(&self) -> anyhow::Result<SearchConfig> {
        let mut config = match &self.config {
            Some(path) => SearchConfig::load(path)?,
            None => SearchConfig::default(),
        };
        if let Some(max_iterations) = self.max_iterations {
            config.max_iterations = max_iterations;
        }
        if let Some(progress_interval) = self.progress_interval {
            config.progress_interval = progress_interval;
        }
        config.prune_revisited |= self.prune_revisited;
        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Command::Solve(args)) => {
            run_solver(&args)?;
        }
        Some(Command::Replay { from }) => run_replay(from)?,
        Some(Command::Moves) => run_moves(),
        Some(Command::Check) => run_check()?,
        None => {
            // default: solve and step through the result
            let args = SearchArgs {
                output: PathBuf::from(SOLUTION_TXT),
                ..SearchArgs::default()
            };
            let solution = run_solver(&args)?;
            step_through(&solution)?;
        }
    }

    Ok(())
}

/// Runs the search, saves the solution to disk, and returns it.
fn run_solver(args: &SearchArgs) -> anyhow::Result<MoveSequence> {
    let config = args.search_config()?;
    let report = Solver::new(ENGLISH, config)?.run();

    let solution = match report.outcome {
        SearchOutcome::Solved(moves) => moves,
        SearchOutcome::Exhausted => bail!(
            "no solution exists: search space exhausted after {} iterations",
            report.iterations
        ),
        SearchOutcome::BudgetExceeded => bail!(
            "no solution found within {} iterations",
            report.iterations
        ),
    };

    println!("-DONE-");
    for mv in &solution {
        println!("{mv}");
    }

    persistence::save(&args.output, &solution)
        .with_context(|| format!("failed to save solution to {}", args.output.display()))?;
    info!(path = %args.output.display(), moves = solution.len(), "saved solution");

    Ok(solution)
}

/// Loads (or picks the built-in) solution and steps through it.
fn run_replay(from: Option<PathBuf>) -> anyhow::Result<()> {
    let moves = match from {
        Some(path) => persistence::load(&path)
            .with_context(|| format!("failed to load solution from {}", path.display()))?,
        None => WINNING_MOVESET.to_vec(),
    };
    step_through(&moves)
}

fn step_through(moves: &[Move]) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let end = replay::step_through(&ENGLISH, moves, &mut stdin.lock(), &mut io::stdout())?;
    println!("{}", replay_summary(&end, &ENGLISH.goal, moves.len()));
    Ok(())
}

/// One-line verdict on how a replay ended.
fn replay_summary<const ROWS: usize, const COLS: usize>(
    end: &replay::ReplayEnd<ROWS, COLS>,
    goal: &Board<ROWS, COLS>,
    total: usize,
) -> String {
    if !end.completed {
        format!("Stopped after {} of {} moves.", end.applied, total)
    } else if end.board == *goal {
        "Solved: one marble left in the center.".to_string()
    } else {
        format!(
            "All {} moves applied, but the board ended away from the goal ({} marbles left).",
            total,
            end.board.marble_count()
        )
    }
}

/// Prints the legal moves of the starting board.
fn run_moves() {
    print!("{}", format_board(&ENGLISH.mask, &ENGLISH.initial));
    for mv in legal_moves(&ENGLISH.mask, &ENGLISH.initial) {
        println!("{mv}");
    }
}

/// Replays the built-in winning sequence with full legality checks.
fn run_check() -> anyhow::Result<()> {
    let board = replay_sequence(&ENGLISH.mask, &ENGLISH.initial, &WINNING_MOVESET)?;
    if board != ENGLISH.goal {
        bail!("built-in sequence ends away from the goal:\n{}", format_board(&ENGLISH.mask, &board));
    }
    println!("Built-in sequence of {} moves reaches the goal.", WINNING_MOVESET.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config_defaults() {
        let cli = Cli::parse_from([
            "marbles",
            "solve",
            "--max-iterations",
            "500",
            "--prune-revisited",
        ]);
        let Some(Command::Solve(args)) = cli.command else {
            panic!("expected the solve subcommand");
        };
        let config = args.search_config().unwrap();

        assert_eq!(config.max_iterations, 500);
        assert_eq!(config.progress_interval, 50_000);
        assert!(config.prune_revisited);
        assert_eq!(args.output, PathBuf::from(SOLUTION_TXT));
    }

    #[test]
    fn test_zero_budget_rejected() {
        let args = SearchArgs {
            max_iterations: Some(0),
            ..SearchArgs::default()
        };
        assert!(args.search_config().is_err());
    }

    #[test]
    fn test_builtin_sequence_checks_out() {
        assert!(run_check().is_ok());
    }

    #[test]
    fn test_legal_moves_listing_snapshot() {
        let mut output = String::from("starting board:\n");
        output.push_str(&format_board(&ENGLISH.mask, &ENGLISH.initial));
        for mv in legal_moves(&ENGLISH.mask, &ENGLISH.initial) {
            output.push_str(&format!("{mv}\n"));
        }

        insta::assert_snapshot!("legal_moves_listing", output);
    }

    #[test]
    fn test_replay_summary_flags_wrong_final_board() {
        let short = &WINNING_MOVESET[..30];
        let board = replay_sequence(&ENGLISH.mask, &ENGLISH.initial, short).unwrap();
        let end = replay::ReplayEnd {
            board,
            applied: short.len(),
            completed: true,
        };

        let summary = replay_summary(&end, &ENGLISH.goal, short.len());
        assert_eq!(
            summary,
            "All 30 moves applied, but the board ended away from the goal (2 marbles left)."
        );
    }

    #[test]
    fn test_replay_summary_reports_solved_and_stopped() {
        let solved = replay::ReplayEnd {
            board: ENGLISH.goal,
            applied: WINNING_MOVESET.len(),
            completed: true,
        };
        assert_eq!(
            replay_summary(&solved, &ENGLISH.goal, WINNING_MOVESET.len()),
            "Solved: one marble left in the center."
        );

        let stopped = replay::ReplayEnd {
            board: ENGLISH.initial,
            applied: 0,
            completed: false,
        };
        assert_eq!(
            replay_summary(&stopped, &ENGLISH.goal, WINNING_MOVESET.len()),
            "Stopped after 0 of 31 moves."
        );
    }
}
