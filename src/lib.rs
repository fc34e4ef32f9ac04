//! Marble Solitaire Solver Library
//!
//! Board model, jump-move rules and an exhaustive depth-first search for
//! peg-solitaire style puzzles on boards of up to 64 cells.

pub mod board;
pub mod config;
pub mod error;
pub mod moves;
pub mod persistence;
pub mod solver;

pub use board::{Board, Layout, ValidMask, ENGLISH};
pub use config::SearchConfig;
pub use error::{ConfigError, MoveError, PersistenceError, ReplayError};
pub use moves::{Direction, Move, MoveSequence, WINNING_MOVESET};
pub use solver::{solve, SearchOutcome, SearchReport, Solver};
