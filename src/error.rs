//! Error types for move validation, configuration and solution files.

use std::path::PathBuf;

use crate::moves::Move;

/// Reasons a move cannot be applied to a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("move {0} leaves the board grid")]
    OutOfBounds(Move),

    #[error("move {0} starts from an empty cell")]
    EmptySource(Move),

    #[error("move {0} has no marble to jump over")]
    NothingToJump(Move),

    #[error("move {0} lands outside the playable board")]
    InvalidDestination(Move),

    #[error("move {0} lands on an occupied cell")]
    OccupiedDestination(Move),
}

/// A move sequence that stopped being legal part way through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("move #{} of the sequence is illegal: {source}", .index + 1)]
pub struct ReplayError {
    /// Zero-based position of the offending move.
    pub index: usize,
    pub source: MoveError,
}

/// Errors that can occur when loading search configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors that can occur when saving or loading a solution file.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}
