//! File I/O for saving and loading a solution's move sequence.
//!
//! Text format for `solution.txt`:
//! - a `# marbles solution: N moves` header comment
//! - one move per line: `row col DIRECTION`, e.g. `5 3 LEFT`
//!
//! Blank lines and lines starting with `#` are ignored when loading.

use std::fs;
use std::path::Path;

use crate::error::PersistenceError;
use crate::moves::{Direction, Move, MoveSequence};

/// Default file name for a saved solution.
pub const SOLUTION_TXT: &str = "solution.txt";

/// Formats a move sequence in the solution file format.
pub fn format_moves(moves: &[Move]) -> String {
    let mut output = format!("# marbles solution: {} moves\n", moves.len());
    for mv in moves {
        output.push_str(&format!("{} {} {}\n", mv.row, mv.col, mv.direction));
    }
    output
}

/// Parses the solution file format.
pub fn parse_moves(text: &str) -> Result<MoveSequence, PersistenceError> {
    let mut moves = Vec::new();

    for (line_index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parse_error = |reason: String| PersistenceError::Parse {
            line: line_index + 1,
            reason,
        };

        let fields: Vec<&str> = line.split_whitespace().collect();
        let [row, col, direction] = fields[..] else {
            return Err(parse_error(format!(
                "expected `row col DIRECTION`, found {} fields",
                fields.len()
            )));
        };

        let row: u8 = row
            .parse()
            .map_err(|_| parse_error(format!("invalid row {row:?}")))?;
        let col: u8 = col
            .parse()
            .map_err(|_| parse_error(format!("invalid column {col:?}")))?;
        let direction = Direction::from_name(direction)
            .ok_or_else(|| parse_error(format!("unknown direction {direction:?}")))?;

        moves.push(Move::new(row, col, direction));
    }

    Ok(moves)
}

/// Saves a move sequence to `path`.
pub fn save(path: &Path, moves: &[Move]) -> Result<(), PersistenceError> {
    fs::write(path, format_moves(moves))?;
    Ok(())
}

/// Loads a move sequence from `path`.
///
/// Only the syntax is checked; legality depends on the board it is replayed on.
pub fn load(path: &Path) -> Result<MoveSequence, PersistenceError> {
    let text = fs::read_to_string(path)?;
    parse_moves(&text)
}
