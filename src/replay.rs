//! Step-through replay of a move sequence in the terminal.

use std::io::{BufRead, Write};

use anyhow::Context;

use marbles::board::{format_board, Board, Layout};
use marbles::moves::{apply, Move};

/// Where a replay stopped.
#[derive(Debug)]
pub struct ReplayEnd<const ROWS: usize, const COLS: usize> {
    pub board: Board<ROWS, COLS>,
    pub applied: usize,
    pub completed: bool,
}

/// Prints `prompt` and reads one line. End of input counts as a stop request.
fn ask<R: BufRead, W: Write>(prompt: &str, input: &mut R, output: &mut W) -> anyhow::Result<bool> {
    write!(output, "{prompt}")?;
    output.flush()?;
    let mut answer = String::new();
    let bytes_read = input.read_line(&mut answer)?;
    Ok(bytes_read > 0 && answer.trim().is_empty())
}

/// Replays `moves` from the layout's initial board, pausing before every move.
///
/// An empty line continues; anything else stops the replay early.
pub fn step_through<R: BufRead, W: Write, const ROWS: usize, const COLS: usize>(
    layout: &Layout<ROWS, COLS>,
    moves: &[Move],
    input: &mut R,
    output: &mut W,
) -> anyhow::Result<ReplayEnd<ROWS, COLS>> {
    let mut board = layout.initial;
    write!(output, "{}", format_board(&layout.mask, &board))?;

    for (index, &mv) in moves.iter().enumerate() {
        if !ask("Next? ", input, output)? {
            return Ok(ReplayEnd {
                board,
                applied: index,
                completed: false,
            });
        }
        board = apply(&layout.mask, &board, mv)
            .with_context(|| format!("move #{} cannot be replayed", index + 1))?;
        writeln!(output, "{mv}")?;
        write!(output, "{}", format_board(&layout.mask, &board))?;
    }

    ask("Done? ", input, output)?;
    Ok(ReplayEnd {
        board,
        applied: moves.len(),
        completed: true,
    })
}
