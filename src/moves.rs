//! Jump moves: enumeration, validation and application.
//!
//! Directions follow plot coordinates where the row index is the horizontal
//! axis: LEFT and RIGHT change the row, UP and DOWN change the column.

use std::fmt;

use crate::board::{cell_to_idx, idx_to_cell, Board, ValidMask};
use crate::error::{MoveError, ReplayError};

/// One of the four straight jump directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Order in which a single cell's moves are generated.
    ///
    /// Changing this changes which solution the search finds first.
    pub const SEARCH_ORDER: [Direction; 4] = [
        Direction::Down,
        Direction::Up,
        Direction::Right,
        Direction::Left,
    ];

    /// Unit step as (row delta, column delta).
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
            Direction::Up => "UP",
            Direction::Down => "DOWN",
        }
    }

    /// Case-insensitive inverse of [`Direction::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        [
            Direction::Left,
            Direction::Right,
            Direction::Up,
            Direction::Down,
        ]
        .into_iter()
        .find(|direction| direction.name().eq_ignore_ascii_case(name))
    }

    const fn code(self) -> u8 {
        match self {
            Direction::Left => 0,
            Direction::Right => 1,
            Direction::Up => 2,
            Direction::Down => 3,
        }
    }

    const fn from_code(code: u8) -> Self {
        match code & 0b11 {
            0 => Direction::Left,
            1 => Direction::Right,
            2 => Direction::Up,
            _ => Direction::Down,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The marble at `(row, col)` jumps two cells in `direction`.
///
/// A move says nothing about legality on its own; that depends on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub row: u8,
    pub col: u8,
    pub direction: Direction,
}

impl Move {
    pub const fn new(row: u8, col: u8, direction: Direction) -> Self {
        Self { row, col, direction }
    }

    /// Cell `steps` away from the source along the move's direction.
    ///
    /// May be off the grid; callers check before indexing.
    pub const fn step(&self, steps: i32) -> (i32, i32) {
        let (row_delta, col_delta) = self.direction.delta();
        (
            self.row as i32 + steps * row_delta,
            self.col as i32 + steps * col_delta,
        )
    }

    /// The cell being jumped over.
    pub const fn jumped(&self) -> (i32, i32) {
        self.step(1)
    }

    /// The landing cell.
    pub const fn destination(&self) -> (i32, i32) {
        self.step(2)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {}", self.row, self.col, self.direction)
    }
}

/// An ordered list of moves replayed from a starting board.
pub type MoveSequence = Vec<Move>;

/// A move packed into one byte: `cell_index << 2 | direction`.
///
/// Cell indices stay below 64, so six bits suffice for the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PackedMove(u8);

impl PackedMove {
    #[inline(always)]
    pub(crate) const fn pack<const COLS: usize>(mv: Move) -> Self {
        let cell_index = cell_to_idx::<COLS>(mv.row as usize, mv.col as usize);
        Self(((cell_index as u8) << 2) | mv.direction.code())
    }

    #[inline(always)]
    pub(crate) const fn unpack<const COLS: usize>(self) -> Move {
        let (row, col) = idx_to_cell::<COLS>((self.0 >> 2) as usize);
        Move::new(row as u8, col as u8, Direction::from_code(self.0))
    }
}

/// Converts a signed position to a cell index, or `None` if it is off the grid.
fn grid_index<const ROWS: usize, const COLS: usize>((row, col): (i32, i32)) -> Option<usize> {
    if row < 0 || col < 0 || row as usize >= ROWS || col as usize >= COLS {
        None
    } else {
        Some(cell_to_idx::<COLS>(row as usize, col as usize))
    }
}

/// Calls `visit` with each legal move from the marble at `(row, col)`.
///
/// Directions are tried in [`Direction::SEARCH_ORDER`]. The caller must only
/// pass occupied cells. Each direction is bounds-checked before any cell two
/// steps away is indexed.
pub fn for_each_legal_move_for_cell<const ROWS: usize, const COLS: usize>(
    mask: &ValidMask<ROWS, COLS>,
    board: &Board<ROWS, COLS>,
    row: usize,
    col: usize,
    mut visit: impl FnMut(Move),
) {
    debug_assert!(board.is_occupied(row, col), "({row}, {col}) holds no marble");

    for direction in Direction::SEARCH_ORDER {
        let two_steps_on_grid = match direction {
            Direction::Down => col >= 2,
            Direction::Up => col + 2 < COLS,
            Direction::Right => row + 2 < ROWS,
            Direction::Left => row >= 2,
        };
        if !two_steps_on_grid {
            continue;
        }

        let mv = Move::new(row as u8, col as u8, direction);
        let (Some(jumped), Some(landing)) = (
            grid_index::<ROWS, COLS>(mv.jumped()),
            grid_index::<ROWS, COLS>(mv.destination()),
        ) else {
            unreachable!("bounds guard let {mv} leave the grid");
        };

        if board.is_occupied_idx(jumped)
            && mask.contains_idx(landing)
            && !board.is_occupied_idx(landing)
        {
            visit(mv);
        }
    }
}

/// Calls `visit` with every legal move on the board.
///
/// Occupied cells are visited in row-major order.
pub fn for_each_legal_move<const ROWS: usize, const COLS: usize>(
    mask: &ValidMask<ROWS, COLS>,
    board: &Board<ROWS, COLS>,
    mut visit: impl FnMut(Move),
) {
    for (row, col) in board.occupied_cells() {
        for_each_legal_move_for_cell(mask, board, row, col, &mut visit);
    }
}

/// Legal moves from the marble at `(row, col)`.
pub fn legal_moves_for_cell<const ROWS: usize, const COLS: usize>(
    mask: &ValidMask<ROWS, COLS>,
    board: &Board<ROWS, COLS>,
    row: usize,
    col: usize,
) -> Vec<Move> {
    let mut moves = Vec::with_capacity(4);
    for_each_legal_move_for_cell(mask, board, row, col, |mv| moves.push(mv));
    moves
}

/// All legal moves on the board, in search order.
pub fn legal_moves<const ROWS: usize, const COLS: usize>(
    mask: &ValidMask<ROWS, COLS>,
    board: &Board<ROWS, COLS>,
) -> Vec<Move> {
    let mut moves = Vec::new();
    for_each_legal_move(mask, board, |mv| moves.push(mv));
    moves
}

/// Checks every legality condition for an arbitrary move.
pub fn check_move<const ROWS: usize, const COLS: usize>(
    mask: &ValidMask<ROWS, COLS>,
    board: &Board<ROWS, COLS>,
    mv: Move,
) -> Result<(), MoveError> {
    let source = grid_index::<ROWS, COLS>((mv.row as i32, mv.col as i32))
        .ok_or(MoveError::OutOfBounds(mv))?;
    if !board.is_occupied_idx(source) {
        return Err(MoveError::EmptySource(mv));
    }

    let landing =
        grid_index::<ROWS, COLS>(mv.destination()).ok_or(MoveError::OutOfBounds(mv))?;
    let jumped = grid_index::<ROWS, COLS>(mv.jumped()).ok_or(MoveError::OutOfBounds(mv))?;

    if !board.is_occupied_idx(jumped) {
        return Err(MoveError::NothingToJump(mv));
    }
    if !mask.contains_idx(landing) {
        return Err(MoveError::InvalidDestination(mv));
    }
    if board.is_occupied_idx(landing) {
        return Err(MoveError::OccupiedDestination(mv));
    }

    Ok(())
}

pub fn is_legal<const ROWS: usize, const COLS: usize>(
    mask: &ValidMask<ROWS, COLS>,
    board: &Board<ROWS, COLS>,
    mv: Move,
) -> bool {
    check_move(mask, board, mv).is_ok()
}

/// Applies a move after validating it.
pub fn apply<const ROWS: usize, const COLS: usize>(
    mask: &ValidMask<ROWS, COLS>,
    board: &Board<ROWS, COLS>,
    mv: Move,
) -> Result<Board<ROWS, COLS>, MoveError> {
    check_move(mask, board, mv)?;
    Ok(apply_unchecked(board, mv))
}

/// Applies a move the caller has already validated.
///
/// Empties the source and jumped cells and fills the landing cell.
#[inline]
pub(crate) fn apply_unchecked<const ROWS: usize, const COLS: usize>(
    board: &Board<ROWS, COLS>,
    mv: Move,
) -> Board<ROWS, COLS> {
    let source = cell_to_idx::<COLS>(mv.row as usize, mv.col as usize);
    let (jumped_row, jumped_col) = mv.jumped();
    let (landing_row, landing_col) = mv.destination();
    debug_assert!(
        landing_row >= 0
            && landing_col >= 0
            && (landing_row as usize) < ROWS
            && (landing_col as usize) < COLS,
        "{mv} lands off the grid"
    );
    let jumped = cell_to_idx::<COLS>(jumped_row as usize, jumped_col as usize);
    let landing = cell_to_idx::<COLS>(landing_row as usize, landing_col as usize);
    debug_assert!(
        board.is_occupied_idx(source)
            && board.is_occupied_idx(jumped)
            && !board.is_occupied_idx(landing),
        "{mv} is not legal on this board"
    );

    let mut next = *board;
    next.set_idx(source, false);
    next.set_idx(jumped, false);
    next.set_idx(landing, true);
    next
}

/// Applies each move in order from `start`, validating every step.
pub fn replay<const ROWS: usize, const COLS: usize>(
    mask: &ValidMask<ROWS, COLS>,
    start: &Board<ROWS, COLS>,
    moves: &[Move],
) -> Result<Board<ROWS, COLS>, ReplayError> {
    moves
        .iter()
        .enumerate()
        .try_fold(*start, |board, (index, &mv)| {
            apply(mask, &board, mv).map_err(|source| ReplayError { index, source })
        })
}

const L: Direction = Direction::Left;
const R: Direction = Direction::Right;
const U: Direction = Direction::Up;
const D: Direction = Direction::Down;

/// A known 31-move solution for the English board, center to center.
///
/// This is also the first solution the depth-first search reaches.
#[rustfmt::skip]
pub const WINNING_MOVESET: [Move; 31] = [
    Move::new(5, 3, L), Move::new(4, 5, D), Move::new(6, 4, L), Move::new(6, 2, U),
    Move::new(4, 3, U), Move::new(4, 6, D), Move::new(4, 2, R), Move::new(4, 0, U),
    Move::new(3, 4, R), Move::new(6, 4, L), Move::new(3, 6, D), Move::new(3, 4, R),
    Move::new(3, 2, R), Move::new(6, 2, L), Move::new(3, 0, U), Move::new(3, 2, R),
    Move::new(1, 4, R), Move::new(2, 6, D), Move::new(2, 4, R), Move::new(5, 4, L),
    Move::new(3, 4, D), Move::new(2, 2, R), Move::new(5, 2, L), Move::new(2, 0, U),
    Move::new(2, 3, D), Move::new(0, 2, R), Move::new(3, 2, L), Move::new(0, 4, D),
    Move::new(0, 2, R), Move::new(2, 1, U), Move::new(1, 3, R),
];
