//! Board geometry and occupancy for peg-solitaire style boards.
//!
//! Generic over the grid shape (`ROWS` x `COLS`). Both the playable-cell mask
//! and the marble occupancy are `u64` bitmasks where bit `row * COLS + col`
//! stands for the cell at `(row, col)`, so a board holds at most 64 cells.

/// Maximum number of cells in a grid (one bit per cell in a `u64`).
pub const MAX_CELLS: usize = 64;

/// Converts (row, col) to a linear cell index.
///
/// Index order is row-major: `idx = row * COLS + col`.
#[inline(always)]
pub const fn cell_to_idx<const COLS: usize>(row: usize, col: usize) -> usize {
    row * COLS + col
}

/// Converts a linear cell index to (row, col).
#[inline(always)]
pub const fn idx_to_cell<const COLS: usize>(cell_index: usize) -> (usize, usize) {
    (cell_index / COLS, cell_index % COLS)
}

/// Packs a boolean grid into a bitmask, checking the shape fits at compile time.
const fn grid_to_bits<const ROWS: usize, const COLS: usize>(grid: [[bool; COLS]; ROWS]) -> u64 {
    assert!(ROWS * COLS <= MAX_CELLS, "ROWS * COLS must be <= 64 (u64 bitmask)");
    let mut bits = 0u64;
    let mut row = 0;
    while row < ROWS {
        let mut col = 0;
        while col < COLS {
            if grid[row][col] {
                bits |= 1 << cell_to_idx::<COLS>(row, col);
            }
            col += 1;
        }
        row += 1;
    }
    bits
}

/// The static set of playable cells. Never changes once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValidMask<const ROWS: usize, const COLS: usize> {
    bits: u64,
}

impl<const ROWS: usize, const COLS: usize> ValidMask<ROWS, COLS> {
    pub const fn from_grid(grid: [[bool; COLS]; ROWS]) -> Self {
        Self {
            bits: grid_to_bits(grid),
        }
    }

    #[inline(always)]
    pub const fn bits(&self) -> u64 {
        self.bits
    }

    #[inline(always)]
    pub(crate) const fn contains_idx(&self, cell_index: usize) -> bool {
        self.bits & (1 << cell_index) != 0
    }

    /// True iff `(row, col)` lies inside the grid and is a playable cell.
    ///
    /// Accepts signed coordinates so callers can ask about off-board positions.
    pub fn is_valid(&self, row: i32, col: i32) -> bool {
        if row < 0 || col < 0 || row as usize >= ROWS || col as usize >= COLS {
            return false;
        }
        self.contains_idx(cell_to_idx::<COLS>(row as usize, col as usize))
    }

    /// Number of playable cells.
    pub fn cell_count(&self) -> u32 {
        self.bits.count_ones()
    }

    /// True if every marble on `board` sits on a playable cell.
    pub fn contains_board(&self, board: &Board<ROWS, COLS>) -> bool {
        board.bits() & !self.bits == 0
    }
}

/// Marble occupancy of every cell.
///
/// Cells outside the mask are always empty. Equality is cell-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board<const ROWS: usize, const COLS: usize> {
    occupied: u64,
}

impl<const ROWS: usize, const COLS: usize> Board<ROWS, COLS> {
    pub const EMPTY: Self = Self { occupied: 0 };

    /// Builds a board by copying an occupancy grid.
    ///
    /// No validation beyond the shape: callers supply mask-consistent grids.
    pub const fn from_grid(grid: [[bool; COLS]; ROWS]) -> Self {
        Self {
            occupied: grid_to_bits(grid),
        }
    }

    #[inline(always)]
    pub const fn bits(&self) -> u64 {
        self.occupied
    }

    #[inline(always)]
    pub(crate) const fn is_occupied_idx(&self, cell_index: usize) -> bool {
        self.occupied & (1 << cell_index) != 0
    }

    #[inline(always)]
    pub(crate) fn set_idx(&mut self, cell_index: usize, occupied: bool) {
        if occupied {
            self.occupied |= 1 << cell_index;
        } else {
            self.occupied &= !(1 << cell_index);
        }
    }

    /// True if a marble sits at `(row, col)`. Off-grid positions are empty.
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        row < ROWS && col < COLS && self.is_occupied_idx(cell_to_idx::<COLS>(row, col))
    }

    pub fn marble_count(&self) -> u32 {
        self.occupied.count_ones()
    }

    /// Occupied cells in row-major order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let mut remaining = self.occupied;
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            // lowest set bit is the next cell in row-major order
            let cell_index = remaining.trailing_zeros() as usize;
            remaining &= remaining - 1;
            Some(idx_to_cell::<COLS>(cell_index))
        })
    }
}

/// A complete puzzle: playable cells plus start and goal configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout<const ROWS: usize, const COLS: usize> {
    pub mask: ValidMask<ROWS, COLS>,
    pub initial: Board<ROWS, COLS>,
    pub goal: Board<ROWS, COLS>,
}

impl<const ROWS: usize, const COLS: usize> Layout<ROWS, COLS> {
    /// Creates a layout, checking both boards only use playable cells.
    pub const fn new(
        mask: ValidMask<ROWS, COLS>,
        initial: Board<ROWS, COLS>,
        goal: Board<ROWS, COLS>,
    ) -> Self {
        assert!(
            initial.occupied & !mask.bits == 0,
            "initial board occupies cells outside the mask"
        );
        assert!(
            goal.occupied & !mask.bits == 0,
            "goal board occupies cells outside the mask"
        );
        Self {
            mask,
            initial,
            goal,
        }
    }
}

const I: bool = true;
const O: bool = false;

/// English board dimensions.
pub const ENGLISH_ROWS: usize = 7;
pub const ENGLISH_COLS: usize = 7;

pub type EnglishBoard = Board<ENGLISH_ROWS, ENGLISH_COLS>;

/// The 33-hole cross: the four 2x2 corner blocks are not part of the board.
pub const ENGLISH_MASK: ValidMask<ENGLISH_ROWS, ENGLISH_COLS> = ValidMask::from_grid([
    [O, O, I, I, I, O, O],
    [O, O, I, I, I, O, O],
    [I, I, I, I, I, I, I],
    [I, I, I, I, I, I, I],
    [I, I, I, I, I, I, I],
    [O, O, I, I, I, O, O],
    [O, O, I, I, I, O, O],
]);

/// Every playable cell filled except the center.
pub const ENGLISH_INITIAL: EnglishBoard = Board::from_grid([
    [O, O, I, I, I, O, O],
    [O, O, I, I, I, O, O],
    [I, I, I, I, I, I, I],
    [I, I, I, O, I, I, I],
    [I, I, I, I, I, I, I],
    [O, O, I, I, I, O, O],
    [O, O, I, I, I, O, O],
]);

/// A single marble left in the center.
pub const ENGLISH_GOAL: EnglishBoard = Board::from_grid([
    [O, O, O, O, O, O, O],
    [O, O, O, O, O, O, O],
    [O, O, O, O, O, O, O],
    [O, O, O, I, O, O, O],
    [O, O, O, O, O, O, O],
    [O, O, O, O, O, O, O],
    [O, O, O, O, O, O, O],
]);

/// The classic center-to-center puzzle.
pub const ENGLISH: Layout<ENGLISH_ROWS, ENGLISH_COLS> =
    Layout::new(ENGLISH_MASK, ENGLISH_INITIAL, ENGLISH_GOAL);

/// Formats a board as text, one grid row per line.
///
/// Marbles show as 'o', empty playable cells as '.', and cells outside
/// the mask as blanks. Trailing blanks are trimmed.
pub fn format_board<const ROWS: usize, const COLS: usize>(
    mask: &ValidMask<ROWS, COLS>,
    board: &Board<ROWS, COLS>,
) -> String {
    let mut output = String::new();

    for row in 0..ROWS {
        let mut line = String::with_capacity(COLS * 2);
        for col in 0..COLS {
            if col > 0 {
                line.push(' ');
            }
            let cell_index = cell_to_idx::<COLS>(row, col);
            let display_char = if !mask.contains_idx(cell_index) {
                ' '
            } else if board.is_occupied_idx(cell_index) {
                'o'
            } else {
                '.'
            };
            line.push(display_char);
        }
        output.push_str(line.trim_end());
        output.push('\n');
    }

    output
}
