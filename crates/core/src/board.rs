//! Board module - the play-field cell matrix
//!
//! The board is a 10x20 matrix of `u8` cells (0 = empty, 1..=7 = locked piece color id).
//! Uses a flat array for cache locality and zero allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//! Rows with negative y form the spawn buffer: pieces may pass through them, but
//! nothing is ever locked there.

use arrayvec::ArrayVec;

use crate::error::LockError;
use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH, EMPTY_CELL};

/// Total number of cells on the board
pub const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Row-major 2D view of the matrix, `[row][column]`
pub type CellRows = [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];

/// The cell matrix - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [EMPTY_CELL; BOARD_SIZE],
        }
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Within bounds and empty
    pub fn is_empty_at(&self, x: i8, y: i8) -> bool {
        self.get(x, y) == Some(EMPTY_CELL)
    }

    /// Within bounds and filled
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(c) if c != EMPTY_CELL)
    }

    /// Whether a falling block may occupy (x, y).
    ///
    /// Cells between the walls are accepted above the top row (spawn buffer); below the
    /// floor or beside the walls they never are.
    pub fn can_hold(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return false;
        }
        y < 0 || self.is_empty_at(x, y)
    }

    /// Check whether every block of `minos`, anchored at (x, y), can be occupied.
    pub fn fits(&self, minos: &[(i8, i8)], x: i8, y: i8) -> bool {
        minos
            .iter()
            .all(|&(dx, dy)| self.can_hold(x + dx, y + dy))
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|&cell| cell != EMPTY_CELL)
    }

    /// Clear all full rows, shifting the rows above down.
    ///
    /// Returns the cleared row indices (bottom to top, as they were before the shift).
    /// A single lock can fill at most four rows, which bounds the result.
    pub fn clear_full_rows(&mut self) -> ArrayVec<usize, 4> {
        let mut cleared_rows = ArrayVec::new();
        let width = BOARD_WIDTH as usize;
        let mut write_y = BOARD_HEIGHT as usize;

        for read_y in (0..BOARD_HEIGHT as usize).rev() {
            if self.is_row_full(read_y) {
                // More than four full rows can only come from hand-built boards; the
                // extra rows still get cleared, they just are not reported.
                let _ = cleared_rows.try_push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        for cell in &mut self.cells[..write_y * width] {
            *cell = EMPTY_CELL;
        }

        cleared_rows
    }

    /// Commit a piece's blocks to the matrix.
    ///
    /// Validates every block first so a failed lock leaves the board untouched.
    pub fn lock_piece(
        &mut self,
        minos: &[(i8, i8)],
        x: i8,
        y: i8,
        color: Cell,
    ) -> Result<(), LockError> {
        for &(dx, dy) in minos {
            let (px, py) = (x + dx, y + dy);
            if px < 0 || px >= BOARD_WIDTH as i8 || py >= BOARD_HEIGHT as i8 {
                return Err(LockError::OutOfBounds { x: px, y: py });
            }
            if py < 0 {
                return Err(LockError::AboveField { x: px, y: py });
            }
            if self.is_occupied(px, py) {
                return Err(LockError::Overlap { x: px, y: py });
            }
        }

        for &(dx, dy) in minos {
            self.set(x + dx, y + dy, color);
        }

        Ok(())
    }

    /// Flat row-major cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Copy the matrix out as rows
    pub fn to_rows(&self) -> CellRows {
        let mut rows = [[EMPTY_CELL; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        for (y, row) in rows.iter_mut().enumerate() {
            let start = y * BOARD_WIDTH as usize;
            row.copy_from_slice(&self.cells[start..start + BOARD_WIDTH as usize]);
        }
        rows
    }

    /// Build a board from rows (used by tests and scripted setups)
    pub fn from_rows(rows: &CellRows) -> Self {
        let mut board = Self::new();
        for (y, row) in rows.iter().enumerate() {
            let start = y * BOARD_WIDTH as usize;
            board.cells[start..start + BOARD_WIDTH as usize].copy_from_slice(row);
        }
        board
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != EMPTY_CELL).count()
    }

    pub fn is_clear(&self) -> bool {
        self.occupied_count() == 0
    }

    pub fn clear(&mut self) {
        self.cells = [EMPTY_CELL; BOARD_SIZE];
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(board: &mut Board, y: i8, color: Cell) {
        for x in 0..BOARD_WIDTH as i8 {
            board.set(x, y, color);
        }
    }

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 19), Some(199));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
    }

    #[test]
    fn test_spawn_buffer_accepts_cells_above_top() {
        let board = Board::new();
        assert!(board.can_hold(4, -1));
        assert!(board.can_hold(0, -3));
        assert!(!board.can_hold(-1, -1));
        assert!(!board.can_hold(10, -1));
        assert!(!board.can_hold(4, 20));
    }

    #[test]
    fn test_clear_single_row_shifts_above_down() {
        let mut board = Board::new();
        board.set(2, 17, 3);
        board.set(5, 18, 6);
        fill_row(&mut board, 19, 1);

        let cleared = board.clear_full_rows();

        assert_eq!(cleared.as_slice(), &[19]);
        assert_eq!(board.get(2, 18), Some(3));
        assert_eq!(board.get(5, 19), Some(6));
        assert_eq!(board.get(2, 17), Some(EMPTY_CELL));
        assert_eq!(board.occupied_count(), 2);
    }

    #[test]
    fn test_clear_non_adjacent_rows() {
        let mut board = Board::new();
        fill_row(&mut board, 19, 1);
        board.set(0, 18, 2);
        fill_row(&mut board, 17, 4);
        board.set(9, 16, 5);

        let cleared = board.clear_full_rows();

        assert_eq!(cleared.as_slice(), &[19, 17]);
        assert_eq!(board.get(0, 19), Some(2));
        assert_eq!(board.get(9, 18), Some(5));
        assert_eq!(board.occupied_count(), 2);
    }

    #[test]
    fn test_lock_failure_leaves_board_untouched() {
        let mut board = Board::new();
        board.set(4, 5, 3);
        let before = board.clone();

        let shape = [(0, 0), (1, 0), (0, 1), (1, 1)];
        assert_eq!(
            board.lock_piece(&shape, 3, 5, 2),
            Err(LockError::Overlap { x: 4, y: 5 })
        );
        assert_eq!(board, before);

        assert_eq!(
            board.lock_piece(&shape, 0, -1, 2),
            Err(LockError::AboveField { x: 0, y: -1 })
        );
        assert_eq!(
            board.lock_piece(&shape, 9, 0, 2),
            Err(LockError::OutOfBounds { x: 10, y: 0 })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_rows_round_trip() {
        let mut board = Board::new();
        board.set(3, 5, 2);
        board.set(7, 10, 7);

        let rows = board.to_rows();
        assert_eq!(rows[5][3], 2);
        assert_eq!(rows[10][7], 7);
        assert_eq!(Board::from_rows(&rows), board);
    }
}
