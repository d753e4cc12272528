//! Board tests - cell matrix, locking and row clearing

use tetris_grid::core::{Board, LockError};
use tetris_grid::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH, EMPTY_CELL};

const O_SHAPE: [(i8, i8); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

fn fill_row(board: &mut Board, y: i8, color: u8) {
    for x in 0..BOARD_WIDTH as i8 {
        board.set(x, y, color);
    }
}

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.height(), BOARD_HEIGHT);

    for y in 0..BOARD_HEIGHT as i8 {
        for x in 0..BOARD_WIDTH as i8 {
            assert_eq!(board.get(x, y), Some(EMPTY_CELL), "cell ({}, {})", x, y);
        }
    }
    assert!(board.is_clear());
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new();
    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(BOARD_WIDTH as i8, 0), None);
    assert_eq!(board.get(0, BOARD_HEIGHT as i8), None);
}

#[test]
fn test_spawn_buffer_accepts_falling_blocks_only_between_walls() {
    let board = Board::new();
    assert!(board.can_hold(0, -2));
    assert!(board.can_hold(9, -1));
    assert!(!board.can_hold(-1, -1));
    assert!(!board.can_hold(BOARD_WIDTH as i8, -1));
    assert!(!board.can_hold(0, BOARD_HEIGHT as i8));
}

#[test]
fn test_lock_piece_writes_color_id() {
    let mut board = Board::new();
    let color = PieceKind::O.color_id();

    board.lock_piece(&O_SHAPE, 3, 5, color).unwrap();

    assert_eq!(board.get(3, 5), Some(color));
    assert_eq!(board.get(4, 5), Some(color));
    assert_eq!(board.get(3, 6), Some(color));
    assert_eq!(board.get(4, 6), Some(color));
    assert_eq!(board.occupied_count(), 4);
}

#[test]
fn test_failed_lock_leaves_board_untouched() {
    let mut board = Board::new();
    board.set(4, 6, PieceKind::T.color_id());
    let before = board.clone();

    assert_eq!(
        board.lock_piece(&O_SHAPE, 3, 5, PieceKind::O.color_id()),
        Err(LockError::Overlap { x: 4, y: 6 })
    );
    assert_eq!(board, before);

    assert_eq!(
        board.lock_piece(&O_SHAPE, 3, -1, PieceKind::O.color_id()),
        Err(LockError::AboveField { x: 3, y: -1 })
    );
    assert!(matches!(
        board.lock_piece(&O_SHAPE, 9, 0, PieceKind::O.color_id()),
        Err(LockError::OutOfBounds { .. })
    ));
    assert_eq!(board, before);
}

#[test]
fn test_clear_single_row_shifts_rows_above() {
    let mut board = Board::new();
    fill_row(&mut board, 19, PieceKind::I.color_id());
    board.set(2, 18, PieceKind::S.color_id());
    board.set(7, 10, PieceKind::Z.color_id());

    let cleared = board.clear_full_rows();

    assert_eq!(cleared.as_slice(), &[19]);
    assert_eq!(board.get(2, 19), Some(PieceKind::S.color_id()));
    assert_eq!(board.get(7, 11), Some(PieceKind::Z.color_id()));
    assert_eq!(board.get(7, 10), Some(EMPTY_CELL));
    assert_eq!(board.occupied_count(), 2);
}

#[test]
fn test_clear_non_adjacent_rows() {
    let mut board = Board::new();
    fill_row(&mut board, 19, PieceKind::I.color_id());
    fill_row(&mut board, 17, PieceKind::L.color_id());
    board.set(0, 18, PieceKind::T.color_id());
    board.set(0, 16, PieceKind::J.color_id());

    let cleared = board.clear_full_rows();

    assert_eq!(cleared.as_slice(), &[19, 17]);
    assert_eq!(board.get(0, 19), Some(PieceKind::T.color_id()));
    assert_eq!(board.get(0, 18), Some(PieceKind::J.color_id()));
    assert_eq!(board.occupied_count(), 2);
}

#[test]
fn test_rows_round_trip() {
    let mut board = Board::new();
    board.set(1, 2, PieceKind::T.color_id());
    board.set(9, 19, PieceKind::I.color_id());

    let rows = board.to_rows();
    assert_eq!(rows[2][1], PieceKind::T.color_id());
    assert_eq!(Board::from_rows(&rows), board);
}
