//! Player intents applied to a [`Grid`]
//!
//! The controller borrows the grid for the duration of one intent and owns nothing.
//! Blocked moves and rotations return `false`; only broken invariants are errors.
//! Everything except `Pause` and `Restart` is ignored unless the grid is running.

use crate::error::GridError;
use crate::grid::{ActivePiece, Grid};
use crate::piece::kick_offsets;
use crate::types::{GameAction, GridState, MoveDirection, PieceKind, RotateDirection};

pub struct GameController<'g> {
    grid: &'g mut Grid,
}

impl<'g> GameController<'g> {
    pub fn new(grid: &'g mut Grid) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &Grid {
        self.grid
    }

    fn running_piece(&self) -> Option<ActivePiece> {
        if self.grid.state() != GridState::Running {
            return None;
        }
        self.grid.active()
    }

    /// Shift the active piece one cell; applied only if every block fits.
    pub fn move_piece(&mut self, direction: MoveDirection) -> bool {
        let Some(active) = self.running_piece() else {
            return false;
        };

        let (dx, dy) = direction.delta();
        let moved = active.shifted(dx, dy);
        if !moved.fits(self.grid.board()) {
            return false;
        }
        self.grid.set_active(moved);
        true
    }

    /// Rotate one step, trying wall kicks in order. All-or-nothing.
    pub fn rotate(&mut self, direction: RotateDirection) -> bool {
        let Some(active) = self.running_piece() else {
            return false;
        };

        // O looks the same in every orientation
        if active.kind() == PieceKind::O {
            return false;
        }

        let mut rotated = active;
        rotated.piece.rotate(direction);

        let kicks = kick_offsets(active.kind(), active.piece.rotation(), direction);
        let tries = if self.grid.tuning().wall_kicks {
            &kicks[..]
        } else {
            &kicks[..1]
        };

        for &(dx, dy) in tries {
            let candidate = rotated.shifted(dx, dy);
            if candidate.fits(self.grid.board()) {
                self.grid.set_active(candidate);
                return true;
            }
        }
        false
    }

    /// One row down per call, scoring `soft_drop_points`.
    ///
    /// Unlike [`GameController::hard_drop`] this does not repeat until the piece is
    /// blocked; a held key repeats the intent instead. It never locks; gravity does that.
    pub fn soft_drop(&mut self) -> bool {
        if !self.move_piece(MoveDirection::Down) {
            return false;
        }
        let points = self.grid.tuning().drop_score(1, false);
        self.grid.add_score(points);
        true
    }

    /// Drop to the lowest fitting row and lock immediately.
    ///
    /// Returns the drop bonus awarded (line clear rewards come on top).
    pub fn hard_drop(&mut self) -> Result<u32, GridError> {
        let Some(active) = self.running_piece() else {
            return Ok(0);
        };

        let rows = self.grid.drop_distance(&active);
        if rows > 0 {
            self.grid.set_active(active.shifted(0, rows as i8));
        }
        let points = self.grid.tuning().drop_score(rows, true);
        self.grid.add_score(points);
        self.grid.lock_active()?;

        Ok(points)
    }

    /// Swap the active piece with the hold slot; an empty slot takes the next piece.
    pub fn hold(&mut self) -> bool {
        if !self.grid.can_hold() {
            return false;
        }
        let Some(active) = self.running_piece() else {
            return false;
        };

        let current = active.kind();
        let placed = match self.grid.hold_piece() {
            Some(held) => self.grid.place(held),
            None => self.grid.spawn_next(),
        };
        self.grid.set_hold(current);

        if !placed {
            tracing::debug!(?current, "held piece swapped into a blocked spawn");
        }
        true
    }

    /// Dispatch one [`GameAction`]
    pub fn apply(&mut self, action: GameAction) -> Result<bool, GridError> {
        let applied = match action {
            GameAction::MoveLeft => self.move_piece(MoveDirection::Left),
            GameAction::MoveRight => self.move_piece(MoveDirection::Right),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::HardDrop => {
                let was_running = self.running_piece().is_some();
                self.hard_drop()?;
                was_running
            }
            GameAction::RotateCw => self.rotate(RotateDirection::Clockwise),
            GameAction::RotateCcw => self.rotate(RotateDirection::CounterClockwise),
            GameAction::Hold => self.hold(),
            GameAction::Pause => self.grid.toggle_pause(),
            GameAction::Restart => {
                self.grid.reset();
                true
            }
        };
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::config::GameConfig;
    use crate::scoring::Tuning;
    use crate::types::{Notification, Rotation, BOARD_WIDTH, SPAWN_X};

    fn grid_with(kind: PieceKind) -> Grid {
        let config = GameConfig {
            seed: Some(12345),
            ..GameConfig::default()
        };
        let mut grid = Grid::new(&config, 0);
        assert!(grid.respawn_as(kind));
        grid
    }

    #[test]
    fn test_move_left_right() {
        let mut grid = grid_with(PieceKind::T);
        let mut ctl = GameController::new(&mut grid);

        assert!(ctl.move_piece(MoveDirection::Left));
        assert_eq!(ctl.grid().active().unwrap().x, SPAWN_X - 1);
        assert!(ctl.move_piece(MoveDirection::Right));
        assert!(ctl.move_piece(MoveDirection::Right));
        assert_eq!(ctl.grid().active().unwrap().x, SPAWN_X + 1);
    }

    #[test]
    fn test_move_blocked_by_wall() {
        let mut grid = grid_with(PieceKind::O);
        let mut ctl = GameController::new(&mut grid);

        let mut moves = 0;
        while ctl.move_piece(MoveDirection::Left) {
            moves += 1;
        }
        // O blocks sit in columns 1-2 of the box.
        assert_eq!(moves, SPAWN_X + 1);
        assert_eq!(ctl.grid().active().unwrap().x, -1);
        assert!(!ctl.move_piece(MoveDirection::Left));
    }

    #[test]
    fn test_move_blocked_by_locked_cells() {
        let mut grid = grid_with(PieceKind::O);
        let mut board = Board::new();
        // O occupies columns 4-5 at spawn; wall off column 6 on its rows.
        board.set(6, 0, PieceKind::Z.color_id());
        board.set(6, 1, PieceKind::Z.color_id());
        grid.replace_board(board);

        let mut ctl = GameController::new(&mut grid);
        assert!(!ctl.move_piece(MoveDirection::Right));
        assert_eq!(ctl.grid().active().unwrap().x, SPAWN_X);
    }

    #[test]
    fn test_rotate_cycles() {
        let mut grid = grid_with(PieceKind::T);
        grid.gravity_tick().unwrap();
        let mut ctl = GameController::new(&mut grid);

        for expected in [
            Rotation::East,
            Rotation::South,
            Rotation::West,
            Rotation::North,
        ] {
            assert!(ctl.rotate(RotateDirection::Clockwise));
            assert_eq!(ctl.grid().active().unwrap().piece.rotation(), expected);
        }
    }

    #[test]
    fn test_rotate_o_is_noop() {
        let mut grid = grid_with(PieceKind::O);
        let mut ctl = GameController::new(&mut grid);
        assert!(!ctl.rotate(RotateDirection::Clockwise));
        assert_eq!(ctl.grid().active().unwrap().piece.rotation(), Rotation::North);
    }

    #[test]
    fn test_rotate_kicks_off_the_wall() {
        let mut grid = grid_with(PieceKind::I);
        grid.gravity_tick().unwrap();
        let mut ctl = GameController::new(&mut grid);

        // Vertical I against the left wall: its column is box column 2 when East.
        assert!(ctl.rotate(RotateDirection::Clockwise));
        while ctl.move_piece(MoveDirection::Left) {}
        assert_eq!(ctl.grid().active().unwrap().x, -2);

        // Rotating back to North at x = -2 would poke out of the wall without a kick.
        assert!(ctl.rotate(RotateDirection::CounterClockwise));
        let active = ctl.grid().active().unwrap();
        assert_eq!(active.piece.rotation(), Rotation::North);
        assert!(active.x >= 0);
    }

    #[test]
    fn test_rotate_without_kicks_fails_against_wall() {
        let config = GameConfig {
            seed: Some(1),
            tuning: Tuning {
                wall_kicks: false,
                ..Tuning::default()
            },
            ..GameConfig::default()
        };
        let mut grid = Grid::new(&config, 0);
        assert!(grid.respawn_as(PieceKind::I));
        grid.gravity_tick().unwrap();
        let mut ctl = GameController::new(&mut grid);

        assert!(ctl.rotate(RotateDirection::Clockwise));
        while ctl.move_piece(MoveDirection::Left) {}
        let before = ctl.grid().active().unwrap();

        assert!(!ctl.rotate(RotateDirection::CounterClockwise));
        assert_eq!(ctl.grid().active().unwrap(), before);
    }

    #[test]
    fn test_soft_drop_scores_per_row() {
        let mut grid = grid_with(PieceKind::T);
        let mut ctl = GameController::new(&mut grid);

        assert!(ctl.soft_drop());
        assert!(ctl.soft_drop());
        assert_eq!(ctl.grid().score(), 2);
        assert_eq!(ctl.grid().active().unwrap().y, 2);
    }

    #[test]
    fn test_hard_drop_locks_and_scores() {
        let mut grid = grid_with(PieceKind::O);
        let mut ctl = GameController::new(&mut grid);

        // O spawns with its top row at y = 0 and lands on rows 18-19.
        assert_eq!(ctl.hard_drop(), Ok(36));
        assert_eq!(ctl.grid().score(), 36);
        assert_eq!(ctl.grid().board().occupied_count(), 4);
        assert_eq!(ctl.grid().board().get(4, 19), Some(PieceKind::O.color_id()));
        assert!(ctl.grid().active().is_some(), "next piece spawned");
    }

    #[test]
    fn test_hard_drop_clears_four_rows() {
        let mut grid = grid_with(PieceKind::I);
        let mut board = Board::new();
        for y in 16..20 {
            for x in 0..BOARD_WIDTH as i8 {
                if x != 9 {
                    board.set(x, y, PieceKind::L.color_id());
                }
            }
        }
        grid.replace_board(board);

        let mut ctl = GameController::new(&mut grid);
        assert!(ctl.rotate(RotateDirection::Clockwise));
        while ctl.move_piece(MoveDirection::Right) {}
        let drop_points = ctl.hard_drop().unwrap();

        assert_eq!(ctl.grid().lines(), 4);
        assert_eq!(ctl.grid().score(), drop_points + 1200);
        assert!(ctl.grid().board().is_clear());
    }

    #[test]
    fn test_hold_once_per_piece() {
        let mut grid = grid_with(PieceKind::T);
        let next = grid.next_piece().unwrap();
        let mut ctl = GameController::new(&mut grid);

        assert!(ctl.hold());
        assert_eq!(ctl.grid().hold_piece(), Some(PieceKind::T));
        assert_eq!(ctl.grid().active().unwrap().kind(), next);
        assert!(!ctl.grid().can_hold());
        assert!(!ctl.hold());

        ctl.hard_drop().unwrap();
        assert!(ctl.grid().can_hold());
        let before = ctl.grid().active().unwrap().kind();
        assert!(ctl.hold());
        assert_eq!(ctl.grid().active().unwrap().kind(), PieceKind::T);
        assert_eq!(ctl.grid().hold_piece(), Some(before));
    }

    #[test]
    fn test_intents_ignored_while_paused() {
        let mut grid = grid_with(PieceKind::T);
        let mut ctl = GameController::new(&mut grid);

        assert_eq!(ctl.apply(GameAction::Pause), Ok(true));
        let before = ctl.grid().snapshot();
        assert_eq!(ctl.apply(GameAction::MoveLeft), Ok(false));
        assert_eq!(ctl.apply(GameAction::RotateCw), Ok(false));
        assert_eq!(ctl.apply(GameAction::HardDrop), Ok(false));
        assert_eq!(ctl.apply(GameAction::Hold), Ok(false));
        assert_eq!(ctl.grid().snapshot(), before);

        assert_eq!(ctl.apply(GameAction::Pause), Ok(true));
        assert_eq!(ctl.grid().state(), GridState::Running);
    }

    #[test]
    fn test_restart_action_resets() {
        let mut grid = grid_with(PieceKind::T);
        let mut ctl = GameController::new(&mut grid);
        ctl.apply(GameAction::HardDrop).unwrap();
        assert!(ctl.grid().score() > 0);

        assert_eq!(ctl.apply(GameAction::Restart), Ok(true));
        assert_eq!(ctl.grid().score(), 0);
        assert!(ctl.grid().board().is_clear());
        assert_eq!(ctl.grid().episode(), 1);
    }

    #[test]
    fn test_moves_notify_observers() {
        let mut grid = grid_with(PieceKind::T);
        grid.take_notifications();
        {
            let mut ctl = GameController::new(&mut grid);
            ctl.move_piece(MoveDirection::Left);
        }
        assert_eq!(grid.take_notifications(), vec![Notification::Updated]);

        {
            let mut ctl = GameController::new(&mut grid);
            while ctl.move_piece(MoveDirection::Left) {}
        }
        grid.take_notifications();
        {
            let mut ctl = GameController::new(&mut grid);
            assert!(!ctl.move_piece(MoveDirection::Left));
        }
        assert!(grid.take_notifications().is_empty());
    }
}
