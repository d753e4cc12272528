//! Grid module - the play-field state machine
//!
//! The grid owns the cell matrix, the active/next/hold slots, score/level/best-score
//! counters and the gravity clock. It never sleeps or spawns threads: a driver (the
//! engine session, a fixed-timestep loop, or a test) calls [`Grid::gravity_tick`] or
//! [`Grid::advance`] and drains [`Grid::take_notifications`] afterwards.
//!
//! States: `Running` (initial) ⇄ `Paused`, and `Running` → `GameOver`, which only
//! [`Grid::reset`] leaves.

use std::time::Duration;

use crate::best_score::{load_or_zero, BestScoreStore};
use crate::board::{Board, CellRows};
use crate::config::GameConfig;
use crate::error::{GridError, LockError};
use crate::piece::{Minos, Piece};
use crate::rng::PieceBag;
use crate::scoring::Tuning;
use crate::snapshot::{ActiveSnapshot, GridSnapshot};
use crate::types::{GridState, Notification, PieceKind, SPAWN_X, SPAWN_Y};

/// The falling piece and its anchor on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub piece: Piece,
    pub x: i8,
    pub y: i8,
}

impl ActivePiece {
    /// A fresh piece of `kind` at the spawn anchor
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            piece: Piece::new(kind),
            x: SPAWN_X,
            y: SPAWN_Y,
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.piece.kind()
    }

    pub fn minos(&self) -> Minos {
        self.piece.minos()
    }

    pub fn fits(&self, board: &Board) -> bool {
        board.fits(&self.minos(), self.x, self.y)
    }

    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

impl From<ActivePiece> for ActiveSnapshot {
    fn from(value: ActivePiece) -> Self {
        Self {
            kind: value.kind(),
            rotation: value.piece.rotation(),
            x: value.x,
            y: value.y,
            minos: value.minos(),
        }
    }
}

/// What one gravity tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running (paused, game over); nothing changed
    Idle,
    /// The active piece moved down one row
    Fell,
    /// The active piece locked and the next one spawned
    Locked { lines_cleared: usize },
    /// The piece could not lock or the next one could not spawn
    GameOver,
}

/// The play field and everything it owns
#[derive(Debug, Clone)]
pub struct Grid {
    board: Board,
    active: Option<ActivePiece>,
    next: Option<PieceKind>,
    hold: Option<PieceKind>,
    bag: PieceBag,
    tuning: Tuning,
    volume: f32,
    state: GridState,
    /// Set by `start`; the gravity clock only runs once started.
    gravity_started: bool,
    gravity_elapsed_ms: u32,
    can_hold: bool,
    score: u32,
    level: u32,
    lines: u32,
    best_score: u32,
    /// Best score the owner last persisted (or loaded)
    persisted_best: u32,
    pending_best_write: Option<u32>,
    episode: u32,
    pieces_spawned: u64,
    notifications: Vec<Notification>,
}

impl Grid {
    /// Build a running grid with the given best score already loaded.
    pub fn new(config: &GameConfig, best_score: u32) -> Self {
        let mut grid = Self {
            board: Board::new(),
            active: None,
            next: None,
            hold: None,
            bag: PieceBag::new(config.seed_or_clock()),
            tuning: config.tuning.clone(),
            volume: config.volume(),
            state: GridState::Running,
            gravity_started: false,
            gravity_elapsed_ms: 0,
            can_hold: true,
            score: 0,
            level: config.tuning.initial_level,
            lines: 0,
            best_score,
            persisted_best: best_score,
            pending_best_write: None,
            episode: 0,
            pieces_spawned: 0,
            notifications: Vec::new(),
        };
        grid.ensure_initialized();
        grid
    }

    /// Build a running grid, reading the best score from `store`.
    ///
    /// A failing store is logged and treated as a best score of zero.
    pub fn with_store(config: &GameConfig, store: &dyn BestScoreStore) -> Self {
        Self::new(config, load_or_zero(store))
    }

    /// Fill the next slot and spawn the first active piece if that has not happened yet.
    ///
    /// Called by the constructor and by [`Grid::reset`]; accessors never initialize.
    pub fn ensure_initialized(&mut self) {
        if self.next.is_none() {
            self.next = Some(self.bag.draw());
        }
        if self.active.is_none() && self.state != GridState::GameOver {
            self.spawn_next();
        }
    }

    /// Enable the gravity clock. Idempotent.
    pub fn start(&mut self) {
        if self.gravity_started {
            return;
        }
        self.gravity_started = true;
        self.gravity_elapsed_ms = 0;
        tracing::debug!(level = self.level, "gravity started");
    }

    pub fn is_started(&self) -> bool {
        self.gravity_started
    }

    /// Whether a driver should be firing gravity ticks right now
    pub fn is_gravity_active(&self) -> bool {
        self.gravity_started && self.state == GridState::Running
    }

    /// Time between gravity ticks at the current level
    pub fn gravity_interval(&self) -> Duration {
        Duration::from_millis(self.tuning.gravity_interval_ms(self.level) as u64)
    }

    /// Fixed-timestep driver: accumulate `elapsed_ms` and run every gravity tick it covers.
    ///
    /// Returns the number of ticks performed.
    pub fn advance(&mut self, elapsed_ms: u32) -> Result<u32, GridError> {
        if !self.is_gravity_active() {
            return Ok(0);
        }

        self.gravity_elapsed_ms = self.gravity_elapsed_ms.saturating_add(elapsed_ms);
        let mut ticks = 0;
        loop {
            let interval = self.tuning.gravity_interval_ms(self.level);
            if self.gravity_elapsed_ms < interval {
                break;
            }
            self.gravity_elapsed_ms -= interval;
            self.gravity_tick()?;
            ticks += 1;
            if !self.is_gravity_active() {
                self.gravity_elapsed_ms = 0;
                break;
            }
        }
        Ok(ticks)
    }

    /// One gravity step: fall one row, or lock, clear, score and spawn.
    pub fn gravity_tick(&mut self) -> Result<TickOutcome, GridError> {
        if self.state != GridState::Running {
            return Ok(TickOutcome::Idle);
        }

        let Some(active) = self.active else {
            return Err(GridError::Invariant(
                "running grid has no active piece".to_string(),
            ));
        };

        let below = active.shifted(0, 1);
        if below.fits(&self.board) {
            self.active = Some(below);
            self.emit(Notification::Updated);
            return Ok(TickOutcome::Fell);
        }

        self.lock_active()
    }

    pub fn pause(&mut self) -> bool {
        if self.state != GridState::Running {
            return false;
        }
        self.state = GridState::Paused;
        self.emit(Notification::Updated);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != GridState::Paused {
            return false;
        }
        self.state = GridState::Running;
        self.emit(Notification::Updated);
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            GridState::Running => self.pause(),
            GridState::Paused => self.resume(),
            GridState::GameOver => false,
        }
    }

    /// Start a fresh session on the same grid.
    ///
    /// Clears the matrix and counters, regenerates next/hold and returns to `Running`.
    /// Gravity resumes if it had been started. The best score is kept, and a write is
    /// queued if this session beat the persisted value.
    pub fn reset(&mut self) {
        self.queue_best_write();

        self.board.clear();
        self.active = None;
        self.next = None;
        self.hold = None;
        self.can_hold = true;
        self.score = 0;
        self.lines = 0;
        self.level = self.tuning.initial_level;
        self.state = GridState::Running;
        self.gravity_elapsed_ms = 0;
        self.episode = self.episode.wrapping_add(1);

        self.ensure_initialized();
        self.emit(Notification::Updated);
        tracing::info!(episode = self.episode, best = self.best_score, "grid reset");
    }

    // ---- accessors -------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Locked cells as rows
    pub fn cells(&self) -> CellRows {
        self.board.to_rows()
    }

    /// Locked cells with the active piece drawn on top
    pub fn composite_cells(&self) -> CellRows {
        self.snapshot().composite()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn next_piece(&self) -> Option<PieceKind> {
        self.next
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    pub fn state(&self) -> GridState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GridState::GameOver
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Pieces placed at the spawn anchor so far, hold swaps included
    pub fn pieces_spawned(&self) -> u64 {
        self.pieces_spawned
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Volume handed in at construction (audio is someone else's job)
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Row the active piece would land on
    pub fn ghost_y(&self) -> Option<i8> {
        let active = self.active?;
        Some(active.y + self.drop_distance(&active) as i8)
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            cells: self.board.to_rows(),
            active: self.active.map(ActiveSnapshot::from),
            ghost_y: self.ghost_y(),
            next: self.next,
            hold: self.hold,
            can_hold: self.can_hold,
            state: self.state,
            score: self.score,
            best_score: self.best_score,
            level: self.level,
            lines: self.lines,
            episode: self.episode,
        }
    }

    // ---- notifications and persistence -----------------------------------

    /// Drain pending observer notifications (oldest first).
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Best score the owner should persist, if any.
    ///
    /// Queued on reset and game over when the session beat the persisted value. The
    /// value only counts as persisted once the owner reports the save with
    /// [`Grid::confirm_best_score_write`]; an unconfirmed value is queued again on the
    /// next reset, game over or [`Grid::queue_best_write`].
    pub fn take_best_score_write(&mut self) -> Option<u32> {
        self.pending_best_write.take()
    }

    /// Record that `saved` reached the store.
    pub fn confirm_best_score_write(&mut self, saved: u32) {
        self.persisted_best = self.persisted_best.max(saved);
        if self
            .pending_best_write
            .is_some_and(|pending| pending <= self.persisted_best)
        {
            self.pending_best_write = None;
        }
    }

    /// Best score known to be in the store
    pub fn persisted_best_score(&self) -> u32 {
        self.persisted_best
    }

    /// Queue the current best score for persistence if it is unsaved.
    pub fn queue_best_write(&mut self) {
        if self.best_score > self.persisted_best {
            self.pending_best_write = Some(self.best_score);
        }
    }

    /// Persist a pending best score through `store` (synchronous owners).
    ///
    /// Failures are logged; the value stays pending so a later flush retries it.
    pub fn flush_best_score(&mut self, store: &dyn BestScoreStore) {
        let Some(best) = self.pending_best_write else {
            return;
        };
        match store.save(best) {
            Ok(()) => {
                self.pending_best_write = None;
                self.persisted_best = best;
            }
            Err(err) => tracing::warn!(error = %err, best, "failed to persist best score"),
        }
    }

    /// Verify the structural invariants. A failure here is a bug, not a game over.
    pub fn check_invariants(&self) -> Result<(), GridError> {
        for (i, &cell) in self.board.cells().iter().enumerate() {
            if cell != 0 && PieceKind::from_color_id(cell).is_none() {
                return Err(GridError::Invariant(format!(
                    "cell {} holds unknown value {}",
                    i, cell
                )));
            }
        }

        match (self.state, self.active) {
            (GridState::GameOver, Some(_)) => Err(GridError::Invariant(
                "game over with an active piece".to_string(),
            )),
            (GridState::Running | GridState::Paused, None) => Err(GridError::Invariant(
                "live grid without an active piece".to_string(),
            )),
            (_, Some(active)) if !active.fits(&self.board) => Err(GridError::Invariant(format!(
                "active piece {:?} at ({}, {}) overlaps the matrix",
                active.kind(),
                active.x,
                active.y
            ))),
            _ => Ok(()),
        }
    }

    /// Replace the locked matrix (puzzle setups, tests). Leaves the active piece alone.
    pub fn replace_board(&mut self, board: Board) {
        self.board = board;
        self.emit(Notification::Updated);
    }

    /// Replace the active piece with a fresh `kind` at the spawn anchor.
    ///
    /// Returns false, and ends the game, if it does not fit.
    pub fn respawn_as(&mut self, kind: PieceKind) -> bool {
        if self.state == GridState::GameOver {
            return false;
        }
        self.active = None;
        self.place(kind)
    }

    // ---- crate-internal mutation used by the controller ------------------

    pub(crate) fn set_active(&mut self, active: ActivePiece) {
        self.active = Some(active);
        self.emit(Notification::Updated);
    }

    pub(crate) fn set_hold(&mut self, kind: PieceKind) {
        self.hold = Some(kind);
        self.can_hold = !self.tuning.hold_once_per_piece;
    }

    pub(crate) fn add_score(&mut self, points: u32) {
        if points == 0 {
            return;
        }
        self.score = self.score.saturating_add(points);
        if self.score > self.best_score {
            self.best_score = self.score;
        }
        self.emit(Notification::Updated);
    }

    /// Rows the piece can fall before it is blocked
    pub(crate) fn drop_distance(&self, active: &ActivePiece) -> u32 {
        let mut rows = 0;
        while active.shifted(0, rows as i8 + 1).fits(&self.board) {
            rows += 1;
        }
        rows
    }

    /// Commit the active piece, clear rows, score and spawn the next piece.
    pub(crate) fn lock_active(&mut self) -> Result<TickOutcome, GridError> {
        let Some(active) = self.active else {
            return Err(GridError::Invariant(
                "lock requested without an active piece".to_string(),
            ));
        };

        match self
            .board
            .lock_piece(&active.minos(), active.x, active.y, active.kind().color_id())
        {
            Ok(()) => {}
            Err(err @ (LockError::Overlap { .. } | LockError::AboveField { .. })) => {
                tracing::info!(reason = %err, "piece cannot lock");
                self.active = None;
                self.enter_game_over();
                return Ok(TickOutcome::GameOver);
            }
            Err(err @ LockError::OutOfBounds { .. }) => return Err(err.into()),
        }
        self.active = None;

        let cleared = self.board.clear_full_rows().len();
        if cleared > 0 {
            let points = self.tuning.line_clear_score(cleared, self.level);
            self.lines += cleared as u32;
            self.level = self.level.max(self.tuning.level_for_lines(self.lines));
            self.add_score(points);
            tracing::debug!(
                cleared,
                points,
                lines = self.lines,
                level = self.level,
                "rows cleared"
            );
        }
        self.emit(Notification::Updated);

        if self.spawn_next() {
            Ok(TickOutcome::Locked {
                lines_cleared: cleared,
            })
        } else {
            Ok(TickOutcome::GameOver)
        }
    }

    /// Promote the next piece to active and refill next from the bag.
    pub(crate) fn spawn_next(&mut self) -> bool {
        let kind = self.next.take().unwrap_or_else(|| self.bag.draw());
        self.next = Some(self.bag.draw());
        self.place(kind)
    }

    /// Put a fresh `kind` at the spawn anchor; a collision ends the game.
    pub(crate) fn place(&mut self, kind: PieceKind) -> bool {
        let piece = ActivePiece::spawn(kind);
        if !piece.fits(&self.board) {
            self.active = None;
            self.enter_game_over();
            return false;
        }
        self.active = Some(piece);
        self.can_hold = true;
        self.pieces_spawned += 1;
        self.emit(Notification::Updated);
        true
    }

    fn enter_game_over(&mut self) {
        if self.state == GridState::GameOver {
            return;
        }
        self.state = GridState::GameOver;
        self.gravity_elapsed_ms = 0;
        self.queue_best_write();
        self.emit(Notification::GameOver);
        tracing::info!(
            score = self.score,
            best = self.best_score,
            lines = self.lines,
            "game over"
        );
    }

    fn emit(&mut self, notification: Notification) {
        // Back-to-back updates carry no extra information for observers.
        if notification == Notification::Updated
            && self.notifications.last() == Some(&Notification::Updated)
        {
            return;
        }
        self.notifications.push(notification);
    }
}
