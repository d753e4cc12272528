//! Blocking bridge for synchronous front-ends.
//!
//! Owns a small multi-thread runtime with the session task on it, so a terminal loop
//! can send commands and poll notifications without being async itself.

use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};
use tokio::sync::broadcast::{self, error::TryRecvError};

use tetris_grid_core::best_score::BestScoreStore;
use tetris_grid_core::{Grid, GridSnapshot};
use tetris_grid_types::{GameAction, Notification};

use crate::session::{Command, GameSession};
use crate::SessionError;

/// Running session plus the runtime it lives on
pub struct GameRuntime {
    session: GameSession,
    events: broadcast::Receiver<Notification>,
    // Declared last: dropped after the session handle.
    runtime: Runtime,
}

impl GameRuntime {
    /// Build the runtime and spawn the session. Gravity starts immediately.
    pub fn start(grid: Grid, store: Arc<dyn BestScoreStore>) -> Result<Self, SessionError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("tetris-grid")
            .enable_all()
            .build()?;

        let session = {
            let _guard = runtime.enter();
            GameSession::spawn(grid, store)
        };
        let events = session.subscribe();
        session.try_send(Command::Start)?;

        Ok(Self {
            session,
            events,
            runtime,
        })
    }

    /// Queue a command; blocks only while the queue is full.
    pub fn send(&self, command: Command) -> Result<(), SessionError> {
        self.runtime.block_on(self.session.send(command))
    }

    pub fn apply(&self, action: GameAction) -> Result<(), SessionError> {
        self.send(Command::Action(action))
    }

    pub fn reset(&self) -> Result<(), SessionError> {
        self.send(Command::Reset)
    }

    /// Next pending notification, if any.
    ///
    /// A receiver that fell behind gets one notification standing in for the dropped
    /// ones, derived from the current snapshot: `GameOver` while the game is over,
    /// `Updated` otherwise. A `GameOver` that was dropped after a later reset is not
    /// replayed, since the game it announced is gone. Observers should treat a repeated
    /// `GameOver` as idempotent.
    pub fn try_recv_notification(&mut self) -> Option<Notification> {
        match self.events.try_recv() {
            Ok(notification) => Some(notification),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "notification receiver lagged");
                if self.session.snapshot().is_game_over() {
                    Some(Notification::GameOver)
                } else {
                    Some(Notification::Updated)
                }
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => None,
        }
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> GridSnapshot {
        self.session.snapshot()
    }

    /// Snapshot after every command sent so far
    pub fn query(&self) -> Result<GridSnapshot, SessionError> {
        self.runtime.block_on(self.session.query())
    }

    /// Stop the session, flush the best score and tear the runtime down.
    pub fn shutdown(self) -> Result<GridSnapshot, SessionError> {
        let Self {
            session, runtime, ..
        } = self;
        runtime.block_on(session.shutdown())
    }
}
