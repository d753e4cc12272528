//! Timed gravity loop around a [`Grid`](tetris_grid_core::Grid)
//!
//! A [`GameSession`] is a single tokio task that owns the grid outright. Gravity
//! deadlines and player commands are multiplexed in one `select!` loop, so mutations
//! never overlap and no lock is needed. Observers get a broadcast of
//! [`Notification`](tetris_grid_types::Notification)s and a watch channel with the latest
//! [`GridSnapshot`](tetris_grid_core::GridSnapshot).
//!
//! [`GameRuntime`] wraps a session in its own runtime for blocking front-ends.

pub mod runtime;
pub mod session;

use tetris_grid_core::GridError;
use thiserror::Error;

pub use runtime::GameRuntime;
pub use session::{Command, GameSession};

/// Failures talking to a running session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("game session has stopped")]
    Closed,
    #[error("command queue is full")]
    Busy,
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("game session task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
