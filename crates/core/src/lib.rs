//! Core simulation - pure, deterministic, and testable
//!
//! Everything that decides what happens on the play field lives here. Nothing in this
//! crate sleeps, spawns threads or draws; timers and front-ends drive it from outside:
//!
//! - **Deterministic**: the same seed deals the same pieces
//! - **Single owner**: one [`Grid`] owns the matrix, piece slots and counters
//! - **Observable**: mutations queue [`Notification`](types::Notification)s the owner drains
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 cell matrix, collision checks, row clearing
//! - [`piece`]: tetromino shapes, rotation states, SRS kick tables
//! - [`rng`]: seeded LCG and the 7-bag piece generator
//! - [`scoring`]: [`Tuning`] - reward table, level curve, gravity curve
//! - [`grid`]: the state machine (gravity tick, lock, clear, spawn, game over, reset)
//! - [`controller`]: player intents (move, rotate, drops, hold)
//! - [`best_score`]: persistence trait and stores
//! - [`config`]: [`GameConfig`] from defaults, JSON and environment
//!
//! # Example
//!
//! ```
//! use tetris_grid_core::{GameConfig, GameController, Grid};
//! use tetris_grid_core::types::{GameAction, Notification};
//!
//! let config = GameConfig { seed: Some(12345), ..GameConfig::default() };
//! let mut grid = Grid::new(&config, 0);
//! grid.start();
//!
//! let mut controller = GameController::new(&mut grid);
//! controller.apply(GameAction::MoveRight).unwrap();
//! controller.apply(GameAction::HardDrop).unwrap();
//!
//! assert!(grid.score() > 0); // hard drop awards points
//! assert!(grid.take_notifications().contains(&Notification::Updated));
//! ```

pub mod best_score;
pub mod board;
pub mod config;
pub mod controller;
pub mod error;
pub mod grid;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tetris_grid_types as types;

// Re-export commonly used types for convenience
pub use best_score::{BestScoreStore, JsonFileStore, MemoryStore};
pub use board::{Board, CellRows};
pub use config::GameConfig;
pub use controller::GameController;
pub use error::{ConfigError, GridError, LockError, StoreError};
pub use grid::{ActivePiece, Grid, TickOutcome};
pub use piece::Piece;
pub use rng::{PieceBag, SimpleRng};
pub use scoring::Tuning;
pub use snapshot::{ActiveSnapshot, GridSnapshot};
