//! Tetris grid (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so binaries, integration tests and
//! benches can write `tetris_grid::{core,engine,input,term,types}`.

pub use tetris_grid_core as core;
pub use tetris_grid_engine as engine;
pub use tetris_grid_input as input;
pub use tetris_grid_term as term;
pub use tetris_grid_types as types;
