//! Keyboard input for the terminal front-end.
//!
//! Maps `crossterm` key events to [`KeyIntent`]s. The mapping depends on the grid state:
//! after a game over only reset and quit are accepted.

pub mod map;

pub use tetris_grid_types as types;

pub use map::{map_key, should_quit, KeyIntent};
