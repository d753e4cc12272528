//! Terminal presentation for the grid.
//!
//! [`BoardView`] turns a [`GridSnapshot`](tetris_grid_core::GridSnapshot) into styled text
//! lines (pure, unit-tested); [`TerminalRenderer`] writes those lines to a real terminal
//! with crossterm.

pub mod renderer;
pub mod view;

pub use tetris_grid_core as core;
pub use tetris_grid_types as types;

pub use renderer::{encode_frame_into, TerminalRenderer};
pub use view::{BoardView, Frame, Line, Span, Tone};
