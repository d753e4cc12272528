//! Shared vocabulary for the grid simulation, the timed engine and the front-end.
//!
//! Everything here is plain data with no external dependencies, so it can be used by
//! the simulation core, the engine loop and the presentation layer alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19)
//! - **Spawn anchor**: (3, 0), top-left corner of the piece's 4x4 box
//!
//! # Default Tuning
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep for synchronous drivers (~60 FPS) |
//! | `LINE_SCORES` | 0/40/100/300/1200 | Reward per simultaneous rows cleared (times level) |
//! | `LINES_PER_LEVEL` | 10 | Cleared lines needed per level step |
//! | `INITIAL_LEVEL` | 1 | Level at the start of a session |
//! | `SOFT_DROP_POINTS` | 1 | Bonus per row of soft drop |
//! | `HARD_DROP_POINTS` | 2 | Bonus per row of hard drop |
//!
//! # Gravity Intervals by Level
//!
//! | Level | Interval |
//! |-------|----------|
//! | 1 | 1000ms |
//! | 2 | 800ms |
//! | 3 | 650ms |
//! | 4 | 500ms |
//! | 5 | 400ms |
//! | 6 | 320ms |
//! | 7 | 250ms |
//! | 8 | 200ms |
//! | 9 | 160ms |
//! | 10+ | 120ms floor |
//!
//! # Examples
//!
//! ```
//! use tetris_grid_types::{MoveDirection, PieceKind, Rotation, RotateDirection, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::from_color_id(3), Some(PieceKind::T));
//! assert_eq!(PieceKind::T.color_id(), 3);
//!
//! let rotation = Rotation::North.rotate(RotateDirection::Clockwise);
//! assert_eq!(rotation, Rotation::East);
//!
//! assert_eq!(MoveDirection::Down.delta(), (0, 1));
//! assert_eq!(BOARD_WIDTH, 10);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Spawn anchor column for new pieces
pub const SPAWN_X: i8 = 3;

/// Spawn anchor row for new pieces
pub const SPAWN_Y: i8 = 0;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity intervals by level (milliseconds per row)
///
/// Index 0 = level 1, index 8 = level 9.
pub const DROP_INTERVALS: [u32; 9] = [1000, 800, 650, 500, 400, 320, 250, 200, 160];

/// Gravity interval used once the level runs past `DROP_INTERVALS`
pub const DROP_INTERVAL_FLOOR_MS: u32 = 120;

/// Line clear reward table (classic scoring)
///
/// Base points for clearing N rows at once; multiplied by the current level.
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Cleared lines needed for each level step
pub const LINES_PER_LEVEL: u32 = 10;

/// Level at the start of a session
pub const INITIAL_LEVEL: u32 = 1;

/// Points per row for a soft drop
pub const SOFT_DROP_POINTS: u32 = 1;

/// Points per row for a hard drop
pub const HARD_DROP_POINTS: u32 = 2;

/// A cell of the play-field matrix.
///
/// `0` is empty; `1..=7` is the [`PieceKind::color_id`] of a locked block.
pub type Cell = u8;

/// The empty cell value
pub const EMPTY_CELL: Cell = 0;

/// The seven tetromino piece kinds
///
/// - **I**: Cyan, horizontal bar
/// - **O**: Yellow, 2x2 square
/// - **T**: Magenta, T-shaped
/// - **S**: Green, S-shaped
/// - **Z**: Red, Z-shaped (mirror of S)
/// - **J**: Blue, J-shaped
/// - **L**: Orange, L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// Every kind, in color-id order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Non-zero matrix value written when a piece of this kind locks.
    pub fn color_id(&self) -> Cell {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::S => 4,
            PieceKind::Z => 5,
            PieceKind::J => 6,
            PieceKind::L => 7,
        }
    }

    /// Inverse of [`PieceKind::color_id`]
    ///
    /// ```
    /// use tetris_grid_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_color_id(1), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_color_id(0), None);
    /// assert_eq!(PieceKind::from_color_id(8), None);
    /// ```
    pub fn from_color_id(id: Cell) -> Option<Self> {
        match id {
            1..=7 => Some(Self::ALL[(id - 1) as usize]),
            _ => None,
        }
    }
}

/// Direction of a single rotation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotateDirection {
    Clockwise,
    CounterClockwise,
}

/// Rotation states following the Super Rotation System (SRS)
///
/// The cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// ```
    /// use tetris_grid_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90°)
    ///
    /// ```
    /// use tetris_grid_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
    /// assert_eq!(Rotation::East.rotate_ccw(), Rotation::North);
    /// ```
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    pub fn rotate(&self, direction: RotateDirection) -> Self {
        match direction {
            RotateDirection::Clockwise => self.rotate_cw(),
            RotateDirection::CounterClockwise => self.rotate_ccw(),
        }
    }
}

/// Direction of a one-cell translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Left,
    Right,
    Down,
}

impl MoveDirection {
    /// Anchor delta `(dx, dy)`; y grows downwards.
    pub fn delta(&self) -> (i8, i8) {
        match self {
            MoveDirection::Left => (-1, 0),
            MoveDirection::Right => (1, 0),
            MoveDirection::Down => (0, 1),
        }
    }
}

/// Player intents applied to the grid
///
/// Every front-end (keyboard, tests, scripted drivers) speaks in these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one cell down (with soft drop scoring)
    SoftDrop,
    /// Instantly drop piece to lowest valid position and lock it
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Swap the active piece with the hold slot
    Hold,
    /// Toggle pause state
    Pause,
    /// Reset the grid (from game over or mid-game)
    Restart,
}

/// Lifecycle state of the grid
///
/// `Running` after construction; `GameOver` is terminal until a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GridState {
    #[default]
    Running,
    Paused,
    GameOver,
}

/// Observer notification pushed after the grid changes
///
/// The set is closed: consumers re-read the grid on `Updated` and show their terminal
/// UI on `GameOver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
    /// Grid, score or level changed
    Updated,
    /// A spawned piece could not be placed; the game stopped
    GameOver,
}

impl Notification {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Notification::GameOver)
    }
}
