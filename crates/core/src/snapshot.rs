use crate::board::CellRows;
use crate::piece::Minos;
use crate::types::{GridState, PieceKind, Rotation, EMPTY_CELL};

/// Read-only copy of the active piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    pub minos: Minos,
}

impl ActiveSnapshot {
    /// Absolute (x, y) of every block, including spawn-buffer rows
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.minos
            .iter()
            .map(move |&(dx, dy)| (self.x + dx, self.y + dy))
    }
}

/// Everything a presentation layer needs to draw one frame.
///
/// Plain `Copy` data so it can cross threads and channels without touching the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSnapshot {
    /// Locked cells only
    pub cells: CellRows,
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub next: Option<PieceKind>,
    pub hold: Option<PieceKind>,
    pub can_hold: bool,
    pub state: GridState,
    pub score: u32,
    pub best_score: u32,
    pub level: u32,
    pub lines: u32,
    /// Incremented by every reset
    pub episode: u32,
}

impl GridSnapshot {
    /// Locked cells with the active piece drawn on top (visible rows only)
    pub fn composite(&self) -> CellRows {
        let mut rows = self.cells;
        if let Some(active) = &self.active {
            let color = active.kind.color_id();
            for (x, y) in active.cells() {
                if x >= 0 && y >= 0 {
                    if let Some(cell) = rows
                        .get_mut(y as usize)
                        .and_then(|row| row.get_mut(x as usize))
                    {
                        *cell = color;
                    }
                }
            }
        }
        rows
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GridState::GameOver
    }

    pub fn playable(&self) -> bool {
        self.state == GridState::Running
    }

    pub fn occupied_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&c| c != EMPTY_CELL)
            .count()
    }
}
