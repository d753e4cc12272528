//! BoardView: maps a `GridSnapshot` into styled text lines.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::piece::minos_for;
use crate::core::snapshot::GridSnapshot;
use crate::types::{GridState, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH, EMPTY_CELL};

/// Board cell width in terminal columns.
const CELL_W: usize = 2;
const INNER_W: usize = BOARD_WIDTH as usize * CELL_W;
const PANEL_GAP: &str = "  ";

/// How a span should be styled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Label,
    Border,
    Empty,
    Ghost,
    Block(PieceKind),
    /// Preview of a piece that cannot be used right now
    Muted(PieceKind),
    Banner,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn push(&mut self, text: impl Into<String>, tone: Tone) {
        let text = text.into();
        // Merge with the previous span when the style does not change.
        if let Some(last) = self.spans.last_mut() {
            if last.tone == tone {
                last.text.push_str(&text);
                return;
            }
        }
        self.spans.push(Span { text, tone });
    }

    pub fn plain(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

/// One full screen of text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub lines: Vec<Line>,
}

impl Frame {
    pub fn plain_lines(&self) -> Vec<String> {
        self.lines.iter().map(Line::plain).collect()
    }
}

/// A text renderer for the grid and its side panel.
#[derive(Debug, Clone, Copy)]
pub struct BoardView {
    show_ghost: bool,
}

impl Default for BoardView {
    fn default() -> Self {
        Self { show_ghost: true }
    }
}

impl BoardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ghost(mut self, show_ghost: bool) -> Self {
        self.show_ghost = show_ghost;
        self
    }

    pub fn render(&self, snap: &GridSnapshot) -> Frame {
        let tones = self.cell_tones(snap);
        let panel = side_panel(snap);
        let banner = banner_rows(snap.state);

        let mut lines = Vec::with_capacity(BOARD_HEIGHT as usize + 2);
        lines.push(border_line());

        for (y, row) in tones.iter().enumerate() {
            let mut line = Line::default();
            line.push("|", Tone::Border);
            match banner.iter().find(|(row_y, _)| *row_y == y) {
                Some((_, text)) => line.push(format!("{:^width$}", text, width = INNER_W), Tone::Banner),
                None => {
                    for &tone in row {
                        line.push(cell_text(tone), tone);
                    }
                }
            }
            line.push("|", Tone::Border);
            if let Some(panel_line) = panel.get(y) {
                line.push(PANEL_GAP, Tone::Plain);
                line.spans.extend(panel_line.spans.iter().cloned());
            }
            lines.push(line);
        }

        lines.push(border_line());
        Frame { lines }
    }

    fn cell_tones(&self, snap: &GridSnapshot) -> [[Tone; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize] {
        let mut tones = [[Tone::Empty; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];

        for (y, row) in snap.cells.iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                if cell != EMPTY_CELL {
                    if let Some(kind) = PieceKind::from_color_id(cell) {
                        tones[y][x] = Tone::Block(kind);
                    }
                }
            }
        }

        let Some(active) = snap.active else {
            return tones;
        };

        if self.show_ghost {
            if let Some(ghost_y) = snap.ghost_y {
                let dy = ghost_y - active.y;
                for (x, y) in active.cells() {
                    if let Some(tone) = visible_mut(&mut tones, x, y + dy) {
                        if *tone == Tone::Empty {
                            *tone = Tone::Ghost;
                        }
                    }
                }
            }
        }

        for (x, y) in active.cells() {
            if let Some(tone) = visible_mut(&mut tones, x, y) {
                *tone = Tone::Block(active.kind);
            }
        }
        tones
    }
}

fn visible_mut<T>(rows: &mut [[T; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize], x: i8, y: i8) -> Option<&mut T> {
    if x < 0 || y < 0 {
        return None;
    }
    rows.get_mut(y as usize)?.get_mut(x as usize)
}

fn border_line() -> Line {
    let mut line = Line::default();
    line.push(format!("+{}+", "-".repeat(INNER_W)), Tone::Border);
    line
}

fn cell_text(tone: Tone) -> &'static str {
    match tone {
        Tone::Block(_) | Tone::Muted(_) => "[]",
        Tone::Ghost => "::",
        Tone::Empty => " .",
        _ => "  ",
    }
}

fn banner_rows(state: GridState) -> Vec<(usize, &'static str)> {
    let mid = BOARD_HEIGHT as usize / 2 - 1;
    match state {
        GridState::Running => Vec::new(),
        GridState::Paused => vec![(mid, "PAUSED"), (mid + 1, "p: resume")],
        GridState::GameOver => vec![(mid, "GAME OVER"), (mid + 1, "r: reset  q: quit")],
    }
}

fn side_panel(snap: &GridSnapshot) -> Vec<Line> {
    let mut panel = Vec::new();
    let stat = |panel: &mut Vec<Line>, label: &str, value: u32| {
        let mut line = Line::default();
        line.push(label, Tone::Label);
        panel.push(line);
        let mut line = Line::default();
        line.push(value.to_string(), Tone::Plain);
        panel.push(line);
        panel.push(Line::default());
    };

    stat(&mut panel, "SCORE", snap.score);
    stat(&mut panel, "BEST", snap.best_score);
    stat(&mut panel, "LEVEL", snap.level);
    stat(&mut panel, "LINES", snap.lines);

    let mut label = Line::default();
    label.push("NEXT", Tone::Label);
    panel.push(label);
    panel.extend(preview(snap.next, true));
    panel.push(Line::default());

    let mut label = Line::default();
    label.push("HOLD", Tone::Label);
    panel.push(label);
    panel.extend(preview(snap.hold, snap.can_hold));

    panel
}

/// Two rows showing `kind` in spawn orientation
fn preview(kind: Option<PieceKind>, usable: bool) -> Vec<Line> {
    let Some(kind) = kind else {
        return vec![Line::default(), Line::default()];
    };

    let minos = minos_for(kind, Rotation::North);
    let top = minos.iter().map(|&(_, dy)| dy).min().unwrap_or(0);
    let tone = if usable {
        Tone::Block(kind)
    } else {
        Tone::Muted(kind)
    };

    (top..top + 2)
        .map(|y| {
            let mut line = Line::default();
            for x in 0..4 {
                if minos.contains(&(x, y)) {
                    line.push(cell_text(tone), tone);
                } else {
                    line.push("  ", Tone::Plain);
                }
            }
            line
        })
        .collect()
}
