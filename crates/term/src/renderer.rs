//! TerminalRenderer: writes a `Frame` to a real terminal.
//!
//! Lines are compared against the previous frame and only changed lines are rewritten.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::types::PieceKind;
use crate::view::{Frame, Line, Tone};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<Frame>,
    buf: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw.
    ///
    /// Useful on terminal resize events.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn draw(&mut self, frame: Frame) -> Result<()> {
        self.buf.clear();
        match &self.last {
            Some(prev) => encode_changed_lines_into(prev, &frame, &mut self.buf)?,
            None => encode_frame_into(&frame, &mut self.buf)?,
        }
        self.flush_buf()?;
        self.last = Some(frame);
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Encode a full-frame redraw into `out`.
///
/// This builds a sequence of crossterm commands without writing to stdout.
pub fn encode_frame_into(frame: &Frame, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    for (y, line) in frame.lines.iter().enumerate() {
        encode_line_into(y as u16, line, out)?;
    }
    out.queue(ResetColor)?;
    Ok(())
}

fn encode_changed_lines_into(prev: &Frame, next: &Frame, out: &mut Vec<u8>) -> Result<()> {
    for (y, line) in next.lines.iter().enumerate() {
        if prev.lines.get(y) != Some(line) {
            encode_line_into(y as u16, line, out)?;
        }
    }
    // Lines the new frame no longer has.
    for y in next.lines.len()..prev.lines.len() {
        out.queue(cursor::MoveTo(0, y as u16))?;
        out.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
    }
    out.queue(ResetColor)?;
    Ok(())
}

fn encode_line_into(y: u16, line: &Line, out: &mut Vec<u8>) -> Result<()> {
    out.queue(cursor::MoveTo(0, y))?;
    out.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
    for span in &line.spans {
        out.queue(SetForegroundColor(tone_color(span.tone)))?;
        out.queue(Print(&span.text))?;
    }
    Ok(())
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Plain => Color::Reset,
        Tone::Label => Color::Rgb {
            r: 220,
            g: 220,
            b: 220,
        },
        Tone::Border => Color::Rgb {
            r: 200,
            g: 200,
            b: 200,
        },
        Tone::Empty => Color::Rgb {
            r: 90,
            g: 90,
            b: 100,
        },
        Tone::Ghost | Tone::Muted(_) => Color::Rgb {
            r: 140,
            g: 140,
            b: 140,
        },
        Tone::Banner => Color::White,
        Tone::Block(kind) => piece_color(kind),
    }
}

fn piece_color(kind: PieceKind) -> Color {
    let (r, g, b) = match kind {
        PieceKind::I => (80, 220, 220),
        PieceKind::O => (240, 220, 80),
        PieceKind::T => (200, 120, 220),
        PieceKind::S => (100, 220, 120),
        PieceKind::Z => (220, 80, 80),
        PieceKind::J => (80, 120, 220),
        PieceKind::L => (255, 165, 0),
    };
    Color::Rgb { r, g, b }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(texts: &[&str]) -> Frame {
        Frame {
            lines: texts
                .iter()
                .map(|text| {
                    let mut line = Line::default();
                    line.push(*text, Tone::Plain);
                    line
                })
                .collect(),
        }
    }

    #[test]
    fn full_frame_contains_every_line() {
        let mut out = Vec::new();
        encode_frame_into(&frame(&["SCORE", "120"]), &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("SCORE"));
        assert!(text.contains("120"));
    }

    #[test]
    fn unchanged_lines_are_skipped() {
        let prev = frame(&["SCORE", "120", "LEVEL"]);
        let next = frame(&["SCORE", "160", "LEVEL"]);

        let mut out = Vec::new();
        encode_changed_lines_into(&prev, &next, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("160"));
        assert!(!text.contains("SCORE"));
        assert!(!text.contains("LEVEL"));
    }

    #[test]
    fn every_piece_has_a_distinct_color() {
        let colors: Vec<Color> = PieceKind::ALL.iter().map(|&k| piece_color(k)).collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
