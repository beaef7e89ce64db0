//! Differential renderer for fullscreen mode.
//!
//! The DiffRenderer compares the current frame to the previous frame and only
//! outputs cells that have changed.
//!
//! # Algorithm
//!
//! 1. Wrap output in a synchronized update
//! 2. For each cell in the new frame:
//!    - If previous frame exists and cell is unchanged: skip
//!    - Otherwise: move (if not already there), set style, print
//! 3. Flush once
//! 4. Store current frame as previous for next comparison

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{DisableMouseCapture, EnableMouseCapture},
    queue,
    style::{Attribute, Color, Print, SetAttribute, SetForegroundColor},
    terminal::{
        BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};

use super::buffer::{CONTINUATION, Cell, FrameBuffer};
use crate::types::{Attr, Rgba};

/// Differential renderer writing to any `Write` target.
pub struct DiffRenderer<W: Write> {
    out: W,
    previous: Option<FrameBuffer>,
}

impl<W: Write> DiffRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, previous: None }
    }

    /// Render a frame, outputting only changed cells.
    ///
    /// Returns true if any cells were changed.
    pub fn render(&mut self, buffer: &FrameBuffer) -> io::Result<bool> {
        let previous = match self.previous.take() {
            Some(prev) if prev.width() == buffer.width() && prev.height() == buffer.height() => {
                Some(prev)
            }
            _ => None,
        };

        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut has_changes = false;
        let mut state = PenState::default();

        for y in 0..buffer.height() {
            for x in 0..buffer.width() {
                let Some(cell) = buffer.get(x, y) else {
                    continue;
                };
                let changed = match &previous {
                    Some(prev) => prev.get(x, y) != Some(cell),
                    None => true,
                };
                if changed {
                    has_changes = true;
                    state.render_cell(&mut self.out, x, y, cell)?;
                }
            }
        }

        queue!(self.out, SetAttribute(Attribute::Reset), EndSynchronizedUpdate)?;
        self.out.flush()?;

        self.previous = Some(buffer.clone());
        Ok(has_changes)
    }

    /// Invalidate the previous frame.
    ///
    /// Next render will be a full redraw. Use after resize.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Enter fullscreen mode (alternate screen, hidden cursor, mouse on).
    pub fn enter_fullscreen(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            EnterAlternateScreen,
            Hide,
            EnableMouseCapture,
            Clear(ClearType::All)
        )?;
        self.out.flush()?;
        self.invalidate();
        Ok(())
    }

    pub fn exit_fullscreen(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            SetAttribute(Attribute::Reset),
            DisableMouseCapture,
            Show,
            LeaveAlternateScreen
        )?;
        self.out.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

// =============================================================================
// Pen state
// =============================================================================

/// Tracks cursor, color and attributes so only differences are emitted.
#[derive(Default)]
struct PenState {
    cursor: Option<(u16, u16)>,
    fg: Option<Rgba>,
    attrs: Option<Attr>,
}

impl PenState {
    fn render_cell(&mut self, out: &mut impl Write, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
        if cell.ch == CONTINUATION {
            // The wide char to the left already covers this column
            self.cursor = None;
            return Ok(());
        }

        if self.cursor != Some((x, y)) {
            queue!(out, MoveTo(x, y))?;
        }

        if self.attrs != Some(cell.attrs) {
            // Reset clears color too
            queue!(out, SetAttribute(Attribute::Reset))?;
            for attribute in attributes(cell.attrs) {
                queue!(out, SetAttribute(attribute))?;
            }
            self.attrs = Some(cell.attrs);
            self.fg = None;
        }

        if self.fg != Some(cell.fg) {
            queue!(out, SetForegroundColor(to_color(cell.fg)))?;
            self.fg = Some(cell.fg);
        }

        queue!(out, Print(cell.ch))?;
        let width = unicode_width::UnicodeWidthChar::width(cell.ch).unwrap_or(1) as u16;
        self.cursor = Some((x + width, y));
        Ok(())
    }
}

fn attributes(attrs: Attr) -> impl Iterator<Item = Attribute> {
    [
        (Attr::BOLD, Attribute::Bold),
        (Attr::DIM, Attribute::Dim),
        (Attr::ITALIC, Attribute::Italic),
        (Attr::UNDERLINE, Attribute::Underlined),
        (Attr::INVERSE, Attribute::Reverse),
    ]
    .into_iter()
    .filter(move |(flag, _)| attrs.contains(*flag))
    .map(|(_, attribute)| attribute)
}

fn to_color(color: Rgba) -> Color {
    if color.is_terminal_default() {
        Color::Reset
    } else {
        Color::Rgb {
            r: color.r as u8,
            g: color.g as u8,
            b: color.b as u8,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Style;

    fn output(renderer: &DiffRenderer<Vec<u8>>) -> String {
        String::from_utf8_lossy(renderer.get_ref()).into_owned()
    }

    #[test]
    fn test_first_render_draws_everything() {
        let mut renderer = DiffRenderer::new(Vec::new());
        let mut buffer = FrameBuffer::new(3, 1);
        buffer.draw_text(0, 0, "abc", Style::default());

        assert!(renderer.render(&buffer).unwrap());
        assert!(output(&renderer).contains("abc"));
        assert!(renderer.has_previous());
    }

    #[test]
    fn test_unchanged_frame_writes_no_cells() {
        let mut renderer = DiffRenderer::new(Vec::new());
        let mut buffer = FrameBuffer::new(3, 1);
        buffer.draw_text(0, 0, "xyz", Style::default());

        renderer.render(&buffer).unwrap();
        assert!(!renderer.render(&buffer).unwrap());
    }

    #[test]
    fn test_only_changed_cells_written() {
        let mut renderer = DiffRenderer::new(Vec::new());
        let mut buffer = FrameBuffer::new(3, 1);
        buffer.draw_text(0, 0, "abc", Style::default());
        renderer.render(&buffer).unwrap();
        let before = renderer.get_ref().len();

        buffer.draw_text(1, 0, "Q", Style::default());
        assert!(renderer.render(&buffer).unwrap());

        let delta = String::from_utf8_lossy(&renderer.get_ref()[before..]).into_owned();
        assert!(delta.contains('Q'));
        assert!(!delta.contains('a'));
        assert!(!delta.contains('c'));
    }

    #[test]
    fn test_invalidate_forces_full_redraw() {
        let mut renderer = DiffRenderer::new(Vec::new());
        let buffer = FrameBuffer::new(2, 2);
        renderer.render(&buffer).unwrap();

        renderer.invalidate();
        assert!(!renderer.has_previous());
        assert!(renderer.render(&buffer).unwrap());
    }

    #[test]
    fn test_resize_redraws() {
        let mut renderer = DiffRenderer::new(Vec::new());
        renderer.render(&FrameBuffer::new(2, 2)).unwrap();
        assert!(renderer.render(&FrameBuffer::new(3, 2)).unwrap());
    }

    #[test]
    fn test_attributes_from_flags() {
        let list: Vec<_> = attributes(Attr::BOLD | Attr::INVERSE).collect();
        assert_eq!(list, vec![Attribute::Bold, Attribute::Reverse]);
        assert_eq!(attributes(Attr::NONE).count(), 0);
    }

    #[test]
    fn test_terminal_default_color() {
        assert_eq!(to_color(Rgba::TERMINAL_DEFAULT), Color::Reset);
        assert_eq!(to_color(Rgba::rgb(1, 2, 3)), Color::Rgb { r: 1, g: 2, b: 3 });
    }
}
