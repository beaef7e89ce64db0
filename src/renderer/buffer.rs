//! FrameBuffer - A 2D grid of terminal cells.
//!
//! One frame of the terminal front-end. Pages paint into it, then the
//! [`DiffRenderer`](super::DiffRenderer) writes the cells that changed.
//!
//! Cells are stored in a flat Vec, row-major, indexed by `y * width + x`.
//! Wide characters occupy two cells; the second holds `'\0'` as a
//! continuation marker and is skipped on output.

use crate::layout::string_width;
use crate::types::{Attr, Rgba};

use unicode_width::UnicodeWidthChar;

/// Continuation marker for the right half of a wide character.
pub const CONTINUATION: char = '\0';

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgba,
    pub attrs: Attr,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Rgba::TERMINAL_DEFAULT,
            attrs: Attr::NONE,
        }
    }
}

/// Style of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub fg: Rgba,
    pub attrs: Attr,
}

impl Default for Style {
    fn default() -> Self {
        Self::plain(Rgba::TERMINAL_DEFAULT)
    }
}

impl Style {
    pub const fn plain(fg: Rgba) -> Self {
        Self { fg, attrs: Attr::NONE }
    }

    pub const fn new(fg: Rgba, attrs: Attr) -> Self {
        Self { fg, attrs }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![Cell::default(); size],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    /// Draw text at a position, clipped to the buffer.
    ///
    /// Returns the number of columns used.
    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        if y >= self.height {
            return 0;
        }

        let mut col = x;
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0) as u16;
            if w == 0 {
                continue;
            }
            // A wide char that would straddle the right edge is dropped
            if col.saturating_add(w) > self.width {
                break;
            }

            if let Some(cell) = self.get_mut(col, y) {
                *cell = Cell { ch, fg: style.fg, attrs: style.attrs };
            }
            if w == 2 {
                if let Some(next) = self.get_mut(col + 1, y) {
                    *next = Cell { ch: CONTINUATION, fg: style.fg, attrs: style.attrs };
                }
            }
            col += w;
        }

        col.saturating_sub(x)
    }

    /// Draw text right-aligned so it ends at `right` (exclusive).
    pub fn draw_text_right(&mut self, right: u16, y: u16, text: &str, style: Style) -> u16 {
        let x = right.saturating_sub(string_width(text));
        self.draw_text(x, y, text, style)
    }

    /// Repeat a character across a row segment.
    pub fn fill_row(&mut self, x: u16, y: u16, width: u16, ch: char, style: Style) {
        let end = x.saturating_add(width).min(self.width);
        for col in x..end {
            if let Some(cell) = self.get_mut(col, y) {
                *cell = Cell { ch, fg: style.fg, attrs: style.attrs };
            }
        }
    }

    /// The characters of one row, continuation cells skipped.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .filter(|cell| cell.ch != CONTINUATION)
            .map(|cell| cell.ch)
            .collect()
    }
}
