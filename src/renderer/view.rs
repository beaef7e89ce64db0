//! Chrome - The fixed navigation bar, progress line and status row.
//!
//! ```text
//! row 0   Hamza Haikal   1 Home  2 About  3 Works  ...      Projects
//! row 1   ━━━━━━━━━━━━━━━━━━━━━━━──────────────────────────────────
//!         (document rows scroll underneath)
//! last    status / key hints
//! ```

use super::buffer::{FrameBuffer, Style};
use crate::layout::{string_width, truncate_text};
use crate::types::{Attr, NAV_ITEMS, Rgba};

/// Rows covered by the fixed navigation bar.
pub const NAV_ROWS: u16 = 2;

/// Rows reserved for the status line.
pub const STATUS_ROWS: u16 = 1;

/// Paint the navigation bar on the first row and blank the rows under it.
///
/// `active` is the highlighted section id. `projects` marks the projects
/// link as current.
pub fn paint_nav(buffer: &mut FrameBuffer, brand: &str, active: Option<&str>, projects: bool) {
    let width = buffer.width();
    for row in 0..NAV_ROWS {
        buffer.fill_row(0, row, width, ' ', Style::default());
    }

    let mut x = 1;
    x += buffer.draw_text(x, 0, brand, Style::new(Rgba::WHITE, Attr::BOLD));
    x += 3;

    for (i, item) in NAV_ITEMS.iter().enumerate() {
        let style = if active == Some(item.id) {
            Style::new(Rgba::SKY, Attr::BOLD | Attr::UNDERLINE)
        } else {
            Style::plain(Rgba::SLATE)
        };
        x += buffer.draw_text(x, 0, &format!("{} {}", i + 1, item.label), style);
        x += 2;
    }

    let link = "p Projects";
    let style = if projects {
        Style::new(Rgba::SKY, Attr::BOLD | Attr::UNDERLINE)
    } else {
        Style::plain(Rgba::SLATE)
    };
    // Only when it fits after the section links
    if x + string_width(link) < width {
        buffer.draw_text_right(width.saturating_sub(1), 0, link, style);
    }
}

/// Paint the scroll progress line under the navigation bar.
///
/// `progress` is clamped to `0..=1`.
pub fn paint_progress(buffer: &mut FrameBuffer, progress: f32) {
    let width = buffer.width();
    let row = NAV_ROWS - 1;
    let filled = (progress.clamp(0.0, 1.0) * width as f32).round() as u16;

    buffer.fill_row(0, row, width, '─', Style::new(Rgba::SLATE, Attr::DIM));
    buffer.fill_row(0, row, filled, '━', Style::plain(Rgba::SKY));
}

/// Paint the status line on the last row.
pub fn paint_status(buffer: &mut FrameBuffer, text: &str) {
    let Some(row) = buffer.height().checked_sub(STATUS_ROWS) else {
        return;
    };
    let width = buffer.width();
    buffer.fill_row(0, row, width, ' ', Style::default());
    let text = truncate_text(text, width.saturating_sub(2));
    buffer.draw_text(1, row, &text, Style::new(Rgba::SLATE, Attr::DIM));
}
