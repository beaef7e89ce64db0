//! Text Measurement
//!
//! Utilities for measuring and wrapping text in terminal cells.
//!
//! Widths come from `unicode-width`:
//! - ASCII printable characters: 1 cell
//! - CJK and most emoji: 2 cells
//! - Control and zero-width characters: 0 cells

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal cells.
pub fn string_width(s: &str) -> u16 {
    u16::try_from(s.width()).unwrap_or(u16::MAX)
}

fn char_width(c: char) -> u16 {
    c.width().unwrap_or(0) as u16
}

/// Word-wrap text to a given width.
///
/// Breaks at whitespace; words wider than a line are split by character.
/// Explicit newlines start a new line, so blank lines survive. Empty text
/// produces no lines.
pub fn wrap_text(text: &str, width: u16) -> Vec<String> {
    if text.is_empty() {
        return vec![];
    }

    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    for raw_line in text.split('\n') {
        wrap_line(raw_line, width, &mut lines);
    }
    lines
}

fn wrap_line(line: &str, width: u16, out: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_width = 0u16;
    let mut emitted = false;

    for word in line.split_whitespace() {
        let word_width = string_width(word);

        // Start a new line if the word does not fit after a space
        if current_width > 0 && current_width + 1 + word_width > width {
            out.push(std::mem::take(&mut current));
            current_width = 0;
            emitted = true;
        }

        if word_width > width {
            // Hard-split a word that can never fit
            for c in word.chars() {
                let w = char_width(c);
                if current_width + w > width && current_width > 0 {
                    out.push(std::mem::take(&mut current));
                    current_width = 0;
                    emitted = true;
                }
                current.push(c);
                current_width += w;
            }
            continue;
        }

        if current_width > 0 {
            current.push(' ');
            current_width += 1;
        }
        current.push_str(word);
        current_width += word_width;
    }

    if !current.is_empty() || !emitted {
        out.push(current);
    }
}

/// Number of lines `text` occupies at `width`.
pub fn measure_text_height(text: &str, width: u16) -> u16 {
    u16::try_from(wrap_text(text, width).len()).unwrap_or(u16::MAX)
}

/// Truncate text to fit within a given width.
///
/// Text wider than `width` is cut and ends with an ellipsis.
pub fn truncate_text(text: &str, width: u16) -> String {
    if width == 0 {
        return String::new();
    }

    if string_width(text) <= width {
        return text.to_string();
    }

    // Leave room for the ellipsis
    let target_width = width.saturating_sub(1);
    let mut result = String::new();
    let mut current_width = 0u16;

    for c in text.chars() {
        let w = char_width(c);
        if current_width + w > target_width {
            break;
        }
        result.push(c);
        current_width += w;
    }

    result.push('…');
    result
}
