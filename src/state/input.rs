//! Input Module - Event conversion and polling
//!
//! Maps crossterm events onto the actions the portfolio front-end
//! understands. Browsing and typing into the contact form use different
//! key maps, selected by [`InputMode`].
//!
//! # Keys
//!
//! | Key                  | Browse                    | Editing           |
//! |----------------------|---------------------------|-------------------|
//! | `1`-`5`              | jump to a section         | typed             |
//! | `j`/`k`, arrows      | scroll or move selection  | typed / ignored   |
//! | PgUp/PgDn, Space     | page                      | typed / ignored   |
//! | `g`/`G`, Home/End    | top/bottom                | typed / ignored   |
//! | `p`                  | projects page             | typed             |
//! | Tab                  | next category             | next field        |
//! | Enter                | open                      | next field / send |
//! | Esc, `b`             | back                      | stop editing      |
//! | `q`                  | quit                      | typed             |
//! | Ctrl+C               | quit                      | quit              |
//!
//! # Example
//!
//! ```ignore
//! use spark_folio::state::{poll_event, InputEvent, InputMode};
//!
//! if let Some(InputEvent::Action(action)) = poll_event(Duration::from_millis(16), mode)? {
//!     app.handle(action, Instant::now());
//! }
//! ```

use crossterm::event::{
    Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent,
    MouseEventKind, poll, read,
};
use std::time::Duration;

use crate::types::NAV_ITEMS;

/// Rows moved per mouse wheel notch.
pub const WHEEL_ROWS: i16 = 3;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Browse,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Nav link for a home-page section
    Section(&'static str),
    Up,
    Down,
    /// Scroll by rows; negative is up
    Scroll(i16),
    PageUp,
    PageDown,
    Top,
    Bottom,
    Projects,
    NextCategory,
    Open,
    Back,
    Quit,
    Type(char),
    Backspace,
    NextField,
    StopEditing,
}

/// Unified event type for the front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Action(Action),
    /// Terminal resize event (new width, height)
    Resize(u16, u16),
    /// No event or unhandled event type
    None,
}

// =============================================================================
// CONVERSION
// =============================================================================

/// Map a key press. Key releases are ignored.
pub fn convert_key_event(event: KeyEvent, mode: InputMode) -> Option<Action> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    match mode {
        InputMode::Editing => match event.code {
            KeyCode::Esc => Some(Action::StopEditing),
            KeyCode::Tab => Some(Action::NextField),
            KeyCode::Enter => Some(Action::Open),
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Char(c) => Some(Action::Type(c)),
            _ => None,
        },
        InputMode::Browse => match event.code {
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                NAV_ITEMS.get(index).map(|item| Action::Section(item.id))
            }
            KeyCode::Char('j') | KeyCode::Down => Some(Action::Down),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::Up),
            KeyCode::Char(' ') | KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::Top),
            KeyCode::Char('G') | KeyCode::End => Some(Action::Bottom),
            KeyCode::Char('p') => Some(Action::Projects),
            KeyCode::Tab => Some(Action::NextCategory),
            KeyCode::Enter => Some(Action::Open),
            KeyCode::Esc | KeyCode::Char('b') => Some(Action::Back),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        },
    }
}

/// Map the mouse wheel to scrolling.
pub fn convert_mouse_event(event: MouseEvent) -> Option<Action> {
    match event.kind {
        MouseEventKind::ScrollDown => Some(Action::Scroll(WHEEL_ROWS)),
        MouseEventKind::ScrollUp => Some(Action::Scroll(-WHEEL_ROWS)),
        _ => None,
    }
}

pub fn convert_event(event: CrosstermEvent, mode: InputMode) -> InputEvent {
    let action = match event {
        CrosstermEvent::Key(key) => convert_key_event(key, mode),
        CrosstermEvent::Mouse(mouse) => convert_mouse_event(mouse),
        CrosstermEvent::Resize(w, h) => return InputEvent::Resize(w, h),
        _ => None,
    };
    action.map_or(InputEvent::None, InputEvent::Action)
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(timeout: Duration, mode: InputMode) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(read_event(mode)?))
    } else {
        Ok(None)
    }
}

/// Read the next event (blocking).
pub fn read_event(mode: InputMode) -> std::io::Result<InputEvent> {
    Ok(convert_event(read()?, mode))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn browse(code: KeyCode) -> Option<Action> {
        convert_key_event(key(code), InputMode::Browse)
    }

    fn editing(code: KeyCode) -> Option<Action> {
        convert_key_event(key(code), InputMode::Editing)
    }

    #[test]
    fn test_digits_map_to_nav_items() {
        assert_eq!(browse(KeyCode::Char('1')), Some(Action::Section("home")));
        assert_eq!(browse(KeyCode::Char('3')), Some(Action::Section("works")));
        assert_eq!(browse(KeyCode::Char('5')), Some(Action::Section("contact")));
        assert_eq!(browse(KeyCode::Char('6')), None);
    }

    #[test]
    fn test_browse_keys() {
        assert_eq!(browse(KeyCode::Char('j')), Some(Action::Down));
        assert_eq!(browse(KeyCode::Up), Some(Action::Up));
        assert_eq!(browse(KeyCode::PageDown), Some(Action::PageDown));
        assert_eq!(browse(KeyCode::Char('G')), Some(Action::Bottom));
        assert_eq!(browse(KeyCode::Char('p')), Some(Action::Projects));
        assert_eq!(browse(KeyCode::Tab), Some(Action::NextCategory));
        assert_eq!(browse(KeyCode::Esc), Some(Action::Back));
        assert_eq!(browse(KeyCode::Char('b')), Some(Action::Back));
        assert_eq!(browse(KeyCode::Char('q')), Some(Action::Quit));
    }

    #[test]
    fn test_editing_keys_type_text() {
        assert_eq!(editing(KeyCode::Char('q')), Some(Action::Type('q')));
        assert_eq!(editing(KeyCode::Char('1')), Some(Action::Type('1')));
        assert_eq!(editing(KeyCode::Tab), Some(Action::NextField));
        assert_eq!(editing(KeyCode::Esc), Some(Action::StopEditing));
        assert_eq!(editing(KeyCode::Backspace), Some(Action::Backspace));
        assert_eq!(editing(KeyCode::Up), None);
    }

    #[test]
    fn test_ctrl_c_quits_in_any_mode() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(convert_key_event(event, InputMode::Browse), Some(Action::Quit));
        assert_eq!(convert_key_event(event, InputMode::Editing), Some(Action::Quit));
    }

    #[test]
    fn test_release_ignored() {
        let mut event = key(KeyCode::Char('q'));
        event.kind = KeyEventKind::Release;
        assert_eq!(convert_key_event(event, InputMode::Browse), None);
    }

    #[test]
    fn test_mouse_wheel() {
        let event = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::empty(),
        };
        assert_eq!(convert_mouse_event(event), Some(Action::Scroll(WHEEL_ROWS)));

        let event = MouseEvent { kind: MouseEventKind::Moved, ..event };
        assert_eq!(convert_mouse_event(event), None);
    }

    #[test]
    fn test_convert_resize() {
        assert_eq!(
            convert_event(CrosstermEvent::Resize(100, 40), InputMode::Browse),
            InputEvent::Resize(100, 40)
        );
        assert_eq!(
            convert_event(CrosstermEvent::FocusGained, InputMode::Browse),
            InputEvent::None
        );
    }
}
