//! Keyboard handling for the board.
//!
//! Cursor movement is applied to [`NavState`] directly. Anything that needs
//! the board is returned as a [`KeyAction`] for the app to carry out.

use crossterm::event::{KeyCode, KeyModifiers};

use crate::nav::NavState;

/// Result of handling a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// User requested exit.
    Exit,
    /// Nothing for the app to do.
    Continue,
    /// Pick up the selected card.
    PickUp,
    /// Release the dragged card over the hovered column.
    Drop,
    /// Abandon the drag.
    Cancel,
    /// Re-fetch stages and deals.
    Refresh,
}

/// Handle one key press.
///
/// `column_lens` holds the card count of each visible column.
pub fn handle_key_event(
    code: KeyCode,
    modifiers: KeyModifiers,
    nav: &mut NavState,
    column_lens: &[usize],
) -> KeyAction {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Exit;
    }

    match code {
        KeyCode::Esc if nav.is_dragging() => KeyAction::Cancel,
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Exit,

        KeyCode::Left | KeyCode::Char('h') => {
            nav.left(column_lens);
            KeyAction::Continue
        }
        KeyCode::Right | KeyCode::Char('l') => {
            nav.right(column_lens);
            KeyAction::Continue
        }
        KeyCode::Up | KeyCode::Char('k') => {
            nav.up(column_lens);
            KeyAction::Continue
        }
        KeyCode::Down | KeyCode::Char('j') => {
            nav.down(column_lens);
            KeyAction::Continue
        }

        KeyCode::Char(' ') | KeyCode::Enter if nav.is_dragging() => KeyAction::Drop,
        KeyCode::Char(' ') | KeyCode::Enter => KeyAction::PickUp,

        KeyCode::Tab if !nav.is_dragging() => {
            nav.toggle_view();
            KeyAction::Continue
        }
        KeyCode::Char('r') if !nav.is_dragging() => KeyAction::Refresh,

        _ => KeyAction::Continue,
    }
}
