mod browse;
mod confirm;

use crossterm::event::{KeyCode, KeyEvent};

use super::app::{App, Mode, SessionError};

use browse::handle_browse;
use confirm::handle_confirm;

/// Handle a key event in the current mode. Persistence failures are
/// returned so the session can stop on diverged state.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Result<(), SessionError> {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return Ok(());
    }
    app.flash = None;

    match app.mode {
        Mode::Browsing => handle_browse(app, key),
        Mode::ConfirmingDelete => handle_confirm(app, key),
        Mode::Help => {
            app.close_help();
            Ok(())
        }
    }
}

#[cfg(test)]
pub(crate) mod test_keys {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub fn ch(c: char) -> KeyEvent {
        let modifiers = if c.is_ascii_uppercase() {
            KeyModifiers::SHIFT
        } else {
            KeyModifiers::NONE
        };
        KeyEvent::new(KeyCode::Char(c), modifiers)
    }
}

#[cfg(test)]
mod tests {
    use super::test_keys::*;
    use super::*;
    use crate::tui::render::test_helpers::app_with_todos;
    use tempfile::TempDir;

    #[test]
    fn test_help_any_key_returns_to_browsing() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_todos(&tmp, &["a", "b"]);

        handle_key(&mut app, ch('?')).unwrap();
        assert_eq!(app.mode, Mode::Help);
        // Keys that normally act are swallowed by the overlay.
        handle_key(&mut app, ch('j')).unwrap();
        assert_eq!(app.mode, Mode::Browsing);
        assert_eq!(app.cursor, 0);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_modifier_only_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_todos(&tmp, &["a"]);
        app.flash = Some("kept".into());
        handle_key(
            &mut app,
            key(KeyCode::Modifier(crossterm::event::ModifierKeyCode::LeftShift)),
        )
        .unwrap();
        assert_eq!(app.flash.as_deref(), Some("kept"));
    }
}
