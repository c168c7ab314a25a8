use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, SessionError};

pub(super) fn handle_browse(app: &mut App, key: KeyEvent) -> Result<(), SessionError> {
    match key.code {
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => app.quit(),
        KeyCode::Down | KeyCode::Char('j') => app.move_down(),
        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
        KeyCode::Char('g') | KeyCode::Home => app.jump_first(),
        KeyCode::Char('G') | KeyCode::End => app.jump_last(),
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected()?,
        KeyCode::Char('d' | 'D' | 'x' | 'X') => app.request_delete(),
        KeyCode::Char('?' | 'h' | 'H') => app.show_help(),
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::model::Status;
    use crate::tui::app::Mode;
    use crate::tui::input::handle_key;
    use crate::tui::input::test_keys::*;
    use crate::tui::render::test_helpers::app_with_todos;
    use crossterm::event::KeyCode;
    use tempfile::TempDir;

    #[test]
    fn test_navigation_keys() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_todos(&tmp, &["a", "b", "c"]);

        handle_key(&mut app, ch('j')).unwrap();
        handle_key(&mut app, key(KeyCode::Down)).unwrap();
        handle_key(&mut app, key(KeyCode::Down)).unwrap();
        assert_eq!(app.cursor, 2);
        handle_key(&mut app, ch('k')).unwrap();
        assert_eq!(app.cursor, 1);
        handle_key(&mut app, ch('g')).unwrap();
        assert_eq!(app.cursor, 0);
        handle_key(&mut app, ch('G')).unwrap();
        assert_eq!(app.cursor, 2);
        handle_key(&mut app, key(KeyCode::Up)).unwrap();
        assert_eq!(app.cursor, 1);
    }

    #[test]
    fn test_space_and_enter_toggle() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_todos(&tmp, &["a"]);

        handle_key(&mut app, ch(' ')).unwrap();
        assert_eq!(app.store.load().unwrap()[0].status, Status::Done);
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.store.load().unwrap()[0].status, Status::Open);
    }

    #[test]
    fn test_delete_keys_open_confirmation() {
        for c in ['d', 'D', 'x', 'X'] {
            let tmp = TempDir::new().unwrap();
            let mut app = app_with_todos(&tmp, &["a"]);
            handle_key(&mut app, ch(c)).unwrap();
            assert_eq!(app.mode, Mode::ConfirmingDelete, "key {c}");
        }
    }

    #[test]
    fn test_quit_keys() {
        for k in [ch('q'), ch('Q'), key(KeyCode::Esc)] {
            let tmp = TempDir::new().unwrap();
            let mut app = app_with_todos(&tmp, &["a"]);
            handle_key(&mut app, k).unwrap();
            assert!(app.should_quit);
        }
    }

    #[test]
    fn test_unbound_key_is_noop() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_todos(&tmp, &["a", "b"]);
        handle_key(&mut app, ch('z')).unwrap();
        assert_eq!(app.cursor, 0);
        assert_eq!(app.mode, Mode::Browsing);
        assert!(!app.should_quit);
    }
}
