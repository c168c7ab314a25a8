use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, SessionError};

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) -> Result<(), SessionError> {
    match key.code {
        KeyCode::Char('y' | 'Y') => app.confirm_delete()?,
        KeyCode::Char('n' | 'N' | 'q') | KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
    Ok(())
}
