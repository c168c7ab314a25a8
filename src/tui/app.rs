use std::io;

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::Backend;
use tracing::debug;

use crate::io::project_io::ProjectError;
use crate::io::store::TodoStore;
use crate::model::Todo;
use crate::ops::todo_ops::ListFilter;

use super::input;
use super::render;
use super::terminal::TerminalGuard;
use super::theme::Theme;

/// Why a list session stopped abnormally
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Raw mode or the alternate screen could not be acquired; nothing was
    /// drawn, so the caller can fall back to static output.
    #[error("interactive terminal unavailable: {0}")]
    Unavailable(io::Error),
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
    #[error("could not save todos: {0}")]
    Store(#[from] ProjectError),
}

/// Input/render mode; exactly one is active at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browsing,
    ConfirmingDelete,
    Help,
}

/// State of one interactive list session.
///
/// `todos` is the full collection as last saved. `visible` holds positions
/// into `todos` for the rows on screen, so filtered sessions still persist
/// every todo.
pub struct App {
    pub store: TodoStore,
    pub todos: Vec<Todo>,
    pub visible: Vec<usize>,
    pub cursor: usize,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    /// Short feedback shown in the footer after an action
    pub flash: Option<String>,
}

impl App {
    pub fn new(store: TodoStore, todos: Vec<Todo>, filter: &ListFilter) -> Self {
        let visible = filter.visible_indices(&todos);
        App {
            store,
            todos,
            visible,
            cursor: 0,
            mode: Mode::Browsing,
            should_quit: false,
            theme: Theme::default(),
            flash: None,
        }
    }

    /// The todo under the cursor
    pub fn selected(&self) -> Option<&Todo> {
        self.visible.get(self.cursor).map(|&i| &self.todos[i])
    }

    pub fn visible_todos(&self) -> impl Iterator<Item = &Todo> {
        self.visible.iter().map(|&i| &self.todos[i])
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.visible.len() {
            self.cursor += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn jump_first(&mut self) {
        self.cursor = 0;
    }

    pub fn jump_last(&mut self) {
        self.cursor = self.visible.len().saturating_sub(1);
    }

    /// Flip done/open on the selected todo and persist the whole collection.
    ///
    /// The row stays visible even if it no longer matches the session's
    /// filter; the visible set only shrinks on delete.
    pub fn toggle_selected(&mut self) -> Result<(), SessionError> {
        let Some(&idx) = self.visible.get(self.cursor) else {
            return Ok(());
        };
        let mut updated = self.todos.clone();
        updated[idx].toggle();
        self.store.save(&updated)?;
        self.flash = Some(format!("Marked {}", updated[idx].status));
        self.todos = updated;
        Ok(())
    }

    pub fn request_delete(&mut self) {
        if self.selected().is_some() {
            self.mode = Mode::ConfirmingDelete;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.mode = Mode::Browsing;
    }

    /// Remove the selected todo, persist, and clamp the cursor. Ends the
    /// session when nothing is left to show.
    pub fn confirm_delete(&mut self) -> Result<(), SessionError> {
        self.mode = Mode::Browsing;
        let Some(&idx) = self.visible.get(self.cursor) else {
            return Ok(());
        };

        let remaining = crate::ops::todo_ops::delete_at(&self.todos, idx);
        self.store.save(&remaining)?;
        debug!(index = idx, "deleted todo from session");
        self.todos = remaining;

        self.visible.remove(self.cursor);
        for pos in self.visible.iter_mut() {
            if *pos > idx {
                *pos -= 1;
            }
        }
        if self.cursor >= self.visible.len() {
            self.cursor = self.visible.len().saturating_sub(1);
        }
        self.flash = Some("Deleted".to_string());
        if self.visible.is_empty() {
            self.should_quit = true;
        }
        Ok(())
    }

    pub fn show_help(&mut self) {
        self.mode = Mode::Help;
    }

    pub fn close_help(&mut self) {
        self.mode = Mode::Browsing;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

/// Run an interactive list session over the todos matching `filter`.
///
/// Returns `SessionError::Unavailable` without drawing anything when the
/// terminal cannot be put into raw mode.
pub fn run(store: TodoStore, filter: &ListFilter) -> Result<(), SessionError> {
    let todos = store.load()?;
    let mut app = App::new(store, todos, filter);
    if app.visible.is_empty() {
        return Ok(());
    }

    let mut guard = TerminalGuard::acquire().map_err(SessionError::Unavailable)?;
    run_event_loop(guard.terminal_mut(), &mut app)
}

fn run_event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), SessionError> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key)?;
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
