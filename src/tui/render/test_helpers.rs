use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::io::project_io::init_project;
use crate::io::store::TodoStore;
use crate::model::Todo;
use crate::ops::todo_ops::ListFilter;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Todos with predictable ids, one per text.
pub fn todos_from(texts: &[&str]) -> Vec<Todo> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| Todo::new(format!("{:032x}", i + 1), *text))
        .collect()
}

/// An initialized project in `tmp` holding one todo per text, opened as an
/// unfiltered session.
pub fn app_with_todos(tmp: &TempDir, texts: &[&str]) -> App {
    app_with(tmp, todos_from(texts))
}

pub fn app_with(tmp: &TempDir, todos: Vec<Todo>) -> App {
    let root = init_project(tmp.path(), false).unwrap();
    let store = TodoStore::open(root);
    store.save(&todos).unwrap();
    App::new(store, todos, &ListFilter::default())
}
