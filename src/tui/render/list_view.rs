use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Todo;
use crate::tui::app::App;
use crate::util::unicode::{single_line, truncate_to_width};

const SELECTED_MARKER: &str = "▸ ";
const UNSELECTED_MARKER: &str = "  ";
/// Left indent of the detail lines under the selected row
const DETAIL_INDENT: &str = "      ";

/// Title line plus key hints
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let title = Line::from(vec![
        Span::styled(" TODOS", theme.key_style()),
        Span::styled(
            format!("  {} shown", app.visible.len()),
            theme.dim_style(),
        ),
    ]);

    let mut hints = vec![Span::styled(" ", theme.base())];
    for (key, desc) in [
        ("↑↓/jk", "move"),
        ("space", "toggle"),
        ("d", "delete"),
        ("?", "help"),
        ("q", "quit"),
    ] {
        hints.push(Span::styled(key, theme.key_style()));
        hints.push(Span::styled(format!(" {desc}  "), theme.dim_style()));
    }

    let paragraph = Paragraph::new(vec![title, Line::from(hints)]).style(theme.base());
    frame.render_widget(paragraph, area);
}

/// One row per visible todo. The selected row is highlighted and followed
/// by its paths and branch.
pub fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let width = area.width as usize;
    let mut lines: Vec<Line> = Vec::new();
    let mut selected_span = (0, 0);

    for (row, todo) in app.visible_todos().enumerate() {
        let is_selected = row == app.cursor;
        let start = lines.len();
        lines.push(row_line(app, todo, is_selected, width));
        if is_selected {
            lines.extend(detail_lines(app, todo, width));
            selected_span = (start, lines.len());
        }
    }

    // Scroll just enough to keep the selected row and its details in view.
    let height = area.height as usize;
    let offset = selected_span.1.saturating_sub(height).min(selected_span.0);

    let paragraph = Paragraph::new(lines)
        .style(app.theme.base())
        .scroll((offset as u16, 0));
    frame.render_widget(paragraph, area);
}

fn row_line<'a>(app: &App, todo: &Todo, selected: bool, width: usize) -> Line<'a> {
    let theme = &app.theme;
    let bg = if selected {
        theme.selection_bg
    } else {
        theme.background
    };
    let marker = if selected {
        SELECTED_MARKER
    } else {
        UNSELECTED_MARKER
    };

    let mut text_style = Style::default().fg(theme.text).bg(bg);
    if selected {
        text_style = text_style
            .fg(theme.text_bright)
            .add_modifier(Modifier::BOLD);
    }
    if todo.is_done() {
        text_style = text_style.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT);
    }

    // marker (2) + icon (1) + space (1) + trailing priority tag
    let priority_tag = format!(" [{}]", todo.priority);
    let budget = width.saturating_sub(4 + priority_tag.len());
    let text = truncate_to_width(&single_line(&todo.text), budget);

    Line::from(vec![
        Span::styled(marker, Style::default().fg(theme.highlight).bg(bg)),
        Span::styled(
            todo.status.icon(),
            Style::default().fg(theme.status_color(todo.status)).bg(bg),
        ),
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled(text, text_style),
        Span::styled(
            priority_tag,
            Style::default()
                .fg(theme.priority_color(todo.priority))
                .bg(bg),
        ),
    ])
}

fn detail_lines<'a>(app: &App, todo: &Todo, width: usize) -> Vec<Line<'a>> {
    let theme = &app.theme;
    let budget = width.saturating_sub(DETAIL_INDENT.len());
    let mut lines = Vec::new();

    if !todo.context.paths.is_empty() {
        let paths = format!("paths: {}", todo.context.paths.join(", "));
        lines.push(Line::from(vec![
            Span::styled(DETAIL_INDENT, theme.base()),
            Span::styled(
                truncate_to_width(&paths, budget),
                Style::default().fg(theme.cyan).bg(theme.background),
            ),
        ]));
    }
    if let Some(branch) = &todo.context.branch {
        let branch = format!("branch: {branch}");
        lines.push(Line::from(vec![
            Span::styled(DETAIL_INDENT, theme.base()),
            Span::styled(
                truncate_to_width(&branch, budget),
                Style::default().fg(theme.green).bg(theme.background),
            ),
        ]));
    }
    lines
}
