use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Status;
use crate::tui::app::App;

const BAR_WIDTH: usize = 20;

/// Position bar plus open/done counts, with the last action's feedback
/// underneath.
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let total = app.visible.len();
    let position = if total == 0 { 0 } else { app.cursor + 1 };

    let filled = (position * BAR_WIDTH).checked_div(total).unwrap_or(0);
    let bar = format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled)
    );

    let open = app
        .visible_todos()
        .filter(|t| t.status == Status::Open)
        .count();
    let done = app.visible_todos().filter(|t| t.is_done()).count();

    let progress = Line::from(vec![
        Span::styled(" ", theme.base()),
        Span::styled(bar, Style::default().fg(theme.highlight).bg(theme.background)),
        Span::styled(format!(" {position}/{total}   "), theme.dim_style()),
        Span::styled(
            format!("{open} open"),
            Style::default().fg(theme.status_color(Status::Open)).bg(theme.background),
        ),
        Span::styled("  ", theme.base()),
        Span::styled(
            format!("{done} done"),
            Style::default().fg(theme.status_color(Status::Done)).bg(theme.background),
        ),
    ]);

    let flash = Line::from(Span::styled(
        format!(" {}", app.flash.as_deref().unwrap_or("")),
        theme.dim_style(),
    ));

    let paragraph = Paragraph::new(vec![progress, flash]).style(theme.base());
    frame.render_widget(paragraph, area);
}
