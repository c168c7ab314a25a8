use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::util::unicode::{single_line, truncate_to_width};

use super::centered_rect_fixed;

/// Render the delete confirmation popup for the selected todo
pub fn render_confirm_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(todo) = app.selected() else {
        return;
    };
    let theme = &app.theme;
    let bg = theme.background;
    let warn_style = Style::default().fg(theme.red).bg(bg);

    let popup_w: u16 = 50.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(4) as usize;

    let lines = vec![
        Line::from(Span::styled(" Delete this todo?", theme.header_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  ", theme.base()),
            Span::styled(
                truncate_to_width(&single_line(&todo.text), inner_w),
                theme.base(),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled("  This cannot be undone.", warn_style)),
        Line::from(""),
        Line::from(vec![
            Span::styled("  ", theme.base()),
            Span::styled("y", theme.key_style()),
            Span::styled(" delete  ", theme.dim_style()),
            Span::styled("n/Esc", theme.key_style()),
            Span::styled(" cancel", theme.dim_style()),
        ]),
    ];

    let popup_h = (lines.len() as u16) + 2;
    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.highlight).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}
