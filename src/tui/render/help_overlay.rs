use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::Status;
use crate::tui::app::App;

use super::centered_rect_fixed;

const BINDINGS: &[(&str, &str)] = &[
    ("↑↓ / j k", "Move cursor"),
    ("g / G", "Jump to first / last"),
    ("Space / Enter", "Toggle done"),
    ("d / x", "Delete (asks first)"),
    ("? / h", "This help"),
    ("q / Esc", "Quit"),
];

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let bg = theme.background;
    let desc_style = theme.base();

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(" Key Bindings", theme.header_style())));
    lines.push(Line::from(""));
    for (key, desc) in BINDINGS {
        add_binding(&mut lines, key, desc, theme.key_style(), desc_style);
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" Status icons", theme.header_style())));
    for status in Status::ALL {
        lines.push(Line::from(vec![
            Span::styled("  ", desc_style),
            Span::styled(
                status.icon(),
                Style::default().fg(theme.status_color(status)).bg(bg),
            ),
            Span::styled(format!(" {status}"), desc_style),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Press any key to return",
        theme.dim_style(),
    )));

    let overlay_area = centered_rect_fixed(44, lines.len() as u16 + 2, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.highlight).bg(bg))
        .style(Style::default().bg(bg));

    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 16;
    let padded_key = format!(" {:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn lists_bindings_and_icons() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_todos(&tmp, &["a"]);
        app.show_help();

        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_help_overlay(frame, &app, area);
        });
        assert!(output.contains("Key Bindings"));
        assert!(output.contains("Toggle done"));
        assert!(output.contains("⚠ tech-debt"));
        assert!(output.contains("Press any key to return"));
    }
}
