pub mod confirm_popup;
pub mod footer;
pub mod help_overlay;
pub mod list_view;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::Block;

use super::app::{App, Mode};

/// Main render function. Clears and redraws the whole frame every call.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    frame.render_widget(Block::default().style(app.theme.base()), area);

    // Layout: header (2 rows) | list | footer (2 rows)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(area);

    list_view::render_header(frame, app, chunks[0]);
    list_view::render_list(frame, app, chunks[1]);
    footer::render_footer(frame, app, chunks[2]);

    match app.mode {
        Mode::Browsing => {}
        Mode::ConfirmingDelete => confirm_popup::render_confirm_popup(frame, app, area),
        Mode::Help => help_overlay::render_help_overlay(frame, app, area),
    }
}

/// Fixed-size rectangle centered in `area`, shrunk to fit.
pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
