// Title bar component
//
// App name, selected part and a spinner while anything is loading.

use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let activity = if session.is_loading() {
        format!(" {} loading part", app.spinner())
    } else if session.pdf_loading() {
        format!(" {} signing link", app.spinner())
    } else {
        String::new()
    };

    let title_text = match session.selected_part_id() {
        Some(part_id) => format!(" 📑 sheetview ──── {part_id}{activity}"),
        None => format!(" 📑 sheetview{activity}"),
    };

    let title = Paragraph::new(title_text)
        .style(
            Style::default()
                .fg(app.theme.title)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.title))
                .title_top(Line::from(" ? ").right_aligned()),
        );

    f.render_widget(title, area);
}
