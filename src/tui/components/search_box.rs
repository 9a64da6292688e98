//! Search box and suggestion dropdown
//!
//! The dropdown is drawn last, over the panels below the search box, and
//! only while the session reports visible suggestions.

use super::panel_block;
use crate::tui::app::{App, Focus};
use crate::viewer::search::MIN_QUERY_LEN;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

/// Widest the dropdown grows
const DROPDOWN_MAX_WIDTH: u16 = 48;

pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    app.hit.search = area;
    let focused = app.focus == Focus::Search;
    let theme = &app.theme;
    let block = panel_block(
        " 🔍 Search parts ".to_string(),
        focused,
        theme.panel_search,
        theme,
    );

    let input = &app.search_input;
    let paragraph = if input.text.is_empty() {
        Paragraph::new(format!("Type at least {MIN_QUERY_LEN} characters of a part number"))
            .style(Style::default().fg(theme.muted))
    } else {
        Paragraph::new(input.text.clone()).style(Style::default().fg(theme.foreground))
    };
    f.render_widget(paragraph.block(block), area);

    if focused {
        let max_col = area.width.saturating_sub(3);
        let col = (input.cursor_column() as u16).min(max_col);
        f.set_cursor_position((area.x + 1 + col, area.y + 1));
    }
}

/// Draw the suggestion dropdown under `search` (call after everything else)
pub fn render_dropdown(f: &mut Frame, search: Rect, app: &mut App) {
    if !app.session.suggestions_visible() {
        app.hit.dropdown = Rect::default();
        return;
    }

    let screen = f.area();
    let suggestions = app.session.suggestions();
    let highlighted = app.session.search().highlighted();

    let wanted = suggestions.len() as u16 + 2;
    let height = wanted.min(screen.bottom().saturating_sub(search.bottom()));
    let width = search.width.min(DROPDOWN_MAX_WIDTH);
    let area = Rect::new(search.x, search.bottom(), width, height);

    let theme = &app.theme;
    let items: Vec<ListItem> = suggestions
        .iter()
        .enumerate()
        .map(|(i, part)| {
            let style = if highlighted == Some(i) {
                Style::default()
                    .fg(theme.selection_fg)
                    .bg(theme.selection)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.foreground)
            };
            ListItem::new(part.part_id.clone()).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.panel_search))
            .style(Style::default().bg(theme.background)),
    );

    f.render_widget(Clear, area);
    f.render_widget(list, area);
    app.hit.dropdown = area;
}
