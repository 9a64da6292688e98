//! Pin table component
//!
//! Collapsible table of the part's pins. The first payload row is the header.

use super::panel_block;
use crate::tui::app::{App, Focus};
use crate::tui::scroll::ScrollState;
use crate::tui::traits::{Handled, Interactive};
use crate::util::truncate_to_width;
use crate::viewer::pins::PinTable;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Widest a single column may grow
const MAX_COLUMN_WIDTH: usize = 24;

pub const PARSE_ERROR_TEXT: &str = "Error parsing pin table data";

pub struct PinTablePanel {
    scroll: ScrollState,
}

impl PinTablePanel {
    pub fn new() -> Self {
        Self {
            scroll: ScrollState::top(),
        }
    }

    pub fn reset(&mut self) {
        self.scroll = ScrollState::top();
    }
}

impl Default for PinTablePanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Interactive for PinTablePanel {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll.step(-1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll.step(1),
            KeyCode::PageUp => self.scroll.page(-1),
            KeyCode::PageDown => self.scroll.page(1),
            KeyCode::Home => self.scroll.home(),
            KeyCode::End => self.scroll.end(),
            _ => return Handled::No,
        }
        Handled::Yes
    }

    fn focus_hint(&self) -> Option<&'static str> {
        Some("↑↓:scroll  Enter:fold")
    }
}

/// Body text when there are no rows to draw; an empty pin list shows nothing
fn placeholder(collapsed: bool, table: Option<&PinTable>) -> Option<&'static str> {
    match (collapsed, table) {
        (true, _) => Some("Collapsed (Enter or click the title to expand)"),
        (false, None | Some(PinTable::Empty)) => Some(""),
        (false, Some(PinTable::Error(_))) => Some(PARSE_ERROR_TEXT),
        (false, Some(PinTable::Table { .. })) => None,
    }
}

/// Column widths sized to content, capped at [`MAX_COLUMN_WIDTH`]
fn column_widths(header: &[String], rows: &[Vec<String>]) -> Vec<Constraint> {
    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);

    (0..columns)
        .map(|col| {
            let widest = std::iter::once(header)
                .chain(rows.iter().map(Vec::as_slice))
                .filter_map(|row| row.get(col))
                .map(|cell| cell.width())
                .max()
                .unwrap_or(0);
            Constraint::Length(widest.clamp(1, MAX_COLUMN_WIDTH) as u16)
        })
        .collect()
}

pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    let focused = app.focus == Focus::Pins;
    let collapsed = app.session.pins_collapsed();
    let arrow = if collapsed { "▸" } else { "▾" };
    let theme = &app.theme;

    let table = app.session.pin_table();
    let count = match table {
        Some(PinTable::Table { rows, .. }) => format!(" ({})", rows.len()),
        _ => String::new(),
    };
    let block = panel_block(
        format!(" {arrow} Pin Table{count} "),
        focused,
        theme.panel_pins,
        theme,
    );

    if let Some(text) = placeholder(collapsed, table) {
        let color = if matches!(table, Some(PinTable::Error(_))) && !collapsed {
            theme.error
        } else {
            theme.muted
        };
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(color))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let Some(PinTable::Table { header, rows }) = app.session.pin_table() else {
        return;
    };

    // Header takes one line inside the borders
    let viewport = area.height.saturating_sub(3) as usize;
    app.pin_table.scroll.resize(rows.len(), viewport);
    let (start, end) = app.pin_table.scroll.window();

    let widths = column_widths(header, rows);
    let theme = &app.theme;
    let header_row = Row::new(
        header
            .iter()
            .map(|h| Cell::from(truncate_to_width(h, MAX_COLUMN_WIDTH))),
    )
    .style(
        Style::default()
            .fg(theme.title)
            .add_modifier(Modifier::BOLD),
    );
    let body = rows[start..end].iter().map(|row| {
        Row::new(
            row.iter()
                .map(|c| Cell::from(truncate_to_width(c, MAX_COLUMN_WIDTH))),
        )
        .style(Style::default().fg(theme.foreground))
    });

    let table = Table::new(body, widths)
        .header(header_row)
        .column_spacing(2)
        .block(block);
    f.render_widget(table, area);
    app.pin_table.scroll.render_scrollbar(f, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn widths_fit_widest_cell() {
        let header = strings(&["Pin", "Name"]);
        let rows = vec![strings(&["1", "VIN"]), strings(&["12", "FEEDBACK", "extra"])];
        assert_eq!(
            column_widths(&header, &rows),
            vec![
                Constraint::Length(3),
                Constraint::Length(8),
                Constraint::Length(5)
            ]
        );
    }

    #[test]
    fn empty_pin_list_leaves_body_blank() {
        assert_eq!(placeholder(false, Some(&PinTable::Empty)), Some(""));
        assert_eq!(placeholder(false, None), Some(""));
        assert_eq!(
            placeholder(false, Some(&PinTable::Error("bad".to_string()))),
            Some(PARSE_ERROR_TEXT)
        );
        let table = PinTable::Table {
            header: strings(&["Pin"]),
            rows: vec![strings(&["1"])],
        };
        assert_eq!(placeholder(false, Some(&table)), None);
        assert!(placeholder(true, Some(&table)).is_some());
    }

    #[test]
    fn widths_are_capped() {
        let header = strings(&["Description"]);
        let rows = vec![vec!["x".repeat(80)]];
        assert_eq!(
            column_widths(&header, &rows),
            vec![Constraint::Length(MAX_COLUMN_WIDTH as u16)]
        );
    }
}
