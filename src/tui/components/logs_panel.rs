//! Logs panel component
//!
//! Tails the shared `LogBuffer` while the viewer runs: loader chains, stale
//! discards and signing failures show up here with their part ids. Moving
//! the cursor pins the view so a line can be copied.

use super::panel_block;
use crate::logging::{LogEntry, LogLevel};
use crate::theme::Theme;
use crate::tui::app::{App, Focus};
use crate::tui::scroll::ScrollState;
use crate::tui::traits::{Handled, Interactive, Selectable};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{List, ListItem},
    Frame,
};

pub struct LogsPanel {
    scroll: ScrollState,
    /// Cursor line; None while tailing
    pub selected: Option<usize>,
    entry_count: usize,
}

impl LogsPanel {
    pub fn new() -> Self {
        Self {
            scroll: ScrollState::tail(),
            selected: None,
            entry_count: 0,
        }
    }

    /// Sync with the buffer length and viewport (call each frame)
    pub fn sync(&mut self, count: usize, viewport_height: usize) {
        self.entry_count = count;
        self.scroll.resize(count, viewport_height);
        self.selected = self.selected.map(|i| i.min(count.saturating_sub(1)));
    }

    /// Copy text for the line under the cursor
    pub fn selected_entry_text(&self, entries: &[LogEntry]) -> Option<String> {
        self.selected
            .and_then(|idx| entries.get(idx))
            .map(format_log_entry)
    }

    fn title(&self, focused: bool) -> &'static str {
        match (focused && self.selected.is_some(), self.scroll.is_following()) {
            (true, _) => " Logs [select] ",
            (false, true) => " Logs ",
            (false, false) => " Logs [paused] ",
        }
    }
}

impl Default for LogsPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Selectable for LogsPanel {
    fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    fn select(&mut self, index: usize) {
        let index = index.min(self.entry_count.saturating_sub(1));
        self.selected = Some(index);
        self.scroll.reveal(index);
    }

    fn item_count(&self) -> usize {
        self.entry_count
    }

    /// The first cursor lands on the newest line
    fn select_next(&mut self) {
        match self.selected {
            Some(idx) => self.select(idx + 1),
            None => self.select_last(),
        }
    }

    fn select_previous(&mut self) {
        match self.selected {
            Some(idx) => self.select(idx.saturating_sub(1)),
            None => self.select_last(),
        }
    }
}

impl Interactive for LogsPanel {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        if self.entry_count == 0 {
            return Handled::No;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Home => {
                self.scroll.home();
                self.select_first();
            }
            KeyCode::End => {
                self.scroll.end();
                self.select_last();
            }
            KeyCode::PageUp => self.scroll.page(-1),
            KeyCode::PageDown => self.scroll.page(1),
            KeyCode::Esc if self.selected.is_some() => {
                self.selected = None;
                self.scroll.follow();
            }
            _ => return Handled::No,
        }
        Handled::Yes
    }

    fn focus_hint(&self) -> Option<&'static str> {
        Some("↑↓:select  y:copy  Esc:resume")
    }
}

/// Last path segment of the tracing target: `sheetview::viewer::loader` -> `loader`
fn source(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

fn format_log_entry(entry: &LogEntry) -> String {
    format!(
        "{} {:5} {:<8} {}",
        entry.timestamp.format("%H:%M:%S"),
        entry.level.as_str(),
        source(&entry.target),
        entry.display_line()
    )
}

fn level_style(level: LogLevel, theme: &Theme) -> Style {
    match level {
        LogLevel::Error => Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        LogLevel::Warn => Style::default().fg(theme.warning),
        LogLevel::Info => Style::default().fg(theme.foreground),
        LogLevel::Debug | LogLevel::Trace => Style::default().fg(theme.muted),
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    let focused = app.focus == Focus::Logs;
    let entries = app.log_buffer.get_all();
    app.logs_panel
        .sync(entries.len(), area.height.saturating_sub(2) as usize);

    let panel = &app.logs_panel;
    let theme = &app.theme;
    let (start, end) = panel.scroll.window();

    let items: Vec<ListItem> = entries[start..end]
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let style = if focused && panel.selected == Some(start + i) {
                Style::default()
                    .fg(theme.selection_fg)
                    .bg(theme.selection)
                    .add_modifier(Modifier::BOLD)
            } else {
                level_style(entry.level, theme)
            };
            ListItem::new(format_log_entry(entry)).style(style)
        })
        .collect();

    let block = panel_block(panel.title(focused).to_string(), focused, theme.panel_logs, theme);
    f.render_widget(List::new(items).block(block), area);
    panel.scroll.render_scrollbar(f, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crossterm::event::KeyModifiers;

    fn entries(count: usize) -> Vec<LogEntry> {
        (0..count)
            .map(|i| LogEntry {
                timestamp: Utc::now(),
                level: LogLevel::Info,
                target: "sheetview::viewer::loader".to_string(),
                message: format!("entry {i}"),
                fields: vec![("part_id".to_string(), "LM317".to_string())],
            })
            .collect()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn first_cursor_lands_on_newest_line() {
        let entries = entries(5);
        let mut panel = LogsPanel::new();
        panel.sync(entries.len(), 3);

        panel.handle_key(key(KeyCode::Up));
        assert_eq!(panel.selected, Some(4));
        panel.handle_key(key(KeyCode::Up));
        assert_eq!(panel.selected, Some(3));

        let text = panel.selected_entry_text(&entries).unwrap();
        assert!(text.ends_with("INFO  loader   entry 3 part_id=LM317"));
    }

    #[test]
    fn esc_clears_cursor_and_resumes_tailing() {
        let mut panel = LogsPanel::new();
        panel.sync(5, 3);
        panel.handle_key(key(KeyCode::Home));
        assert_eq!(panel.selected, Some(0));
        assert!(!panel.scroll.is_following());

        assert_eq!(panel.handle_key(key(KeyCode::Esc)), Handled::Yes);
        assert_eq!(panel.selected, None);
        assert!(panel.scroll.is_following());
        // nothing left to clear, App gets the key
        assert_eq!(panel.handle_key(key(KeyCode::Esc)), Handled::No);
    }

    #[test]
    fn empty_buffer_ignores_keys() {
        let mut panel = LogsPanel::new();
        panel.sync(0, 3);
        assert_eq!(panel.handle_key(key(KeyCode::Up)), Handled::No);
        assert_eq!(panel.selected, None);
    }

    #[test]
    fn cursor_survives_buffer_trim() {
        let mut panel = LogsPanel::new();
        panel.sync(10, 3);
        panel.select(9);
        panel.sync(4, 3);
        assert_eq!(panel.selected, Some(3));
    }

    #[test]
    fn source_is_last_target_segment() {
        assert_eq!(source("sheetview::viewer::loader"), "loader");
        assert_eq!(source("axum"), "axum");
    }
}
