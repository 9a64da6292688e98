//! Part list component
//!
//! Every part id in the catalog, in catalog order. Enter or a click picks
//! the part directly without touching the search box.

use super::panel_block;
use crate::tui::app::{App, Focus};
use crate::tui::scroll::ScrollState;
use crate::tui::traits::{Handled, Interactive, Selectable};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{List, ListItem, Paragraph, Wrap},
    Frame,
};

pub struct PartListPanel {
    scroll: ScrollState,
    /// Cursor row (not necessarily the selected part)
    pub selected: Option<usize>,
    item_count: usize,
}

impl PartListPanel {
    pub fn new() -> Self {
        Self {
            scroll: ScrollState::top(),
            selected: None,
            item_count: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.scroll.offset()
    }

    /// Sync with the current part count and viewport (call each frame)
    pub fn sync(&mut self, count: usize, viewport_height: usize) {
        self.item_count = count;
        self.scroll.resize(count, viewport_height);
        if let Some(idx) = self.selected {
            if idx >= count {
                self.selected = count.checked_sub(1);
            }
        }
        if let Some(idx) = self.selected {
            self.scroll.reveal(idx);
        }
    }
}

impl Default for PartListPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Selectable for PartListPanel {
    fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    fn select(&mut self, index: usize) {
        self.selected = Some(index.min(self.item_count.saturating_sub(1)));
        self.scroll.reveal(index);
    }

    fn item_count(&self) -> usize {
        self.item_count
    }
}

impl Interactive for PartListPanel {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Home => self.select_first(),
            KeyCode::End => self.select_last(),
            KeyCode::PageUp => {
                let page = self.scroll.height().max(1);
                if let Some(idx) = self.selected {
                    self.select(idx.saturating_sub(page));
                }
            }
            KeyCode::PageDown => {
                let page = self.scroll.height().max(1);
                let idx = self.selected.map_or(0, |i| i + page);
                if self.item_count > 0 {
                    self.select(idx);
                }
            }
            _ => return Handled::No,
        }
        Handled::Yes
    }

    fn focus_hint(&self) -> Option<&'static str> {
        Some("↑↓:move  Enter:select")
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    let focused = app.focus == Focus::Parts;
    let theme = &app.theme;
    let parts = app.session.parts();
    let title = format!(" Select Part ({}) ", parts.len());
    let block = panel_block(title, focused, theme.panel_parts, theme);

    if parts.is_empty() {
        let text = match app.session.parts_error() {
            Some(_) => "Could not load parts",
            None => "Loading parts...",
        };
        let style = if app.session.parts_error().is_some() {
            Style::default().fg(theme.error)
        } else {
            Style::default().fg(theme.muted)
        };
        let empty = Paragraph::new(text)
            .style(style)
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let height = area.height.saturating_sub(2) as usize;
    app.part_list.sync(app.session.parts().len(), height);

    let panel = &app.part_list;
    let theme = &app.theme;
    let selected_id = app.session.selected_part_id();
    let (start, end) = panel.scroll.window();

    let items: Vec<ListItem> = app.session.parts()[start..end]
        .iter()
        .enumerate()
        .map(|(i, part)| {
            let idx = start + i;
            let is_current = selected_id == Some(part.part_id.as_str());
            let marker = if is_current { "● " } else { "  " };

            let style = if focused && panel.selected == Some(idx) {
                Style::default()
                    .fg(theme.selection_fg)
                    .bg(theme.selection)
                    .add_modifier(Modifier::BOLD)
            } else if is_current {
                Style::default()
                    .fg(theme.panel_parts)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.foreground)
            };
            ListItem::new(format!("{marker}{}", part.part_id)).style(style)
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
    panel.scroll.render_scrollbar(f, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn navigation_stays_in_bounds() {
        let mut panel = PartListPanel::new();
        panel.sync(3, 10);

        assert_eq!(panel.handle_key(key(KeyCode::Down)), Handled::Yes);
        assert_eq!(panel.selected, Some(0));
        panel.handle_key(key(KeyCode::End));
        assert_eq!(panel.selected, Some(2));
        panel.handle_key(key(KeyCode::Char('j')));
        assert_eq!(panel.selected, Some(2));
        panel.handle_key(key(KeyCode::Home));
        panel.handle_key(key(KeyCode::Up));
        assert_eq!(panel.selected, Some(0));

        assert_eq!(panel.handle_key(key(KeyCode::Enter)), Handled::No);
    }

    #[test]
    fn shrinking_list_clamps_cursor() {
        let mut panel = PartListPanel::new();
        panel.sync(10, 4);
        panel.select(9);
        assert_eq!(panel.offset(), 6);

        panel.sync(2, 4);
        assert_eq!(panel.selected, Some(1));
        assert_eq!(panel.offset(), 0);
    }

    #[test]
    fn empty_list_ignores_navigation() {
        let mut panel = PartListPanel::new();
        panel.sync(0, 5);
        panel.handle_key(key(KeyCode::Down));
        panel.handle_key(key(KeyCode::PageDown));
        assert_eq!(panel.selected, None);
    }
}
