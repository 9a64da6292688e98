//! Rules panel component
//!
//! Design rules grouped by category. The panel's top border toggles the
//! whole panel; category header rows toggle their group.

use super::panel_block;
use crate::theme::Theme;
use crate::tui::app::{App, Focus};
use crate::tui::scroll::ScrollState;
use crate::tui::traits::{Handled, Interactive, Selectable};
use crate::util::truncate_to_width;
use crate::viewer::rules::{RuleRow, Severity};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

pub struct RulesPanel {
    scroll: ScrollState,
    pub selected: Option<usize>,
    row_count: usize,
}

impl RulesPanel {
    pub fn new() -> Self {
        Self {
            scroll: ScrollState::top(),
            selected: None,
            row_count: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.scroll.offset()
    }

    /// Forget cursor and scroll (new part selected)
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn sync(&mut self, rows: usize, viewport_height: usize) {
        self.row_count = rows;
        self.scroll.resize(rows, viewport_height);
        if let Some(idx) = self.selected {
            if idx >= rows {
                self.selected = rows.checked_sub(1);
            }
        }
        if let Some(idx) = self.selected {
            self.scroll.reveal(idx);
        }
    }
}

impl Default for RulesPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Selectable for RulesPanel {
    fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    fn select(&mut self, index: usize) {
        self.selected = Some(index.min(self.row_count.saturating_sub(1)));
        self.scroll.reveal(index);
    }

    fn item_count(&self) -> usize {
        self.row_count
    }
}

impl Interactive for RulesPanel {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Home => self.select_first(),
            KeyCode::End => self.select_last(),
            KeyCode::PageUp => self.scroll.page(-1),
            KeyCode::PageDown => self.scroll.page(1),
            _ => return Handled::No,
        }
        Handled::Yes
    }

    fn focus_hint(&self) -> Option<&'static str> {
        Some("↑↓:move  Enter:fold group  c:fold panel")
    }
}

fn severity_style(severity: Severity, theme: &Theme) -> Style {
    match severity {
        Severity::Essential => Style::default().fg(theme.essential),
        Severity::Recommended => Style::default().fg(theme.recommended),
        Severity::Unranked => Style::default().fg(theme.unranked),
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    let focused = app.focus == Focus::Rules;
    let collapsed = app.session.rules_collapse().panel_collapsed();
    let arrow = if collapsed { "▸" } else { "▾" };
    let title = format!(" {arrow} Design Rules ({}) ", app.session.rules().len());
    let block = panel_block(title, focused, app.theme.panel_rules, &app.theme);

    if collapsed || app.session.rules().is_empty() {
        let text = if collapsed {
            "Collapsed (c or click the title to expand)"
        } else if app.session.is_loading() {
            "Loading rules..."
        } else if app.session.part().is_some() {
            "No rules for this part"
        } else {
            ""
        };
        let empty = Paragraph::new(text)
            .style(Style::default().fg(app.theme.muted))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let height = area.height.saturating_sub(2) as usize;
    let row_count = app.session.visible_rule_rows().len();
    app.rules_panel.sync(row_count, height);

    let theme = &app.theme;
    let panel = &app.rules_panel;
    let rows = app.session.visible_rule_rows();
    let (start, end) = panel.scroll.window();
    let content_width = area.width.saturating_sub(3) as usize;

    let items: Vec<ListItem> = rows[start..end]
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let (text, style) = match row {
                RuleRow::Category {
                    name,
                    count,
                    collapsed,
                } => {
                    let arrow = if *collapsed { "▸" } else { "▾" };
                    (
                        format!("{arrow} {name} ({count})"),
                        Style::default()
                            .fg(theme.title)
                            .add_modifier(Modifier::BOLD),
                    )
                }
                RuleRow::Rule(rule) => {
                    let severity = Severity::from_level(rule.level.as_deref());
                    (
                        format!("  {} {}", severity.icon(), rule.content),
                        severity_style(severity, theme),
                    )
                }
            };

            let style = if focused && panel.selected == Some(start + i) {
                Style::default()
                    .fg(theme.selection_fg)
                    .bg(theme.selection)
                    .add_modifier(Modifier::BOLD)
            } else {
                style
            };
            ListItem::new(truncate_to_width(&text, content_width)).style(style)
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
    panel.scroll.render_scrollbar(f, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn reset_forgets_cursor() {
        let mut panel = RulesPanel::new();
        panel.sync(8, 3);
        panel.handle_key(KeyEvent::new(KeyCode::End, KeyModifiers::NONE));
        assert_eq!(panel.selected, Some(7));
        assert_eq!(panel.offset(), 5);

        panel.reset();
        assert_eq!(panel.selected, None);
        assert_eq!(panel.offset(), 0);
    }

    #[test]
    fn collapsing_rows_clamps_cursor() {
        let mut panel = RulesPanel::new();
        panel.sync(6, 10);
        panel.select(5);
        panel.sync(2, 10);
        assert_eq!(panel.selected, Some(1));
    }
}
