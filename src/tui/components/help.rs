//! Help overlay listing the key bindings

use crate::tui::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const BINDINGS: &[(&str, &str)] = &[
    ("Tab / Shift+Tab", "cycle focus"),
    ("/", "jump to search"),
    ("↑ ↓  j k", "move"),
    ("Enter / Space", "select part, fold group"),
    ("Esc", "close suggestions"),
    ("c", "fold rules panel"),
    ("[  ]", "move divider"),
    ("=", "reset divider"),
    ("drag divider", "resize panes"),
    ("o", "open datasheet"),
    ("y", "copy datasheet link"),
    ("L", "toggle logs"),
    ("q / Ctrl+C", "quit"),
];

pub fn render(f: &mut Frame, app: &App) {
    let screen = f.area();
    let width = 46.min(screen.width);
    let height = (BINDINGS.len() as u16 + 4).min(screen.height);
    let area = Rect::new(
        screen.x + (screen.width - width) / 2,
        screen.y + (screen.height - height) / 2,
        width,
        height,
    );

    let theme = &app.theme;
    let mut lines = vec![Line::default()];
    lines.extend(BINDINGS.iter().map(|(key, action)| {
        Line::from(vec![
            Span::styled(
                format!("{key:>16}  "),
                Style::default()
                    .fg(theme.highlight)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(*action, Style::default().fg(theme.foreground)),
        ])
    }));

    let help = Paragraph::new(lines).alignment(Alignment::Left).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.highlight))
            .title(" Keys (any key to close) ")
            .style(Style::default().bg(theme.background)),
    );

    f.render_widget(Clear, area);
    f.render_widget(help, area);
}
