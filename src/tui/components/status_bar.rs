// Status bar component
//
// Renders load statistics at the bottom plus the focused panel's key hints.

use crate::tui::app::{App, Focus};
use crate::tui::layout::Breakpoint;
use crate::tui::traits::Interactive;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const SEARCH_HINT: &str = "type:filter  ↑↓:pick  Enter:select  Esc:close";

fn focus_hint(app: &App) -> Option<&'static str> {
    match app.focus {
        Focus::Search => Some(SEARCH_HINT),
        Focus::Parts => app.part_list.focus_hint(),
        Focus::Rules => app.rules_panel.focus_hint(),
        Focus::Pins => app.pin_table.focus_hint(),
        Focus::Logs => app.logs_panel.focus_hint(),
    }
}

/// Render the status bar with session statistics
///
/// Adapts to terminal width:
/// - Wide: Full format with labels and key hints
/// - Narrow: Compact icon-based format
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let stats = app.session.stats();
    let bp = Breakpoint::from_width(area.width);
    let parts = app.session.parts().len();

    let status_text = if !bp.at_least(Breakpoint::Wide) {
        format!(
            " {} │ 📦 {} │ 📄 {} │ 🔗 {} │ ~{}ms │ ?:help",
            app.uptime(),
            parts,
            stats.part_loads,
            stats.url_fetches,
            stats.avg_load_time().as_millis(),
        )
    } else {
        let loads_info = if stats.failed_part_loads > 0 {
            format!("📄 {} ✗ {}", stats.part_loads, stats.failed_part_loads)
        } else {
            format!("📄 {}", stats.part_loads)
        };
        let urls_info = if stats.failed_url_fetches > 0 {
            format!("🔗 {} ✗ {}", stats.url_fetches, stats.failed_url_fetches)
        } else {
            format!("🔗 {}", stats.url_fetches)
        };
        let stale_info = if stats.stale_discarded > 0 {
            format!(" │ ⏭ {} stale", stats.stale_discarded)
        } else {
            String::new()
        };
        let mode = if app.demo_mode { " (demo)" } else { "" };

        format!(
            " {} │ {}{} │ 📦 {} parts │ {} │ {} │ ~{}ms{} │ {} │ {}",
            app.uptime(),
            app.backend,
            mode,
            parts,
            loads_info,
            urls_info,
            stats.avg_load_time().as_millis(),
            stale_info,
            app.focus.name(),
            focus_hint(app).unwrap_or("?:help"),
        )
    };

    let status = Paragraph::new(status_text)
        .style(Style::default().fg(app.theme.status_bar))
        .block(Block::default().borders(Borders::TOP));

    f.render_widget(status, area);
}
