// Components module - the panels and overlays of the viewer screen
//
// - Title bar: app name, selected part, loading spinner
// - Search box: query input and suggestion dropdown
// - Part list: every catalog part, pick to select
// - Datasheet pane: link status and part details
// - Rules panel: collapsible rule groups
// - Pin table: collapsible pin listing
// - Status bar, logs panel, toast, help overlay
//
// Stateful panels own their scroll/selection; rendering reads the session.

pub mod datasheet_pane;
pub mod help;
pub mod logs_panel;
pub mod part_list;
pub mod pin_table;
pub mod rules_panel;
pub mod search_box;
pub mod status_bar;
pub mod title_bar;
pub mod toast;

use crate::theme::Theme;
use ratatui::{
    style::{Color, Style},
    widgets::{Block, Borders},
};

/// Bordered panel block; the border takes the panel's accent when focused
pub fn panel_block(title: String, focused: bool, accent: Color, theme: &Theme) -> Block<'static> {
    let border_color = if focused { accent } else { theme.border };
    Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(border_color))
        .title(title)
}
