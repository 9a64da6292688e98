// UI rendering logic
//
// Lays out the frame top to bottom: title bar, search box, body, optional
// logs, status bar. The body holds the part list and the split container
// (datasheet pane | divider | rules over pins). Every panel rectangle is
// recorded in `app.hit` for mouse routing. Overlays are drawn last.

use super::app::App;
use super::components::{
    datasheet_pane, help, logs_panel, part_list, pin_table, rules_panel, search_box, status_bar,
    title_bar,
};
use super::layout::{part_list_width, split_columns, Breakpoint};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

/// Height of the logs panel when shown
const LOGS_HEIGHT: u16 = 8;

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &mut App) {
    let logs_height = if app.show_logs { LOGS_HEIGHT } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),           // Title bar
            Constraint::Length(3),           // Search box
            Constraint::Min(6),              // Body
            Constraint::Length(logs_height), // System logs
            Constraint::Length(2),           // Status bar
        ])
        .split(f.area());

    title_bar::render(f, chunks[0], app);
    search_box::render(f, chunks[1], app);
    render_body(f, chunks[2], app);

    if app.show_logs {
        app.hit.logs = chunks[3];
        logs_panel::render(f, chunks[3], app);
    } else {
        app.hit.logs = Rect::default();
    }

    status_bar::render(f, chunks[4], app);

    // Overlays
    search_box::render_dropdown(f, chunks[1], app);
    if let Some(toast) = &app.toast {
        toast.render(f, f.area(), &app.theme);
    }
    if app.show_help {
        help::render(f, app);
    }
}

fn render_body(f: &mut Frame, area: Rect, app: &mut App) {
    let list_width = part_list_width(Breakpoint::from_width(area.width));
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(list_width), Constraint::Min(0)])
        .split(area);

    if list_width > 0 {
        app.hit.parts = columns[0];
        part_list::render(f, columns[0], app);
    } else {
        app.hit.parts = Rect::default();
    }

    let container = columns[1];
    let split = split_columns(container, app.session.split_ratio());
    app.hit.container = container;
    app.hit.divider = split.divider;
    app.hit.datasheet = split.left;

    datasheet_pane::render(f, split.left, app);
    render_divider(f, split.divider, app);
    render_side_panels(f, split.right, app);
}

fn render_divider(f: &mut Frame, area: Rect, app: &App) {
    let color = if app.session.is_dragging() {
        app.theme.highlight
    } else {
        app.theme.border
    };
    let divider = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(color));
    f.render_widget(divider, area);
}

/// Rules panel above the pin table; a folded panel shrinks to its title
fn render_side_panels(f: &mut Frame, area: Rect, app: &mut App) {
    let rules_folded = app.session.rules_collapse().panel_collapsed();
    let pins_folded = app.session.pins_collapsed();

    let constraints = match (rules_folded, pins_folded) {
        (false, false) => [Constraint::Percentage(55), Constraint::Min(3)],
        (true, false) => [Constraint::Length(3), Constraint::Min(3)],
        (false, true) => [Constraint::Min(3), Constraint::Length(3)],
        (true, true) => [Constraint::Length(3), Constraint::Length(3)],
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    app.hit.rules = rows[0];
    app.hit.pins = rows[1];
    rules_panel::render(f, rows[0], app);
    pin_table::render(f, rows[1], app);
}
