// TUI application state
//
// App owns the viewer session and every panel's UI state. Input handlers
// in tui/mod.rs call into App; loader results arrive through apply_event.
// Rendering records panel rectangles in `hit` so mouse events can be routed
// on the next input.

use super::components::logs_panel::LogsPanel;
use super::components::part_list::PartListPanel;
use super::components::pin_table::PinTablePanel;
use super::components::rules_panel::RulesPanel;
use super::components::toast::Toast;
use super::input::{InputHandler, TextInput};
use super::layout::contains;
use super::traits::{Handled, Interactive};
use crate::config::Config;
use crate::events::ViewerEvent;
use crate::logging::LogBuffer;
use crate::theme::Theme;
use crate::viewer::rules::RuleRow;
use crate::viewer::{DataLoader, LoadRequest, PdfPane, SessionChange, SessionState};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use std::time::{Duration, Instant};

/// Braille spinner frames, advanced every tick
const SPINNER: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

/// Panels that can hold keyboard focus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Search,
    Parts,
    Rules,
    Pins,
    Logs,
}

impl Focus {
    pub fn name(&self) -> &'static str {
        match self {
            Focus::Search => "Search",
            Focus::Parts => "Parts",
            Focus::Rules => "Rules",
            Focus::Pins => "Pins",
            Focus::Logs => "Logs",
        }
    }
}

/// Screen rectangles from the last frame, for mouse routing
#[derive(Debug, Clone, Copy, Default)]
pub struct HitAreas {
    pub search: Rect,
    /// Zero-sized while the dropdown is hidden
    pub dropdown: Rect,
    pub parts: Rect,
    /// Area the split ratio is measured against
    pub container: Rect,
    pub divider: Rect,
    pub datasheet: Rect,
    pub rules: Rect,
    pub pins: Rect,
    pub logs: Rect,
}

/// Main application state for the TUI
pub struct App {
    pub session: SessionState,
    loader: DataLoader,

    pub focus: Focus,
    pub search_input: TextInput,
    pub part_list: PartListPanel,
    pub rules_panel: RulesPanel,
    pub pin_table: PinTablePanel,
    pub logs_panel: LogsPanel,

    /// Log buffer for system logs display
    pub log_buffer: LogBuffer,
    pub show_logs: bool,
    pub show_help: bool,
    pub toast: Option<Toast>,
    pub theme: Theme,
    pub hit: HitAreas,

    /// Catalog backend name, for the status bar
    pub backend: &'static str,
    pub demo_mode: bool,

    pub should_quit: bool,
    pub start_time: Instant,
    animation_frame: usize,

    /// Input handler for flexible key behavior
    input_handler: InputHandler,
}

impl App {
    pub fn new(
        loader: DataLoader,
        log_buffer: LogBuffer,
        config: &Config,
        backend: &'static str,
    ) -> Self {
        let mut session = SessionState::new();
        session.subscribe(Box::new(|change: &SessionChange| {
            tracing::trace!(?change, "Session changed");
        }));
        let theme = Theme::by_name(&config.theme);
        tracing::debug!(theme = %theme.name, "Theme loaded");

        Self {
            session,
            loader,
            focus: Focus::Search,
            search_input: TextInput::new(),
            part_list: PartListPanel::new(),
            rules_panel: RulesPanel::new(),
            pin_table: PinTablePanel::new(),
            logs_panel: LogsPanel::new(),
            log_buffer,
            show_logs: false,
            show_help: false,
            toast: None,
            theme,
            hit: HitAreas::default(),
            backend,
            demo_mode: config.demo_mode,
            should_quit: false,
            start_time: Instant::now(),
            animation_frame: 0,
            input_handler: InputHandler::default(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Input plumbing
    // ─────────────────────────────────────────────────────────────────────

    /// Returns true if the key should trigger its action
    pub fn handle_key_press(&mut self, key: KeyCode) -> bool {
        self.input_handler.handle_key_press(key)
    }

    pub fn handle_key_release(&mut self, key: KeyCode) {
        self.input_handler.handle_key_release(key);
    }

    /// Periodic tick: spinner frame and toast expiry
    pub fn tick(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);
        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER[self.animation_frame % SPINNER.len()]
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message));
    }

    /// Get uptime as a formatted string
    pub fn uptime(&self) -> String {
        let elapsed = self.start_time.elapsed().as_secs();
        let hours = elapsed / 3600;
        let minutes = (elapsed % 3600) / 60;
        let secs = elapsed % 60;
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Loader
    // ─────────────────────────────────────────────────────────────────────

    /// Apply a loader result to the session
    pub fn apply_event(&mut self, event: ViewerEvent) {
        let failed = matches!(event, ViewerEvent::PartDataFailed { .. });
        if self.session.apply(event) && failed {
            self.toast = Some(Toast::with_duration(
                "✗ could not load part data",
                Duration::from_secs(4),
            ));
        }
    }

    fn start_load(&mut self, request: Option<LoadRequest>) {
        let Some(request) = request else {
            return;
        };
        self.rules_panel.reset();
        self.pin_table.reset();
        if let Some(index) = self
            .session
            .parts()
            .iter()
            .position(|p| p.part_id == request.part_id)
        {
            self.part_list.selected = Some(index);
        }
        self.loader.spawn(request);
    }

    /// Pick from the full part list; search text is left alone
    pub fn choose_part(&mut self, part_id: &str) {
        let request = self.session.choose_part(part_id);
        self.start_load(request);
    }

    /// Pick the highlighted suggestion, or the first one if none is
    pub fn select_suggestion(&mut self) {
        if !self.session.suggestions_visible() {
            return;
        }
        if self.session.search().highlighted().is_none() {
            self.session.highlight_next();
        }
        let request = self.session.select_highlighted();
        // Picking clears the search even when the part was already selected
        if self.session.search().text().is_empty() {
            self.search_input.clear();
        }
        self.start_load(request);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Focus
    // ─────────────────────────────────────────────────────────────────────

    fn focus_order(&self) -> Vec<Focus> {
        let mut order = vec![Focus::Search, Focus::Parts, Focus::Rules, Focus::Pins];
        if self.show_logs {
            order.push(Focus::Logs);
        }
        order
    }

    pub fn set_focus(&mut self, focus: Focus) {
        if self.focus == focus {
            return;
        }
        if self.focus == Focus::Search {
            self.session.dismiss_search();
        }
        if focus == Focus::Search {
            self.session.refocus_search();
        }
        self.focus = focus;
    }

    pub fn focus_next(&mut self) {
        let order = self.focus_order();
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.set_focus(order[(idx + 1) % order.len()]);
    }

    pub fn focus_prev(&mut self) {
        let order = self.focus_order();
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.set_focus(order[(idx + order.len() - 1) % order.len()]);
    }

    pub fn toggle_logs(&mut self) {
        self.show_logs = !self.show_logs;
        if !self.show_logs && self.focus == Focus::Logs {
            self.set_focus(Focus::Parts);
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Search box editing
    // ─────────────────────────────────────────────────────────────────────

    /// Apply an edit to the search box and push the text to the session
    pub fn edit_search(&mut self, edit: impl FnOnce(&mut TextInput)) {
        let before = self.search_input.text.clone();
        edit(&mut self.search_input);
        if self.search_input.text != before {
            self.session.set_search_text(self.search_input.text.clone());
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Panel actions
    // ─────────────────────────────────────────────────────────────────────

    /// Route a key to the focused panel
    pub fn dispatch_to_focused(&mut self, key: KeyEvent) -> Handled {
        match self.focus {
            Focus::Search => Handled::No,
            Focus::Parts => self.part_list.handle_key(key),
            Focus::Rules => self.rules_panel.handle_key(key),
            Focus::Pins => self.pin_table.handle_key(key),
            Focus::Logs => self.logs_panel.handle_key(key),
        }
    }

    /// Enter/Space on the focused panel
    pub fn activate_focused(&mut self) {
        match self.focus {
            Focus::Search => self.select_suggestion(),
            Focus::Parts => {
                let part_id = self
                    .part_list
                    .selected
                    .and_then(|i| self.session.parts().get(i))
                    .map(|p| p.part_id.clone());
                if let Some(part_id) = part_id {
                    self.choose_part(&part_id);
                }
            }
            Focus::Rules => match self.rules_panel.selected {
                Some(row) => self.activate_rule_row(row),
                None if self.session.rules_collapse().panel_collapsed() => {
                    self.session.toggle_rules_panel()
                }
                None => {}
            },
            Focus::Pins => self.session.toggle_pins(),
            Focus::Logs => {}
        }
    }

    /// Toggle the category on a rules panel row, if it is a header
    fn activate_rule_row(&mut self, row: usize) {
        let category = match self.session.visible_rule_rows().get(row) {
            Some(RuleRow::Category { name, .. }) => Some(name.to_string()),
            _ => None,
        };
        if let Some(category) = category {
            self.session.toggle_category(&category);
        }
    }

    /// Open the signed datasheet URL in the system viewer
    pub fn open_datasheet(&mut self) {
        let PdfPane::Ready(url) = self.session.pdf_pane() else {
            self.show_toast("No datasheet link yet");
            return;
        };
        match open::that_detached(url) {
            Ok(()) => self.show_toast("✓ Opened datasheet"),
            Err(e) => {
                tracing::warn!("Failed to open datasheet: {}", e);
                self.show_toast("✗ Failed to open datasheet");
            }
        }
    }

    /// Copy the signed datasheet URL
    pub fn copy_datasheet_url(&mut self) {
        let PdfPane::Ready(url) = self.session.pdf_pane() else {
            self.show_toast("No datasheet link yet");
            return;
        };
        let url = url.to_string();
        self.copy_with_toast(&url, "link");
    }

    /// Copy the selected log line
    pub fn copy_log_entry(&mut self) {
        let entries = self.log_buffer.get_all();
        let Some(text) = self.logs_panel.selected_entry_text(&entries) else {
            return;
        };
        self.copy_with_toast(&text, "log line");
    }

    /// A fresh clipboard handle per copy; headless sessions have none
    fn copy_with_toast(&mut self, text: &str, what: &str) {
        let copied = arboard::Clipboard::new().and_then(|mut board| board.set_text(text));
        match copied {
            Ok(()) => self.show_toast(format!("✓ Copied {what}")),
            Err(e) => {
                tracing::warn!("Clipboard unavailable: {}", e);
                self.show_toast("✗ Failed to copy");
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mouse
    // ─────────────────────────────────────────────────────────────────────

    /// Left button pressed at (column, row)
    pub fn mouse_down(&mut self, column: u16, row: u16) {
        let hit = self.hit;

        // The dropdown overlays the body, so it is tested first
        if contains(hit.dropdown, column, row) {
            // row 0 is the dropdown's top border
            if let Some(index) = row.checked_sub(hit.dropdown.y + 1) {
                if self.session.highlight(index as usize) {
                    self.select_suggestion();
                }
            }
            return;
        }

        if contains(hit.search, column, row) {
            self.set_focus(Focus::Search);
            return;
        }

        // Anywhere outside the search widget closes the suggestions
        self.session.dismiss_search();

        if contains(hit.divider, column, row) {
            self.session.begin_drag();
            return;
        }

        if contains(hit.parts, column, row) {
            self.set_focus(Focus::Parts);
            if let Some(index) = list_row(hit.parts, row, self.part_list.offset()) {
                if index < self.session.parts().len() {
                    self.part_list.selected = Some(index);
                    self.activate_focused();
                }
            }
        } else if contains(hit.rules, column, row) {
            self.set_focus(Focus::Rules);
            if row == hit.rules.y {
                self.session.toggle_rules_panel();
            } else if let Some(index) = list_row(hit.rules, row, self.rules_panel.offset()) {
                if index < self.session.visible_rule_rows().len() {
                    self.rules_panel.selected = Some(index);
                    self.activate_rule_row(index);
                }
            }
        } else if contains(hit.pins, column, row) {
            self.set_focus(Focus::Pins);
            if row == hit.pins.y {
                self.session.toggle_pins();
            }
        } else if contains(hit.datasheet, column, row) {
            if matches!(self.session.pdf_pane(), PdfPane::Ready(_)) {
                self.open_datasheet();
            }
        } else if contains(hit.logs, column, row) {
            self.set_focus(Focus::Logs);
        }
    }

    /// Pointer moved with the button held (or any motion while dragging)
    pub fn mouse_drag(&mut self, column: u16) {
        if !self.session.is_dragging() {
            return;
        }
        let container = self.hit.container;
        self.session.drag_to(
            column as f64,
            container.x as f64,
            container.width as f64,
        );
    }

    /// Button released anywhere
    pub fn mouse_up(&mut self) {
        self.session.end_drag();
    }
}

/// Item index under `row` for a bordered list starting at `area.y`
fn list_row(area: Rect, row: u16, offset: usize) -> Option<usize> {
    let inner = row.checked_sub(area.y + 1)?;
    if inner >= area.height.saturating_sub(2) {
        return None;
    }
    Some(inner as usize + offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::memory::MemoryCatalog;
    use crate::catalog::{Part, PartRepository, PartSummary, Rule};
    use crate::presign::SignedUrlProvider;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    struct EchoUrls;

    #[async_trait]
    impl SignedUrlProvider for EchoUrls {
        async fn signed_url(&self, file_path: &str) -> anyhow::Result<String> {
            Ok(format!("https://signed/{file_path}"))
        }
    }

    fn app() -> (App, mpsc::Receiver<ViewerEvent>) {
        let mut lm317 = Part::new("LM317");
        lm317.file_path = Some("ds/lm317.pdf".into());
        let repo: Arc<dyn PartRepository> = Arc::new(
            MemoryCatalog::new()
                .with_part(
                    lm317,
                    "c1",
                    vec![
                        Rule::new(Some("Power"), Some("ESSENTIAL"), "Input cap"),
                        Rule::new(Some("Layout"), None, "Short loop"),
                    ],
                )
                .with_part(Part::new("LM358"), "c2", vec![]),
        );
        let (tx, rx) = mpsc::channel(16);
        let loader = DataLoader::new(repo, Arc::new(EchoUrls), tx);
        let app = App::new(loader, LogBuffer::new(), &Config::default(), "memory");
        (app, rx)
    }

    fn with_parts(app: &mut App) {
        app.apply_event(ViewerEvent::PartsListed {
            parts: vec![PartSummary::new("LM317"), PartSummary::new("LM358")],
        });
    }

    async fn drain(app: &mut App, rx: &mut mpsc::Receiver<ViewerEvent>, count: usize) {
        for _ in 0..count {
            let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
                .await
                .unwrap()
                .unwrap();
            app.apply_event(event);
        }
    }

    #[tokio::test]
    async fn typing_then_enter_loads_first_suggestion() {
        let (mut app, mut rx) = app();
        with_parts(&mut app);

        app.edit_search(|input| input.insert_char('l'));
        assert!(!app.session.suggestions_visible());
        app.edit_search(|input| input.insert_char('m'));
        assert!(app.session.suggestions_visible());

        app.activate_focused();
        assert_eq!(app.session.selected_part_id(), Some("LM317"));
        assert_eq!(app.search_input.text, "");
        assert_eq!(app.part_list.selected, Some(0));

        drain(&mut app, &mut rx, 2).await;
        assert_eq!(app.session.rules().len(), 2);
        assert_eq!(
            app.session.pdf_pane(),
            PdfPane::Ready("https://signed/ds/lm317.pdf")
        );
    }

    #[tokio::test]
    async fn cursor_moves_do_not_reset_highlight() {
        let (mut app, _rx) = app();
        with_parts(&mut app);
        app.edit_search(|input| input.set("LM"));
        app.session.highlight_next();
        app.session.highlight_next();

        app.edit_search(|input| input.move_left());
        assert_eq!(app.session.search().highlighted(), Some(1));
    }

    #[tokio::test]
    async fn leaving_search_dismisses_and_returning_reopens() {
        let (mut app, _rx) = app();
        with_parts(&mut app);
        app.edit_search(|input| input.set("LM"));
        assert!(app.session.suggestions_visible());

        app.focus_next();
        assert_eq!(app.focus, Focus::Parts);
        assert!(!app.session.suggestions_visible());

        app.focus_prev();
        assert_eq!(app.focus, Focus::Search);
        assert!(app.session.suggestions_visible());
    }

    #[tokio::test]
    async fn logs_join_focus_cycle_only_when_shown() {
        let (mut app, _rx) = app();
        app.set_focus(Focus::Pins);
        app.focus_next();
        assert_eq!(app.focus, Focus::Search);

        app.toggle_logs();
        app.set_focus(Focus::Pins);
        app.focus_next();
        assert_eq!(app.focus, Focus::Logs);

        app.toggle_logs();
        assert_eq!(app.focus, Focus::Parts);
    }

    #[tokio::test]
    async fn divider_drag_updates_ratio() {
        let (mut app, _rx) = app();
        app.hit.container = Rect::new(20, 3, 100, 30);
        app.hit.divider = Rect::new(70, 3, 1, 30);

        // motion without a drag is ignored
        app.mouse_drag(50);
        assert_eq!(app.session.split_ratio(), 50.0);

        app.mouse_down(70, 10);
        assert!(app.session.is_dragging());
        app.mouse_drag(60);
        assert_eq!(app.session.split_ratio(), 40.0);
        app.mouse_drag(21);
        assert_eq!(app.session.split_ratio(), 20.0);

        app.mouse_up();
        assert!(!app.session.is_dragging());
        app.mouse_drag(100);
        assert_eq!(app.session.split_ratio(), 20.0);
    }

    #[tokio::test]
    async fn click_outside_search_dismisses_suggestions() {
        let (mut app, _rx) = app();
        with_parts(&mut app);
        app.hit.search = Rect::new(0, 0, 40, 3);
        app.hit.dropdown = Rect::new(0, 3, 40, 4);
        app.edit_search(|input| input.set("LM"));

        // inside the search box keeps it open
        app.mouse_down(5, 1);
        assert!(app.session.suggestions_visible());

        app.mouse_down(60, 20);
        assert!(!app.session.suggestions_visible());
        assert_eq!(app.search_input.text, "LM");
        assert!(app.session.selected_part_id().is_none());
    }

    #[tokio::test]
    async fn click_on_suggestion_selects_it() {
        let (mut app, mut rx) = app();
        with_parts(&mut app);
        app.hit.dropdown = Rect::new(0, 3, 40, 4);
        app.edit_search(|input| input.set("lm"));

        // second suggestion row sits below the border and the first row
        app.mouse_down(3, 5);
        assert_eq!(app.session.selected_part_id(), Some("LM358"));

        drain(&mut app, &mut rx, 1).await;
        assert_eq!(app.session.pdf_pane(), PdfPane::FileNotFound);
    }

    #[tokio::test]
    async fn divider_click_also_dismisses_suggestions() {
        let (mut app, _rx) = app();
        with_parts(&mut app);
        app.hit.search = Rect::new(0, 0, 40, 3);
        app.hit.divider = Rect::new(60, 6, 1, 20);
        app.edit_search(|input| input.set("LM"));

        app.mouse_down(60, 10);
        assert!(!app.session.suggestions_visible());
        assert!(app.session.is_dragging());
    }

    #[tokio::test]
    async fn suggestion_over_divider_selects_instead_of_dragging() {
        let (mut app, _rx) = app();
        with_parts(&mut app);
        app.hit.dropdown = Rect::new(0, 6, 48, 4);
        app.hit.divider = Rect::new(40, 6, 1, 20);
        app.edit_search(|input| input.set("LM"));

        app.mouse_down(40, 7);
        assert_eq!(app.session.selected_part_id(), Some("LM317"));
        assert!(!app.session.is_dragging());
    }

    #[tokio::test]
    async fn click_below_last_suggestion_selects_nothing() {
        let (mut app, _rx) = app();
        with_parts(&mut app);
        app.hit.dropdown = Rect::new(0, 6, 48, 4);
        app.edit_search(|input| input.set("LM"));

        // bottom border: index 2 with only two suggestions
        app.mouse_down(3, 9);
        assert!(app.session.selected_part_id().is_none());
        assert!(app.session.suggestions_visible());
        assert_eq!(app.session.search().highlighted(), None);
    }

    #[tokio::test]
    async fn rule_header_row_toggles_category() {
        let (mut app, mut rx) = app();
        with_parts(&mut app);
        app.choose_part("LM317");
        drain(&mut app, &mut rx, 2).await;

        app.set_focus(Focus::Rules);
        app.rules_panel.selected = Some(0);
        app.activate_focused();
        assert!(app.session.rules_collapse().is_collapsed("Power"));

        // rows are now [Power (collapsed), Layout, Short loop]; rule rows are not toggles
        app.rules_panel.selected = Some(2);
        app.activate_focused();
        assert!(!app.session.rules_collapse().is_collapsed("Layout"));
    }

    #[tokio::test]
    async fn failed_load_raises_notice() {
        let (mut app, mut rx) = app();
        app.choose_part("MISSING");
        drain(&mut app, &mut rx, 1).await;

        assert!(app.session.load_error().is_some());
        assert_eq!(
            app.toast.as_ref().map(|t| t.message.as_str()),
            Some("✗ could not load part data")
        );
    }

    #[test]
    fn list_row_skips_borders() {
        let area = Rect::new(0, 4, 20, 6);
        assert_eq!(list_row(area, 4, 0), None);
        assert_eq!(list_row(area, 5, 0), Some(0));
        assert_eq!(list_row(area, 8, 3), Some(6));
        assert_eq!(list_row(area, 9, 0), None);
    }
}
