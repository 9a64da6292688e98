//! Observable viewer session
//!
//! `SessionState` is the single owner of everything the screen shows. All
//! mutation goes through its methods, and every change is announced to
//! subscribed observers synchronously, before the method returns.
//!
//! Selecting a part resets all dependent state, bumps the selection token
//! and returns a [`LoadRequest`] for the loader. Loader results come back
//! through [`SessionState::apply`], which drops anything carrying an old
//! token.

use super::pins::PinTable;
use super::rules::{group_rules, visible_rows, RuleGroup, RuleRow, RulesCollapse};
use super::search::SearchState;
use super::split::SplitPane;
use crate::catalog::{Part, PartSummary, Rule};
use crate::events::{LoadStats, SelectionToken, ViewerEvent};

/// Work order for the data loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub token: SelectionToken,
    pub part_id: String,
}

/// What the datasheet pane shows, in priority order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfPane<'a> {
    /// Signed URL being fetched
    Loading,
    Ready(&'a str),
    /// Part has a storage path but no URL came back
    FailedToLoad,
    /// Part record has no storage path
    FileNotFound,
    /// No part data (nothing selected, still loading, or load failed)
    NoSelection,
}

impl PdfPane<'_> {
    pub fn message(&self) -> &'static str {
        match self {
            PdfPane::Loading => "Loading datasheet...",
            PdfPane::Ready(_) => "Datasheet ready",
            PdfPane::FailedToLoad => "Failed to load datasheet",
            PdfPane::FileNotFound => "Datasheet file not found!",
            PdfPane::NoSelection => "Select a part to view datasheet",
        }
    }
}

/// Notification sent to observers after each mutation
#[derive(Debug, Clone, PartialEq)]
pub enum SessionChange {
    PartsListed { count: usize },
    PartsListFailed { message: String },
    SearchChanged,
    SelectionChanged {
        part_id: String,
        token: SelectionToken,
    },
    PartDataLoaded { part_id: String, rules: usize },
    PartDataFailed { message: String },
    PdfUrlReady,
    PdfUrlFailed { message: String },
    SplitChanged { ratio: f64 },
    DragChanged { dragging: bool },
    CollapseChanged,
}

pub type Observer = Box<dyn FnMut(&SessionChange) + Send>;

#[derive(Default)]
pub struct SessionState {
    parts: Vec<PartSummary>,
    parts_error: Option<String>,
    search: SearchState,
    split: SplitPane,

    selected: Option<String>,
    token: SelectionToken,
    part_loading: bool,
    pdf_loading: bool,
    part: Option<Part>,
    rules: Vec<Rule>,
    pin_table: Option<PinTable>,
    pdf_url: Option<String>,
    load_error: Option<String>,
    pdf_error: Option<String>,

    rules_collapse: RulesCollapse,
    pins_collapsed: bool,

    stats: LoadStats,
    observers: Vec<Observer>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer; it sees every later change
    pub fn subscribe(&mut self, observer: Observer) {
        self.observers.push(observer);
    }

    fn notify(&mut self, change: SessionChange) {
        for observer in &mut self.observers {
            observer(&change);
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────

    pub fn parts(&self) -> &[PartSummary] {
        &self.parts
    }

    pub fn parts_error(&self) -> Option<&str> {
        self.parts_error.as_deref()
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search.set_text(text);
        self.notify(SessionChange::SearchChanged);
    }

    pub fn dismiss_search(&mut self) {
        if self.search.is_open() {
            self.search.dismiss();
            self.notify(SessionChange::SearchChanged);
        }
    }

    pub fn refocus_search(&mut self) {
        self.search.refocus();
        self.notify(SessionChange::SearchChanged);
    }

    pub fn suggestions(&self) -> Vec<&PartSummary> {
        self.search.suggestions(&self.parts)
    }

    pub fn suggestions_visible(&self) -> bool {
        self.search.suggestions_visible(&self.parts)
    }

    pub fn highlight_next(&mut self) {
        self.search.highlight_next(&self.parts);
        self.notify(SessionChange::SearchChanged);
    }

    pub fn highlight_prev(&mut self) {
        self.search.highlight_prev(&self.parts);
        self.notify(SessionChange::SearchChanged);
    }

    pub fn highlight(&mut self, index: usize) -> bool {
        let accepted = self.search.highlight(index, &self.parts);
        if accepted {
            self.notify(SessionChange::SearchChanged);
        }
        accepted
    }

    // ─────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────

    /// Pick a part from the suggestions: clears the search, then selects
    pub fn select_part(&mut self, part_id: &str) -> Option<LoadRequest> {
        self.search.clear();
        self.notify(SessionChange::SearchChanged);
        self.begin_selection(part_id)
    }

    /// Pick the highlighted suggestion (Enter)
    pub fn select_highlighted(&mut self) -> Option<LoadRequest> {
        let part_id = self.search.highlighted_part(&self.parts)?.part_id.clone();
        self.select_part(&part_id)
    }

    /// Pick a part from the full list; the search box is left alone
    pub fn choose_part(&mut self, part_id: &str) -> Option<LoadRequest> {
        self.begin_selection(part_id)
    }

    fn begin_selection(&mut self, part_id: &str) -> Option<LoadRequest> {
        if part_id.is_empty() || self.selected.as_deref() == Some(part_id) {
            return None;
        }

        self.token += 1;
        self.selected = Some(part_id.to_string());
        self.part_loading = true;
        self.pdf_loading = false;
        self.part = None;
        self.rules.clear();
        self.pin_table = None;
        self.pdf_url = None;
        self.load_error = None;
        self.pdf_error = None;
        self.rules_collapse = RulesCollapse::default();
        self.pins_collapsed = false;

        tracing::debug!(part_id = %part_id, token = self.token, "Part selected");
        self.notify(SessionChange::SelectionChanged {
            part_id: part_id.to_string(),
            token: self.token,
        });

        Some(LoadRequest {
            token: self.token,
            part_id: part_id.to_string(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Loader results
    // ─────────────────────────────────────────────────────────────────────

    /// Apply a loader event; returns false when it was stale and dropped
    pub fn apply(&mut self, event: ViewerEvent) -> bool {
        if let Some(token) = event.token() {
            if token != self.token {
                tracing::debug!(
                    event = event.kind(),
                    token,
                    current = self.token,
                    "Discarding stale load result"
                );
                self.stats.stale_discarded += 1;
                return false;
            }
        }

        match event {
            ViewerEvent::PartsListed { parts } => {
                tracing::info!("Loaded {} parts", parts.len());
                self.parts = parts;
                self.parts_error = None;
                let count = self.parts.len();
                self.notify(SessionChange::PartsListed { count });
            }
            ViewerEvent::PartsListFailed { message } => {
                tracing::error!("Error fetching parts: {}", message);
                self.parts_error = Some(message.clone());
                self.notify(SessionChange::PartsListFailed { message });
            }
            ViewerEvent::PartDataLoaded {
                part, rules, elapsed, ..
            } => {
                let pins = PinTable::parse(part.pin_table.as_ref());
                if let PinTable::Error(e) = &pins {
                    tracing::warn!("Error parsing pin data for {}: {}", part.part_id, e);
                }

                self.part_loading = false;
                self.pdf_loading = part.storage_path().is_some();
                self.stats.part_loads += 1;
                self.stats.total_load_time += elapsed;

                let change = SessionChange::PartDataLoaded {
                    part_id: part.part_id.clone(),
                    rules: rules.len(),
                };
                self.pin_table = Some(pins);
                self.part = Some(part);
                self.rules = rules;
                self.notify(change);
            }
            ViewerEvent::PartDataFailed { message, .. } => {
                tracing::error!("Error fetching data: {}", message);
                self.part_loading = false;
                self.stats.failed_part_loads += 1;
                self.load_error = Some(message.clone());
                self.notify(SessionChange::PartDataFailed { message });
            }
            ViewerEvent::PdfUrlReady { url, .. } => {
                self.pdf_loading = false;
                self.stats.url_fetches += 1;
                self.pdf_url = Some(url);
                self.notify(SessionChange::PdfUrlReady);
            }
            ViewerEvent::PdfUrlFailed { message, .. } => {
                tracing::error!("Error getting presigned URL: {}", message);
                self.pdf_loading = false;
                self.stats.url_fetches += 1;
                self.stats.failed_url_fetches += 1;
                self.pdf_error = Some(message.clone());
                self.notify(SessionChange::PdfUrlFailed { message });
            }
        }
        true
    }

    // ─────────────────────────────────────────────────────────────────────
    // Layout
    // ─────────────────────────────────────────────────────────────────────

    pub fn split_ratio(&self) -> f64 {
        self.split.ratio()
    }

    pub fn is_dragging(&self) -> bool {
        self.split.is_dragging()
    }

    pub fn begin_drag(&mut self) {
        self.split.begin_drag();
        self.notify(SessionChange::DragChanged { dragging: true });
    }

    pub fn drag_to(&mut self, pointer_x: f64, container_left: f64, container_width: f64) {
        if self.split.drag_to(pointer_x, container_left, container_width) {
            let ratio = self.split.ratio();
            self.notify(SessionChange::SplitChanged { ratio });
        }
    }

    pub fn end_drag(&mut self) {
        if self.split.is_dragging() {
            self.split.end_drag();
            self.notify(SessionChange::DragChanged { dragging: false });
        }
    }

    pub fn nudge_split(&mut self, delta: f64) {
        if self.split.nudge(delta) {
            let ratio = self.split.ratio();
            self.notify(SessionChange::SplitChanged { ratio });
        }
    }

    /// Back to the default even split
    pub fn reset_split(&mut self) {
        self.split.reset();
        let ratio = self.split.ratio();
        self.notify(SessionChange::SplitChanged { ratio });
    }

    // ─────────────────────────────────────────────────────────────────────
    // Collapse state
    // ─────────────────────────────────────────────────────────────────────

    pub fn rules_collapse(&self) -> &RulesCollapse {
        &self.rules_collapse
    }

    pub fn toggle_rules_panel(&mut self) {
        self.rules_collapse.toggle_panel();
        self.notify(SessionChange::CollapseChanged);
    }

    pub fn toggle_category(&mut self, category: &str) {
        self.rules_collapse.toggle_category(category);
        self.notify(SessionChange::CollapseChanged);
    }

    pub fn pins_collapsed(&self) -> bool {
        self.pins_collapsed
    }

    pub fn toggle_pins(&mut self) {
        self.pins_collapsed = !self.pins_collapsed;
        self.notify(SessionChange::CollapseChanged);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Read accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn selected_part_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[cfg(test)]
    pub fn current_token(&self) -> SelectionToken {
        self.token
    }

    pub fn is_loading(&self) -> bool {
        self.part_loading
    }

    pub fn pdf_loading(&self) -> bool {
        self.pdf_loading
    }

    pub fn part(&self) -> Option<&Part> {
        self.part.as_ref()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule_groups(&self) -> Vec<RuleGroup<'_>> {
        group_rules(&self.rules)
    }

    pub fn visible_rule_rows(&self) -> Vec<RuleRow<'_>> {
        visible_rows(&self.rule_groups(), &self.rules_collapse)
    }

    /// Parsed pin table of the loaded part
    pub fn pin_table(&self) -> Option<&PinTable> {
        self.pin_table.as_ref()
    }

    #[cfg(test)]
    pub fn pdf_url(&self) -> Option<&str> {
        self.pdf_url.as_deref()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn pdf_error(&self) -> Option<&str> {
        self.pdf_error.as_deref()
    }

    pub fn pdf_pane(&self) -> PdfPane<'_> {
        if self.pdf_loading {
            PdfPane::Loading
        } else if let Some(url) = &self.pdf_url {
            PdfPane::Ready(url)
        } else {
            match &self.part {
                Some(part) if part.storage_path().is_some() => PdfPane::FailedToLoad,
                Some(_) => PdfPane::FileNotFound,
                None => PdfPane::NoSelection,
            }
        }
    }

    /// Heading for the datasheet pane
    pub fn title(&self) -> String {
        match &self.part {
            Some(part) => format!("Datasheet Viewer: Part {}", part.part_id),
            None => "Datasheet Viewer".to_string(),
        }
    }

    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn listed(ids: &[&str]) -> ViewerEvent {
        ViewerEvent::PartsListed {
            parts: ids.iter().map(|id| PartSummary::new(*id)).collect(),
        }
    }

    fn part_with_file(id: &str, file: Option<&str>) -> Part {
        let mut part = Part::new(id);
        part.file_path = file.map(str::to_string);
        part
    }

    fn loaded(token: SelectionToken, part: Part, rules: Vec<Rule>) -> ViewerEvent {
        ViewerEvent::PartDataLoaded {
            token,
            part,
            rules,
            elapsed: Duration::from_millis(10),
        }
    }

    #[test]
    fn selection_resets_dependent_state() {
        let mut session = SessionState::new();
        session.apply(listed(&["LM317", "NE555"]));

        let req = session.choose_part("LM317").unwrap();
        session.apply(loaded(
            req.token,
            part_with_file("LM317", Some("ds/lm317.pdf")),
            vec![Rule::new(Some("Power"), None, "cap")],
        ));
        session.apply(ViewerEvent::PdfUrlReady {
            token: req.token,
            url: "https://signed".into(),
            elapsed: Duration::ZERO,
        });
        session.toggle_category("Power");
        session.toggle_pins();
        assert_eq!(session.pdf_url(), Some("https://signed"));

        let next = session.choose_part("NE555").unwrap();
        assert_eq!(next.token, req.token + 1);
        assert!(session.is_loading());
        assert!(session.part().is_none());
        assert!(session.rules().is_empty());
        assert!(session.pdf_url().is_none());
        assert!(!session.rules_collapse().is_collapsed("Power"));
        assert!(!session.pins_collapsed());
        assert_eq!(session.pdf_pane(), PdfPane::NoSelection);
    }

    #[test]
    fn reselecting_same_part_is_noop() {
        let mut session = SessionState::new();
        assert!(session.choose_part("LM317").is_some());
        assert!(session.choose_part("LM317").is_none());
        assert!(session.choose_part("").is_none());
        assert_eq!(session.current_token(), 1);
    }

    #[test]
    fn select_from_search_clears_text() {
        let mut session = SessionState::new();
        session.apply(listed(&["LM317", "LM358"]));
        session.set_search_text("lm");
        assert!(session.suggestions_visible());

        session.highlight_next();
        session.highlight_next();
        let req = session.select_highlighted().unwrap();
        assert_eq!(req.part_id, "LM358");
        assert_eq!(session.search().text(), "");
        assert!(!session.search().is_open());
    }

    #[test]
    fn direct_pick_keeps_search_text() {
        let mut session = SessionState::new();
        session.set_search_text("LM3");
        session.choose_part("NE555");
        assert_eq!(session.search().text(), "LM3");
        assert_eq!(session.selected_part_id(), Some("NE555"));
    }

    #[test]
    fn part_data_sets_pdf_loading_when_path_present() {
        let mut session = SessionState::new();
        let req = session.choose_part("LM317").unwrap();
        assert!(session.is_loading());
        assert!(!session.pdf_loading());

        session.apply(loaded(
            req.token,
            part_with_file("LM317", Some("ds/lm317.pdf")),
            vec![],
        ));
        assert!(!session.is_loading());
        assert!(session.pdf_loading());
        assert_eq!(session.pdf_pane(), PdfPane::Loading);

        session.apply(ViewerEvent::PdfUrlFailed {
            token: req.token,
            message: "500".into(),
        });
        assert!(!session.pdf_loading());
        assert_eq!(session.pdf_pane(), PdfPane::FailedToLoad);
        assert_eq!(session.pdf_pane().message(), "Failed to load datasheet");
    }

    #[test]
    fn part_without_path_is_file_not_found() {
        let mut session = SessionState::new();
        let req = session.choose_part("X1").unwrap();
        session.apply(loaded(req.token, part_with_file("X1", Some("")), vec![]));

        assert!(!session.pdf_loading());
        assert_eq!(session.pdf_pane(), PdfPane::FileNotFound);
        assert_eq!(session.title(), "Datasheet Viewer: Part X1");
    }

    #[test]
    fn failure_leaves_part_unset_with_error() {
        let mut session = SessionState::new();
        let req = session.choose_part("LM317").unwrap();
        session.apply(ViewerEvent::PartDataFailed {
            token: req.token,
            message: "no row in schematic_checklist for LM317".into(),
        });

        assert!(!session.is_loading());
        assert!(session.part().is_none());
        assert!(session.load_error().is_some());
        assert_eq!(session.pdf_pane(), PdfPane::NoSelection);
        assert_eq!(session.stats().failed_part_loads, 1);
    }

    #[test]
    fn stale_results_are_discarded() {
        let mut session = SessionState::new();
        let first = session.choose_part("A").unwrap();
        let second = session.choose_part("B").unwrap();

        // A's data arrives after B was selected
        assert!(!session.apply(loaded(first.token, part_with_file("A", None), vec![])));
        assert!(session.part().is_none());
        assert!(session.is_loading());

        assert!(session.apply(loaded(second.token, part_with_file("B", None), vec![])));
        assert_eq!(session.part().unwrap().part_id, "B");

        assert!(!session.apply(ViewerEvent::PdfUrlReady {
            token: first.token,
            url: "https://a".into(),
            elapsed: Duration::ZERO,
        }));
        assert!(session.pdf_url().is_none());
        assert_eq!(session.stats().stale_discarded, 2);
    }

    #[test]
    fn pin_table_is_parsed_on_load() {
        let mut session = SessionState::new();
        let req = session.choose_part("U1").unwrap();
        let mut part = part_with_file("U1", None);
        part.pin_table = Some(json!("not json"));
        session.apply(loaded(req.token, part, vec![]));

        assert!(session.pin_table().unwrap().is_error());
    }

    #[test]
    fn list_failure_keeps_list_empty() {
        let mut session = SessionState::new();
        session.apply(ViewerEvent::PartsListFailed {
            message: "timeout".into(),
        });
        assert!(session.parts().is_empty());
        assert_eq!(session.parts_error(), Some("timeout"));
    }

    #[test]
    fn observers_see_changes_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let mut session = SessionState::new();
        session.subscribe(Box::new(move |change| {
            sink.lock().unwrap().push(change.clone());
        }));

        session.begin_drag();
        session.drag_to(250.0, 0.0, 1000.0);
        session.end_drag();
        let req = session.choose_part("LM317").unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                SessionChange::DragChanged { dragging: true },
                SessionChange::SplitChanged { ratio: 25.0 },
                SessionChange::DragChanged { dragging: false },
                SessionChange::SelectionChanged {
                    part_id: "LM317".into(),
                    token: req.token
                },
            ]
        );
    }

    #[test]
    fn split_stays_clamped() {
        let mut session = SessionState::new();
        session.begin_drag();
        session.drag_to(5.0, 0.0, 100.0);
        assert_eq!(session.split_ratio(), 20.0);
        session.end_drag();
        session.nudge_split(100.0);
        assert_eq!(session.split_ratio(), 80.0);
    }
}
