//! Part search: prefix filtering and suggestion dropdown state

use crate::catalog::PartSummary;

/// Characters needed before suggestions open
pub const MIN_QUERY_LEN: usize = 2;

/// Most suggestions shown at once
pub const MAX_SUGGESTIONS: usize = 10;

/// Parts whose id starts with `text` (case-insensitive), catalog order,
/// capped at [`MAX_SUGGESTIONS`]
pub fn filtered_parts<'a>(text: &str, parts: &'a [PartSummary]) -> Vec<&'a PartSummary> {
    let needle = text.to_lowercase();
    parts
        .iter()
        .filter(|p| p.part_id.to_lowercase().starts_with(&needle))
        .take(MAX_SUGGESTIONS)
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    text: String,
    open: bool,
    highlighted: Option<usize>,
}

impl SearchState {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    fn long_enough(&self) -> bool {
        self.text.chars().count() >= MIN_QUERY_LEN
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.open = self.long_enough();
        self.highlighted = None;
    }

    /// Close the dropdown, keep the text
    pub fn dismiss(&mut self) {
        self.open = false;
        self.highlighted = None;
    }

    /// Focus came back to the search box
    pub fn refocus(&mut self) {
        if self.long_enough() {
            self.open = true;
        }
    }

    /// Reset after a part was picked from the dropdown
    pub fn clear(&mut self) {
        self.text.clear();
        self.open = false;
        self.highlighted = None;
    }

    pub fn suggestions<'a>(&self, parts: &'a [PartSummary]) -> Vec<&'a PartSummary> {
        filtered_parts(&self.text, parts)
    }

    /// Dropdown is drawn only when open and there is something to show
    pub fn suggestions_visible(&self, parts: &[PartSummary]) -> bool {
        self.open && !self.suggestions(parts).is_empty()
    }

    pub fn highlight_next(&mut self, parts: &[PartSummary]) {
        let count = self.visible_count(parts);
        if count == 0 {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(i) if i + 1 < count => i + 1,
            Some(i) => i,
            None => 0,
        });
    }

    pub fn highlight_prev(&mut self, parts: &[PartSummary]) {
        let count = self.visible_count(parts);
        if count == 0 {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(i) => i.saturating_sub(1),
            None => count - 1,
        });
    }

    /// Point the highlight at a suggestion row; false when no row is there
    pub fn highlight(&mut self, index: usize, parts: &[PartSummary]) -> bool {
        if index < self.visible_count(parts) {
            self.highlighted = Some(index);
            true
        } else {
            false
        }
    }

    pub fn highlighted_part<'a>(&self, parts: &'a [PartSummary]) -> Option<&'a PartSummary> {
        if !self.open {
            return None;
        }
        self.highlighted
            .and_then(|i| self.suggestions(parts).get(i).copied())
    }

    fn visible_count(&self, parts: &[PartSummary]) -> usize {
        if self.open {
            self.suggestions(parts).len()
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(ids: &[&str]) -> Vec<PartSummary> {
        ids.iter().map(|id| PartSummary::new(*id)).collect()
    }

    #[test]
    fn filter_is_case_insensitive_prefix() {
        let parts = parts(&["LM317", "LM7805", "NE555", "lm358"]);
        let ids: Vec<_> = filtered_parts("lm", &parts)
            .iter()
            .map(|p| p.part_id.as_str())
            .collect();
        assert_eq!(ids, vec!["LM317", "LM7805", "lm358"]);

        assert!(filtered_parts("555", &parts).is_empty());
    }

    #[test]
    fn empty_catalog_filters_to_nothing() {
        assert!(filtered_parts("lm", &[]).is_empty());
        assert!(filtered_parts("", &[]).is_empty());
    }

    #[test]
    fn single_letter_matches_regardless_of_case() {
        let parts = parts(&["A1"]);
        let ids: Vec<_> = filtered_parts("a", &parts)
            .iter()
            .map(|p| p.part_id.as_str())
            .collect();
        assert_eq!(ids, vec!["A1"]);
    }

    #[test]
    fn highlight_rejects_rows_past_the_list() {
        let parts = parts(&["LM317", "LM358"]);
        let mut search = SearchState::default();
        search.set_text("LM");

        assert!(!search.highlight(2, &parts));
        assert_eq!(search.highlighted(), None);
        assert!(search.highlight(1, &parts));
        assert_eq!(search.highlighted(), Some(1));
    }

    #[test]
    fn filter_caps_at_ten() {
        let ids: Vec<String> = (0..25).map(|i| format!("R{i:03}")).collect();
        let parts: Vec<_> = ids.iter().map(|id| PartSummary::new(id.clone())).collect();

        let found = filtered_parts("r", &parts);
        assert_eq!(found.len(), MAX_SUGGESTIONS);
        assert_eq!(found[0].part_id, "R000");
        assert_eq!(found[9].part_id, "R009");
    }

    #[test]
    fn dropdown_opens_at_two_characters() {
        let parts = parts(&["LM317"]);
        let mut search = SearchState::default();

        search.set_text("L");
        assert!(!search.is_open());

        search.set_text("LM");
        assert!(search.is_open());
        assert!(search.suggestions_visible(&parts));

        // open but nothing matches: nothing drawn
        search.set_text("XY");
        assert!(search.is_open());
        assert!(!search.suggestions_visible(&parts));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let mut search = SearchState::default();
        search.set_text("µ");
        assert!(!search.is_open());
        search.set_text("µA");
        assert!(search.is_open());
    }

    #[test]
    fn dismiss_and_refocus() {
        let mut search = SearchState::default();
        search.set_text("LM");
        search.dismiss();
        assert!(!search.is_open());
        assert_eq!(search.text(), "LM");

        search.refocus();
        assert!(search.is_open());

        search.set_text("L");
        search.refocus();
        assert!(!search.is_open());
    }

    #[test]
    fn keyboard_highlight_stays_in_bounds() {
        let parts = parts(&["LM317", "LM358", "LM7805"]);
        let mut search = SearchState::default();
        search.set_text("lm");

        search.highlight_next(&parts);
        assert_eq!(search.highlighted(), Some(0));
        search.highlight_next(&parts);
        search.highlight_next(&parts);
        search.highlight_next(&parts);
        assert_eq!(search.highlighted(), Some(2));
        assert_eq!(search.highlighted_part(&parts).unwrap().part_id, "LM7805");

        search.highlight_prev(&parts);
        assert_eq!(search.highlighted(), Some(1));

        // typing resets the highlight
        search.set_text("lm3");
        assert_eq!(search.highlighted(), None);
        search.highlight_prev(&parts);
        assert_eq!(search.highlighted_part(&parts).unwrap().part_id, "LM358");
    }

    #[test]
    fn closed_dropdown_has_no_highlight() {
        let parts = parts(&["LM317"]);
        let mut search = SearchState::default();
        search.set_text("L");
        search.highlight_next(&parts);
        assert_eq!(search.highlighted(), None);
        assert!(search.highlighted_part(&parts).is_none());
    }
}
