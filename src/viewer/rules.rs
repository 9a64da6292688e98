//! Design rule grouping and collapse state

use crate::catalog::Rule;
use std::collections::HashSet;

/// Rule severity, from the `level` column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Essential,
    Recommended,
    /// Any other level, or none
    Unranked,
}

impl Severity {
    /// Exact, case-sensitive match on the stored vocabulary
    pub fn from_level(level: Option<&str>) -> Self {
        match level {
            Some("ESSENTIAL") => Self::Essential,
            Some("RECOMMENDED") => Self::Recommended,
            _ => Self::Unranked,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Essential => "🔴",
            Self::Recommended => "🟡",
            Self::Unranked => "⚪",
        }
    }
}

/// Rules sharing one category, in catalog order
#[derive(Debug, Clone, PartialEq)]
pub struct RuleGroup<'a> {
    pub category: &'a str,
    pub rules: Vec<&'a Rule>,
}

/// Group rules by category in order of first occurrence
pub fn group_rules(rules: &[Rule]) -> Vec<RuleGroup<'_>> {
    let mut groups: Vec<RuleGroup<'_>> = Vec::new();
    for rule in rules {
        let category = rule.category_label();
        match groups.iter_mut().find(|g| g.category == category) {
            Some(group) => group.rules.push(rule),
            None => groups.push(RuleGroup {
                category,
                rules: vec![rule],
            }),
        }
    }
    groups
}

/// Expanded/collapsed flags for the rules panel and each category
#[derive(Debug, Clone, Default)]
pub struct RulesCollapse {
    panel_collapsed: bool,
    collapsed_categories: HashSet<String>,
}

impl RulesCollapse {
    pub fn panel_collapsed(&self) -> bool {
        self.panel_collapsed
    }

    pub fn is_collapsed(&self, category: &str) -> bool {
        self.collapsed_categories.contains(category)
    }

    pub fn toggle_panel(&mut self) {
        self.panel_collapsed = !self.panel_collapsed;
    }

    pub fn toggle_category(&mut self, category: &str) {
        if !self.collapsed_categories.remove(category) {
            self.collapsed_categories.insert(category.to_string());
        }
    }
}

/// One renderable line of the rules panel
#[derive(Debug, Clone, PartialEq)]
pub enum RuleRow<'a> {
    Category {
        name: &'a str,
        count: usize,
        collapsed: bool,
    },
    Rule(&'a Rule),
}

/// Flatten groups into rows, skipping rules of collapsed categories
pub fn visible_rows<'a>(groups: &[RuleGroup<'a>], collapse: &RulesCollapse) -> Vec<RuleRow<'a>> {
    if collapse.panel_collapsed() {
        return Vec::new();
    }

    let mut rows = Vec::new();
    for group in groups {
        let collapsed = collapse.is_collapsed(group.category);
        rows.push(RuleRow::Category {
            name: group.category,
            count: group.rules.len(),
            collapsed,
        });
        if !collapsed {
            rows.extend(group.rules.iter().copied().map(RuleRow::Rule));
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Rule> {
        vec![
            Rule::new(Some("Power"), Some("ESSENTIAL"), "Input cap"),
            Rule::new(None, Some("RECOMMENDED"), "Thermal pad"),
            Rule::new(Some("Layout"), None, "Short loop"),
            Rule::new(Some("Power"), Some("essential"), "Output cap"),
            Rule::new(Some(""), None, "Misc"),
        ]
    }

    #[test]
    fn groups_in_first_seen_order() {
        let rules = sample();
        let groups = group_rules(&rules);

        let names: Vec<_> = groups.iter().map(|g| g.category).collect();
        assert_eq!(names, vec!["Power", "Uncategorized", "Layout"]);

        let power: Vec<_> = groups[0].rules.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(power, vec!["Input cap", "Output cap"]);

        let uncategorized: Vec<_> = groups[1].rules.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(uncategorized, vec!["Thermal pad", "Misc"]);
    }

    #[test]
    fn every_rule_lands_exactly_once() {
        let rules = sample();
        let groups = group_rules(&rules);
        let total: usize = groups.iter().map(|g| g.rules.len()).sum();
        assert_eq!(total, rules.len());

        for rule in &rules {
            let hits = groups
                .iter()
                .flat_map(|g| g.rules.iter())
                .filter(|r| std::ptr::eq(**r, rule))
                .count();
            assert_eq!(hits, 1);
        }
    }

    #[test]
    fn no_rules_no_groups() {
        assert!(group_rules(&[]).is_empty());
    }

    #[test]
    fn severity_is_exact_match() {
        assert_eq!(Severity::from_level(Some("ESSENTIAL")), Severity::Essential);
        assert_eq!(
            Severity::from_level(Some("RECOMMENDED")),
            Severity::Recommended
        );
        assert_eq!(Severity::from_level(Some("essential")), Severity::Unranked);
        assert_eq!(Severity::from_level(None), Severity::Unranked);
        assert_eq!(Severity::Essential.icon(), "🔴");
        assert_eq!(Severity::Unranked.icon(), "⚪");
    }

    #[test]
    fn collapse_hides_rules_but_keeps_headers() {
        let rules = sample();
        let groups = group_rules(&rules);
        let mut collapse = RulesCollapse::default();

        assert_eq!(visible_rows(&groups, &collapse).len(), 3 + 5);

        collapse.toggle_category("Power");
        let rows = visible_rows(&groups, &collapse);
        assert_eq!(rows.len(), 3 + 3);
        assert_eq!(
            rows[0],
            RuleRow::Category {
                name: "Power",
                count: 2,
                collapsed: true
            }
        );

        collapse.toggle_panel();
        assert!(visible_rows(&groups, &collapse).is_empty());

        // category state survives the panel toggle
        collapse.toggle_panel();
        assert!(collapse.is_collapsed("Power"));
        collapse.toggle_category("Power");
        assert!(!collapse.is_collapsed("Power"));
    }
}
