//! In-memory catalog used by demo mode and tests
//!
//! Optional per-call latency makes loading states visible in the TUI.

use super::{
    expect_single, CatalogError, CatalogResult, Checklist, Part, PartRepository, PartSummary,
    Rule, CHECKLIST_TABLE, PART_TABLE,
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct MemoryCatalog {
    parts: Vec<Part>,
    checklists: Vec<Checklist>,
    rules: Vec<Rule>,
    latency: Duration,
    /// Part ids whose lookups fail with a request error
    failing: HashSet<String>,
    /// Every lookup made, in order (`table:key`)
    calls: Mutex<Vec<String>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Add a part together with its checklist and rules
    pub fn with_part(mut self, part: Part, checklist_id: &str, rules: Vec<Rule>) -> Self {
        self.checklists.push(Checklist {
            uuid: checklist_id.to_string(),
            part_id: Some(part.part_id.clone()),
        });
        self.rules.extend(rules.into_iter().map(|mut r| {
            r.checklist_id = Some(checklist_id.to_string());
            r
        }));
        self.parts.push(part);
        self
    }

    /// Add a part with no checklist row
    pub fn with_orphan_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Make every lookup for `part_id` fail
    #[cfg(test)]
    pub fn failing_for(mut self, part_id: &str) -> Self {
        self.failing.insert(part_id.to_string());
        self
    }

    /// Lookups made so far
    #[cfg(test)]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    async fn record(&self, table: &str, key: &str) -> CatalogResult<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(format!("{table}:{key}"));
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.failing.contains(key) {
            return Err(CatalogError::Request(format!(
                "simulated failure for {key}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PartRepository for MemoryCatalog {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list_parts(&self) -> CatalogResult<Vec<PartSummary>> {
        self.record(PART_TABLE, "*").await?;
        Ok(self
            .parts
            .iter()
            .map(|p| PartSummary::new(p.part_id.clone()))
            .collect())
    }

    async fn part(&self, part_id: &str) -> CatalogResult<Part> {
        self.record(PART_TABLE, part_id).await?;
        let rows = self
            .parts
            .iter()
            .filter(|p| p.part_id == part_id)
            .cloned()
            .collect();
        expect_single(rows, PART_TABLE, part_id)
    }

    async fn checklist(&self, part_id: &str) -> CatalogResult<Checklist> {
        self.record(CHECKLIST_TABLE, part_id).await?;
        let rows = self
            .checklists
            .iter()
            .filter(|c| c.part_id.as_deref() == Some(part_id))
            .cloned()
            .collect();
        expect_single(rows, CHECKLIST_TABLE, part_id)
    }

    async fn rules(&self, checklist_id: &str) -> CatalogResult<Vec<Rule>> {
        self.record(super::RULE_TABLE, checklist_id).await?;
        Ok(self
            .rules
            .iter()
            .filter(|r| r.checklist_id.as_deref() == Some(checklist_id))
            .cloned()
            .collect())
    }
}
