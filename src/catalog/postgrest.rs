//! Supabase / PostgREST catalog backend
//!
//! Each lookup is a single filtered `GET /rest/v1/<table>` request. The
//! service key travels in both the `apikey` and `Authorization` headers, as
//! Supabase expects.

use super::{
    decode_rows, expect_single, CatalogError, CatalogResult, Checklist, Part, PartRepository,
    PartSummary, Rule, CHECKLIST_TABLE, PART_TABLE, RULE_TABLE,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::time::Duration;

pub struct PostgrestCatalog {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PostgrestCatalog {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(4)
            .build()
            .context("Failed to create catalog HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Build the request for `table` with PostgREST query parameters
    fn request(&self, table: &str, params: &[(&str, String)]) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}/rest/v1/{}", self.base_url, table))
            .query(params)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn fetch_rows(
        &self,
        table: &'static str,
        params: &[(&str, String)],
    ) -> CatalogResult<Vec<Map<String, Value>>> {
        let response = self.request(table, params).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Request(format!(
                "{table} returned {status}: {}",
                body.trim()
            )));
        }

        response
            .json::<Vec<Map<String, Value>>>()
            .await
            .map_err(|e| CatalogError::Decode(format!("{table}: {e}")))
    }
}

/// `eq.` filter value for a column
fn eq(value: &str) -> String {
    format!("eq.{value}")
}

#[async_trait]
impl PartRepository for PostgrestCatalog {
    fn backend_name(&self) -> &'static str {
        "supabase"
    }

    async fn list_parts(&self) -> CatalogResult<Vec<PartSummary>> {
        let rows = self
            .fetch_rows(PART_TABLE, &[("select", "part_id".to_string())])
            .await?;
        decode_rows(rows, PART_TABLE)
    }

    async fn part(&self, part_id: &str) -> CatalogResult<Part> {
        let rows = self
            .fetch_rows(
                PART_TABLE,
                &[("select", "*".to_string()), ("part_id", eq(part_id))],
            )
            .await?;
        expect_single(decode_rows(rows, PART_TABLE)?, PART_TABLE, part_id)
    }

    async fn checklist(&self, part_id: &str) -> CatalogResult<Checklist> {
        let rows = self
            .fetch_rows(
                CHECKLIST_TABLE,
                &[("select", "uuid".to_string()), ("part_id", eq(part_id))],
            )
            .await?;
        expect_single(decode_rows(rows, CHECKLIST_TABLE)?, CHECKLIST_TABLE, part_id)
    }

    async fn rules(&self, checklist_id: &str) -> CatalogResult<Vec<Rule>> {
        let rows = self
            .fetch_rows(
                RULE_TABLE,
                &[("select", "*".to_string()), ("checklist_id", eq(checklist_id))],
            )
            .await?;
        decode_rows(rows, RULE_TABLE)
    }
}
