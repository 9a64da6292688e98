//! Part catalog - read-only access to parts, checklists and rules
//!
//! The catalog is the hosted database the viewer reads from. Three tables
//! make up the schema:
//!
//! ```text
//! schematic_part ──(part_id)──▶ schematic_checklist ──(uuid = checklist_id)──▶ schematic_rule
//! ```
//!
//! Backends:
//! - [`postgrest::PostgrestCatalog`] - Supabase / PostgREST over HTTPS
//! - [`sqlite::SqliteCatalog`] - local SQLite mirror with the same tables
//! - [`memory::MemoryCatalog`] - in-process data (demo mode and tests)

pub mod memory;
pub mod postgrest;
pub mod sqlite;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Table holding part records
pub const PART_TABLE: &str = "schematic_part";
/// Table linking a part to its rule set
pub const CHECKLIST_TABLE: &str = "schematic_checklist";
/// Table holding checklist rules
pub const RULE_TABLE: &str = "schematic_rule";

/// Category used for rules that carry none
pub const UNCATEGORIZED: &str = "Uncategorized";

// ─────────────────────────────────────────────────────────────────────────────
// Records
// ─────────────────────────────────────────────────────────────────────────────

/// Entry in the part list (only the identifier is fetched)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartSummary {
    pub part_id: String,
}

impl PartSummary {
    pub fn new(part_id: impl Into<String>) -> Self {
        Self {
            part_id: part_id.into(),
        }
    }
}

/// Full part record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub part_id: String,

    /// Storage key of the datasheet PDF
    #[serde(default)]
    pub file_path: Option<String>,

    /// Pin table payload, either a JSON object or a serialized JSON string
    #[serde(default)]
    pub pin_table: Option<Value>,

    /// Remaining descriptive columns (manufacturer, package, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Part {
    pub fn new(part_id: impl Into<String>) -> Self {
        Self {
            part_id: part_id.into(),
            file_path: None,
            pin_table: None,
            extra: Map::new(),
        }
    }

    /// Storage key, if the record carries a non-empty one
    pub fn storage_path(&self) -> Option<&str> {
        self.file_path.as_deref().filter(|p| !p.is_empty())
    }

    /// Descriptive fields rendered as `(name, text)` pairs, nulls skipped
    pub fn descriptive_fields(&self) -> Vec<(String, String)> {
        self.extra
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| {
                let text = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), text)
            })
            .collect()
    }
}

/// Link between a part and its rule set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    pub uuid: String,
    #[serde(default)]
    pub part_id: Option<String>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single design rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub checklist_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    /// Null renders as an empty rule
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Rule {
    pub fn new(category: Option<&str>, level: Option<&str>, content: impl Into<String>) -> Self {
        Self {
            checklist_id: None,
            category: category.map(str::to_string),
            level: level.map(str::to_string),
            content: content.into(),
            extra: Map::new(),
        }
    }

    /// Category label, falling back to [`UNCATEGORIZED`]
    pub fn category_label(&self) -> &str {
        match self.category.as_deref() {
            Some(c) if !c.is_empty() => c,
            _ => UNCATEGORIZED,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Errors produced by catalog backends
#[derive(Debug)]
pub enum CatalogError {
    /// Lookup that expects one row found none
    NotFound { table: &'static str, key: String },
    /// Lookup that expects one row found several
    Ambiguous {
        table: &'static str,
        key: String,
        count: usize,
    },
    /// Transport or HTTP status failure
    Request(String),
    /// Row could not be decoded into a record
    Decode(String),
    /// Local database failure
    Database(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::NotFound { table, key } => write!(f, "no row in {table} for {key}"),
            CatalogError::Ambiguous { table, key, count } => {
                write!(f, "expected one row in {table} for {key}, found {count}")
            }
            CatalogError::Request(msg) => write!(f, "catalog request failed: {msg}"),
            CatalogError::Decode(msg) => write!(f, "catalog row could not be decoded: {msg}"),
            CatalogError::Database(msg) => write!(f, "catalog database error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<rusqlite::Error> for CatalogError {
    fn from(e: rusqlite::Error) -> Self {
        CatalogError::Database(e.to_string())
    }
}

impl From<r2d2::Error> for CatalogError {
    fn from(e: r2d2::Error) -> Self {
        CatalogError::Database(e.to_string())
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        CatalogError::Request(e.to_string())
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

// ─────────────────────────────────────────────────────────────────────────────
// Repository contract
// ─────────────────────────────────────────────────────────────────────────────

/// Read-only, key-based lookups against the part catalog
#[async_trait]
pub trait PartRepository: Send + Sync {
    /// Short backend name for the startup banner and logs
    fn backend_name(&self) -> &'static str;

    /// All part identifiers, in catalog order
    async fn list_parts(&self) -> CatalogResult<Vec<PartSummary>>;

    /// Exactly one part by identifier
    async fn part(&self, part_id: &str) -> CatalogResult<Part>;

    /// Exactly one checklist for the part
    async fn checklist(&self, part_id: &str) -> CatalogResult<Checklist>;

    /// Every rule of the checklist (possibly none)
    async fn rules(&self, checklist_id: &str) -> CatalogResult<Vec<Rule>>;
}

/// Collapse a lookup result to its single row
pub(crate) fn expect_single<T>(
    mut rows: Vec<T>,
    table: &'static str,
    key: &str,
) -> CatalogResult<T> {
    match rows.len() {
        1 => Ok(rows.remove(0)),
        0 => Err(CatalogError::NotFound {
            table,
            key: key.to_string(),
        }),
        count => Err(CatalogError::Ambiguous {
            table,
            key: key.to_string(),
            count,
        }),
    }
}

/// Decode JSON rows into records
pub(crate) fn decode_rows<T: serde::de::DeserializeOwned>(
    rows: Vec<Map<String, Value>>,
    table: &'static str,
) -> CatalogResult<Vec<T>> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(Value::Object(row))
                .map_err(|e| CatalogError::Decode(format!("{table}: {e}")))
        })
        .collect()
}
