//! Local SQLite catalog backend
//!
//! Mirrors the hosted schema table-for-table so an exported snapshot can be
//! browsed offline. Columns are read generically into JSON maps, which lets
//! extra descriptive columns on `schematic_part` flow through untouched.
//!
//! Queries run on the blocking thread pool; the r2d2 pool hands out up to
//! four connections.

use super::{
    decode_rows, expect_single, CatalogError, CatalogResult, Checklist, Part, PartRepository,
    PartSummary, Rule, CHECKLIST_TABLE, PART_TABLE, RULE_TABLE,
};
use anyhow::Context;
use async_trait::async_trait;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection};
use serde_json::{Map, Value};
use std::path::Path;

/// Schema of the three catalog tables
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS schematic_part (
    part_id      TEXT PRIMARY KEY,
    file_path    TEXT,
    pin_table    TEXT,
    manufacturer TEXT,
    description  TEXT,
    package      TEXT
);

CREATE TABLE IF NOT EXISTS schematic_checklist (
    uuid    TEXT PRIMARY KEY,
    part_id TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS schematic_rule (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    checklist_id TEXT NOT NULL,
    category     TEXT,
    level        TEXT,
    content      TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_checklist_part ON schematic_checklist(part_id);
CREATE INDEX IF NOT EXISTS idx_rule_checklist ON schematic_rule(checklist_id);
"#;

#[derive(Clone)]
pub struct SqliteCatalog {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteCatalog {
    /// Open an existing catalog database
    pub fn open(db_path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let db_path = db_path.as_ref();
        if !db_path.exists() {
            anyhow::bail!(
                "Catalog database {} does not exist (create it with `sheetview catalog init`)",
                db_path.display()
            );
        }

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(4)
            .build(manager)
            .context("Failed to open catalog database")?;

        // Verify connection works
        let conn = pool.get()?;
        conn.query_row("SELECT 1", [], |_| Ok(()))?;

        Ok(Self { pool })
    }

    /// Create the schema in `conn` (idempotent)
    pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(SCHEMA)
    }

    /// Insert a part, its checklist (when given) and the checklist's rules
    ///
    /// Only the descriptive columns present in [`SCHEMA`] are stored; other
    /// entries of `part.extra` are dropped.
    pub fn insert_part(
        conn: &Connection,
        part: &Part,
        checklist_id: Option<&str>,
        rules: &[Rule],
    ) -> rusqlite::Result<()> {
        let pin_table = part.pin_table.as_ref().map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        });
        let text_field = |name: &str| part.extra.get(name).and_then(Value::as_str);

        conn.execute(
            "INSERT INTO schematic_part (part_id, file_path, pin_table, manufacturer, description, package)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                part.part_id,
                part.file_path,
                pin_table,
                text_field("manufacturer"),
                text_field("description"),
                text_field("package"),
            ],
        )?;

        let Some(checklist_id) = checklist_id else {
            return Ok(());
        };
        conn.execute(
            "INSERT INTO schematic_checklist (uuid, part_id) VALUES (?1, ?2)",
            rusqlite::params![checklist_id, part.part_id],
        )?;
        for rule in rules {
            conn.execute(
                "INSERT INTO schematic_rule (checklist_id, category, level, content) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![checklist_id, rule.category, rule.level, rule.content],
            )?;
        }
        Ok(())
    }

    /// Run a query on the blocking pool and collect rows as JSON maps
    async fn query_rows(
        &self,
        sql: &'static str,
        args: Vec<String>,
    ) -> CatalogResult<Vec<Map<String, Value>>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            select_rows(&conn, sql, &args)
        })
        .await
        .map_err(|e| CatalogError::Database(format!("query task failed: {e}")))?
    }
}

/// Execute `sql` and map every row to a column-name keyed JSON object
pub(crate) fn select_rows(
    conn: &Connection,
    sql: &str,
    args: &[String],
) -> CatalogResult<Vec<Map<String, Value>>> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

    let mut rows = stmt.query(params_from_iter(args.iter()))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut map = Map::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            map.insert(name.clone(), column_value(row.get_ref(i)?));
        }
        out.push(map);
    }
    Ok(out)
}

fn column_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::String(hex::encode(b)),
    }
}

#[async_trait]
impl PartRepository for SqliteCatalog {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn list_parts(&self) -> CatalogResult<Vec<PartSummary>> {
        let rows = self
            .query_rows("SELECT part_id FROM schematic_part ORDER BY rowid", vec![])
            .await?;
        decode_rows(rows, PART_TABLE)
    }

    async fn part(&self, part_id: &str) -> CatalogResult<Part> {
        let rows = self
            .query_rows(
                "SELECT * FROM schematic_part WHERE part_id = ?1",
                vec![part_id.to_string()],
            )
            .await?;
        expect_single(decode_rows(rows, PART_TABLE)?, PART_TABLE, part_id)
    }

    async fn checklist(&self, part_id: &str) -> CatalogResult<Checklist> {
        let rows = self
            .query_rows(
                "SELECT uuid, part_id FROM schematic_checklist WHERE part_id = ?1",
                vec![part_id.to_string()],
            )
            .await?;
        expect_single(decode_rows(rows, CHECKLIST_TABLE)?, CHECKLIST_TABLE, part_id)
    }

    async fn rules(&self, checklist_id: &str) -> CatalogResult<Vec<Rule>> {
        let rows = self
            .query_rows(
                "SELECT * FROM schematic_rule WHERE checklist_id = ?1 ORDER BY id",
                vec![checklist_id.to_string()],
            )
            .await?;
        decode_rows(rows, RULE_TABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;

    fn seeded_db() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");
        let conn = Connection::open(&path).unwrap();
        SqliteCatalog::create_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO schematic_part (part_id, file_path, manufacturer) VALUES (?1, ?2, ?3)",
            params!["LM317", "ds/lm317.pdf", "TI"],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO schematic_part (part_id) VALUES (?1)",
            params!["NE555"],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO schematic_checklist (uuid, part_id) VALUES ('c-1', 'LM317')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO schematic_checklist (uuid, part_id) VALUES ('c-2', 'NE555')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO schematic_checklist (uuid, part_id) VALUES ('c-3', 'NE555')",
            [],
        )
        .unwrap();
        for (category, level, content) in [
            (Some("Power"), Some("ESSENTIAL"), "Add input capacitor"),
            (None, None, "Check thermal pad"),
        ] {
            conn.execute(
                "INSERT INTO schematic_rule (checklist_id, category, level, content) VALUES ('c-1', ?1, ?2, ?3)",
                params![category, level, content],
            )
            .unwrap();
        }

        (dir, path)
    }

    #[tokio::test]
    async fn reads_parts_and_rules() {
        let (_dir, path) = seeded_db();
        let catalog = SqliteCatalog::open(&path).unwrap();

        let parts = catalog.list_parts().await.unwrap();
        assert_eq!(
            parts,
            vec![PartSummary::new("LM317"), PartSummary::new("NE555")]
        );

        let part = catalog.part("LM317").await.unwrap();
        assert_eq!(part.storage_path(), Some("ds/lm317.pdf"));
        assert_eq!(part.extra.get("manufacturer"), Some(&Value::from("TI")));

        let checklist = catalog.checklist("LM317").await.unwrap();
        assert_eq!(checklist.uuid, "c-1");

        let rules = catalog.rules(&checklist.uuid).await.unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].level.as_deref(), Some("ESSENTIAL"));
        assert_eq!(rules[1].category_label(), "Uncategorized");
    }

    #[tokio::test]
    async fn checklist_must_be_unique() {
        let (_dir, path) = seeded_db();
        let catalog = SqliteCatalog::open(&path).unwrap();

        assert!(matches!(
            catalog.checklist("NE555").await,
            Err(CatalogError::Ambiguous { count: 2, .. })
        ));
        assert!(matches!(
            catalog.part("missing").await,
            Err(CatalogError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn inserted_part_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");
        let conn = Connection::open(&path).unwrap();
        SqliteCatalog::create_schema(&conn).unwrap();

        let mut part = Part::new("TPS5430");
        part.file_path = Some("ds/tps5430.pdf".into());
        part.pin_table = Some(serde_json::json!({"pins": [["Pin", "Name"], [1, "BOOT"]]}));
        part.extra.insert("package".into(), Value::from("SOIC-8"));
        let rules = vec![Rule::new(Some("Layout"), Some("RECOMMENDED"), "Keep SW node small")];
        SqliteCatalog::insert_part(&conn, &part, Some("c-9"), &rules).unwrap();
        drop(conn);

        let catalog = SqliteCatalog::open(&path).unwrap();
        let loaded = catalog.part("TPS5430").await.unwrap();
        assert_eq!(loaded.storage_path(), Some("ds/tps5430.pdf"));
        assert_eq!(loaded.extra.get("package"), Some(&Value::from("SOIC-8")));
        assert!(matches!(loaded.pin_table, Some(Value::String(_))));

        let rules = catalog.rules("c-9").await.unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].content, "Keep SW node small");
    }

    #[test]
    fn open_missing_database_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SqliteCatalog::open(dir.path().join("nope.db")).is_err());
    }
}
