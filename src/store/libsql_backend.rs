//! libSQL backend — async `RuleStore` implementation.
//!
//! Conditions and actions are stored as JSON text columns; the
//! prioritization criteria live in a single-row table as one JSON blob.
//! Timestamps are RFC 3339 strings.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info, warn};

use crate::error::StorageError;
use crate::rules::model::Rule;
use crate::store::traits::RuleStore;
use crate::triage::scorer::PrioritizationCriteria;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS rules (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        natural_language TEXT,
        conditions_json TEXT NOT NULL,
        actions_json TEXT NOT NULL,
        match_all INTEGER NOT NULL DEFAULT 1,
        enabled INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_rules_enabled ON rules(enabled);

    CREATE TABLE IF NOT EXISTS prioritization_criteria (
        id INTEGER PRIMARY KEY,
        criteria_json TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
"#;

const RULE_COLUMNS: &str =
    "id, name, description, natural_language, conditions_json, actions_json, match_all, enabled, created_at, updated_at";

/// libSQL-backed rule and criteria store.
///
/// Holds a single connection reused for all operations —
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlStore {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlStore {
    /// Open (or create) a local database file and initialize the schema.
    pub async fn new_local(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::Open(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StorageError::Open(format!("Failed to open libSQL database: {e}")))?;
        let conn = db
            .connect()
            .map_err(|e| StorageError::Open(format!("Failed to create connection: {e}")))?;

        let store = Self {
            db: Arc::new(db),
            conn,
        };
        store.init_schema().await?;
        info!(path = %path.display(), "Rule store opened");
        Ok(store)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, StorageError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| StorageError::Open(format!("Failed to create in-memory database: {e}")))?;
        let conn = db
            .connect()
            .map_err(|e| StorageError::Open(format!("Failed to create connection: {e}")))?;

        let store = Self {
            db: Arc::new(db),
            conn,
        };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StorageError> {
        self.conn
            .execute_batch(SCHEMA)
            .await
            .map_err(|e| StorageError::Query(format!("init_schema: {e}")))?;
        Ok(())
    }
}

/// Convert `Option<&str>` to a libsql Value (NULL when absent).
fn opt_text(s: Option<&str>) -> libsql::Value {
    match s {
        Some(s) => libsql::Value::Text(s.to_string()),
        None => libsql::Value::Null,
    }
}

/// Parse an RFC 3339 timestamp, falling back to `now` on anything else.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn row_to_rule(row: &libsql::Row) -> Result<Rule, StorageError> {
    let conditions_json: String = row
        .get(4)
        .map_err(|e| StorageError::Query(format!("rule row: {e}")))?;
    let actions_json: String = row
        .get(5)
        .map_err(|e| StorageError::Query(format!("rule row: {e}")))?;
    let created_str: String = row
        .get(8)
        .map_err(|e| StorageError::Query(format!("rule row: {e}")))?;
    let updated_str: String = row
        .get(9)
        .map_err(|e| StorageError::Query(format!("rule row: {e}")))?;

    Ok(Rule {
        id: Some(
            row.get(0)
                .map_err(|e| StorageError::Query(format!("rule row: {e}")))?,
        ),
        name: row
            .get(1)
            .map_err(|e| StorageError::Query(format!("rule row: {e}")))?,
        description: row.get(2).unwrap_or_default(),
        natural_language: row.get(3).ok(),
        conditions: serde_json::from_str(&conditions_json)?,
        actions: serde_json::from_str(&actions_json)?,
        match_all: row.get::<i64>(6).unwrap_or(1) != 0,
        enabled: row.get::<i64>(7).unwrap_or(1) != 0,
        created_at: parse_datetime(&created_str),
        updated_at: parse_datetime(&updated_str),
    })
}

#[async_trait]
impl RuleStore for LibSqlStore {
    async fn save_rule(&self, rule: &Rule) -> Result<i64, StorageError> {
        let conditions_json = serde_json::to_string(&rule.conditions)?;
        let actions_json = serde_json::to_string(&rule.actions)?;
        let now = Utc::now().to_rfc3339();

        self.conn
            .execute(
                "INSERT INTO rules (name, description, natural_language, conditions_json, actions_json, match_all, enabled, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    rule.name.as_str(),
                    rule.description.as_str(),
                    opt_text(rule.natural_language.as_deref()),
                    conditions_json,
                    actions_json,
                    rule.match_all as i64,
                    rule.enabled as i64,
                    now.clone(),
                    now,
                ],
            )
            .await
            .map_err(|e| StorageError::Query(format!("save_rule: {e}")))?;

        let id = self.conn.last_insert_rowid();
        debug!(rule = %rule.name, id, "Rule saved");
        Ok(id)
    }

    async fn load_rules(&self, enabled_only: bool) -> Result<Vec<Rule>, StorageError> {
        let sql = if enabled_only {
            format!("SELECT {RULE_COLUMNS} FROM rules WHERE enabled = 1 ORDER BY id ASC")
        } else {
            format!("SELECT {RULE_COLUMNS} FROM rules ORDER BY id ASC")
        };

        let mut rows = self
            .conn
            .query(&sql, ())
            .await
            .map_err(|e| StorageError::Query(format!("load_rules: {e}")))?;

        let mut rules = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            match row_to_rule(&row) {
                Ok(rule) => rules.push(rule),
                Err(e) => warn!("Skipping malformed rule row: {e}"),
            }
        }
        Ok(rules)
    }

    async fn delete_rule(&self, id: i64) -> Result<bool, StorageError> {
        let changed = self
            .conn
            .execute("DELETE FROM rules WHERE id = ?1", params![id])
            .await
            .map_err(|e| StorageError::Query(format!("delete_rule: {e}")))?;
        Ok(changed > 0)
    }

    async fn set_rule_enabled(&self, id: i64, enabled: bool) -> Result<bool, StorageError> {
        let now = Utc::now().to_rfc3339();
        let changed = self
            .conn
            .execute(
                "UPDATE rules SET enabled = ?1, updated_at = ?2 WHERE id = ?3",
                params![enabled as i64, now, id],
            )
            .await
            .map_err(|e| StorageError::Query(format!("set_rule_enabled: {e}")))?;
        Ok(changed > 0)
    }

    async fn load_criteria(&self) -> Result<Option<PrioritizationCriteria>, StorageError> {
        let mut rows = self
            .conn
            .query(
                "SELECT criteria_json FROM prioritization_criteria ORDER BY id DESC LIMIT 1",
                (),
            )
            .await
            .map_err(|e| StorageError::Query(format!("load_criteria: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let json: String = row
                    .get(0)
                    .map_err(|e| StorageError::Query(format!("criteria row: {e}")))?;
                Ok(Some(serde_json::from_str(&json)?))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(StorageError::Query(format!("load_criteria: {e}"))),
        }
    }

    async fn save_criteria(&self, criteria: &PrioritizationCriteria) -> Result<(), StorageError> {
        let mut updated = criteria.clone();
        updated.updated_at = Utc::now();
        let json = serde_json::to_string(&updated)?;

        let mut rows = self
            .conn
            .query("SELECT id FROM prioritization_criteria LIMIT 1", ())
            .await
            .map_err(|e| StorageError::Query(format!("save_criteria: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let id: i64 = row
                    .get(0)
                    .map_err(|e| StorageError::Query(format!("criteria row: {e}")))?;
                self.conn
                    .execute(
                        "UPDATE prioritization_criteria SET criteria_json = ?1, updated_at = ?2 WHERE id = ?3",
                        params![json, updated.updated_at.to_rfc3339(), id],
                    )
                    .await
                    .map_err(|e| StorageError::Query(format!("save_criteria: {e}")))?;
            }
            Ok(None) => {
                self.conn
                    .execute(
                        "INSERT INTO prioritization_criteria (criteria_json, created_at, updated_at) VALUES (?1, ?2, ?3)",
                        params![
                            json,
                            updated.created_at.to_rfc3339(),
                            updated.updated_at.to_rfc3339(),
                        ],
                    )
                    .await
                    .map_err(|e| StorageError::Query(format!("save_criteria: {e}")))?;
            }
            Err(e) => return Err(StorageError::Query(format!("save_criteria: {e}"))),
        }

        debug!("Prioritization criteria saved");
        Ok(())
    }

    async fn clear_criteria(&self) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM prioritization_criteria", ())
            .await
            .map_err(|e| StorageError::Query(format!("clear_criteria: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::model::{
        ActionKind, ConditionField, ConditionOperator, ConditionValue, RuleAction, RuleCondition,
    };

    fn sample_rule() -> Rule {
        let mut rule = Rule::new("Archive old newsletters");
        rule.description = "archive newsletters older than 7 days".into();
        rule.natural_language = Some("archive newsletters older than 7 days".into());
        rule.conditions = vec![
            RuleCondition::new(
                ConditionField::Category,
                ConditionOperator::Equals,
                ConditionValue::text("newsletter"),
            ),
            RuleCondition::new(
                ConditionField::Date,
                ConditionOperator::OlderThan,
                ConditionValue::duration(7, "days"),
            ),
        ];
        rule.actions = vec![
            RuleAction::new(ActionKind::Archive),
            RuleAction::new(ActionKind::AddLabel).with_param("label", "swept"),
        ];
        rule
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let store = LibSqlStore::new_memory().await.unwrap();
        let rule = sample_rule();

        let id = store.save_rule(&rule).await.unwrap();
        let loaded = store.load_rules(false).await.unwrap();

        assert_eq!(loaded.len(), 1);
        let got = &loaded[0];
        assert_eq!(got.id, Some(id));
        assert_eq!(got.name, rule.name);
        assert_eq!(got.description, rule.description);
        assert_eq!(got.natural_language, rule.natural_language);
        assert_eq!(got.conditions, rule.conditions);
        assert_eq!(got.actions, rule.actions);
        assert_eq!(got.match_all, rule.match_all);
        assert_eq!(got.enabled, rule.enabled);
    }

    #[tokio::test]
    async fn enabled_only_filter() {
        let store = LibSqlStore::new_memory().await.unwrap();
        let id1 = store.save_rule(&sample_rule()).await.unwrap();
        let id2 = store.save_rule(&sample_rule()).await.unwrap();
        assert!(store.set_rule_enabled(id1, false).await.unwrap());

        let enabled = store.load_rules(true).await.unwrap();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].id, Some(id2));

        let all = store.load_rules(false).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(!all[0].enabled);
    }

    #[tokio::test]
    async fn delete_rule_reports_removal() {
        let store = LibSqlStore::new_memory().await.unwrap();
        let id = store.save_rule(&sample_rule()).await.unwrap();

        assert!(store.delete_rule(id).await.unwrap());
        assert!(!store.delete_rule(id).await.unwrap());
        assert!(store.load_rules(false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn set_enabled_on_missing_rule_is_false() {
        let store = LibSqlStore::new_memory().await.unwrap();
        assert!(!store.set_rule_enabled(9999, true).await.unwrap());
    }

    #[tokio::test]
    async fn criteria_lifecycle() {
        let store = LibSqlStore::new_memory().await.unwrap();
        assert!(store.load_criteria().await.unwrap().is_none());

        let mut criteria = PrioritizationCriteria::default();
        criteria.vip_senders = vec!["boss@corp.com".into()];
        criteria.high_priority_keywords = vec!["urgent".into()];
        store.save_criteria(&criteria).await.unwrap();

        let loaded = store.load_criteria().await.unwrap().unwrap();
        assert_eq!(loaded.vip_senders, vec!["boss@corp.com"]);

        // Update in place — still a single row.
        criteria.vip_domains = vec!["bigclient.com".into()];
        store.save_criteria(&criteria).await.unwrap();
        let loaded = store.load_criteria().await.unwrap().unwrap();
        assert_eq!(loaded.vip_domains, vec!["bigclient.com"]);

        store.clear_criteria().await.unwrap();
        assert!(store.load_criteria().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn open_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("nested").join("mail-assist.db");
        let store = LibSqlStore::new_local(&db_path).await.unwrap();
        assert!(db_path.exists());
        drop(store);
    }

    #[tokio::test]
    async fn malformed_rule_row_is_skipped() {
        let store = LibSqlStore::new_memory().await.unwrap();
        store.save_rule(&sample_rule()).await.unwrap();
        store
            .conn
            .execute(
                "INSERT INTO rules (name, description, conditions_json, actions_json, created_at, updated_at) VALUES ('bad', '', 'not json', '[]', '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
                (),
            )
            .await
            .unwrap();

        let rules = store.load_rules(false).await.unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, "Archive old newsletters");
    }
}
