//! SQLite-based store implementation

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    CookieJarSnapshot, DecisionEvent, DecisionRecord, FlagKey, Store, StoreResult,
};

/// SQLite-based store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(
            r#"
            -- Durable boolean flags
            CREATE TABLE IF NOT EXISTS flags (
                key TEXT PRIMARY KEY,
                value INTEGER NOT NULL DEFAULT 0
            );

            -- Cookie snapshot (single row)
            CREATE TABLE IF NOT EXISTS cookie_jar (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                snapshot_json TEXT NOT NULL
            );

            -- Decision log (append-only)
            CREATE TABLE IF NOT EXISTS decision_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                event_json TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_decision_timestamp ON decision_log(timestamp);
            "#,
        )?;

        debug!("Store schema initialized");
        Ok(())
    }
}

impl Store for SqliteStore {
    fn get_flag(&self, key: FlagKey) -> StoreResult<bool> {
        let conn = self.conn.lock().unwrap();

        let value: Option<i64> = conn
            .query_row(
                "SELECT value FROM flags WHERE key = ?",
                [key.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        Ok(value.unwrap_or(0) != 0)
    }

    fn set_flag(&self, key: FlagKey, value: bool) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            r#"
            INSERT INTO flags (key, value)
            VALUES (?, ?)
            ON CONFLICT(key)
            DO UPDATE SET value = excluded.value
            "#,
            params![key.as_str(), value as i64],
        )?;

        debug!(key = key.as_str(), value, "Flag written");
        Ok(())
    }

    fn load_cookie_snapshot(&self) -> StoreResult<Option<CookieJarSnapshot>> {
        let conn = self.conn.lock().unwrap();

        let json: Option<String> = conn
            .query_row(
                "SELECT snapshot_json FROM cookie_jar WHERE id = 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(s) => {
                let snapshot: CookieJarSnapshot = serde_json::from_str(&s)?;
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    fn save_cookie_snapshot(&self, snapshot: &CookieJarSnapshot) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let json = serde_json::to_string(snapshot)?;

        conn.execute(
            r#"
            INSERT INTO cookie_jar (id, snapshot_json)
            VALUES (1, ?)
            ON CONFLICT(id)
            DO UPDATE SET snapshot_json = excluded.snapshot_json
            "#,
            [json],
        )?;

        debug!(cookie_count = snapshot.cookies.len(), "Cookie snapshot saved");
        Ok(())
    }

    fn append_decision(&self, mut record: DecisionRecord) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let event_json = serde_json::to_string(&record.event)?;

        conn.execute(
            "INSERT INTO decision_log (timestamp, event_json) VALUES (?, ?)",
            params![record.timestamp.to_rfc3339(), event_json],
        )?;

        record.id = conn.last_insert_rowid();
        debug!(record_id = record.id, "Decision appended");

        Ok(())
    }

    fn recent_decisions(&self, limit: usize) -> StoreResult<Vec<DecisionRecord>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, timestamp, event_json FROM decision_log ORDER BY id DESC LIMIT ?",
        )?;

        let rows = stmt.query_map([limit], |row| {
            let id: i64 = row.get(0)?;
            let timestamp_str: String = row.get(1)?;
            let event_json: String = row.get(2)?;
            Ok((id, timestamp_str, event_json))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, timestamp_str, event_json) = row?;
            let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| tollgate_util::now());
            let event: DecisionEvent = serde_json::from_str(&event_json)?;

            records.push(DecisionRecord {
                id,
                timestamp,
                event,
            });
        }

        Ok(records)
    }

    fn is_healthy(&self) -> bool {
        match self.conn.lock() {
            Ok(conn) => conn.query_row("SELECT 1", [], |_| Ok(())).is_ok(),
            Err(_) => {
                warn!("Store lock poisoned");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CookieRecord;

    #[test]
    fn in_memory_store_is_healthy() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.is_healthy());
    }

    #[test]
    fn missing_flag_reads_as_false() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(!store.get_flag(FlagKey::FallbackLatch).unwrap());
    }

    #[test]
    fn flag_write_is_idempotent() {
        let store = SqliteStore::in_memory().unwrap();

        store.set_flag(FlagKey::FallbackLatch, true).unwrap();
        store.set_flag(FlagKey::FallbackLatch, true).unwrap();

        assert!(store.get_flag(FlagKey::FallbackLatch).unwrap());
        // Other flags are untouched.
        assert!(!store.get_flag(FlagKey::RatingShown).unwrap());
    }

    #[test]
    fn flags_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("tollgate.db");

        {
            let store = SqliteStore::open(&db_path).unwrap();
            store.set_flag(FlagKey::FallbackLatch, true).unwrap();
        }

        let store = SqliteStore::open(&db_path).unwrap();
        assert!(store.get_flag(FlagKey::FallbackLatch).unwrap());
    }

    #[test]
    fn cookie_snapshot_overwrites() {
        let store = SqliteStore::in_memory().unwrap();

        assert!(store.load_cookie_snapshot().unwrap().is_none());

        store
            .save_cookie_snapshot(&CookieJarSnapshot::new(vec![CookieRecord::new("a", "1")]))
            .unwrap();
        store
            .save_cookie_snapshot(&CookieJarSnapshot::new(vec![
                CookieRecord::new("a", "2"),
                CookieRecord::new("b", "3"),
            ]))
            .unwrap();

        let snapshot = store.load_cookie_snapshot().unwrap().unwrap();
        assert_eq!(snapshot.cookies.len(), 2);
        assert_eq!(snapshot.cookies[0].value, "2");
    }

    #[test]
    fn decision_log_appends() {
        let store = SqliteStore::in_memory().unwrap();

        store
            .append_decision(DecisionRecord::new(DecisionEvent::Native {
                reason: "tablet_device".into(),
            }))
            .unwrap();
        store
            .append_decision(DecisionRecord::new(DecisionEvent::WebSurface {
                endpoint: "https://crontime.online/YfTxvzLJ".into(),
            }))
            .unwrap();

        let records = store.recent_decisions(10).unwrap();
        assert_eq!(records.len(), 2);
        // Newest first.
        assert!(matches!(records[0].event, DecisionEvent::WebSurface { .. }));
    }
}
