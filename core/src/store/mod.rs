//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! Everything persisted is a string value under a fixed key; the typed
//! accessors in the submodules own the (de)serialization.

mod chat;
mod progress;

use crate::error::VizResult;
use rusqlite::{params, Connection, OptionalExtension};

pub struct KvStore {
    conn: Connection,
    path: Option<String>, // None for :memory:
}

impl KvStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> VizResult<Self> {
        if path == ":memory:" {
            return Self::in_memory();
        }
        let conn = Connection::open(path)?;
        // WAL only applies to real files.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn, path: Some(path.to_string()) })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> VizResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, path: None })
    }

    /// Open `path` and apply migrations.
    pub fn open_migrated(path: &str) -> VizResult<Self> {
        let store = Self::open(path)?;
        store.migrate()?;
        Ok(store)
    }

    /// Reopen a new connection to the same database.
    /// In-memory stores reopen as a fresh, empty database.
    pub fn reopen(&self) -> VizResult<Self> {
        match &self.path {
            Some(p) => Self::open_migrated(p),
            None => {
                let store = Self::in_memory()?;
                store.migrate()?;
                Ok(store)
            }
        }
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> VizResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_kv.sql"))?;
        Ok(())
    }

    // ── Raw key/value ──────────────────────────────────────────

    pub fn get(&self, key: &str) -> VizResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    pub fn set(&self, key: &str, value: &str) -> VizResult<()> {
        let now = chrono::Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }

    /// Delete a key. Returns whether it existed.
    pub fn remove(&self, key: &str) -> VizResult<bool> {
        let n = self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(n > 0)
    }

    /// Number of stored keys (for tests).
    pub fn key_count(&self) -> VizResult<i64> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))?;
        Ok(count)
    }
}
