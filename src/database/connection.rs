//! SQLite-backed key-value storage for tabkeeper.
//!
//! Provides the [`Database`] struct that wraps a `rusqlite::Connection`
//! and automatically runs schema migrations on open.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

use super::migrations;
use super::storage::KeyValueStorage;
use crate::types::errors::StorageError;
use crate::types::snapshot::WindowSnapshot;

/// Saved layouts in an SQLite `snapshots` table, one JSON value per key.
///
/// The connection sits behind a mutex so the store can be shared with the
/// writer task; statements are short and never held across an await.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Opens (or creates) a SQLite database at the given file path and runs migrations.
    ///
    /// # Errors
    /// Returns `StorageError::DatabaseError` if the file cannot be opened or a
    /// migration fails.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        migrations::run_all(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens an in-memory SQLite database and runs migrations.
    ///
    /// The database is discarded when the `Database` is dropped.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        migrations::run_all(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Number of stored keys.
    pub fn len(&self) -> Result<usize, StorageError> {
        let count: i64 = self
            .connection()?
            .query_row("SELECT COUNT(*) FROM snapshots", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }
}

#[async_trait]
impl KeyValueStorage for Database {
    async fn set(&self, key: &str, value: &WindowSnapshot) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.connection()?.execute(
            "INSERT OR REPLACE INTO snapshots (key, value, written_at) VALUES (?1, ?2, ?3)",
            params![key, json, Self::now()],
        )?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<WindowSnapshot>, StorageError> {
        let json: Option<String> = self
            .connection()?
            .query_row(
                "SELECT value FROM snapshots WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn get_all(&self) -> Result<BTreeMap<String, WindowSnapshot>, StorageError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare("SELECT key, value FROM snapshots ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut entries = BTreeMap::new();
        for row in rows {
            let (key, json) = row?;
            match serde_json::from_str::<WindowSnapshot>(&json) {
                Ok(snapshot) => {
                    entries.insert(key, snapshot);
                }
                Err(e) => warn!(key = %key, error = %e, "skipping undecodable snapshot"),
            }
        }
        Ok(entries)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.connection()?.execute("DELETE FROM snapshots", [])?;
        Ok(())
    }
}
