//! Fact Store Implementation
//!
//! SQLite-backed persistent storage for remembered facts.
//! The store keeps only the database location; each operation opens its own
//! connection and releases it when the operation returns, on success or error.

use super::schema::{Fact, FactLookup, SaveReceipt, FACTS_TABLE};
use crate::error::{BaarezError, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Default wait for a competing writer before giving up
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Fact store backed by SQLite
#[derive(Debug, Clone)]
pub struct FactStore {
    db_path: PathBuf,
    busy_timeout: Duration,
}

impl FactStore {
    /// Open or create the fact store at a specific path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_timeout(path, DEFAULT_BUSY_TIMEOUT)
    }

    /// Open or create the fact store, waiting up to `busy_timeout` on locked writes
    pub fn open_with_timeout(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                BaarezError::StorageUnavailable(format!(
                    "failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let store = Self {
            db_path: path.to_path_buf(),
            busy_timeout,
        };

        store.init_schema()?;
        Ok(store)
    }

    /// Acquire a connection scoped to one operation
    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path).map_err(|e| {
            BaarezError::StorageUnavailable(format!(
                "failed to open database {}: {}",
                self.db_path.display(),
                e
            ))
        })?;
        conn.busy_timeout(self.busy_timeout)?;
        Ok(conn)
    }

    /// Create the facts table if absent
    fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;

        conn.execute(
            &format!(
                r#"
                CREATE TABLE IF NOT EXISTS {FACTS_TABLE} (
                    id INTEGER PRIMARY KEY,
                    key TEXT NOT NULL UNIQUE,
                    value TEXT NOT NULL
                )
                "#
            ),
            [],
        )?;

        Ok(())
    }

    /// Insert or overwrite the fact for `key`
    pub fn save(&self, key: &str, value: &str) -> Result<SaveReceipt> {
        let conn = self.connect()?;

        // Single statement: concurrent writers serialize on SQLite's write lock
        conn.execute(
            &format!(
                r#"
                INSERT INTO {FACTS_TABLE} (key, value) VALUES (?1, ?2)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value
                "#
            ),
            params![key, value],
        )?;

        debug!("Saved fact {:?}", key);
        Ok(SaveReceipt::from(Fact::new(key, value)))
    }

    /// Look up the fact for `key`
    pub fn get(&self, key: &str) -> Result<FactLookup> {
        let conn = self.connect()?;

        let value: Option<String> = conn
            .query_row(
                &format!("SELECT value FROM {FACTS_TABLE} WHERE key = ?1"),
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(FactLookup {
            key: key.to_string(),
            value,
        })
    }

    /// Get total fact count
    pub fn count(&self) -> Result<usize> {
        let conn = self.connect()?;
        let count: usize =
            conn.query_row(&format!("SELECT COUNT(*) FROM {FACTS_TABLE}"), [], |row| {
                row.get(0)
            })?;
        Ok(count)
    }

    /// Get database path
    pub fn path(&self) -> &Path {
        &self.db_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_store() -> (FactStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test_memories.db");
        let store = FactStore::open(&path).unwrap();
        (store, dir)
    }

    #[test]
    fn test_create_store() {
        let (store, _dir) = test_store();
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.path().exists());
    }

    #[test]
    fn test_save_and_get() {
        let (store, _dir) = test_store();

        let receipt = store.save("favorite color", "blue").unwrap();
        assert_eq!(receipt.status, "saved");
        assert_eq!(receipt.key, "favorite color");
        assert_eq!(receipt.value, "blue");

        let lookup = store.get("favorite color").unwrap();
        assert_eq!(lookup.value.as_deref(), Some("blue"));
    }

    #[test]
    fn test_overwrite_keeps_single_row() {
        let (store, _dir) = test_store();

        store.save("car", "red").unwrap();
        store.save("car", "green").unwrap();

        assert_eq!(store.get("car").unwrap().value.as_deref(), Some("green"));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_missing_key_is_absent_not_error() {
        let (store, _dir) = test_store();
        let lookup = store.get("dog's name").unwrap();
        assert_eq!(lookup.key, "dog's name");
        assert!(lookup.value.is_none());
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let (store, _dir) = test_store();
        store.save("City", "Lisbon").unwrap();

        assert!(store.get("city").unwrap().value.is_none());
        assert_eq!(store.get("City").unwrap().value.as_deref(), Some("Lisbon"));
    }

    #[test]
    fn test_empty_value_is_stored() {
        let (store, _dir) = test_store();
        store.save("nickname", "").unwrap();
        assert_eq!(store.get("nickname").unwrap().value.as_deref(), Some(""));
    }

    #[test]
    fn test_reopen_keeps_facts() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memories.db");

        FactStore::open(&path).unwrap().save("city", "Porto").unwrap();
        let reopened = FactStore::open(&path).unwrap();
        assert_eq!(reopened.get("city").unwrap().value.as_deref(), Some("Porto"));
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("memories.db");
        let store = FactStore::open(&path).unwrap();
        store.save("k", "v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_unopenable_path_is_storage_unavailable() {
        let dir = tempdir().unwrap();
        // A directory cannot be opened as a database file
        let err = FactStore::open(dir.path()).unwrap_err();
        assert!(matches!(err, BaarezError::StorageUnavailable(_)), "{}", err);
    }
}
