use std::path::Path;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{OpenFlags, OptionalExtension};

use crate::error::ClientResult;
use crate::storage::{migrations, LocalStorage};

pub type StoragePool = Pool<SqliteConnectionManager>;

/// SQLite-backed storage, one row per key.
#[derive(Clone)]
pub struct SqliteStorage {
    pool: StoragePool,
}

impl SqliteStorage {
    pub fn open(sqlite_path: &str) -> ClientResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = Path::new(sqlite_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(sqlite_path)
            .with_flags(
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_FULL_MUTEX,
            )
            .with_init(|conn| {
                conn.execute_batch(
                    "PRAGMA journal_mode = WAL;
                     PRAGMA busy_timeout = 5000;",
                )
            });

        let pool = Pool::builder().max_size(4).build(manager)?;

        let conn = pool.get()?;
        migrations::run(&conn)?;
        tracing::debug!("Client storage ready at {sqlite_path}");

        Ok(Self { pool })
    }
}

impl LocalStorage for SqliteStorage {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        let conn = self.pool.get()?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                rusqlite::params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        let conn = self.pool.get()?;
        let now = chrono::Utc::now()
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string();
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value, now],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM kv_store WHERE key = ?1", rusqlite::params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("client.db");
        let path = path.to_str().unwrap();

        let storage = SqliteStorage::open(path).unwrap();
        assert_eq!(storage.get("token").unwrap(), None);
        storage.set("token", "first").unwrap();
        storage.set("token", "second").unwrap();
        drop(storage);

        let reopened = SqliteStorage::open(path).unwrap();
        assert_eq!(reopened.get("token").unwrap().as_deref(), Some("second"));

        reopened.remove("token").unwrap();
        assert_eq!(reopened.get("token").unwrap(), None);
        // Removing twice is fine
        reopened.remove("token").unwrap();
    }
}
