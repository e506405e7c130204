// src/app/storage.rs
use std::collections::HashMap;
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

/// Flat string key/value persistence.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, String>;
    fn put(&mut self, key: &str, value: &str) -> Result<(), String>;
}

impl<T: KvStore + ?Sized> KvStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        (**self).get(key)
    }
    fn put(&mut self, key: &str, value: &str) -> Result<(), String> {
        (**self).put(key, value)
    }
}

const SQL_CREATE_KV: &str = r#"
CREATE TABLE IF NOT EXISTS kv (
  key   TEXT PRIMARY KEY,
  value TEXT NOT NULL
)
"#;

const SQL_UPSERT_KV: &str = r#"
INSERT INTO kv (key, value) VALUES (?1, ?2)
ON CONFLICT(key) DO UPDATE SET value = excluded.value
"#;

pub struct SqliteKv {
    conn: Connection,
}

impl SqliteKv {
    pub fn open(path: &Path) -> Result<Self, String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("create {}: {e}", parent.display()))?;
            }
        }
        let conn =
            Connection::open(path).map_err(|e| format!("open db {}: {e}", path.display()))?;
        conn.execute_batch(SQL_CREATE_KV)
            .map_err(|e| format!("create kv table: {e}"))?;
        Ok(Self { conn })
    }
}

impl KvStore for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()
            .map_err(|e| format!("read {key}: {e}"))
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.conn
            .execute(SQL_UPSERT_KV, params![key, value])
            .map(|_| ())
            .map_err(|e| format!("write {key}: {e}"))
    }
}

/// Process-local store; also counts writes so callers can observe persistence traffic.
#[derive(Debug, Default, Clone)]
pub struct MemoryKv {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryKv {
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut kv = Self::default();
        kv.entries.insert(key.to_string(), value.to_string());
        kv
    }

    pub const fn writes(&self) -> usize {
        self.writes
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// Open the favorites database, or fall back to a session-only store.
pub fn open_or_memory(path: &Path) -> Box<dyn KvStore> {
    match SqliteKv::open(path) {
        Ok(kv) => Box::new(kv),
        Err(e) => {
            warn!("favorites storage unavailable ({e}); favorites will not survive restart");
            Box::new(MemoryKv::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_round_trips_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("kv.db");

        {
            let mut kv = SqliteKv::open(&path).unwrap();
            assert_eq!(kv.get("k").unwrap(), None);
            kv.put("k", "one").unwrap();
            kv.put("k", "two").unwrap();
            assert_eq!(kv.get("k").unwrap().as_deref(), Some("two"));
        }

        let kv = SqliteKv::open(&path).unwrap();
        assert_eq!(kv.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn memory_counts_writes() {
        let mut kv = MemoryKv::with_entry("a", "1");
        assert_eq!(kv.writes(), 0);
        kv.put("a", "2").unwrap();
        kv.put("b", "3").unwrap();
        assert_eq!(kv.writes(), 2);
        assert_eq!(kv.get("a").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn unopenable_path_falls_back_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be opened as a database file
        let mut kv = open_or_memory(dir.path());
        kv.put("x", "y").unwrap();
        assert_eq!(kv.get("x").unwrap().as_deref(), Some("y"));
    }
}
