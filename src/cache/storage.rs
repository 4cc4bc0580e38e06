//! Cache storage trait and SQLite implementation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection};

use crate::config::CacheConfig;
use crate::error::SyncError;

/// Key-value persistence for collection snapshots.
///
/// Slots are entity-kind names ("projects", "tasks"); values are the
/// JSON-serialized full collection. There are no partial writes.
pub trait CacheStore: Send + Sync {
  fn get(&self, slot: &str) -> Result<Option<String>, SyncError>;

  fn set(&self, slot: &str, value: &str) -> Result<(), SyncError>;
}

/// Storage that persists nothing.
/// Used when caching is disabled - all operations are no-ops.
pub struct NoopCache;

impl CacheStore for NoopCache {
  fn get(&self, _slot: &str) -> Result<Option<String>, SyncError> {
    Ok(None) // Always miss
  }

  fn set(&self, _slot: &str, _value: &str) -> Result<(), SyncError> {
    Ok(()) // Discard
  }
}

/// In-memory storage for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryCache {
  slots: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
  pub fn new() -> Self {
    Self::default()
  }
}

impl CacheStore for MemoryCache {
  fn get(&self, slot: &str) -> Result<Option<String>, SyncError> {
    let slots = self.slots.lock().map_err(|_| SyncError::CacheLock)?;
    Ok(slots.get(slot).cloned())
  }

  fn set(&self, slot: &str, value: &str) -> Result<(), SyncError> {
    let mut slots = self.slots.lock().map_err(|_| SyncError::CacheLock)?;
    slots.insert(slot.to_string(), value.to_string());
    Ok(())
  }
}

/// SQLite-based cache storage implementation.
pub struct SqliteCache {
  conn: Mutex<Connection>,
}

/// Schema for the cache table.
const CACHE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS slot_cache (
    slot TEXT PRIMARY KEY,
    data TEXT NOT NULL,
    cached_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

impl SqliteCache {
  /// Open or create the cache database at the default location.
  pub fn open_default() -> Result<Self, SyncError> {
    Self::open(&Self::default_path()?)
  }

  /// Open or create the cache database at `path`.
  pub fn open(path: &Path) -> Result<Self, SyncError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;
    conn.execute_batch(CACHE_SCHEMA)?;

    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  /// Get the default database path.
  fn default_path() -> Result<PathBuf, SyncError> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or(SyncError::NoDataDir)?;

    Ok(data_dir.join("boardsync").join("cache.db"))
  }
}

impl CacheStore for SqliteCache {
  fn get(&self, slot: &str) -> Result<Option<String>, SyncError> {
    let conn = self.conn.lock().map_err(|_| SyncError::CacheLock)?;

    let mut stmt = conn.prepare("SELECT data FROM slot_cache WHERE slot = ?")?;
    match stmt.query_row(params![slot], |row| row.get::<_, String>(0)) {
      Ok(data) => Ok(Some(data)),
      Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  fn set(&self, slot: &str, value: &str) -> Result<(), SyncError> {
    let conn = self.conn.lock().map_err(|_| SyncError::CacheLock)?;

    conn.execute(
      "INSERT OR REPLACE INTO slot_cache (slot, data, cached_at)
       VALUES (?, ?, datetime('now'))",
      params![slot, value],
    )?;

    Ok(())
  }
}

/// Select the cache backend from configuration.
pub fn open_cache(config: &CacheConfig) -> Result<Arc<dyn CacheStore>, SyncError> {
  if !config.enabled {
    return Ok(Arc::new(NoopCache));
  }

  let cache = match &config.path {
    Some(path) => SqliteCache::open(path)?,
    None => SqliteCache::open_default()?,
  };
  Ok(Arc::new(cache))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sqlite_roundtrip_and_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let cache = SqliteCache::open(&dir.path().join("cache.db")).unwrap();

    assert_eq!(cache.get("projects").unwrap(), None);

    cache.set("projects", "[{\"id\":1}]").unwrap();
    assert_eq!(
      cache.get("projects").unwrap().as_deref(),
      Some("[{\"id\":1}]")
    );

    cache.set("projects", "[]").unwrap();
    assert_eq!(cache.get("projects").unwrap().as_deref(), Some("[]"));
  }

  #[test]
  fn slots_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let cache = SqliteCache::open(&dir.path().join("cache.db")).unwrap();

    cache.set("projects", "[1]").unwrap();
    cache.set("tasks", "[2]").unwrap();

    assert_eq!(cache.get("projects").unwrap().as_deref(), Some("[1]"));
    assert_eq!(cache.get("tasks").unwrap().as_deref(), Some("[2]"));
  }

  #[test]
  fn reopen_sees_persisted_slots() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.db");

    {
      let cache = SqliteCache::open(&path).unwrap();
      cache.set("tasks", "[]").unwrap();
    }

    let cache = SqliteCache::open(&path).unwrap();
    assert_eq!(cache.get("tasks").unwrap().as_deref(), Some("[]"));
  }

  #[test]
  fn noop_always_misses() {
    let cache = NoopCache;
    cache.set("projects", "[1]").unwrap();
    assert_eq!(cache.get("projects").unwrap(), None);
  }

  #[test]
  fn memory_roundtrip() {
    let cache = MemoryCache::new();
    cache.set("tasks", "[1]").unwrap();
    assert_eq!(cache.get("tasks").unwrap().as_deref(), Some("[1]"));
  }
}
