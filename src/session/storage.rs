//! Session storage trait and its SQLite and in-memory implementations.

use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{PERMISSIONS_KEY, TOKEN_KEY};
use crate::access::PermissionSet;

/// Trait for session storage backends.
pub trait SessionStore: Send + Sync {
  /// Read a value.
  fn get(&self, key: &str) -> Result<Option<String>>;

  /// Insert or replace a value.
  fn set(&self, key: &str, value: &str) -> Result<()>;

  /// Delete a value. Missing keys are not an error.
  fn remove(&self, key: &str) -> Result<()>;

  /// Bearer token for API requests, if one is stored.
  fn token(&self) -> Result<Option<String>> {
    self.get(TOKEN_KEY)
  }

  /// Permission strings granted to the current user.
  fn permissions(&self) -> Result<PermissionSet> {
    match self.get(PERMISSIONS_KEY)? {
      Some(raw) => {
        let list: Vec<String> = serde_json::from_str(&raw)
          .map_err(|e| eyre!("Failed to parse stored permissions: {}", e))?;
        Ok(list.into_iter().collect())
      }
      None => Ok(PermissionSet::default()),
    }
  }

  /// Replace the stored permission list.
  fn set_permissions(&self, permissions: &PermissionSet) -> Result<()> {
    let raw = serde_json::to_string(permissions)
      .map_err(|e| eyre!("Failed to serialize permissions: {}", e))?;
    self.set(PERMISSIONS_KEY, &raw)
  }
}

/// Session store that only lives as long as the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
  values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Store seeded with a bearer token.
  pub fn with_token(token: impl Into<String>) -> Self {
    let mut values = HashMap::new();
    values.insert(TOKEN_KEY.to_string(), token.into());
    Self {
      values: Mutex::new(values),
    }
  }
}

impl SessionStore for MemorySessionStore {
  fn get(&self, key: &str) -> Result<Option<String>> {
    let values = self
      .values
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    Ok(values.get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    let mut values = self
      .values
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    values.insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<()> {
    let mut values = self
      .values
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    values.remove(key);
    Ok(())
  }
}

/// SQLite-based session storage.
pub struct SqliteSessionStore {
  conn: Mutex<Connection>,
}

impl SqliteSessionStore {
  /// Open the session database at the default location.
  pub fn open() -> Result<Self> {
    let path = Self::default_path()?;
    Self::open_at(&path)
  }

  /// Open or create the session database at `path`.
  pub fn open_at(path: &Path) -> Result<Self> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create session directory: {}", e))?;
    }

    let conn = Connection::open(path)
      .map_err(|e| eyre!("Failed to open session database at {}: {}", path.display(), e))?;

    Self::from_connection(conn)
  }

  /// Session store backed by a private in-memory database.
  pub fn in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()
      .map_err(|e| eyre!("Failed to open in-memory session database: {}", e))?;
    Self::from_connection(conn)
  }

  fn from_connection(conn: Connection) -> Result<Self> {
    let store = Self {
      conn: Mutex::new(conn),
    };
    store.run_migrations()?;
    Ok(store)
  }

  /// Get the default database path.
  pub fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("taskdeck").join("session.db"))
  }

  fn run_migrations(&self) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute_batch(SESSION_SCHEMA)
      .map_err(|e| eyre!("Failed to run session migrations: {}", e))?;

    Ok(())
  }
}

const SESSION_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS session (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

impl SessionStore for SqliteSessionStore {
  fn get(&self, key: &str) -> Result<Option<String>> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .query_row(
        "SELECT value FROM session WHERE key = ?",
        params![key],
        |row| row.get(0),
      )
      .optional()
      .map_err(|e| eyre!("Failed to read session key {}: {}", key, e))
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute(
        "INSERT OR REPLACE INTO session (key, value, updated_at)
         VALUES (?, ?, datetime('now'))",
        params![key, value],
      )
      .map_err(|e| eyre!("Failed to store session key {}: {}", key, e))?;

    Ok(())
  }

  fn remove(&self, key: &str) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute("DELETE FROM session WHERE key = ?", params![key])
      .map_err(|e| eyre!("Failed to remove session key {}: {}", key, e))?;

    Ok(())
  }
}
