//! Persistent storage for the daily play record
//!
//! This module provides:
//! - The [`SaveStore`] key/value interface with per-key expiry
//! - A SQLite implementation in the OS-standard data directory
//! - An in-memory implementation for tests and debug sessions
//! - The [`DailyRecord`] written once a day's play reaches results

mod record;

pub use record::{has_played_today, DailyRecord, RECORD_TTL};

use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Current schema version. Bump this when making schema changes.
/// Version history:
/// - v1: key/value table with expiry
const SCHEMA_VERSION: u32 = 1;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error from SQLite
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Could not determine data directory
    #[error("could not determine data directory")]
    NoDataDirectory,
    /// Failed to create data directory
    #[error("failed to create data directory: {0}")]
    CreateDirFailed(#[source] std::io::Error),
    /// Schema version mismatch (future version)
    #[error("database schema version {found} is newer than supported version {supported}")]
    FutureSchemaVersion { found: u32, supported: u32 },
    /// A stored value could not be encoded or decoded
    #[error("malformed value for {key}: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    /// The store refused the operation
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Key/value store with per-key expiry.
///
/// Expired keys read as absent.
pub trait SaveStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str, ttl: Duration) -> Result<(), StorageError>;
    fn clear(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Milliseconds since the Unix epoch.
fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

fn expiry_from(ttl: Duration) -> i64 {
    now_millis().saturating_add(i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX))
}

/// SQLite-backed store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create the store in the OS-standard data directory.
    ///
    /// - Linux: `$XDG_DATA_HOME/boggle-scramble/` or `~/.local/share/boggle-scramble/`
    /// - macOS: `~/Library/Application Support/boggle-scramble/`
    pub fn open() -> Result<Self, StorageError> {
        Self::open_in(&Self::data_dir()?)
    }

    /// Open or create the store inside `dir`.
    pub fn open_in(dir: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(dir).map_err(StorageError::CreateDirFailed)?;
        let conn = Connection::open(dir.join("scramble.db"))?;
        let store = SqliteStore { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let store = SqliteStore {
            conn: Connection::open_in_memory()?,
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Get the OS-standard data directory.
    pub fn data_dir() -> Result<PathBuf, StorageError> {
        ProjectDirs::from("", "", "boggle-scramble")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDirectory)
    }

    /// Delete every expired key. Returns how many were removed.
    pub fn purge_expired(&self) -> Result<usize, StorageError> {
        let removed = self
            .conn
            .execute("DELETE FROM kv WHERE expires_at <= ?1", params![now_millis()])?;
        Ok(removed)
    }

    fn initialize_schema(&self) -> Result<(), StorageError> {
        let current_version = self.get_schema_version()?;

        if current_version == 0 {
            self.create_schema_v1()?;
        } else if current_version > SCHEMA_VERSION {
            return Err(StorageError::FutureSchemaVersion {
                found: current_version,
                supported: SCHEMA_VERSION,
            });
        }

        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StorageError> {
        let table_exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='meta'",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version: u32 = self
            .conn
            .query_row("SELECT schema_version FROM meta LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        Ok(version)
    }

    fn create_schema_v1(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            -- Meta table: stores schema version
            CREATE TABLE meta (
                schema_version INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );

            -- Key/value pairs, each with its own expiry (unix ms)
            CREATE TABLE kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                expires_at INTEGER NOT NULL
            );
            "#,
        )?;

        self.conn.execute(
            "INSERT INTO meta (schema_version, created_at) VALUES (?1, ?2)",
            params![SCHEMA_VERSION, now_millis()],
        )?;

        Ok(())
    }
}

impl SaveStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1 AND expires_at > ?2",
                params![key, now_millis()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str, ttl: Duration) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO kv (key, value, expires_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, expires_at = excluded.expires_at",
            params![key, value, expiry_from(ttl)],
        )?;
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

/// Store that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, (String, i64)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .entries
            .get(key)
            .filter(|(_, expires_at)| *expires_at > now_millis())
            .map(|(value, _)| value.clone()))
    }

    fn set(&mut self, key: &str, value: &str, ttl: Duration) -> Result<(), StorageError> {
        self.entries
            .insert(key.to_string(), (value.to_string(), expiry_from(ttl)));
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}
