//! SQLite-backed snapshot store.
//!
//! One table of `{id, value}` records holds the last full member and
//! course snapshots as serialized JSON. Writes are full-replace; there
//! is no merge path, and concurrent writers to the same key resolve
//! last-write-wins. A missing key is not an error.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Error;

/// Key of the member snapshot.
pub const MEMBERS_KEY: &str = "members";
/// Key of the course snapshot.
pub const COURSES_KEY: &str = "courses";

pub struct SnapshotStore {
    conn: Connection,
}

impl SnapshotStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::init(Connection::open(path)?)
    }

    /// In-memory store, for tests.
    pub fn open_in_memory() -> Result<Self, Error> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, Error> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS snapshots (
                id TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self { conn })
    }

    /// Replaces the snapshot under `key` wholesale.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), Error> {
        let json = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO snapshots (id, value) VALUES (?1, ?2)",
            params![key, json],
        )?;
        Ok(())
    }

    /// Reads the snapshot under `key`; `None` when it was never written.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM snapshots WHERE id = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn exists(&self, key: &str) -> Result<bool, Error> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM snapshots WHERE id = ?1",
            params![key],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}
