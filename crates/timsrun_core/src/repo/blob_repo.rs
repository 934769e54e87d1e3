//! Key-value blob store contract and implementations.
//!
//! # Responsibility
//! - Store opaque byte blobs under string keys.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `put_blob` replaces any previous value for the key.
//! - `get_blob` returns exactly the bytes last written, or `None`.

use crate::db::{open_db, open_db_in_memory, DbError};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type BlobResult<T> = Result<T, BlobError>;

/// Failure to read or write a blob.
#[derive(Debug)]
pub enum BlobError {
    Db(DbError),
    /// Failure reported by a `BlobStore` implementation that is not backed
    /// by SQLite (for example a platform key-value store).
    Unavailable(String),
}

impl Display for BlobError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "blob store unavailable: {message}"),
        }
    }
}

impl Error for BlobError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for BlobError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for BlobError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Local key-value storage for whole-collection snapshots.
pub trait BlobStore {
    fn get_blob(&self, key: &str) -> BlobResult<Option<Vec<u8>>>;
    fn put_blob(&self, key: &str, value: &[u8]) -> BlobResult<()>;
}

/// SQLite-backed blob store owning its connection.
pub struct SqliteBlobStore {
    conn: Connection,
}

impl SqliteBlobStore {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens the database file at `path`, applying migrations.
    pub fn open(path: impl AsRef<Path>) -> BlobResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> BlobResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }
}

impl BlobStore for SqliteBlobStore {
    fn get_blob(&self, key: &str) -> BlobResult<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row("SELECT value FROM blobs WHERE key = ?1;", [key], |row| {
                row.get::<_, Vec<u8>>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn put_blob(&self, key: &str, value: &[u8]) -> BlobResult<()> {
        self.conn.execute(
            "INSERT INTO blobs (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Process-local blob store; contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `key` with raw bytes, bypassing any encoder.
    pub fn with_blob(key: &str, value: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        store.blobs.borrow_mut().insert(key.to_string(), value.into());
        store
    }
}

impl BlobStore for MemoryBlobStore {
    fn get_blob(&self, key: &str) -> BlobResult<Option<Vec<u8>>> {
        Ok(self.blobs.borrow().get(key).cloned())
    }

    fn put_blob(&self, key: &str, value: &[u8]) -> BlobResult<()> {
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

impl<S: BlobStore + ?Sized> BlobStore for &S {
    fn get_blob(&self, key: &str) -> BlobResult<Option<Vec<u8>>> {
        (**self).get_blob(key)
    }

    fn put_blob(&self, key: &str, value: &[u8]) -> BlobResult<()> {
        (**self).put_blob(key, value)
    }
}
