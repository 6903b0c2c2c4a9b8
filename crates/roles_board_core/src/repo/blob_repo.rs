//! Blob store contract and SQLite implementation.
//!
//! # Responsibility
//! - Read and write one whole text value per key.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - A write is a single upsert statement and therefore atomic.

use crate::codec::document::FormatError;
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::borrow::Borrow;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, PersistenceError>;

/// Durable storage failure. The in-memory board stays authoritative.
#[derive(Debug)]
pub enum PersistenceError {
    Db(DbError),
    /// The backend refused the write (for example a storage quota).
    Rejected(String),
    Encode(FormatError),
    /// Storage could not be read when the board opened, so writing the
    /// in-memory board would overwrite data nobody has seen.
    StorageUnread,
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "board storage error: {err}"),
            Self::Rejected(reason) => write!(f, "board storage rejected write: {reason}"),
            Self::Encode(err) => write!(f, "{err}"),
            Self::StorageUnread => write!(
                f,
                "board storage could not be read at startup; retry saving to overwrite it"
            ),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Rejected(_) | Self::StorageUnread => None,
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for PersistenceError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<FormatError> for PersistenceError {
    fn from(value: FormatError) -> Self {
        Self::Encode(value)
    }
}

/// Opaque key/value store holding whole text blobs.
pub trait BlobStore {
    fn read_blob(&self, key: &str) -> RepoResult<Option<String>>;
    fn write_blob(&self, key: &str, value: &str) -> RepoResult<()>;
}

impl<S: BlobStore + ?Sized> BlobStore for &S {
    fn read_blob(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).read_blob(key)
    }

    fn write_blob(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).write_blob(key, value)
    }
}

/// SQLite-backed blob store over the `blobs` table.
///
/// Holds either a borrowed `&Connection` or an owned `Connection`.
pub struct SqliteBlobStore<C: Borrow<Connection>> {
    conn: C,
}

impl<C: Borrow<Connection>> SqliteBlobStore<C> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    fn conn(&self) -> &Connection {
        self.conn.borrow()
    }
}

impl<C: Borrow<Connection>> BlobStore for SqliteBlobStore<C> {
    fn read_blob(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn()
            .query_row("SELECT value FROM blobs WHERE key = ?1;", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write_blob(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn().execute(
            "INSERT INTO blobs (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}
