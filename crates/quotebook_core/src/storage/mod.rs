//! Key-value storage tiers.
//!
//! # Responsibility
//! - Define the string key-value contract the persistence adapter writes to.
//! - Provide a durable SQLite tier and a session-scoped in-memory tier.
//!
//! # Invariants
//! - Each `set` is a single-key write; there are no multi-key transactions.
//! - `get` on a missing key is `Ok(None)`, not an error.

use crate::db::DbError;
use thiserror::Error;

mod memory;
mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}
