//! Core domain logic for Quotebook.
//! This crate is the single source of truth for catalog and sync invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;
pub mod sync;

pub use config::{ConfigError, QuotebookConfig, SyncConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::filter::{CategoryFilter, ALL_CATEGORIES};
pub use model::quote::{default_quotes, Quote, QuoteValidationError};
pub use repo::quote_repo::{KvQuoteRepository, QuoteRepository, RepoError, RepoResult};
pub use service::quote_store::{ImportError, QuoteStore, StoreError, StoreResult};
pub use storage::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};
pub use sync::engine::{
    fallback_quotes, share_store, DataOrigin, FetchOutcome, SharedStore, SyncEngine, SyncError,
    SyncEvent, SyncReport, SyncState,
};
pub use sync::reconcile::{reconcile, ReconcileOutcome};
pub use sync::remote::{HttpRemoteSource, PushAck, RemoteError, RemoteResult, RemoteSource};
pub use sync::scheduler::AutoSyncTask;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
