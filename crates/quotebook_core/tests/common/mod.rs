#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use quotebook_core::{
    KeyValueStore, KvQuoteRepository, MemoryKeyValueStore, PushAck, Quote, QuoteRepository,
    QuoteStore, RemoteError, RemoteResult, RemoteSource, StorageError, StorageResult,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

pub fn memory_repo() -> KvQuoteRepository {
    KvQuoteRepository::new(
        Arc::new(MemoryKeyValueStore::new()),
        Arc::new(MemoryKeyValueStore::new()),
    )
}

/// Store initialized over `quotes` instead of the default seed.
pub fn store_with(quotes: &[Quote]) -> QuoteStore<KvQuoteRepository> {
    let repo = memory_repo();
    repo.save_collection(quotes).unwrap();
    QuoteStore::initialize(repo).unwrap()
}

pub fn empty_store() -> QuoteStore<KvQuoteRepository> {
    store_with(&[])
}

/// In-memory store whose writes fail once `fail_writes` is switched on.
#[derive(Default)]
pub struct FlakyKeyValueStore {
    inner: MemoryKeyValueStore,
    fail_writes: AtomicBool,
}

impl FlakyKeyValueStore {
    pub fn fail_writes(&self, enabled: bool) {
        self.fail_writes.store(enabled, Ordering::SeqCst);
    }

    fn check_writable(&self) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            let code = rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_FULL);
            let err = rusqlite::Error::SqliteFailure(code, Some("disk full".to_string()));
            return Err(StorageError::from(err));
        }
        Ok(())
    }
}

impl KeyValueStore for FlakyKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.check_writable()?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.check_writable()?;
        self.inner.remove(key)
    }
}

/// Store over `quotes` whose durable tier can be made to reject writes.
pub fn flaky_store_with(
    quotes: &[Quote],
) -> (QuoteStore<KvQuoteRepository>, Arc<FlakyKeyValueStore>) {
    let durable = Arc::new(FlakyKeyValueStore::default());
    let repo = KvQuoteRepository::new(durable.clone(), Arc::new(MemoryKeyValueStore::new()));
    repo.save_collection(quotes).unwrap();
    (QuoteStore::initialize(repo).unwrap(), durable)
}

fn offline_error() -> RemoteError {
    RemoteError::Encode(serde_json::from_str::<serde_json::Value>("offline").unwrap_err())
}

/// Scripted remote that records calls.
#[derive(Default)]
pub struct MockRemote {
    pub quotes: Mutex<Vec<Quote>>,
    pub fail_fetch: bool,
    pub fail_push: bool,
    pub fetch_calls: AtomicUsize,
    pub pushed: Mutex<Vec<Vec<Quote>>>,
    /// When set, fetch waits for a notification before answering.
    pub fetch_gate: Option<Arc<Notify>>,
}

impl MockRemote {
    pub fn serving(quotes: Vec<Quote>) -> Self {
        Self {
            quotes: Mutex::new(quotes),
            ..Self::default()
        }
    }

    pub fn offline() -> Self {
        Self {
            fail_fetch: true,
            fail_push: true,
            ..Self::default()
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteSource for MockRemote {
    async fn fetch_quotes(&self) -> RemoteResult<Vec<Quote>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.fetch_gate {
            gate.notified().await;
        }
        if self.fail_fetch {
            return Err(offline_error());
        }
        Ok(self.quotes.lock().clone())
    }

    async fn push_quotes(&self, quotes: &[Quote]) -> RemoteResult<PushAck> {
        if self.fail_push {
            return Err(offline_error());
        }
        self.pushed.lock().push(quotes.to_vec());
        Ok(PushAck {
            remote_id: Some(101),
            simulated: false,
            message: "ok".to_string(),
        })
    }
}
