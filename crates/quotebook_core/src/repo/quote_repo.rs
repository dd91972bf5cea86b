//! Quote repository contract and key-value implementation.
//!
//! # Responsibility
//! - Round-trip the full quote list as a JSON array under `quotes`.
//! - Keep the filter selection in the durable tier and the last viewed quote
//!   in the session tier.
//!
//! # Invariants
//! - Missing keys and malformed JSON load as `None`.
//! - Write failures propagate as `RepoError`.

use crate::model::filter::CategoryFilter;
use crate::model::quote::Quote;
use crate::storage::{KeyValueStore, StorageError};
use log::warn;
use std::sync::Arc;
use thiserror::Error;

pub const QUOTES_KEY: &str = "quotes";
pub const FILTER_KEY: &str = "selectedCategory";
pub const LEGACY_FILTER_KEY: &str = "lastFilter";
pub const LAST_VIEWED_KEY: &str = "lastViewedQuote";

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to serialize `{key}`: {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistence contract used by the collection store.
pub trait QuoteRepository: Send + Sync {
    fn save_collection(&self, quotes: &[Quote]) -> RepoResult<()>;
    fn load_collection(&self) -> Option<Vec<Quote>>;
    fn save_filter(&self, filter: &CategoryFilter) -> RepoResult<()>;
    fn load_filter(&self) -> Option<CategoryFilter>;
    fn save_last_viewed(&self, quote: &Quote) -> RepoResult<()>;
    fn load_last_viewed(&self) -> Option<Quote>;
}

/// Repository writing to a durable and a session key-value tier.
#[derive(Clone)]
pub struct KvQuoteRepository {
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl KvQuoteRepository {
    pub fn new(durable: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self { durable, session }
    }

    fn read_key(store: &dyn KeyValueStore, key: &str) -> Option<String> {
        match store.get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!("event=storage_read module=repo status=error key={key} error={err}");
                None
            }
        }
    }

    fn read_json<T: serde::de::DeserializeOwned>(
        store: &dyn KeyValueStore,
        key: &str,
    ) -> Option<T> {
        let raw = Self::read_key(store, key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(
                    "event=storage_read module=repo status=malformed key={key} error={err}"
                );
                None
            }
        }
    }
}

impl QuoteRepository for KvQuoteRepository {
    fn save_collection(&self, quotes: &[Quote]) -> RepoResult<()> {
        let json = serde_json::to_string(quotes).map_err(|source| RepoError::Serialize {
            key: QUOTES_KEY,
            source,
        })?;
        self.durable.set(QUOTES_KEY, &json)?;
        Ok(())
    }

    fn load_collection(&self) -> Option<Vec<Quote>> {
        Self::read_json(self.durable.as_ref(), QUOTES_KEY)
    }

    fn save_filter(&self, filter: &CategoryFilter) -> RepoResult<()> {
        self.durable.set(FILTER_KEY, filter.as_str())?;
        self.durable.set(LEGACY_FILTER_KEY, filter.as_str())?;
        Ok(())
    }

    fn load_filter(&self) -> Option<CategoryFilter> {
        let read = |key: &str| {
            Self::read_key(self.durable.as_ref(), key).filter(|value| !value.is_empty())
        };
        read(FILTER_KEY)
            .or_else(|| read(LEGACY_FILTER_KEY))
            .map(|value| CategoryFilter::parse(&value))
    }

    fn save_last_viewed(&self, quote: &Quote) -> RepoResult<()> {
        let json = serde_json::to_string(quote).map_err(|source| RepoError::Serialize {
            key: LAST_VIEWED_KEY,
            source,
        })?;
        self.session.set(LAST_VIEWED_KEY, &json)?;
        Ok(())
    }

    fn load_last_viewed(&self) -> Option<Quote> {
        Self::read_json(self.session.as_ref(), LAST_VIEWED_KEY)
    }
}
