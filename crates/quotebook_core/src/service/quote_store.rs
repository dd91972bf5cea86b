//! Collection store use-cases.
//!
//! # Responsibility
//! - Own the in-memory quote list, the active filter and its derived view.
//! - Persist every mutation through the repository before returning.
//!
//! # Invariants
//! - `filtered` always equals `filter.apply(&quotes)` after each operation.
//! - Insertion order is preserved; new entries are appended.
//! - `all` never appears in `list_categories`.

use crate::model::filter::{CategoryFilter, ALL_CATEGORIES};
use crate::model::quote::{default_quotes, Quote, QuoteValidationError};
use crate::repo::quote_repo::{QuoteRepository, RepoError};
use log::{info, warn};
use rand::seq::SliceRandom;
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Why an import payload was rejected as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    MalformedJson(String),
    #[error("invalid JSON format, expected an array of quotes")]
    NotAnArray,
    #[error("no valid quotes found")]
    NoValidQuotes,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] QuoteValidationError),
    #[error("import failed: {0}")]
    InvalidImport(#[from] ImportError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    /// Returns whether the error came from user input rather than storage.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidImport(_))
    }
}

/// In-memory quote collection backed by a repository.
pub struct QuoteStore<R: QuoteRepository> {
    repo: R,
    quotes: Vec<Quote>,
    filter: CategoryFilter,
    filtered: Vec<Quote>,
}

impl<R: QuoteRepository> QuoteStore<R> {
    /// Loads persisted state, seeding defaults on first run.
    ///
    /// Unreadable stored quotes count as a first run. The persisted filter
    /// selection is restored and applied.
    pub fn initialize(repo: R) -> StoreResult<Self> {
        let quotes = match repo.load_collection() {
            Some(quotes) => quotes,
            None => {
                let seeded = default_quotes();
                repo.save_collection(&seeded)?;
                info!(
                    "event=store_seed module=service status=ok count={}",
                    seeded.len()
                );
                seeded
            }
        };
        let filter = repo.load_filter().unwrap_or_default();
        let filtered = filter.apply(&quotes);

        info!(
            "event=store_init module=service status=ok count={} filter={}",
            quotes.len(),
            filter
        );

        Ok(Self {
            repo,
            quotes,
            filter,
            filtered,
        })
    }

    /// Validates and appends one quote, returning the stored value.
    pub fn add(
        &mut self,
        text: impl AsRef<str>,
        category: impl AsRef<str>,
    ) -> StoreResult<Quote> {
        let quote = Quote::new(text, category)?;
        self.quotes.push(quote.clone());
        if let Err(err) = self.repo.save_collection(&self.quotes) {
            self.quotes.pop();
            return Err(err.into());
        }

        if self.filter.matches(&quote) {
            self.filtered.push(quote.clone());
            self.record_last_viewed(&quote);
        }

        info!(
            "event=quote_add module=service status=ok count={}",
            self.quotes.len()
        );
        Ok(quote)
    }

    /// Selects a filter, persists it and returns the new view.
    ///
    /// On a failed save the previous filter and view stay active.
    pub fn set_filter(&mut self, category: &str) -> StoreResult<&[Quote]> {
        let filter = CategoryFilter::parse(category);
        self.repo.save_filter(&filter)?;
        self.filter = filter;
        self.refresh_view();
        Ok(&self.filtered)
    }

    /// Distinct categories in first-seen order.
    pub fn list_categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut categories = Vec::new();
        for quote in &self.quotes {
            if quote.category != ALL_CATEGORIES && seen.insert(quote.category.as_str()) {
                categories.push(quote.category.clone());
            }
        }
        categories
    }

    /// Appends every structurally valid entry of a parsed JSON payload.
    ///
    /// Entries that are not objects with string `text` and `category` are
    /// dropped individually. Returns the accepted count.
    pub fn import_quotes(&mut self, raw: &Value) -> StoreResult<usize> {
        let entries = raw.as_array().ok_or(ImportError::NotAnArray)?;
        let valid: Vec<Quote> = entries.iter().filter_map(Quote::from_json_value).collect();
        if valid.is_empty() {
            return Err(ImportError::NoValidQuotes.into());
        }

        let accepted = valid.len();
        let previous_len = self.quotes.len();
        self.quotes.extend(valid);
        if let Err(err) = self.repo.save_collection(&self.quotes) {
            self.quotes.truncate(previous_len);
            return Err(err.into());
        }
        self.refresh_view();

        info!(
            "event=quote_import module=service status=ok accepted={accepted} dropped={}",
            entries.len() - accepted
        );
        Ok(accepted)
    }

    /// Parses raw file content and imports it.
    pub fn import_json(&mut self, content: &str) -> StoreResult<usize> {
        let raw: Value = serde_json::from_str(content)
            .map_err(|err| ImportError::MalformedJson(err.to_string()))?;
        self.import_quotes(&raw)
    }

    /// Full collection as pretty-printed JSON.
    pub fn export_snapshot(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(&self.quotes)?)
    }

    /// Replaces the whole collection, persists it and refreshes the view.
    ///
    /// Used by sync after reconciliation.
    pub fn replace_all(&mut self, quotes: Vec<Quote>) -> StoreResult<()> {
        self.repo.save_collection(&quotes)?;
        self.quotes = quotes;
        self.refresh_view();
        Ok(())
    }

    /// Picks a random quote from the active view and records it as shown.
    pub fn random_quote(&self) -> Option<Quote> {
        let picked = self.filtered.choose(&mut rand::thread_rng()).cloned()?;
        self.record_last_viewed(&picked);
        Some(picked)
    }

    /// Records a quote as the one currently on screen.
    pub fn show_quote(&self, quote: &Quote) -> StoreResult<()> {
        self.repo.save_last_viewed(quote)?;
        Ok(())
    }

    /// Quote shown last in this session, if any.
    pub fn last_viewed(&self) -> Option<Quote> {
        self.repo.load_last_viewed()
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn filtered(&self) -> &[Quote] {
        &self.filtered
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    fn refresh_view(&mut self) {
        self.filtered = self.filter.apply(&self.quotes);
    }

    fn record_last_viewed(&self, quote: &Quote) {
        if let Err(err) = self.repo.save_last_viewed(quote) {
            warn!("event=last_viewed_save module=service status=error error={err}");
        }
    }
}
