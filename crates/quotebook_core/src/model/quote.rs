//! Quote domain model.
//!
//! # Responsibility
//! - Define the single catalog entity and its wire shape.
//! - Validate user-entered quotes and structurally check imported ones.
//!
//! # Invariants
//! - Quotes built through `Quote::new` have trimmed, non-empty fields.
//! - Imported quotes are only checked for shape (both fields are strings).

use crate::model::filter::ALL_CATEGORIES;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Validation failures for user-entered quotes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteValidationError {
    #[error("quote text cannot be empty")]
    EmptyText,
    #[error("quote category cannot be empty")]
    EmptyCategory,
    #[error("category `{0}` is reserved")]
    ReservedCategory(String),
}

/// One catalog entry.
///
/// Serialized as `{"text": ..., "category": ...}`, matching the persisted
/// collection, export files and remote payloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub category: String,
}

impl Quote {
    /// Builds a quote from user input.
    ///
    /// Both fields are trimmed. Blank values and the reserved `all` category
    /// are rejected.
    pub fn new(
        text: impl AsRef<str>,
        category: impl AsRef<str>,
    ) -> Result<Self, QuoteValidationError> {
        let text = text.as_ref().trim();
        let category = category.as_ref().trim();

        if text.is_empty() {
            return Err(QuoteValidationError::EmptyText);
        }
        if category.is_empty() {
            return Err(QuoteValidationError::EmptyCategory);
        }
        if category == ALL_CATEGORIES {
            return Err(QuoteValidationError::ReservedCategory(category.to_string()));
        }

        Ok(Self {
            text: text.to_string(),
            category: category.to_string(),
        })
    }

    /// Builds a quote without validation.
    ///
    /// Used for seed data, remote items and imports whose shape was already
    /// checked.
    pub fn unchecked(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Extracts a quote from an arbitrary JSON value.
    ///
    /// Returns `None` unless the value is an object whose `text` and
    /// `category` members are both strings. Extra members are ignored.
    pub fn from_json_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let text = object.get("text")?.as_str()?;
        let category = object.get("category")?.as_str()?;
        Some(Self::unchecked(text, category))
    }

    /// Returns whether both quotes share the reconciliation key.
    pub fn same_key(&self, other: &Quote) -> bool {
        self.text == other.text && self.category == other.category
    }
}

/// First-run catalog content.
pub fn default_quotes() -> Vec<Quote> {
    vec![
        Quote::unchecked(
            "The only way to do great work is to love what you do.",
            "Motivation",
        ),
        Quote::unchecked(
            "Innovation distinguishes between a leader and a follower.",
            "Business",
        ),
        Quote::unchecked(
            "Life is what happens to you while you're busy making other plans.",
            "Life",
        ),
        Quote::unchecked(
            "The future belongs to those who believe in the beauty of their dreams.",
            "Inspiration",
        ),
        Quote::unchecked(
            "It is during our darkest moments that we must focus to see the light.",
            "Motivation",
        ),
    ]
}
