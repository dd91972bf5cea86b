//! Category filter selection.

use crate::model::quote::Quote;
use std::fmt::{Display, Formatter};

/// Sentinel filter value selecting every category.
pub const ALL_CATEGORIES: &str = "all";

/// Active category filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Exact, case-sensitive category match.
    Category(String),
}

impl CategoryFilter {
    /// Parses a persisted or user-supplied selection.
    ///
    /// `all` maps to `CategoryFilter::All`; anything else is taken verbatim.
    pub fn parse(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Category(value.to_string())
        }
    }

    /// Returns the storage/selection form of this filter.
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Category(category) => category.as_str(),
        }
    }

    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => quote.category == *category,
        }
    }

    /// Applies this filter to a collection, preserving order.
    pub fn apply(&self, quotes: &[Quote]) -> Vec<Quote> {
        quotes
            .iter()
            .filter(|quote| self.matches(quote))
            .cloned()
            .collect()
    }
}

impl Display for CategoryFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
