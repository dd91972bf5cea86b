//! Domain model for the quote catalog.
//!
//! # Responsibility
//! - Define the canonical `Quote` record shared by store, storage and sync.
//! - Define the category filter selection, including the `all` sentinel.
//!
//! # Invariants
//! - Quote identity is the exact `(text, category)` pair; there is no ID.
//! - `all` is reserved for the filter and never a real category.

pub mod filter;
pub mod quote;
