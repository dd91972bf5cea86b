//! Persistence adapter between the collection store and key-value storage.
//!
//! # Responsibility
//! - Serialize the collection, filter and last-viewed quote to fixed keys.
//! - Turn unreadable state into absence so callers never see read errors.
//!
//! # Invariants
//! - Read paths never return errors; they log and yield `None`.
//! - Filter writes go to both the current and the legacy key.

pub mod quote_repo;
