//! Two-way synchronization with a remote quote source.
//!
//! # Responsibility
//! - Fetch remote quotes and merge them with remote-wins semantics.
//! - Push the merged collection back and report outcome counts.
//! - Repeat on a fixed interval when auto-sync is enabled.

pub mod engine;
pub mod reconcile;
pub mod remote;
pub mod scheduler;
