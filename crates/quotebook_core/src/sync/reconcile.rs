//! Remote-wins reconciliation.

use crate::model::quote::Quote;

/// Result of merging a remote batch into a local list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconcileOutcome {
    pub merged: Vec<Quote>,
    /// Remote entries that matched an existing `(text, category)` pair.
    pub updated: usize,
    /// Remote entries appended as new.
    pub added: usize,
}

impl ReconcileOutcome {
    pub fn has_changes(&self) -> bool {
        self.added > 0 || self.updated > 0
    }
}

/// Merges `remote` into `local`.
///
/// Each remote quote, in received order, overwrites the first merged entry
/// with the same key or is appended. Lookups run against the growing merged
/// list, so a key repeated within one remote batch counts as added once and
/// updated afterwards. Existing order is preserved.
pub fn reconcile(local: Vec<Quote>, remote: &[Quote]) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome {
        merged: local,
        ..ReconcileOutcome::default()
    };

    for remote_quote in remote {
        match outcome
            .merged
            .iter()
            .position(|existing| existing.same_key(remote_quote))
        {
            Some(index) => {
                outcome.merged[index] = remote_quote.clone();
                outcome.updated += 1;
            }
            None => {
                outcome.merged.push(remote_quote.clone());
                outcome.added += 1;
            }
        }
    }

    outcome
}
