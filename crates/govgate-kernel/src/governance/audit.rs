//! Audit sink contract
//!
//! The gate owns exactly one sink and is its only writer. Sinks serialise
//! appends internally so a gate shared across tasks keeps append order.

use super::types::{AuditEntry, SecurityResult};

/// Append-only store of gate decisions.
pub trait AuditSink: Send + Sync {
    /// Record one entry. Entries are never rewritten or removed.
    fn append(&self, entry: &AuditEntry) -> SecurityResult<()>;

    /// Snapshot of every entry recorded through this sink, in append order.
    fn entries(&self) -> Vec<AuditEntry>;

    fn len(&self) -> usize {
        self.entries().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
