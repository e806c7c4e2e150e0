//! Read-only audit queries
//!
//! Implemented by store backends; the audit trail itself is written through
//! the backend's transactions, never through this interface.

use async_trait::async_trait;
use uuid::Uuid;

use crate::entry::AuditEntry;

/// Read-only access to a record's audit history.
///
/// Implementations return entries ordered by `created_at` descending (newest
/// first); entries with equal timestamps keep insertion order, newest first.
#[async_trait]
pub trait AuditQuery: Send + Sync {
    /// The audit history for `(table_name, record_id)`, newest first.
    async fn history(&self, table_name: &str, record_id: Uuid) -> Vec<AuditEntry>;
}
