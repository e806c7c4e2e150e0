//! # Connect Audit
//!
//! Audit trail records for the yaoundeConnect platform.
//!
//! Every state-changing action on a moderated or managed record produces one
//! [`AuditEntry`] capturing the values before and after the change and the
//! user who made it. Entries are written by the same store transaction as the
//! mutation they record, so an entry can never exist without its mutation
//! (nor the reverse). The audit table is append-only: nothing ever updates or
//! deletes an entry.
//!
//! The [`AuditQuery`] trait is the read side: stores implement it to return a
//! record's history, newest first.

pub mod entry;
pub mod query;

// Re-export main types for convenience
pub use entry::{AuditAction, AuditEntry};
pub use query::AuditQuery;
