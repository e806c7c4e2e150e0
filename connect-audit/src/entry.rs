//! Audit entry model
//!
//! One immutable record per state-changing action.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of mutation an audit entry records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// A record was created
    Create,
    /// A record was updated
    Update,
    /// A record was deleted
    Delete,
}

impl AuditAction {
    /// Get string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable audit record.
///
/// Captures what changed on which record, who changed it, and the field
/// values before and after. `old_values` and `new_values` are free-form JSON
/// snapshots so the audit trail survives schema evolution.
///
/// # Examples
///
/// ```
/// use connect_audit::{AuditAction, AuditEntry};
/// use serde_json::json;
/// use uuid::Uuid;
///
/// let entry = AuditEntry::new(
///     "points_of_interest",
///     Uuid::now_v7(),
///     AuditAction::Update,
///     Uuid::now_v7(),
/// )
/// .with_old_values(json!({"status": "pending"}))
/// .with_new_values(json!({"status": "approved"}));
///
/// assert_eq!(entry.action, AuditAction::Update);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique entry ID
    pub id: Uuid,

    /// Name of the table the mutated record lives in
    pub table_name: String,

    /// ID of the mutated record
    pub record_id: Uuid,

    /// What kind of mutation happened
    pub action: AuditAction,

    /// Field values before the mutation
    pub old_values: serde_json::Value,

    /// Field values after the mutation
    pub new_values: serde_json::Value,

    /// User who performed the mutation
    pub actor_id: Uuid,

    /// When the entry was written
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Create a new audit entry with empty value snapshots.
    ///
    /// # Arguments
    ///
    /// * `table_name` - Table of the mutated record
    /// * `record_id` - ID of the mutated record
    /// * `action` - Kind of mutation
    /// * `actor_id` - User who performed it
    pub fn new(
        table_name: impl Into<String>,
        record_id: Uuid,
        action: AuditAction,
        actor_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            table_name: table_name.into(),
            record_id,
            action,
            old_values: serde_json::Value::Null,
            new_values: serde_json::Value::Null,
            actor_id,
            created_at: Utc::now(),
        }
    }

    /// Set the before-mutation snapshot.
    pub fn with_old_values(mut self, values: serde_json::Value) -> Self {
        self.old_values = values;
        self
    }

    /// Set the after-mutation snapshot.
    pub fn with_new_values(mut self, values: serde_json::Value) -> Self {
        self.new_values = values;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_creation() {
        let record_id = Uuid::now_v7();
        let actor_id = Uuid::now_v7();
        let entry = AuditEntry::new("users", record_id, AuditAction::Create, actor_id);

        assert_eq!(entry.table_name, "users");
        assert_eq!(entry.record_id, record_id);
        assert_eq!(entry.actor_id, actor_id);
        assert_eq!(entry.old_values, serde_json::Value::Null);
    }

    #[test]
    fn test_entry_snapshots() {
        let entry = AuditEntry::new(
            "points_of_interest",
            Uuid::now_v7(),
            AuditAction::Update,
            Uuid::now_v7(),
        )
        .with_old_values(json!({"status": "pending"}))
        .with_new_values(json!({"status": "approved"}));

        assert_eq!(entry.old_values["status"], "pending");
        assert_eq!(entry.new_values["status"], "approved");
    }

    #[test]
    fn test_action_serialization() {
        let value = serde_json::to_value(AuditAction::Update).unwrap();
        assert_eq!(value, json!("UPDATE"));
        assert_eq!(AuditAction::Delete.as_str(), "DELETE");
    }
}
