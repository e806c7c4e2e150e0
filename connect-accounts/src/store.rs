//! Persistence contract for user accounts
//!
//! Same shape as the POI store: all writes go through a transaction that
//! stages the mutation together with its audit entry, and the in-memory
//! backend serializes transactions by holding the write lock.

use async_trait::async_trait;
use connect_audit::{AuditEntry, AuditQuery};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};
use uuid::Uuid;

use crate::user::User;

/// Store error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend failure (connection, constraint, ...)
    #[error("Store backend failure: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A unit of work over the users table and its audit trail.
#[async_trait]
pub trait UserTransaction: Send {
    /// Read a user's current committed state.
    async fn find(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Read a user by email address.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Stage a new user row.
    fn insert(&mut self, user: User);

    /// Stage an update to an existing user row.
    fn update(&mut self, user: User);

    /// Stage a row deletion.
    fn delete(&mut self, id: Uuid);

    /// Stage an audit entry alongside the mutation it records.
    fn record_audit(&mut self, entry: AuditEntry);

    /// Apply all staged writes atomically.
    async fn commit(self: Box<Self>) -> StoreResult<()>;

    /// Discard all staged writes.
    async fn rollback(self: Box<Self>) -> StoreResult<()>;
}

/// Persistence collaborator for user accounts.
#[async_trait]
pub trait UserStore: AuditQuery + Send + Sync {
    /// Read a user by ID.
    async fn find(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Open a transaction.
    async fn begin(&self) -> StoreResult<Box<dyn UserTransaction>>;
}

// ============================================================================
// In-memory backend
// ============================================================================

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    audit: Vec<AuditEntry>,
}

enum StagedWrite {
    Upsert(User),
    Delete(Uuid),
}

/// In-memory user store for tests and single-process deployments.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Transaction over [`MemoryUserStore`].
pub struct MemoryUserTransaction {
    guard: OwnedRwLockWriteGuard<MemoryState>,
    staged: Vec<StagedWrite>,
    staged_audit: Vec<AuditEntry>,
}

#[async_trait]
impl UserTransaction for MemoryUserTransaction {
    async fn find(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.guard.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .guard
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn insert(&mut self, user: User) {
        self.staged.push(StagedWrite::Upsert(user));
    }

    fn update(&mut self, user: User) {
        self.staged.push(StagedWrite::Upsert(user));
    }

    fn delete(&mut self, id: Uuid) {
        self.staged.push(StagedWrite::Delete(id));
    }

    fn record_audit(&mut self, entry: AuditEntry) {
        self.staged_audit.push(entry);
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let Self {
            mut guard,
            staged,
            mut staged_audit,
        } = *self;
        for write in staged {
            match write {
                StagedWrite::Upsert(user) => {
                    guard.users.insert(user.id, user);
                }
                StagedWrite::Delete(id) => {
                    guard.users.remove(&id);
                }
            }
        }
        guard.audit.append(&mut staged_audit);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn begin(&self) -> StoreResult<Box<dyn UserTransaction>> {
        let guard = self.state.clone().write_owned().await;
        Ok(Box::new(MemoryUserTransaction {
            guard,
            staged: Vec::new(),
            staged_audit: Vec::new(),
        }))
    }
}

#[async_trait]
impl AuditQuery for MemoryUserStore {
    async fn history(&self, table_name: &str, record_id: Uuid) -> Vec<AuditEntry> {
        let state = self.state.read().await;
        state
            .audit
            .iter()
            .rev()
            .filter(|e| e.table_name == table_name && e.record_id == record_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::NewUser;
    use connect_audit::AuditAction;
    use connect_roles::Role;

    #[tokio::test]
    async fn test_commit_and_delete() {
        let store = MemoryUserStore::new();
        let user = User::new(NewUser::new("Paul", "paul@example.cm", Role::Membre));
        let id = user.id;

        let mut tx = store.begin().await.unwrap();
        tx.insert(user);
        tx.commit().await.unwrap();
        assert!(store.find(id).await.unwrap().is_some());

        let mut tx = store.begin().await.unwrap();
        tx.delete(id);
        tx.record_audit(AuditEntry::new("users", id, AuditAction::Delete, Uuid::now_v7()));
        tx.commit().await.unwrap();
        assert!(store.find(id).await.unwrap().is_none());
        assert_eq!(store.history("users", id).await.len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_email_is_case_insensitive() {
        let store = MemoryUserStore::new();
        let user = User::new(NewUser::new("Amina", "Amina@Example.cm", Role::Collecteur));

        let mut tx = store.begin().await.unwrap();
        tx.insert(user);
        tx.commit().await.unwrap();

        let tx = store.begin().await.unwrap();
        assert!(tx.find_by_email("amina@example.cm").await.unwrap().is_some());
        tx.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn test_rollback_discards_staged_writes() {
        let store = MemoryUserStore::new();
        let user = User::new(NewUser::new("Paul", "paul@example.cm", Role::Membre));
        let id = user.id;

        let mut tx = store.begin().await.unwrap();
        tx.insert(user);
        tx.rollback().await.unwrap();

        assert!(store.find(id).await.unwrap().is_none());
    }
}
