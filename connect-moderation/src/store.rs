//! Persistence contract for points of interest
//!
//! The store is the external persistence collaborator behind a trait. All
//! writes go through a [`PoiTransaction`]: staged mutations and their audit
//! entries become visible together at commit, or not at all. Reads inside a
//! transaction see the committed state at the time the transaction began its
//! exclusive section, which is what makes the service's
//! read-guard-apply-commit sequence race-free.

use async_trait::async_trait;
use connect_audit::{AuditEntry, AuditQuery};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};
use uuid::Uuid;

use crate::poi::{Poi, PoiStatus};

/// Store error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend failure (connection, constraint, ...)
    #[error("Store backend failure: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A unit of work over the POI table and its audit trail.
///
/// Mutations are staged and only become visible at [`commit`]; dropping the
/// transaction (or calling [`rollback`]) discards everything, audit entries
/// included. An audit entry can therefore never outlive a rolled-back
/// mutation.
///
/// [`commit`]: PoiTransaction::commit
/// [`rollback`]: PoiTransaction::rollback
#[async_trait]
pub trait PoiTransaction: Send {
    /// Read a POI's current committed state.
    async fn find(&self, id: Uuid) -> StoreResult<Option<Poi>>;

    /// Stage a new POI row.
    fn insert(&mut self, poi: Poi);

    /// Stage an update to an existing POI row.
    fn update(&mut self, poi: Poi);

    /// Stage an audit entry alongside the mutation it records.
    fn record_audit(&mut self, entry: AuditEntry);

    /// Apply all staged writes atomically.
    async fn commit(self: Box<Self>) -> StoreResult<()>;

    /// Discard all staged writes.
    async fn rollback(self: Box<Self>) -> StoreResult<()>;
}

/// Persistence collaborator for points of interest.
///
/// Also answers audit-history queries for the POI table (see [`AuditQuery`]).
#[async_trait]
pub trait PoiStore: AuditQuery + Send + Sync {
    /// Read a POI by ID.
    async fn find(&self, id: Uuid) -> StoreResult<Option<Poi>>;

    /// All POIs currently in `status`, oldest first.
    async fn list_by_status(&self, status: PoiStatus) -> StoreResult<Vec<Poi>>;

    /// Open a transaction.
    ///
    /// Transactions on the same store serialize their write sections, so
    /// two concurrent transitions on one POI cannot interleave between the
    /// status re-read and the commit.
    async fn begin(&self) -> StoreResult<Box<dyn PoiTransaction>>;
}

// ============================================================================
// In-memory backend
// ============================================================================

#[derive(Debug, Default)]
struct MemoryState {
    pois: HashMap<Uuid, Poi>,
    audit: Vec<AuditEntry>,
}

/// In-memory POI store.
///
/// Backs the test suites and single-process deployments. The transaction
/// holds the store's write lock for its whole lifetime — the in-process
/// equivalent of the row-level locking a relational backend provides.
#[derive(Debug, Clone, Default)]
pub struct MemoryPoiStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryPoiStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Transaction over [`MemoryPoiStore`].
pub struct MemoryPoiTransaction {
    guard: OwnedRwLockWriteGuard<MemoryState>,
    staged_pois: Vec<Poi>,
    staged_audit: Vec<AuditEntry>,
}

#[async_trait]
impl PoiTransaction for MemoryPoiTransaction {
    async fn find(&self, id: Uuid) -> StoreResult<Option<Poi>> {
        Ok(self.guard.pois.get(&id).cloned())
    }

    fn insert(&mut self, poi: Poi) {
        self.staged_pois.push(poi);
    }

    fn update(&mut self, poi: Poi) {
        self.staged_pois.push(poi);
    }

    fn record_audit(&mut self, entry: AuditEntry) {
        self.staged_audit.push(entry);
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let Self {
            mut guard,
            staged_pois,
            mut staged_audit,
        } = *self;
        for poi in staged_pois {
            guard.pois.insert(poi.id, poi);
        }
        guard.audit.append(&mut staged_audit);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        // Dropping the guard releases the lock; staged writes are discarded.
        Ok(())
    }
}

#[async_trait]
impl PoiStore for MemoryPoiStore {
    async fn find(&self, id: Uuid) -> StoreResult<Option<Poi>> {
        Ok(self.state.read().await.pois.get(&id).cloned())
    }

    async fn list_by_status(&self, status: PoiStatus) -> StoreResult<Vec<Poi>> {
        let state = self.state.read().await;
        let mut pois: Vec<Poi> = state
            .pois
            .values()
            .filter(|p| p.status == status)
            .cloned()
            .collect();
        pois.sort_by_key(|p| p.created_at);
        Ok(pois)
    }

    async fn begin(&self) -> StoreResult<Box<dyn PoiTransaction>> {
        let guard = self.state.clone().write_owned().await;
        Ok(Box::new(MemoryPoiTransaction {
            guard,
            staged_pois: Vec::new(),
            staged_audit: Vec::new(),
        }))
    }
}

#[async_trait]
impl AuditQuery for MemoryPoiStore {
    async fn history(&self, table_name: &str, record_id: Uuid) -> Vec<AuditEntry> {
        let state = self.state.read().await;
        // Append-only store: reverse insertion order is created_at descending,
        // with same-timestamp ties newest first.
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
    use crate::poi::NewPoi;
    use connect_audit::AuditAction;

    fn sample_poi() -> Poi {
        Poi::new(NewPoi::new("Stade Ahmadou Ahidjo", "Mfandena"), Uuid::now_v7())
    }

    #[tokio::test]
    async fn test_commit_makes_writes_visible() {
        let store = MemoryPoiStore::new();
        let poi = sample_poi();
        let id = poi.id;

        let mut tx = store.begin().await.unwrap();
        tx.insert(poi);
        tx.record_audit(AuditEntry::new(
            "points_of_interest",
            id,
            AuditAction::Create,
            Uuid::now_v7(),
        ));
        tx.commit().await.unwrap();

        assert!(store.find(id).await.unwrap().is_some());
        assert_eq!(store.history("points_of_interest", id).await.len(), 1);
    }

    #[tokio::test]
    async fn test_rollback_discards_writes_and_audit() {
        let store = MemoryPoiStore::new();
        let poi = sample_poi();
        let id = poi.id;

        let mut tx = store.begin().await.unwrap();
        tx.insert(poi);
        tx.record_audit(AuditEntry::new(
            "points_of_interest",
            id,
            AuditAction::Create,
            Uuid::now_v7(),
        ));
        tx.rollback().await.unwrap();

        assert!(store.find(id).await.unwrap().is_none());
        assert!(store.history("points_of_interest", id).await.is_empty());
    }

    #[tokio::test]
    async fn test_transaction_sees_committed_state() {
        let store = MemoryPoiStore::new();
        let poi = sample_poi();
        let id = poi.id;

        let mut tx = store.begin().await.unwrap();
        tx.insert(poi);
        tx.commit().await.unwrap();

        let tx = store.begin().await.unwrap();
        let found = tx.find(id).await.unwrap();
        assert!(found.is_some());
        tx.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn test_transactions_serialize() {
        let store = MemoryPoiStore::new();
        let poi = sample_poi();
        let id = poi.id;

        let mut tx = store.begin().await.unwrap();
        tx.insert(poi);

        // A second transaction cannot begin until the first completes.
        let store2 = store.clone();
        let pending = tokio::spawn(async move {
            let tx2 = store2.begin().await.unwrap();
            let found = tx2.find(id).await.unwrap();
            tx2.rollback().await.unwrap();
            found
        });

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!pending.is_finished());

        tx.commit().await.unwrap();

        // Once the first commits, the second observes its write.
        let found = pending.await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_list_by_status_filters() {
        let store = MemoryPoiStore::new();
        let a = sample_poi();
        let mut b = sample_poi();
        b.status = PoiStatus::Approved;

        let mut tx = store.begin().await.unwrap();
        tx.insert(a);
        tx.insert(b);
        tx.commit().await.unwrap();

        let pending = store.list_by_status(PoiStatus::Pending).await.unwrap();
        let approved = store.list_by_status(PoiStatus::Approved).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(approved.len(), 1);
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let store = MemoryPoiStore::new();
        let record = Uuid::now_v7();
        let actor = Uuid::now_v7();

        let mut tx = store.begin().await.unwrap();
        tx.record_audit(AuditEntry::new("points_of_interest", record, AuditAction::Create, actor));
        tx.record_audit(AuditEntry::new("points_of_interest", record, AuditAction::Update, actor));
        tx.commit().await.unwrap();

        let history = store.history("points_of_interest", record).await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].action, AuditAction::Update);
        assert_eq!(history[1].action, AuditAction::Create);
    }
}
