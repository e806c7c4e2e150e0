//! Moderation state machine
//!
//! The service drives every `status` transition a POI can undergo. Guards
//! that depend only on the input (role, reason length) run before any
//! transaction is opened; guards that depend on current state run on a
//! re-read inside the transaction. Notifications go out after commit only.

use chrono::Utc;
use connect_audit::{AuditAction, AuditEntry, AuditQuery};
use connect_events::{NotificationDispatcher, PoiEvent};
use connect_roles::{Actor, PermissionResolver};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{ModerationError, ModerationResult};
use crate::poi::{NewPoi, Poi, PoiStatus};
use crate::store::PoiStore;

/// Audit table name for points of interest.
pub const POI_TABLE: &str = "points_of_interest";

/// Tunables for the moderation workflow.
#[derive(Debug, Clone)]
pub struct ModerationConfig {
    /// Minimum length of a rejection reason, in characters after trimming
    pub min_rejection_reason_len: usize,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            min_rejection_reason_len: 10,
        }
    }
}

/// Counts of POIs per moderation status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModerationStats {
    /// POIs awaiting moderation
    pub pending: usize,
    /// Approved POIs
    pub approved: usize,
    /// Rejected POIs
    pub rejected: usize,
}

impl ModerationStats {
    /// Total number of POIs across all statuses.
    pub fn total(&self) -> usize {
        self.pending + self.approved + self.rejected
    }
}

/// The moderation workflow service.
///
/// Constructed once at startup with its collaborators and shared behind the
/// API layer. See the crate docs for the lifecycle and the transaction
/// contract.
pub struct ModerationService {
    store: Arc<dyn PoiStore>,
    resolver: PermissionResolver,
    dispatcher: NotificationDispatcher,
    config: ModerationConfig,
}

impl std::fmt::Debug for ModerationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModerationService")
            .field("config", &self.config)
            .finish()
    }
}

impl ModerationService {
    /// Create the service from its collaborators.
    pub fn new(
        store: Arc<dyn PoiStore>,
        resolver: PermissionResolver,
        dispatcher: NotificationDispatcher,
        config: ModerationConfig,
    ) -> Self {
        Self {
            store,
            resolver,
            dispatcher,
            config,
        }
    }

    /// Submit a new point of interest.
    ///
    /// Requires role `collecteur` or above. The POI is created in `pending`
    /// together with its `CREATE` audit entry; moderators are notified via
    /// `poi.submitted` after the transaction commits.
    ///
    /// # Errors
    ///
    /// - [`ModerationError::Authorization`] if the actor cannot submit
    /// - [`ModerationError::Validation`] if name or address are blank
    pub async fn submit(&self, actor: &Actor, new: NewPoi) -> ModerationResult<Poi> {
        if !actor.role.can_submit() {
            return Err(ModerationError::Authorization(format!(
                "role {} cannot submit points of interest",
                actor.role
            )));
        }
        if new.name.trim().is_empty() {
            return Err(ModerationError::Validation("name must not be blank".into()));
        }
        if new.address.trim().is_empty() {
            return Err(ModerationError::Validation(
                "address must not be blank".into(),
            ));
        }

        let poi = Poi::new(new, actor.id);

        let mut tx = self.store.begin().await?;
        tx.insert(poi.clone());
        tx.record_audit(
            AuditEntry::new(POI_TABLE, poi.id, AuditAction::Create, actor.id)
                .with_new_values(serde_json::to_value(&poi).unwrap_or_default()),
        );
        tx.commit().await?;

        tracing::info!(poi_id = %poi.id, created_by = %actor.id, "POI submitted");

        self.dispatcher
            .dispatch(
                PoiEvent::Submitted {
                    poi_id: poi.id,
                    name: poi.name.clone(),
                    created_by: actor.id,
                }
                .to_event(),
            )
            .await;

        Ok(poi)
    }

    /// Approve a POI.
    ///
    /// Legal from `pending` and from `rejected` (a reapproval); approving an
    /// already-approved POI fails with [`ModerationError::AlreadyApproved`]
    /// rather than silently succeeding.
    ///
    /// # Errors
    ///
    /// - [`ModerationError::Authorization`] if the actor is not a moderator
    /// - [`ModerationError::NotFound`] if the POI does not exist
    /// - [`ModerationError::AlreadyApproved`] if the POI is already approved
    pub async fn approve(
        &self,
        actor: &Actor,
        poi_id: Uuid,
        comments: Option<&str>,
    ) -> ModerationResult<Poi> {
        self.require_moderator(actor, "approve")?;
        self.apply_approval(actor, poi_id, comments, false).await
    }

    /// Approve a rejected POI again.
    ///
    /// A guarded alias of [`approve`] restricted to the
    /// `rejected → approved` edge: any other current status fails with
    /// [`ModerationError::NotRejected`].
    ///
    /// [`approve`]: Self::approve
    pub async fn reapprove(&self, actor: &Actor, poi_id: Uuid) -> ModerationResult<Poi> {
        self.require_moderator(actor, "reapprove")?;
        self.apply_approval(actor, poi_id, None, true).await
    }

    /// Reject a POI.
    ///
    /// Legal from `pending` and from `approved`. Requires a human-readable
    /// reason of at least the configured minimum length; the reason gate is
    /// checked before any transaction is opened.
    ///
    /// # Errors
    ///
    /// - [`ModerationError::Authorization`] if the actor is not a moderator
    /// - [`ModerationError::Validation`] if the reason is too short
    /// - [`ModerationError::NotFound`] if the POI does not exist
    /// - [`ModerationError::AlreadyRejected`] if the POI is already rejected
    pub async fn reject(
        &self,
        actor: &Actor,
        poi_id: Uuid,
        reason: &str,
    ) -> ModerationResult<Poi> {
        self.require_moderator(actor, "reject")?;

        let reason = reason.trim();
        if reason.chars().count() < self.config.min_rejection_reason_len {
            return Err(ModerationError::Validation(format!(
                "rejection reason must be at least {} characters",
                self.config.min_rejection_reason_len
            )));
        }

        let mut tx = self.store.begin().await?;
        let Some(mut poi) = tx.find(poi_id).await? else {
            tx.rollback().await?;
            return Err(ModerationError::NotFound(poi_id));
        };

        match poi.status {
            PoiStatus::Rejected => {
                tx.rollback().await?;
                return Err(ModerationError::AlreadyRejected);
            }
            PoiStatus::Pending | PoiStatus::Approved => {}
        }

        let old_values = json!({
            "status": poi.status,
            "approved_by": poi.approved_by,
        });

        poi.status = PoiStatus::Rejected;
        poi.approved_by = Some(actor.id);
        poi.is_verify = false;
        poi.updated_at = Utc::now();

        let new_values = json!({
            "status": poi.status,
            "approved_by": poi.approved_by,
            "reason": reason,
        });

        tx.update(poi.clone());
        tx.record_audit(
            AuditEntry::new(POI_TABLE, poi.id, AuditAction::Update, actor.id)
                .with_old_values(old_values)
                .with_new_values(new_values),
        );
        tx.commit().await?;

        tracing::info!(poi_id = %poi.id, moderator = %actor.id, "POI rejected");

        self.dispatcher
            .dispatch(
                PoiEvent::Rejected {
                    poi_id: poi.id,
                    moderator_id: actor.id,
                    reason: reason.to_string(),
                }
                .to_event(),
            )
            .await;

        Ok(poi)
    }

    /// Fetch a POI by ID.
    pub async fn get(&self, poi_id: Uuid) -> ModerationResult<Poi> {
        self.store
            .find(poi_id)
            .await?
            .ok_or(ModerationError::NotFound(poi_id))
    }

    /// POIs awaiting moderation, oldest first.
    pub async fn pending(&self) -> ModerationResult<Vec<Poi>> {
        Ok(self.store.list_by_status(PoiStatus::Pending).await?)
    }

    /// The audit history of a POI, newest first.
    pub async fn history(&self, poi_id: Uuid) -> ModerationResult<Vec<AuditEntry>> {
        Ok(self.store.history(POI_TABLE, poi_id).await)
    }

    /// Counts of POIs per status.
    pub async fn stats(&self) -> ModerationResult<ModerationStats> {
        Ok(ModerationStats {
            pending: self.store.list_by_status(PoiStatus::Pending).await?.len(),
            approved: self.store.list_by_status(PoiStatus::Approved).await?.len(),
            rejected: self.store.list_by_status(PoiStatus::Rejected).await?.len(),
        })
    }

    fn require_moderator(&self, actor: &Actor, action: &str) -> ModerationResult<()> {
        if actor.role.can_moderate() {
            Ok(())
        } else {
            Err(ModerationError::Authorization(format!(
                "role {} cannot {action} points of interest",
                actor.role
            )))
        }
    }

    /// The shared `→ approved` transition behind [`approve`] and
    /// [`reapprove`].
    ///
    /// [`approve`]: Self::approve
    /// [`reapprove`]: Self::reapprove
    async fn apply_approval(
        &self,
        actor: &Actor,
        poi_id: Uuid,
        comments: Option<&str>,
        only_from_rejected: bool,
    ) -> ModerationResult<Poi> {
        let mut tx = self.store.begin().await?;
        let Some(mut poi) = tx.find(poi_id).await? else {
            tx.rollback().await?;
            return Err(ModerationError::NotFound(poi_id));
        };

        match (poi.status, only_from_rejected) {
            (PoiStatus::Pending | PoiStatus::Approved, true) => {
                tx.rollback().await?;
                return Err(ModerationError::NotRejected);
            }
            (PoiStatus::Approved, false) => {
                tx.rollback().await?;
                return Err(ModerationError::AlreadyApproved);
            }
            (PoiStatus::Pending, false) | (PoiStatus::Rejected, _) => {}
        }
        let was_rejected = poi.status == PoiStatus::Rejected;

        let old_values = json!({
            "status": poi.status,
            "approved_by": poi.approved_by,
        });

        poi.status = PoiStatus::Approved;
        poi.approved_by = Some(actor.id);
        poi.is_verify = true;
        poi.updated_at = Utc::now();

        let mut new_values = json!({
            "status": poi.status,
            "approved_by": poi.approved_by,
        });
        if let Some(comments) = comments {
            new_values["comments"] = json!(comments);
        }

        tx.update(poi.clone());
        tx.record_audit(
            AuditEntry::new(POI_TABLE, poi.id, AuditAction::Update, actor.id)
                .with_old_values(old_values)
                .with_new_values(new_values),
        );
        tx.commit().await?;

        tracing::info!(
            poi_id = %poi.id,
            moderator = %actor.id,
            reapproval = was_rejected,
            "POI approved"
        );

        let event = if was_rejected {
            PoiEvent::Reapproved {
                poi_id: poi.id,
                moderator_id: actor.id,
            }
        } else {
            PoiEvent::Approved {
                poi_id: poi.id,
                moderator_id: actor.id,
                comments: comments.map(str::to_string),
            }
        };
        self.dispatcher.dispatch(event.to_event()).await;

        Ok(poi)
    }
}
