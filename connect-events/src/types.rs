//! Event types for platform notifications
//!
//! This module defines the generic event envelope plus the typed events the
//! moderation and account services publish.

use chrono::{DateTime, Utc};
use connect_roles::Role;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Notification event envelope.
///
/// All events are wrapped in this envelope, which carries the metadata the
/// socket and email layers need for routing and display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event ID
    pub id: Uuid,

    /// Event type (e.g., "poi.approved", "account.created")
    pub event_type: String,

    /// Timestamp when event was created
    pub timestamp: DateTime<Utc>,

    /// User who triggered the event
    pub actor_id: Option<Uuid>,

    /// Record the event is about (POI or user)
    pub subject_id: Option<Uuid>,

    /// Event version for schema evolution
    pub version: u32,

    /// Event payload
    pub payload: serde_json::Value,

    /// Additional metadata
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Event {
    /// Create a new event.
    ///
    /// # Arguments
    ///
    /// * `event_type` - The dotted event type string
    /// * `payload` - The event payload
    pub fn new(event_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::now_v7(),
            event_type: event_type.into(),
            timestamp: Utc::now(),
            actor_id: None,
            subject_id: None,
            version: 1,
            payload,
            metadata: HashMap::new(),
        }
    }

    /// Set the acting user.
    pub fn with_actor(mut self, actor_id: Uuid) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    /// Set the subject record.
    pub fn with_subject(mut self, subject_id: Uuid) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    /// Add metadata.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Get the routing topic for this event.
    ///
    /// The topic is the dotted event type itself.
    pub fn topic(&self) -> &str {
        &self.event_type
    }

    /// Parse the payload into a specific type.
    pub fn parse_payload<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

// ============================================================================
// POI Events
// ============================================================================

/// Moderation lifecycle events for points of interest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PoiEvent {
    /// A new POI was submitted and awaits moderation
    Submitted {
        poi_id: Uuid,
        name: String,
        created_by: Uuid,
    },
    /// A pending POI was approved
    Approved {
        poi_id: Uuid,
        moderator_id: Uuid,
        comments: Option<String>,
    },
    /// A POI was rejected
    Rejected {
        poi_id: Uuid,
        moderator_id: Uuid,
        reason: String,
    },
    /// A rejected POI was approved again
    Reapproved { poi_id: Uuid, moderator_id: Uuid },
}

impl PoiEvent {
    /// Convert to generic event.
    pub fn to_event(&self) -> Event {
        let (event_type, actor, subject) = match self {
            PoiEvent::Submitted {
                poi_id, created_by, ..
            } => ("poi.submitted", *created_by, *poi_id),
            PoiEvent::Approved {
                poi_id,
                moderator_id,
                ..
            } => ("poi.approved", *moderator_id, *poi_id),
            PoiEvent::Rejected {
                poi_id,
                moderator_id,
                ..
            } => ("poi.rejected", *moderator_id, *poi_id),
            PoiEvent::Reapproved {
                poi_id,
                moderator_id,
            } => ("poi.reapproved", *moderator_id, *poi_id),
        };
        Event::new(event_type, serde_json::to_value(self).unwrap())
            .with_actor(actor)
            .with_subject(subject)
    }
}

// ============================================================================
// Account Events
// ============================================================================

/// User management events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountEvent {
    /// A user account was created
    Created {
        user_id: Uuid,
        role: Role,
        created_by: Uuid,
    },
    /// A user's role was changed
    RoleChanged {
        user_id: Uuid,
        old_role: Role,
        new_role: Role,
        changed_by: Uuid,
    },
    /// A user account was deleted
    Deleted { user_id: Uuid, deleted_by: Uuid },
    /// A password reset was requested on behalf of a user
    PasswordResetRequested { user_id: Uuid, requested_by: Uuid },
}

impl AccountEvent {
    /// Convert to generic event.
    pub fn to_event(&self) -> Event {
        let (event_type, actor, subject) = match self {
            AccountEvent::Created {
                user_id,
                created_by,
                ..
            } => ("account.created", *created_by, *user_id),
            AccountEvent::RoleChanged {
                user_id,
                changed_by,
                ..
            } => ("account.role_changed", *changed_by, *user_id),
            AccountEvent::Deleted {
                user_id,
                deleted_by,
            } => ("account.deleted", *deleted_by, *user_id),
            AccountEvent::PasswordResetRequested {
                user_id,
                requested_by,
            } => ("account.password_reset_requested", *requested_by, *user_id),
        };
        Event::new(event_type, serde_json::to_value(self).unwrap())
            .with_actor(actor)
            .with_subject(subject)
    }
}
