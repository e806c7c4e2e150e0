//! # Connect Moderation
//!
//! This crate implements the POI moderation workflow for the yaoundeConnect
//! platform: the lifecycle of a point of interest from submission through
//! approval or rejection, with a full audit trail and post-commit
//! notifications.
//!
//! ## Overview
//!
//! The connect-moderation crate handles:
//! - **POI Model**: The point-of-interest entity and its status field
//! - **Store Contract**: Transactional persistence behind a trait
//! - **Moderation Service**: The state machine driving status transitions
//! - **Errors**: The moderation error taxonomy with stable discriminants
//!
//! ## Lifecycle
//!
//! ```text
//!              approve
//!   pending ────────────→ approved
//!      │                    │  ▲
//!      │ reject      reject │  │ reapprove
//!      ▼                    ▼  │
//!   rejected ←──────────────┘  │
//!      └───────────────────────┘
//! ```
//!
//! Every POI starts in `pending`. Approval and rejection require a moderator
//! role; rejection additionally requires a human-readable reason. Approving
//! an already-approved POI fails rather than silently succeeding, and only
//! rejected POIs can be reapproved.
//!
//! ## Transaction contract
//!
//! Each transition runs inside one store transaction: the current status is
//! re-read inside the transaction (guarding against concurrent moderation),
//! the guard is validated, the fields are applied, and the audit entry is
//! recorded — then the transaction commits. The notification event is
//! dispatched only after a successful commit and is best-effort: a delivery
//! failure never affects the committed transition.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use connect_events::{MemoryEventBus, NotificationDispatcher};
//! use connect_moderation::{MemoryPoiStore, ModerationConfig, ModerationService, NewPoi};
//! use connect_roles::{Actor, PermissionResolver, Role};
//! use uuid::Uuid;
//!
//! async fn example() -> Result<(), connect_moderation::ModerationError> {
//!     let store = Arc::new(MemoryPoiStore::new());
//!     let dispatcher = NotificationDispatcher::new(Arc::new(MemoryEventBus::new()));
//!     let service = ModerationService::new(
//!         store,
//!         PermissionResolver::default(),
//!         dispatcher,
//!         ModerationConfig::default(),
//!     );
//!
//!     let collector = Actor::new(Uuid::now_v7(), Role::Collecteur);
//!     let poi = service
//!         .submit(&collector, NewPoi::new("Marché Central", "Avenue Kennedy"))
//!         .await?;
//!
//!     let moderator = Actor::new(Uuid::now_v7(), Role::Moderateur);
//!     service.approve(&moderator, poi.id, Some("verified on site")).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod poi;
pub mod service;
pub mod store;

// Re-export main types for convenience
pub use error::{ModerationError, ModerationResult};
pub use poi::{NewPoi, Poi, PoiStatus};
pub use service::{ModerationConfig, ModerationService, ModerationStats, POI_TABLE};
pub use store::{MemoryPoiStore, PoiStore, PoiTransaction, StoreError, StoreResult};
