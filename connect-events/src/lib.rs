//! # Connect Events
//!
//! This crate provides the notification event bus for the yaoundeConnect
//! platform. The moderation and account services publish events here after a
//! transaction commits; the socket and email layers subscribe to push them to
//! users.
//!
//! ## Overview
//!
//! The connect-events crate handles:
//! - **Event Types**: Strongly-typed POI and account events
//! - **Event Bus**: Publish/subscribe messaging with topic wildcards
//! - **Notification Dispatch**: The best-effort, post-commit delivery boundary
//!
//! ## Delivery contract
//!
//! Notification delivery is deliberately weaker than persistence: an event is
//! dispatched only after its transaction has committed, delivery is
//! best-effort with no retry queue, and a failed dispatch is logged and
//! dropped. A notification failure never unwinds a committed transition.
//! No ordering is guaranteed between notifications.
//!
//! ## Usage
//!
//! ### Publishing Events
//!
//! ```rust,no_run
//! use connect_events::{EventBus, MemoryEventBus, PoiEvent};
//! use uuid::Uuid;
//!
//! async fn publish_example() {
//!     let bus = MemoryEventBus::new();
//!
//!     let event = PoiEvent::Approved {
//!         poi_id: Uuid::now_v7(),
//!         moderator_id: Uuid::now_v7(),
//!         comments: Some("looks good".to_string()),
//!     };
//!
//!     bus.publish(event.to_event()).await.unwrap();
//! }
//! ```
//!
//! ### Subscribing to Events
//!
//! ```rust,no_run
//! use connect_events::{EventBus, MemoryEventBus};
//!
//! async fn subscribe_example() {
//!     let bus = MemoryEventBus::new();
//!
//!     // All POI moderation events
//!     let mut sub = bus.subscribe("poi.*").await.unwrap();
//!
//!     // Or every event on the platform
//!     let mut all = bus.subscribe("#").await.unwrap();
//!
//!     while let Ok(event) = sub.recv().await {
//!         println!("received: {}", event.event_type);
//!     }
//! }
//! ```
//!
//! ## Topic Patterns
//!
//! Topics are dotted event types:
//! - `poi.approved` - Specific event
//! - `poi.*` - All POI events
//! - `account.#` - All account events
//! - `#` - All events
//!
//! Wildcards:
//! - `*` matches exactly one segment
//! - `#` matches zero or more segments

pub mod bus;
pub mod dispatch;
pub mod types;

// Re-export main types
pub use bus::{
    EventBus, EventBusError, EventBusResult, EventBusStats, EventHandler, MemoryEventBus,
    Subscription,
};
pub use dispatch::NotificationDispatcher;
pub use types::{AccountEvent, Event, PoiEvent};
