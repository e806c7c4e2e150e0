//! Notification dispatch boundary
//!
//! The dispatcher is the second phase of the commit-then-notify contract.
//! Phase one (the store transaction with its audit entry) either commits or
//! returns an error; phase two hands the resulting event to the bus. A
//! failure in phase two is logged and dropped — it must never surface to the
//! caller of an already-committed transition.

use std::sync::Arc;

use crate::bus::EventBus;
use crate::types::Event;

/// Best-effort notification dispatcher over an event bus.
///
/// Constructed once at startup and injected into the services that publish
/// notifications. There is no retry queue: a failed dispatch is logged at
/// `warn` level and dropped.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use connect_events::{Event, MemoryEventBus, NotificationDispatcher};
///
/// async fn example() {
///     let bus = Arc::new(MemoryEventBus::new());
///     let dispatcher = NotificationDispatcher::new(bus);
///
///     // Never fails from the caller's point of view.
///     dispatcher.dispatch(Event::new("poi.approved", serde_json::json!({}))).await;
/// }
/// ```
#[derive(Clone)]
pub struct NotificationDispatcher {
    bus: Arc<dyn EventBus>,
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher").finish()
    }
}

impl NotificationDispatcher {
    /// Create a dispatcher over the given bus.
    pub fn new(bus: Arc<dyn EventBus>) -> Self {
        Self { bus }
    }

    /// Publish an event, swallowing delivery failures.
    ///
    /// Awaits the publish so callers get deterministic delivery against the
    /// in-memory bus, but the result is always `()`: a bus error is logged
    /// and dropped.
    pub async fn dispatch(&self, event: Event) {
        let topic = event.topic().to_string();
        let event_id = event.id;

        match self.bus.publish(event).await {
            Ok(()) => {
                tracing::debug!(%topic, %event_id, "notification dispatched");
            }
            Err(e) => {
                tracing::warn!(%topic, %event_id, error = %e, "notification dropped");
            }
        }
    }

    /// Publish an event on a background task.
    ///
    /// For callers that must not await delivery at all. Requires a tokio
    /// runtime.
    pub fn dispatch_detached(&self, event: Event) {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            dispatcher.dispatch(event).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{EventBusError, EventBusResult, EventBusStats, MemoryEventBus, Subscription};
    use crate::EventHandler;
    use async_trait::async_trait;

    /// A bus whose publish always fails.
    struct FailingBus;

    #[async_trait]
    impl EventBus for FailingBus {
        async fn publish(&self, _event: Event) -> EventBusResult<()> {
            Err(EventBusError::PublishError("socket layer down".into()))
        }

        async fn subscribe(&self, _topic: &str) -> EventBusResult<Subscription> {
            Err(EventBusError::SubscribeError("unsupported".into()))
        }

        async fn register_handler(
            &self,
            _handler: Arc<dyn EventHandler>,
        ) -> EventBusResult<()> {
            Ok(())
        }

        async fn unsubscribe(&self, _subscription_id: &str) -> EventBusResult<()> {
            Ok(())
        }

        async fn stats(&self) -> EventBusStats {
            EventBusStats::default()
        }
    }

    #[tokio::test]
    async fn test_dispatch_delivers_to_subscribers() {
        let bus = Arc::new(MemoryEventBus::new());
        let mut sub = bus.subscribe("poi.*").await.unwrap();
        let dispatcher = NotificationDispatcher::new(bus);

        dispatcher
            .dispatch(Event::new("poi.rejected", serde_json::json!({})))
            .await;

        let received =
            tokio::time::timeout(std::time::Duration::from_millis(100), sub.recv()).await;
        assert_eq!(received.unwrap().unwrap().event_type, "poi.rejected");
    }

    #[tokio::test]
    async fn test_dispatch_swallows_bus_failures() {
        let dispatcher = NotificationDispatcher::new(Arc::new(FailingBus));

        // Must not panic or propagate anything.
        dispatcher
            .dispatch(Event::new("poi.approved", serde_json::json!({})))
            .await;
    }
}
