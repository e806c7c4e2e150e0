//! Event bus implementation
//!
//! This module provides the event bus abstraction the notification layer is
//! built on, plus the in-memory implementation used by the single-process
//! socket layer and the test suites.

use crate::types::Event;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};

/// Event bus error types.
#[derive(Debug, Error)]
pub enum EventBusError {
    /// Failed to publish event
    #[error("Failed to publish event: {0}")]
    PublishError(String),

    /// Failed to subscribe
    #[error("Failed to subscribe: {0}")]
    SubscribeError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Channel closed
    #[error("Channel closed")]
    ChannelClosed,
}

/// Result type for event bus operations.
pub type EventBusResult<T> = Result<T, EventBusError>;

/// Subscription handle for receiving events.
pub struct Subscription {
    /// Subscription ID
    pub id: String,
    /// Topic pattern
    pub topic: String,
    /// Event receiver
    pub receiver: broadcast::Receiver<Event>,
}

impl Subscription {
    /// Receive the next event.
    pub async fn recv(&mut self) -> EventBusResult<Event> {
        self.receiver
            .recv()
            .await
            .map_err(|_| EventBusError::ChannelClosed)
    }
}

/// Event handler trait for processing events.
///
/// Handlers back the push channels (socket broadcast, email). A handler
/// failure is logged and dropped; it never reaches the publisher.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handle an event.
    async fn handle(&self, event: Event) -> EventBusResult<()>;

    /// Get the topics this handler is interested in.
    fn topics(&self) -> Vec<String>;
}

/// Event bus trait for publish/subscribe operations.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish an event.
    async fn publish(&self, event: Event) -> EventBusResult<()>;

    /// Subscribe to a topic pattern.
    ///
    /// Topic patterns support wildcards:
    /// - `*` matches any single segment
    /// - `#` matches zero or more segments
    ///
    /// Examples:
    /// - `poi.*` matches `poi.approved`, `poi.rejected`
    /// - `account.#` matches every account event
    async fn subscribe(&self, topic: &str) -> EventBusResult<Subscription>;

    /// Register an event handler.
    async fn register_handler(&self, handler: Arc<dyn EventHandler>) -> EventBusResult<()>;

    /// Unsubscribe from a topic.
    async fn unsubscribe(&self, subscription_id: &str) -> EventBusResult<()>;

    /// Get event bus stats.
    async fn stats(&self) -> EventBusStats;
}

/// Event bus statistics.
#[derive(Debug, Clone, Default)]
pub struct EventBusStats {
    /// Total events published
    pub events_published: u64,
    /// Active subscriptions
    pub active_subscriptions: usize,
    /// Registered handlers
    pub registered_handlers: usize,
}

/// In-memory event bus implementation.
///
/// Suitable for the single-process deployment model and for testing. The
/// socket layer subscribes here; nothing is persisted and there is no replay.
pub struct MemoryEventBus {
    /// Topic subscribers
    subscribers: Arc<RwLock<HashMap<String, broadcast::Sender<Event>>>>,
    /// Registered handlers
    handlers: Arc<RwLock<Vec<Arc<dyn EventHandler>>>>,
    /// Statistics
    stats: Arc<RwLock<EventBusStats>>,
    /// Default channel capacity
    channel_capacity: usize,
}

impl std::fmt::Debug for MemoryEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryEventBus")
            .field("channel_capacity", &self.channel_capacity)
            .finish()
    }
}

impl MemoryEventBus {
    /// Create a new in-memory event bus.
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create with custom channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
            handlers: Arc::new(RwLock::new(Vec::new())),
            stats: Arc::new(RwLock::new(EventBusStats::default())),
            channel_capacity: capacity,
        }
    }

    /// Check if a topic matches a pattern.
    fn topic_matches(pattern: &str, topic: &str) -> bool {
        let pattern_parts: Vec<&str> = pattern.split('.').collect();
        let topic_parts: Vec<&str> = topic.split('.').collect();

        let mut p_idx = 0;
        let mut t_idx = 0;

        while p_idx < pattern_parts.len() && t_idx < topic_parts.len() {
            match pattern_parts[p_idx] {
                "*" => {
                    // Match single segment
                    p_idx += 1;
                    t_idx += 1;
                }
                "#" => {
                    // Match zero or more segments
                    if p_idx == pattern_parts.len() - 1 {
                        // # at end matches everything remaining
                        return true;
                    }
                    // Try matching remaining pattern
                    for i in t_idx..=topic_parts.len() {
                        if Self::topic_matches(
                            &pattern_parts[p_idx + 1..].join("."),
                            &topic_parts[i..].join("."),
                        ) {
                            return true;
                        }
                    }
                    return false;
                }
                segment => {
                    if segment != topic_parts[t_idx] {
                        return false;
                    }
                    p_idx += 1;
                    t_idx += 1;
                }
            }
        }

        // Handle trailing # in pattern
        if p_idx < pattern_parts.len() && pattern_parts[p_idx] == "#" {
            p_idx += 1;
        }

        p_idx == pattern_parts.len() && t_idx == topic_parts.len()
    }
}

impl Default for MemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventBus for MemoryEventBus {
    async fn publish(&self, event: Event) -> EventBusResult<()> {
        let topic = event.topic().to_string();

        // Update stats
        {
            let mut stats = self.stats.write().await;
            stats.events_published += 1;
        }

        // Notify matching subscribers
        let subscribers = self.subscribers.read().await;
        for (pattern, sender) in subscribers.iter() {
            if Self::topic_matches(pattern, &topic) {
                let _ = sender.send(event.clone());
            }
        }

        // Notify handlers; handler failures stay on the handler side
        let handlers = self.handlers.read().await;
        for handler in handlers.iter() {
            for handler_topic in handler.topics() {
                if Self::topic_matches(&handler_topic, &topic) {
                    let handler = handler.clone();
                    let event = event.clone();
                    tokio::task::spawn(async move {
                        if let Err(e) = handler.handle(event).await {
                            tracing::error!(error = %e, "event handler failed");
                        }
                    });
                    break;
                }
            }
        }

        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> EventBusResult<Subscription> {
        let id = uuid::Uuid::now_v7().to_string();

        let receiver = {
            let mut subscribers = self.subscribers.write().await;

            if let Some(sender) = subscribers.get(topic) {
                sender.subscribe()
            } else {
                let (sender, receiver) = broadcast::channel(self.channel_capacity);
                subscribers.insert(topic.to_string(), sender);
                receiver
            }
        };

        // Update stats
        {
            let mut stats = self.stats.write().await;
            stats.active_subscriptions += 1;
        }

        Ok(Subscription {
            id,
            topic: topic.to_string(),
            receiver,
        })
    }

    async fn register_handler(&self, handler: Arc<dyn EventHandler>) -> EventBusResult<()> {
        let mut handlers = self.handlers.write().await;
        handlers.push(handler);

        // Update stats
        {
            let mut stats = self.stats.write().await;
            stats.registered_handlers += 1;
        }

        Ok(())
    }

    async fn unsubscribe(&self, _subscription_id: &str) -> EventBusResult<()> {
        // Update stats
        {
            let mut stats = self.stats.write().await;
            if stats.active_subscriptions > 0 {
                stats.active_subscriptions -= 1;
            }
        }

        Ok(())
    }

    async fn stats(&self) -> EventBusStats {
        self.stats.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_event_bus_publish_subscribe() {
        let bus = MemoryEventBus::new();

        // Subscribe to topic
        let mut sub = bus.subscribe("poi.*").await.unwrap();

        // Publish event
        let event = Event::new("poi.approved", serde_json::json!({}));
        bus.publish(event.clone()).await.unwrap();

        // Receive event
        let received =
            tokio::time::timeout(std::time::Duration::from_millis(100), sub.recv()).await;

        assert!(received.is_ok());
        assert_eq!(received.unwrap().unwrap().event_type, "poi.approved");
    }

    #[tokio::test]
    async fn test_non_matching_topic_not_delivered() {
        let bus = MemoryEventBus::new();
        let mut sub = bus.subscribe("account.*").await.unwrap();

        let event = Event::new("poi.approved", serde_json::json!({}));
        bus.publish(event).await.unwrap();

        let received =
            tokio::time::timeout(std::time::Duration::from_millis(50), sub.recv()).await;
        assert!(received.is_err());
    }

    #[test]
    fn test_topic_matching() {
        // Exact match
        assert!(MemoryEventBus::topic_matches("poi.approved", "poi.approved"));

        // Single wildcard
        assert!(MemoryEventBus::topic_matches("poi.*", "poi.approved"));
        assert!(MemoryEventBus::topic_matches("*.approved", "poi.approved"));

        // Multi-segment wildcard
        assert!(MemoryEventBus::topic_matches("poi.#", "poi.approved"));
        assert!(MemoryEventBus::topic_matches("#", "account.role_changed"));

        // Non-matches
        assert!(!MemoryEventBus::topic_matches("poi.approved", "poi.rejected"));
        assert!(!MemoryEventBus::topic_matches("account.*", "poi.approved"));
    }

    #[tokio::test]
    async fn test_stats() {
        let bus = MemoryEventBus::new();

        let stats = bus.stats().await;
        assert_eq!(stats.events_published, 0);
        assert_eq!(stats.active_subscriptions, 0);

        let _sub = bus.subscribe("poi.*").await.unwrap();
        let stats = bus.stats().await;
        assert_eq!(stats.active_subscriptions, 1);

        let event = Event::new("poi.submitted", serde_json::json!({}));
        bus.publish(event).await.unwrap();

        let stats = bus.stats().await;
        assert_eq!(stats.events_published, 1);
    }
}
