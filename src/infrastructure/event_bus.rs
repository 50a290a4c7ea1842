//! Fan-out of call events to connected observers
//!
//! Every subscriber owns an unbounded, ordered queue. The bus keeps only
//! the sending halves, keyed by subscriber id. A send that fails means the
//! receiving half is gone, so that subscriber is dropped from the registry
//! during the same publish. Nothing is reported to the publisher.

use crate::domain::call::PhoneEvent;
use crate::domain::shared::error::Result;
use crate::infrastructure::call_metrics as metrics;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Subscriber identifier, unique for the lifetime of the bus
pub type SubscriberId = u64;

/// A serialized event as handed to the stream sink
///
/// `data` is the JSON payload. It is shared between all subscribers that
/// receive the same publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFrame {
    event: &'static str,
    data: Arc<str>,
}

impl EventFrame {
    pub fn encode(event: &PhoneEvent) -> Result<Self> {
        Ok(Self {
            event: event.event_type(),
            data: Arc::from(event.payload_json()?),
        })
    }

    pub fn event(&self) -> &'static str {
        self.event
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    #[cfg(test)]
    pub fn decode(&self) -> Result<PhoneEvent> {
        PhoneEvent::from_parts(self.event, &self.data)
    }
}

/// Registry of live subscriber queues
pub struct EventBus {
    subscribers: Mutex<HashMap<SubscriberId, mpsc::UnboundedSender<EventFrame>>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            subscribers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        })
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<SubscriberId, mpsc::UnboundedSender<EventFrame>>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new subscriber with an empty queue
    pub fn subscribe(self: &Arc<Self>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();

        let count = {
            let mut subscribers = self.registry();
            subscribers.insert(id, tx);
            subscribers.len()
        };
        metrics::update_subscribers(count);
        debug!(subscriber = id, subscribers = count, "Subscriber attached");

        Subscription {
            id,
            rx,
            bus: Arc::downgrade(self),
        }
    }

    /// Remove a subscriber. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriberId) {
        let (removed, count) = {
            let mut subscribers = self.registry();
            let removed = subscribers.remove(&id).is_some();
            (removed, subscribers.len())
        };
        if removed {
            metrics::update_subscribers(count);
            debug!(subscriber = id, subscribers = count, "Subscriber detached");
        }
    }

    /// Enqueue `event` on every subscriber queue
    ///
    /// Returns the number of subscribers that accepted the frame. Never
    /// blocks: queues are unbounded.
    pub fn publish(&self, event: &PhoneEvent) -> usize {
        let frame = match EventFrame::encode(event) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Failed to serialize {} event: {}", event.event_type(), e);
                return 0;
            }
        };

        let (delivered, dropped) = {
            let mut subscribers = self.registry();
            let before = subscribers.len();
            subscribers.retain(|id, tx| {
                if tx.send(frame.clone()).is_ok() {
                    true
                } else {
                    debug!(subscriber = *id, "Dropping closed subscriber");
                    false
                }
            });
            let after = subscribers.len();
            (after, before - after)
        };

        metrics::record_event_published(event.event_type());
        if dropped > 0 {
            metrics::update_subscribers(delivered);
        }
        debug!(event = event.event_type(), recipients = delivered, "Event published");

        delivered
    }

    /// Get number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.registry().len()
    }
}

/// Receiving end of one subscriber's queue
///
/// Dropping it unregisters the subscriber.
pub struct Subscription {
    id: SubscriberId,
    rx: mpsc::UnboundedReceiver<EventFrame>,
    bus: Weak<EventBus>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next frame. `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<EventFrame> {
        self.rx.recv().await
    }

    /// Next frame if one is already queued
    #[cfg(test)]
    pub fn try_recv(&mut self) -> Option<EventFrame> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.unsubscribe(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::call::OperatorStatus;

    #[test]
    fn test_event_bus_creation() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_subscribe_starts_empty() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_publish_reaches_every_subscriber() {
        let bus = EventBus::new();
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        let delivered = bus.publish(&PhoneEvent::status_change(OperatorStatus::Busy));
        assert_eq!(delivered, 2);

        for sub in [&mut sub1, &mut sub2] {
            let frame = sub.recv().await.unwrap();
            assert_eq!(frame.event(), "status_change");
            assert_eq!(frame.data(), r#"{"status":"busy"}"#);
        }
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let bus = EventBus::new();
        let sub = bus.subscribe();
        let id = sub.id();

        bus.unsubscribe(id);
        bus.unsubscribe(id);
        assert_eq!(bus.subscriber_count(), 0);

        // Drop after explicit unsubscribe is harmless too
        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_dropping_subscription_unregisters() {
        let bus = EventBus::new();
        let sub = bus.subscribe();
        let _other = bus.subscribe();
        drop(sub);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn test_closed_queue_is_removed_on_publish() {
        let bus = EventBus::new();
        let mut alive = bus.subscribe();

        // Simulate a broken transport: registry still holds a sender whose
        // receiver is gone.
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        bus.registry().insert(999, tx);
        assert_eq!(bus.subscriber_count(), 2);

        let delivered = bus.publish(&PhoneEvent::call_ended());
        assert_eq!(delivered, 1);
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(alive.try_recv().unwrap().event(), "call_ended");
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(&PhoneEvent::call_ended()), 0);
    }

    #[test]
    fn test_frames_preserve_publish_order() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe();

        bus.publish(&PhoneEvent::status_change(OperatorStatus::Ready));
        bus.publish(&PhoneEvent::call_ended());
        bus.publish(&PhoneEvent::status_change(OperatorStatus::Offline));

        let order: Vec<_> = std::iter::from_fn(|| sub.try_recv())
            .map(|frame| frame.decode().unwrap())
            .collect();
        assert_eq!(
            order,
            vec![
                PhoneEvent::status_change(OperatorStatus::Ready),
                PhoneEvent::call_ended(),
                PhoneEvent::status_change(OperatorStatus::Offline),
            ]
        );
    }

    #[tokio::test]
    async fn test_recv_returns_none_after_bus_dropped() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe();
        drop(bus);
        assert!(sub.recv().await.is_none());
    }
}
