//! Per-observer stream session
//!
//! A session starts with the snapshot frames captured at attach time and
//! then relays every live frame from its subscription, in publish order.
//! Dropping the session (for example when the client disconnects and the
//! response stream is dropped) unsubscribes it from the bus.

use crate::application::call_service::CallService;
use crate::infrastructure::event_bus::{EventFrame, SubscriberId, Subscription};
use futures::stream::{self, Stream};
use std::collections::VecDeque;
use tracing::debug;

pub struct SubscriptionSession {
    pending: VecDeque<EventFrame>,
    subscription: Subscription,
}

impl SubscriptionSession {
    pub fn open(service: &CallService) -> Self {
        let (subscription, snapshot) = service.attach();
        debug!(
            subscriber = subscription.id(),
            snapshot_events = snapshot.len(),
            "Session opened"
        );
        Self {
            pending: snapshot.into(),
            subscription,
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.subscription.id()
    }

    /// Next frame to deliver, waiting for a live event if needed
    pub async fn next(&mut self) -> Option<EventFrame> {
        match self.pending.pop_front() {
            Some(frame) => Some(frame),
            None => self.subscription.recv().await,
        }
    }

    /// Next frame if one is ready without waiting
    #[cfg(test)]
    pub fn try_next(&mut self) -> Option<EventFrame> {
        self.pending
            .pop_front()
            .or_else(|| self.subscription.try_recv())
    }

    /// Turn the session into a stream for the transport
    pub fn into_stream(self) -> impl Stream<Item = EventFrame> + Send + 'static {
        stream::unfold(self, |mut session| async move {
            let frame = session.next().await?;
            Some((frame, session))
        })
    }
}

impl Drop for SubscriptionSession {
    fn drop(&mut self) {
        debug!(subscriber = self.subscription.id(), "Session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulatorConfig;
    use crate::domain::call::{Call, Command, OperatorStatus, PhoneEvent, StatusChanged};
    use futures::StreamExt;
    use std::sync::Arc;

    fn service(initial_status: &str) -> Arc<CallService> {
        CallService::new(&SimulatorConfig {
            initial_status: initial_status.to_string(),
            ..SimulatorConfig::default()
        })
    }

    fn drain(session: &mut SubscriptionSession) -> Vec<PhoneEvent> {
        std::iter::from_fn(|| session.try_next())
            .map(|frame| frame.decode().unwrap())
            .collect()
    }

    fn ring(service: &Arc<CallService>) -> Call {
        service.execute(Command::AutoIncoming {
            number: "+79001234567".to_string(),
        });
        service.snapshot().active_call().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_busy_idle_snapshot_is_single_status_change() {
        let service = service("busy");
        let mut session = SubscriptionSession::open(&service);

        assert_eq!(
            drain(&mut session),
            vec![PhoneEvent::status_change(OperatorStatus::Busy)]
        );
    }

    #[tokio::test]
    async fn test_incoming_call_snapshot_order() {
        let service = service("ready");
        let call = ring(&service);

        let mut session = SubscriptionSession::open(&service);
        assert_eq!(
            drain(&mut session),
            vec![
                PhoneEvent::status_change(OperatorStatus::Ready),
                PhoneEvent::call_incoming(&call),
            ]
        );
    }

    #[tokio::test]
    async fn test_snapshot_precedes_live_events() {
        let service = service("ready");
        let mut session = SubscriptionSession::open(&service);
        service.execute(Command::Hangup);

        assert_eq!(
            drain(&mut session),
            vec![
                PhoneEvent::status_change(OperatorStatus::Ready),
                PhoneEvent::call_ended(),
            ]
        );
    }

    #[tokio::test]
    async fn test_concurrent_sessions_see_identical_sequence() {
        let service = service("offline");
        let first = SubscriptionSession::open(&service);
        let second = SubscriptionSession::open(&service);

        let producer = {
            let service = service.clone();
            tokio::spawn(async move {
                service.execute(Command::SetOperatorStatus {
                    status: OperatorStatus::Ready,
                });
                service.execute(Command::Dial {
                    phone: Some("+1555".to_string()),
                });
                service.execute(Command::Answer);
                service.execute(Command::Hangup);
            })
        };

        let collect = |session: SubscriptionSession| {
            tokio::spawn(async move {
                session
                    .into_stream()
                    .take(4)
                    .map(|frame| frame.decode().unwrap())
                    .collect::<Vec<_>>()
                    .await
            })
        };
        let first = collect(first);
        let second = collect(second);

        producer.await.unwrap();
        let first = first.await.unwrap();
        let second = second.await.unwrap();

        assert_eq!(first, second);
        let types: Vec<_> = first.iter().map(PhoneEvent::event_type).collect();
        assert_eq!(
            types,
            vec!["status_change", "status_change", "call_connected", "call_ended"]
        );
        assert_eq!(first[0], PhoneEvent::status_change(OperatorStatus::Offline));
        assert_eq!(first[1], PhoneEvent::status_change(OperatorStatus::Ready));
    }

    fn status_number(event: &PhoneEvent) -> u32 {
        match event {
            PhoneEvent::StatusChange(StatusChanged { status }) => status
                .as_str()
                .and_then(|s| s.strip_prefix('s'))
                .and_then(|n| n.parse().ok())
                .unwrap(),
            other => panic!("unexpected event {}", other.event_type()),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_sessions_opened_mid_stream_miss_and_repeat_nothing() {
        const TRANSITIONS: u32 = 1_000;
        let service = service("s0");

        let producer = {
            let service = service.clone();
            tokio::task::spawn_blocking(move || {
                for n in 1..=TRANSITIONS {
                    service.execute(Command::SetOperatorStatus {
                        status: OperatorStatus::Custom(format!("s{n}")),
                    });
                }
            })
        };

        let mut sessions = vec![SubscriptionSession::open(&service)];
        while !producer.is_finished() && sessions.len() < 200 {
            sessions.push(SubscriptionSession::open(&service));
            tokio::task::yield_now().await;
        }
        producer.await.unwrap();

        for session in &mut sessions {
            let numbers: Vec<u32> = drain(session).iter().map(status_number).collect();
            let first = numbers[0];
            let expected: Vec<u32> = (first..=TRANSITIONS).collect();
            assert_eq!(numbers, expected);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_incoming_injection_races_with_commands() {
        const ROUNDS: usize = 500;
        let service = CallService::new(&SimulatorConfig {
            connect_delay_ms: 600_000,
            ..SimulatorConfig::default()
        });
        let mut session = SubscriptionSession::open(&service);

        let injector = {
            let service = service.clone();
            tokio::task::spawn_blocking(move || {
                (0..ROUNDS)
                    .filter(|_| {
                        !service
                            .execute(Command::AutoIncoming {
                                number: "+79001234567".to_string(),
                            })
                            .is_noop()
                    })
                    .count()
            })
        };
        let operator = {
            let service = service.clone();
            tokio::task::spawn_blocking(move || {
                for _ in 0..ROUNDS {
                    service.execute(Command::Dial {
                        phone: Some("+1555".to_string()),
                    });
                    service.execute(Command::Hangup);
                }
            })
        };

        let injected = injector.await.unwrap();
        operator.await.unwrap();

        let events = drain(&mut session);
        assert_eq!(events[0].event_type(), PhoneEvent::STATUS_CHANGE);

        let mut ids = std::collections::HashSet::new();
        let mut ringing = false;
        for event in &events[1..] {
            match event {
                PhoneEvent::CallIncoming(incoming) => {
                    // A call is only injected while idle
                    assert!(!ringing);
                    ringing = true;
                    assert!(incoming.call_id.as_str().starts_with("inc_"));
                    assert!(ids.insert(incoming.call_id.as_str().to_string()));
                }
                PhoneEvent::CallEnded(_) => ringing = false,
                other => panic!("unexpected event {}", other.event_type()),
            }
        }
        assert_eq!(ids.len(), injected);
    }

    #[tokio::test]
    async fn test_dropping_session_unsubscribes() {
        let service = service("ready");
        let session = SubscriptionSession::open(&service);
        assert_eq!(service.subscriber_count(), 1);

        let stream = session.into_stream();
        drop(stream);
        assert_eq!(service.subscriber_count(), 0);

        // Publishing afterwards is unaffected
        service.execute(Command::Hangup);
    }
}
