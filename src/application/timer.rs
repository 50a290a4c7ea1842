//! Timer-driven transitions
//!
//! Timers never touch state directly. They issue ordinary commands
//! through [`CallService::execute`], the same path external commands take.
//! Both hold only a weak reference to the service and stop once it is
//! gone.

use crate::application::call_service::CallService;
use crate::domain::call::Command;
use crate::domain::shared::value_objects::CallId;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

pub struct TimerEngine;

impl TimerEngine {
    /// Issue `ConnectCall(call_id)` once, after `delay`
    ///
    /// If the call has ended or been replaced by then, the id no longer
    /// matches and the command is a no-op.
    pub fn schedule_connect(
        service: &Arc<CallService>,
        call_id: CallId,
        delay: Duration,
    ) -> JoinHandle<()> {
        let service = Arc::downgrade(service);
        debug!(call_id = %call_id, delay_ms = delay.as_millis() as u64, "Connect timer scheduled");

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(service) = service.upgrade() else {
                return;
            };
            let transition = service.execute(Command::ConnectCall {
                call_id: call_id.clone(),
            });
            if transition.is_noop() {
                debug!(call_id = %call_id, "Connect timer fired for stale call");
            } else {
                info!(call_id = %call_id, "Simulated call connected");
            }
        })
    }

    /// Inject a simulated inbound call every `period` while idle
    ///
    /// The first attempt happens one full period after start. Whether a
    /// call is active is decided inside the state lock at fire time.
    /// Returns `None` for a zero period.
    pub fn spawn_incoming_simulator(
        service: &Arc<CallService>,
        period: Duration,
        number: String,
    ) -> Option<JoinHandle<()>> {
        if period.is_zero() {
            warn!("Incoming call interval is zero, simulator not started");
            return None;
        }

        let service = Arc::downgrade(service);
        info!(interval_secs = period.as_secs(), number = %number, "Incoming call simulator started");

        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let Some(service) = service.upgrade() else {
                    break;
                };
                let transition = service.execute(Command::AutoIncoming {
                    number: number.clone(),
                });
                if transition.is_noop() {
                    debug!("Call in progress, simulated incoming call skipped");
                } else {
                    info!("Simulated incoming call injected");
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulatorConfig;
    use crate::domain::call::{CallState, PhoneEvent};
    use crate::infrastructure::event_bus::Subscription;

    const NUMBER: &str = "+79001234567";

    fn service() -> Arc<CallService> {
        CallService::new(&SimulatorConfig::default())
    }

    fn drain(subscription: &mut Subscription) -> Vec<PhoneEvent> {
        std::iter::from_fn(|| subscription.try_recv())
            .map(|frame| frame.decode().unwrap())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulator_waits_one_period() {
        let service = service();
        let (mut sub, _) = service.attach();
        let handle =
            TimerEngine::spawn_incoming_simulator(&service, Duration::from_secs(30), NUMBER.to_string())
                .unwrap();

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert!(service.snapshot().active_call().is_none());

        tokio::time::sleep(Duration::from_secs(2)).await;
        let call = service.snapshot().active_call().cloned().unwrap();
        assert_eq!(call.state(), CallState::Incoming);
        assert_eq!(call.phone_number(), Some(NUMBER));
        assert_eq!(drain(&mut sub), vec![PhoneEvent::call_incoming(&call)]);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulator_skips_while_call_active() {
        let service = service();
        let handle =
            TimerEngine::spawn_incoming_simulator(&service, Duration::from_secs(30), NUMBER.to_string())
                .unwrap();

        tokio::time::sleep(Duration::from_secs(31)).await;
        let first = service.snapshot().active_call().cloned().unwrap();
        let (mut sub, _) = service.attach();

        // Two more ticks while the first call is still ringing
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(service.snapshot().active_call(), Some(&first));
        assert!(drain(&mut sub).is_empty());

        // Once idle again the next tick rings exactly once
        service.execute(Command::Hangup);
        assert_eq!(drain(&mut sub), vec![PhoneEvent::call_ended()]);
        tokio::time::sleep(Duration::from_secs(30)).await;
        let events = drain(&mut sub);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), PhoneEvent::CALL_INCOMING);
        assert_ne!(service.snapshot().active_call().unwrap().id(), first.id());

        handle.abort();
    }

    #[tokio::test]
    async fn test_zero_period_is_rejected() {
        let service = service();
        assert!(TimerEngine::spawn_incoming_simulator(&service, Duration::ZERO, NUMBER.to_string())
            .is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_timer_stops_when_service_dropped() {
        let service = service();
        let handle = TimerEngine::schedule_connect(&service, CallId::dialed(), Duration::from_secs(2));
        drop(service);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(handle.is_finished());
    }
}
