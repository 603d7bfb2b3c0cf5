//! # Doorbell round: one producer (the responder), one waiting coordinator.
//!
//! ```text
//! coordinator                          responder task
//!   group.enter()
//!   house.ring_doorbell(reply) ──────► sleep(response_delay)
//!   group.wait(timeout)                event.answer()
//!     │                                group.leave()  ─┐
//!     ▼                                                │
//!   Completed ◄───────────────────────────────────────┘
//!   TimedOut  (nobody came; reply never runs)
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::group::{RendezvousGroup, WaitStatus};

use super::home::House;

/// Shared flag set by whoever answers the door.
#[derive(Debug, Default)]
pub struct DoorbellEvent {
    answered: AtomicBool,
}

impl DoorbellEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(&self) {
        self.answered.store(true, Ordering::Release);
    }

    pub fn is_answered(&self) -> bool {
        self.answered.load(Ordering::Acquire)
    }
}

/// What the coordinator observed after waiting at the door.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorbellOutcome {
    pub status: WaitStatus,
    pub answered: bool,
}

/// Rings `house` and waits up to `timeout` for somebody to answer.
pub async fn ring_and_wait(house: &House, timeout: Duration) -> DoorbellOutcome {
    let group = RendezvousGroup::labeled("doorbell");
    let event = Arc::new(DoorbellEvent::new());

    group.enter();
    house.ring_doorbell(responder(&group, &event));
    let status = group.wait(timeout).await;

    DoorbellOutcome {
        status,
        answered: event.is_answered(),
    }
}

/// [`ring_and_wait`] bounded by the house's [`HouseConfig::doorbell_timeout`].
///
/// [`HouseConfig::doorbell_timeout`]: super::HouseConfig::doorbell_timeout
pub async fn ring_and_wait_default(house: &House) -> DoorbellOutcome {
    ring_and_wait(house, house.config().doorbell_timeout).await
}

/// Builds the reply closure: mark the event answered, then leave the group.
pub(crate) fn responder(
    group: &RendezvousGroup,
    event: &Arc<DoorbellEvent>,
) -> impl FnOnce() + Send + 'static {
    let group = group.clone();
    let event = Arc::clone(event);
    move || {
        event.answer();
        if let Err(e) = group.leave() {
            tracing::error!(error = %e, "doorbell responder left an idle group");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::house::HouseConfig;
    use tokio::time::Instant;

    fn house(response_delay: Duration) -> House {
        House::new(
            "test",
            HouseConfig {
                alarm_boot: Duration::ZERO,
                response_delay,
                doorbell_timeout: Duration::from_secs(5),
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn default_round_waits_for_the_house_timeout() {
        let house = house(Duration::from_secs(10));

        let start = Instant::now();
        let outcome = ring_and_wait_default(&house).await;

        assert_eq!(outcome.status, WaitStatus::TimedOut);
        assert!(start.elapsed() >= Duration::from_secs(5));
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn owner_at_home_answers_promptly() {
        let house = house(Duration::from_millis(100));

        let start = Instant::now();
        let outcome = ring_and_wait(&house, Duration::from_secs(5)).await;

        assert_eq!(
            outcome,
            DoorbellOutcome {
                status: WaitStatus::Completed,
                answered: true
            }
        );
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn locked_house_times_out() {
        let house = house(Duration::from_millis(100));
        house.lock(true).await;

        let start = Instant::now();
        let outcome = ring_and_wait(&house, Duration::from_secs(5)).await;

        assert_eq!(outcome.status, WaitStatus::TimedOut);
        assert!(!outcome.answered);
        assert!(start.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_owner_misses_the_visitor() {
        let house = house(Duration::from_secs(10));

        let outcome = ring_and_wait(&house, Duration::from_secs(5)).await;
        assert_eq!(outcome.status, WaitStatus::TimedOut);
        assert!(!outcome.answered);
    }
}
