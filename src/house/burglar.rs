//! # Burglar: the doorbell round with a branching completion callback.
//!
//! The burglar rings, waits a bounded time, then decides:
//! - **Completed**: somebody answered the door. The verdict is read inside a
//!   `notify` callback and handed back through a oneshot channel.
//! - **TimedOut**: nobody came, the house is burglable. A late answer can
//!   still arrive; it is logged by a callback armed for that case.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;

use crate::error::GroupError;
use crate::group::{RendezvousGroup, WaitStatus};

use super::doorbell::{responder, DoorbellEvent};
use super::home::{House, HouseConfig};

/// Decision taken after ringing a house.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Somebody answered; leave quickly.
    OwnerHome,
    /// Nobody answered within the burglar's patience.
    Burglable,
}

/// Result of a full visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    pub verdict: Verdict,
    /// True if breaking in tripped the alarm.
    pub alarm_raised: bool,
}

/// A visitor who checks whether anybody is home before breaking in.
#[derive(Debug, Clone)]
pub struct Burglar {
    patience: Duration,
}

impl Default for Burglar {
    /// Waits as long as [`HouseConfig::default`]'s `doorbell_timeout`.
    fn default() -> Self {
        Self::new(HouseConfig::default().doorbell_timeout)
    }
}

impl Burglar {
    pub fn new(patience: Duration) -> Self {
        Self { patience }
    }

    /// A burglar as patient as visitors of `house` are expected to be.
    pub fn for_house(house: &House) -> Self {
        Self::new(house.config().doorbell_timeout)
    }

    pub fn patience(&self) -> Duration {
        self.patience
    }

    /// Rings `house` and decides whether it is burglable.
    pub async fn check(&self, house: &House) -> Result<Verdict, GroupError> {
        let group = RendezvousGroup::labeled("burglar");
        let event = Arc::new(DoorbellEvent::new());

        group.enter();
        house.ring_doorbell(responder(&group, &event));

        match group.wait(self.patience).await {
            WaitStatus::Completed => {
                let (tx, rx) = oneshot::channel();
                let seen = Arc::clone(&event);
                group.notify(move || {
                    let _ = tx.send(seen.is_answered());
                })?;

                // a dropped sender means the callback died; assume somebody is home
                let answered = rx.await.unwrap_or(true);
                Ok(if answered {
                    Verdict::OwnerHome
                } else {
                    Verdict::Burglable
                })
            }
            WaitStatus::TimedOut => {
                let house_name = house.name().to_string();
                group.notify(move || {
                    tracing::debug!(house = %house_name, "door answered after the burglar gave up");
                })?;
                Ok(Verdict::Burglable)
            }
        }
    }

    /// Checks `house` and breaks in through a window if nobody is home.
    pub async fn visit(&self, house: &House) -> Result<Visit, GroupError> {
        let verdict = self.check(house).await?;
        let alarm_raised = match verdict {
            Verdict::Burglable => house.open_window().await,
            Verdict::OwnerHome => {
                tracing::info!(house = %house.name(), "owner is home, moving on");
                false
            }
        };
        Ok(Visit {
            verdict,
            alarm_raised,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn house() -> House {
        House::new(
            "target",
            HouseConfig {
                alarm_boot: Duration::ZERO,
                response_delay: Duration::from_millis(100),
                doorbell_timeout: Duration::from_secs(5),
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn owner_home_means_no_break_in() {
        let house = house();
        let visit = Burglar::default().visit(&house).await.unwrap();

        assert_eq!(
            visit,
            Visit {
                verdict: Verdict::OwnerHome,
                alarm_raised: false
            }
        );
        assert!(house.windows_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn locked_house_is_burglable_and_alarm_trips() {
        let house = house();
        house.open_window().await;
        house.lock(true).await;

        let visit = Burglar::default().visit(&house).await.unwrap();

        assert_eq!(visit.verdict, Verdict::Burglable);
        assert!(visit.alarm_raised);
        assert_eq!(house.alerts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn impatient_burglar_leaves_before_slow_owner() {
        let house = house();
        let burglar = Burglar::new(Duration::from_millis(50));

        assert_eq!(burglar.check(&house).await.unwrap(), Verdict::Burglable);
    }

    #[tokio::test(start_paused = true)]
    async fn burglar_for_house_uses_its_doorbell_timeout() {
        let house = House::new(
            "quick-door",
            HouseConfig {
                alarm_boot: Duration::ZERO,
                response_delay: Duration::from_millis(100),
                doorbell_timeout: Duration::from_millis(50),
            },
        );
        let burglar = Burglar::for_house(&house);
        assert_eq!(burglar.patience(), Duration::from_millis(50));
        assert_eq!(burglar.check(&house).await.unwrap(), Verdict::Burglable);

        assert_eq!(
            Burglar::default().patience(),
            HouseConfig::default().doorbell_timeout
        );
    }
}
