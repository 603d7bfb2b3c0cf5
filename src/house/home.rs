//! # House: the doorbell harness.
//!
//! State changes are explicit transitions. Each method performs its side
//! effects and the mutation together:
//!
//! ```text
//! lock(true)    ─► close all windows/doors ─► locked = true  ─► alarm on
//! lock(false)   ─► locked = false ─► alarm off
//! open_window() ─► windows open ─► alarm active? ─► BREAK IN ALERT
//! ring_doorbell(reply)
//!               ─► locked?  yes ─► nobody answers (reply dropped)
//!                           no  ─► responder runs `reply` after `response_delay`
//! ```
//!
//! The alarm system is booted on first use (`OnceCell`), not when the house
//! is created. Booting awaits a timer, so `lock` and `open_window` are async
//! and never park a runtime thread.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::OnceCell;

use super::alarm::AlarmSystem;

/// Timing knobs of the harness.
#[derive(Clone, Debug)]
pub struct HouseConfig {
    /// How long the alarm system takes to boot on first use.
    pub alarm_boot: Duration,
    /// How long the owner takes to answer the door.
    pub response_delay: Duration,
    /// How long a visitor waits at the door.
    pub doorbell_timeout: Duration,
}

impl Default for HouseConfig {
    /// - `alarm_boot = 1s`
    /// - `response_delay = 100ms`
    /// - `doorbell_timeout = 5s`
    fn default() -> Self {
        Self {
            alarm_boot: Duration::from_secs(1),
            response_delay: Duration::from_millis(100),
            doorbell_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug)]
struct HouseState {
    locked: bool,
    windows_closed: bool,
}

/// A house with a lock, windows, a lazily booted alarm and a doorbell.
///
/// Share it between tasks with `Arc<House>`; all methods take `&self`.
#[derive(Debug)]
pub struct House {
    name: String,
    cfg: HouseConfig,
    state: Mutex<HouseState>,
    alarm: OnceCell<AlarmSystem>,
}

impl House {
    pub fn new(name: impl Into<String>, cfg: HouseConfig) -> Self {
        let name = name.into();
        tracing::info!(house = %name, "house is set up");
        Self {
            name,
            cfg,
            state: Mutex::new(HouseState {
                locked: false,
                windows_closed: true,
            }),
            alarm: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &HouseConfig {
        &self.cfg
    }

    pub fn is_locked(&self) -> bool {
        self.lock_state().locked
    }

    pub fn windows_closed(&self) -> bool {
        self.lock_state().windows_closed
    }

    /// True once the alarm system has been booted.
    pub fn alarm_booted(&self) -> bool {
        self.alarm.initialized()
    }

    /// Whether the alarm is armed. Does not boot it.
    pub fn alarm_active(&self) -> bool {
        self.alarm.get().is_some_and(AlarmSystem::is_active)
    }

    /// Break-in alerts raised so far. Does not boot the alarm.
    pub fn alerts(&self) -> usize {
        self.alarm.get().map_or(0, AlarmSystem::alerts)
    }

    /// Locks or unlocks the house.
    ///
    /// Locking closes every window and door first, then arms the alarm.
    /// Unlocking disarms it.
    pub async fn lock(&self, locked: bool) {
        {
            let mut state = self.lock_state();
            if locked {
                state.windows_closed = true;
                tracing::info!(house = %self.name, "locked all doors and windows");
            }
            state.locked = locked;
        }
        self.alarm().await.set_active(locked);
        tracing::info!(
            house = %self.name,
            "{} the house",
            if locked { "locked" } else { "unlocked" }
        );
    }

    /// Opens a window. Returns `true` if that raised a break-in alert.
    pub async fn open_window(&self) -> bool {
        tracing::info!(house = %self.name, "opening a window");
        self.lock_state().windows_closed = false;

        let alarm = self.alarm().await;
        if alarm.is_active() {
            alarm.trigger();
            true
        } else {
            false
        }
    }

    /// Rings the doorbell.
    ///
    /// If somebody is home (house unlocked), `reply` runs on a responder task
    /// after [`HouseConfig::response_delay`] and `true` is returned. A locked
    /// house never answers: `reply` is dropped and `false` is returned.
    pub fn ring_doorbell<F>(&self, reply: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        tracing::info!(house = %self.name, "ring ring");
        if self.is_locked() {
            return false;
        }

        let delay = self.cfg.response_delay;
        match Handle::try_current() {
            Ok(rt) => {
                rt.spawn(async move {
                    tokio::time::sleep(delay).await;
                    reply();
                });
            }
            Err(_) => {
                std::thread::spawn(move || {
                    std::thread::sleep(delay);
                    reply();
                });
            }
        }
        true
    }

    async fn alarm(&self) -> &AlarmSystem {
        self.alarm
            .get_or_init(|| AlarmSystem::boot(self.cfg.alarm_boot))
            .await
    }

    fn lock_state(&self) -> MutexGuard<'_, HouseState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn quick() -> HouseConfig {
        HouseConfig {
            alarm_boot: Duration::ZERO,
            response_delay: Duration::from_millis(10),
            doorbell_timeout: Duration::from_millis(200),
        }
    }

    #[tokio::test]
    async fn alarm_boots_on_first_use_only() {
        let house = House::new("lazy", quick());
        assert!(!house.alarm_booted());

        assert!(!house.open_window().await);
        assert!(house.alarm_booted());
        assert!(!house.alarm_active());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn alarm_boot_lets_other_tasks_run() {
        let house = House::new(
            "slow-alarm",
            HouseConfig {
                alarm_boot: Duration::from_millis(300),
                ..quick()
            },
        );

        let ticks = Arc::new(AtomicUsize::new(0));
        let ticker = {
            let ticks = Arc::clone(&ticks);
            tokio::spawn(async move {
                let mut every = tokio::time::interval(Duration::from_millis(10));
                loop {
                    every.tick().await;
                    ticks.fetch_add(1, Ordering::SeqCst);
                }
            })
        };

        let start = tokio::time::Instant::now();
        assert!(!house.open_window().await);
        assert!(start.elapsed() >= Duration::from_millis(300));
        assert!(ticks.load(Ordering::SeqCst) >= 10);
        ticker.abort();
    }

    #[tokio::test]
    async fn locking_closes_windows_and_arms_alarm() {
        let house = House::new("home", quick());
        house.open_window().await;
        assert!(!house.windows_closed());

        house.lock(true).await;
        assert!(house.is_locked());
        assert!(house.windows_closed());
        assert!(house.alarm_active());

        house.lock(false).await;
        assert!(!house.is_locked());
        assert!(!house.alarm_active());
    }

    #[tokio::test]
    async fn opening_a_window_while_armed_raises_alert() {
        let house = House::new("home", quick());
        house.lock(true).await;

        assert!(house.open_window().await);
        assert_eq!(house.alerts(), 1);
    }

    #[tokio::test]
    async fn locked_house_does_not_answer() {
        let house = House::new("away", quick());
        house.lock(true).await;

        let (tx, rx) = std::sync::mpsc::channel::<()>();
        assert!(!house.ring_doorbell(move || {
            let _ = tx.send(());
        }));
        // reply was dropped without running
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn unlocked_house_answers_from_another_thread() {
        let house = House::new("home", quick());

        let (tx, rx) = std::sync::mpsc::channel();
        assert!(house.ring_doorbell(move || {
            let _ = tx.send(std::thread::current().id());
        }));
        let responder = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_ne!(responder, std::thread::current().id());
    }
}
