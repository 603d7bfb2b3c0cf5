use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Alarm system of a [`House`](crate::House).
///
/// Booting is slow, so a house creates it on first use only.
#[derive(Debug)]
pub struct AlarmSystem {
    active: AtomicBool,
    alerts: AtomicUsize,
}

impl AlarmSystem {
    /// Boots the alarm; suspends the caller for `boot_time`.
    pub(crate) async fn boot(boot_time: Duration) -> Self {
        tracing::info!(?boot_time, "alarm system is booting");
        if !boot_time.is_zero() {
            tokio::time::sleep(boot_time).await;
        }
        tracing::info!("alarm system is ready");
        Self {
            active: AtomicBool::new(false),
            alerts: AtomicUsize::new(0),
        }
    }

    /// Whether the alarm is armed.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Number of break-in alerts raised so far.
    pub fn alerts(&self) -> usize {
        self.alerts.load(Ordering::Acquire)
    }

    /// Switches the alarm on or off; logs only on an actual change.
    pub(crate) fn set_active(&self, active: bool) {
        let was = self.active.swap(active, Ordering::AcqRel);
        match (was, active) {
            (false, true) => tracing::info!("alarm activated"),
            (true, false) => tracing::warn!("alarm deactivated"),
            _ => {}
        }
    }

    pub(crate) fn trigger(&self) {
        let n = self.alerts.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::warn!(alerts = n, "BREAK IN ALERT");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn toggling_and_alerts() {
        let alarm = AlarmSystem::boot(Duration::ZERO).await;
        assert!(!alarm.is_active());

        alarm.set_active(true);
        alarm.set_active(true);
        assert!(alarm.is_active());

        alarm.trigger();
        alarm.trigger();
        assert_eq!(alarm.alerts(), 2);

        alarm.set_active(false);
        assert!(!alarm.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn boot_takes_its_time() {
        let start = tokio::time::Instant::now();
        AlarmSystem::boot(Duration::from_millis(300)).await;
        assert!(start.elapsed() >= Duration::from_millis(300));
    }
}
