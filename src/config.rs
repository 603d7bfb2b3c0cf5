//! # Group configuration.
//!
//! Provides [`Config`], the settings a [`RendezvousGroup`](crate::RendezvousGroup)
//! is built with.
//!
//! Config is used in two ways:
//! 1. **Group creation**: `GroupBuilder::new(config).build()`
//! 2. **Wait defaults**: `group.wait_default()` uses [`Config::default_timeout`]
//!
//! ## Sentinel values
//! - `wait_timeout = 0s` → no default timeout (`wait_default` waits until drained)

use std::borrow::Cow;
use std::time::Duration;

/// Configuration for a rendezvous group.
///
/// ## Field semantics
/// - `label`: Name used in logs, events and errors
/// - `wait_timeout`: Default bound for `wait_default` (`0s` = unbounded)
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
#[derive(Clone, Debug)]
pub struct Config {
    /// Human-readable group name.
    pub label: Cow<'static, str>,

    /// Default timeout applied by `wait_default`.
    ///
    /// - `Duration::ZERO` = wait until the pending count drains
    /// - `> 0` = bounded wait
    pub wait_timeout: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow listeners that lag behind more than `bus_capacity` events skip
    /// older items. Minimum value is 1 (enforced by Bus).
    pub bus_capacity: usize,
}

impl Config {
    /// Creates the default configuration with a custom label.
    pub fn labeled(label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Returns the default wait timeout as an `Option`.
    ///
    /// - `None` → wait until drained
    /// - `Some(d)` → bounded wait
    #[inline]
    pub fn default_timeout(&self) -> Option<Duration> {
        if self.wait_timeout == Duration::ZERO {
            None
        } else {
            Some(self.wait_timeout)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `label = "group"`
    /// - `wait_timeout = 5s`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            label: Cow::Borrowed("group"),
            wait_timeout: Duration::from_secs(5),
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timeout_means_unbounded() {
        let cfg = Config {
            wait_timeout: Duration::ZERO,
            ..Config::default()
        };
        assert_eq!(cfg.default_timeout(), None);
        assert_eq!(
            Config::default().default_timeout(),
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn bus_capacity_is_clamped() {
        let cfg = Config {
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }

    #[test]
    fn labeled_keeps_other_defaults() {
        let cfg = Config::labeled("burglar");
        assert_eq!(cfg.label, "burglar");
        assert_eq!(cfg.bus_capacity, 1024);
    }
}
