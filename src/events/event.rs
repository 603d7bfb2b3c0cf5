//! # Events emitted by rendezvous groups.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Counter events**: the pending count moved (entered, left, drained)
//! - **Coordination events**: waits and completion callbacks resolved
//! - **Diagnostic events**: usage errors and subscriber trouble
//!
//! The [`Event`] struct carries metadata such as the timestamp, group label,
//! the pending count observed at the time and an optional reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use rendezvous::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::WaitTimedOut)
//!     .with_group("doorbell")
//!     .with_pending(1)
//!     .with_timeout(Duration::from_secs(5));
//!
//! assert_eq!(ev.kind, EventKind::WaitTimedOut);
//! assert_eq!(ev.group.as_deref(), Some("doorbell"));
//! assert_eq!(ev.timeout_ms, Some(5_000));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of group events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Counter events ===
    /// A unit of work joined the group.
    ///
    /// Sets:
    /// - `group`: group label
    /// - `pending`: count after the increment
    Entered,

    /// A unit of work left the group.
    ///
    /// Sets:
    /// - `group`: group label
    /// - `pending`: count after the decrement
    Left,

    /// The pending count returned to zero; waiters were released.
    ///
    /// Sets:
    /// - `group`: group label
    /// - `pending`: always `0`
    Drained,

    // === Coordination events ===
    /// A completion callback was armed for the current round.
    ///
    /// Sets:
    /// - `group`: group label
    /// - `pending`: count at registration time
    NotifyRegistered,

    /// A completion callback ran to completion.
    ///
    /// Sets:
    /// - `group`: group label
    NotifyFired,

    /// A completion callback panicked; the panic was contained.
    ///
    /// Sets:
    /// - `group`: group label
    /// - `reason`: panic message
    CallbackPanicked,

    /// A completion callback could not be run at all (no thread could be
    /// started for it after its runtime went away).
    ///
    /// Sets:
    /// - `group`: group label
    /// - `reason`: thread spawn error
    CallbackLost,

    /// A waiter observed the pending count at zero.
    ///
    /// Sets:
    /// - `group`: group label
    /// - `timeout_ms`: bound of the wait, if any
    WaitCompleted,

    /// A waiter gave up before the pending count reached zero.
    ///
    /// Sets:
    /// - `group`: group label
    /// - `pending`: count still outstanding
    /// - `timeout_ms`: bound of the wait
    WaitTimedOut,

    // === Diagnostics ===
    /// `leave()` was called with no matching `enter()`.
    ///
    /// Sets:
    /// - `group`: group label
    /// - `reason`: description of the misuse
    UnbalancedLeave,

    /// `notify()` was rejected because a callback is already pending.
    ///
    /// Sets:
    /// - `group`: group label
    /// - `pending`: count at the time
    NotifyRejected,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `reason`: "subscriber=<name> reason=<full|closed>"
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `reason`: subscriber name and panic info
    SubscriberPanicked,
}

impl EventKind {
    /// Returns a short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::Entered => "entered",
            EventKind::Left => "left",
            EventKind::Drained => "drained",
            EventKind::NotifyRegistered => "notify-registered",
            EventKind::NotifyFired => "notify-fired",
            EventKind::CallbackPanicked => "callback-panicked",
            EventKind::CallbackLost => "callback-lost",
            EventKind::WaitCompleted => "wait-completed",
            EventKind::WaitTimedOut => "wait-timed-out",
            EventKind::UnbalancedLeave => "unbalanced-leave",
            EventKind::NotifyRejected => "notify-rejected",
            EventKind::SubscriberOverflow => "subscriber-overflow",
            EventKind::SubscriberPanicked => "subscriber-panicked",
        }
    }
}

/// Group event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Label of the group that emitted the event.
    pub group: Option<Arc<str>>,
    /// Pending count observed when the event was produced.
    pub pending: Option<usize>,
    /// Wait bound in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Human-readable reason (panics, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            group: None,
            pending: None,
            timeout_ms: None,
            reason: None,
        }
    }

    /// Attaches a group label.
    #[inline]
    pub fn with_group(mut self, group: impl Into<Arc<str>>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Attaches the observed pending count.
    #[inline]
    pub fn with_pending(mut self, pending: usize) -> Self {
        self.pending = Some(pending);
        self
    }

    /// Attaches a wait bound (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} info={info}"))
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberPanicked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_increase() {
        let a = Event::new(EventKind::Entered);
        let b = Event::new(EventKind::Left);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn timeout_is_saturated_to_u32() {
        let ev = Event::new(EventKind::WaitTimedOut).with_timeout(Duration::from_secs(u64::MAX));
        assert_eq!(ev.timeout_ms, Some(u32::MAX));
    }

    #[test]
    fn subscriber_helpers_format_reason() {
        let ev = Event::subscriber_overflow("audit", "full");
        assert!(ev.is_subscriber_overflow());
        assert_eq!(ev.reason.as_deref(), Some("subscriber=audit reason=full"));

        let ev = Event::subscriber_panicked("audit", "boom".into());
        assert!(ev.is_subscriber_panic());
        assert_eq!(ev.group, None);
    }
}
