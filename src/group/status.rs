/// Outcome of waiting on a [`RendezvousGroup`](crate::RendezvousGroup).
///
/// A timeout is a normal outcome, not an error: outstanding work keeps running
/// and its `leave()` calls still count toward the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaitStatus {
    /// The pending count reached zero before the deadline.
    Completed,
    /// The deadline elapsed while work was still pending.
    TimedOut,
}

impl WaitStatus {
    /// True if the pending count reached zero in time.
    #[inline]
    pub fn is_completed(self) -> bool {
        matches!(self, WaitStatus::Completed)
    }

    /// True if the wait gave up with work still pending.
    #[inline]
    pub fn is_timed_out(self) -> bool {
        matches!(self, WaitStatus::TimedOut)
    }

    /// Returns a short stable label for logs.
    pub fn as_label(self) -> &'static str {
        match self {
            WaitStatus::Completed => "completed",
            WaitStatus::TimedOut => "timed_out",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates_match_the_variant() {
        assert!(WaitStatus::Completed.is_completed());
        assert!(!WaitStatus::Completed.is_timed_out());
        assert!(WaitStatus::TimedOut.is_timed_out());
        assert_eq!(WaitStatus::TimedOut.as_label(), "timed_out");
    }
}
