//! Error types used by rendezvous groups.
//!
//! [`GroupError`] covers **usage errors**: calls that indicate a logic bug in the
//! caller (an unmatched `leave()`, a second pending `notify()`), and construction
//! problems (no tokio runtime to attach subscribers or spawned work to).
//!
//! A wait that runs out of time is **not** an error; it is reported through
//! [`WaitStatus::TimedOut`](crate::WaitStatus::TimedOut).
//!
//! Like the event types, errors provide `as_label` / `as_message` helpers for
//! logs and metrics.

use thiserror::Error;

/// # Errors produced by a rendezvous group.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupError {
    /// `leave()` was called while the pending count was already zero.
    ///
    /// This mirrors a double-release bug: the count is left at zero and the
    /// offending call is reported instead of wrapping around.
    #[error("group '{group}': leave() without a matching enter()")]
    UnbalancedLeave {
        /// Label of the group the call was made on.
        group: String,
    },

    /// `notify()` was called while another callback is still waiting to fire.
    ///
    /// The first registration stays in place; the rejected callback is dropped.
    #[error("group '{group}': a completion callback is already pending")]
    NotifyPending {
        /// Label of the group the call was made on.
        group: String,
    },

    /// The operation needs a tokio runtime and none is available.
    #[error("no tokio runtime available for {what}")]
    RuntimeRequired {
        /// What needed the runtime (e.g. "subscribers", "spawn").
        what: &'static str,
    },
}

impl GroupError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use rendezvous::GroupError;
    ///
    /// let err = GroupError::UnbalancedLeave { group: "doorbell".into() };
    /// assert_eq!(err.as_label(), "group_unbalanced_leave");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            GroupError::UnbalancedLeave { .. } => "group_unbalanced_leave",
            GroupError::NotifyPending { .. } => "group_notify_pending",
            GroupError::RuntimeRequired { .. } => "group_runtime_required",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            GroupError::UnbalancedLeave { group } => {
                format!("unbalanced leave on group={group}")
            }
            GroupError::NotifyPending { group } => {
                format!("callback already pending on group={group}")
            }
            GroupError::RuntimeRequired { what } => format!("runtime required: {what}"),
        }
    }

    /// Indicates whether the error is a caller logic bug (as opposed to an
    /// environment problem such as a missing runtime).
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            GroupError::UnbalancedLeave { .. } | GroupError::NotifyPending { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        let unbalanced = GroupError::UnbalancedLeave { group: "g".into() };
        let pending = GroupError::NotifyPending { group: "g".into() };
        let runtime = GroupError::RuntimeRequired { what: "spawn" };

        assert_eq!(unbalanced.as_label(), "group_unbalanced_leave");
        assert_eq!(pending.as_label(), "group_notify_pending");
        assert_eq!(runtime.as_label(), "group_runtime_required");
    }

    #[test]
    fn usage_errors_are_classified() {
        assert!(GroupError::UnbalancedLeave { group: "g".into() }.is_usage_error());
        assert!(GroupError::NotifyPending { group: "g".into() }.is_usage_error());
        assert!(!GroupError::RuntimeRequired { what: "spawn" }.is_usage_error());
    }

    #[test]
    fn display_names_the_group() {
        let err = GroupError::UnbalancedLeave {
            group: "doorbell".into(),
        };
        assert_eq!(
            err.to_string(),
            "group 'doorbell': leave() without a matching enter()"
        );
        assert_eq!(err.as_message(), "unbalanced leave on group=doorbell");
    }
}
