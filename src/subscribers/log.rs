//! # LogWriter — event logger
//!
//! A minimal subscriber that forwards incoming [`Event`]s to `tracing`.
//! Counter traffic goes to `debug`, coordination outcomes to `info`, and
//! misuse or subscriber trouble to `warn`/`error`.
//!
//! ## Example output
//! ```text
//! DEBUG [entered] group="doorbell" pending=1
//!  INFO [wait-timed-out] group="doorbell" pending=1 timeout_ms=5000
//! ERROR [unbalanced-leave] group="doorbell" reason="leave() without a matching enter()"
//! ```

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;
use async_trait::async_trait;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let kind = e.kind.as_label();
        let group = e.group.as_deref().unwrap_or("-");
        match e.kind {
            EventKind::Entered | EventKind::Left | EventKind::Drained => {
                tracing::debug!(seq = e.seq, group, pending = ?e.pending, "[{kind}]");
            }
            EventKind::NotifyRegistered | EventKind::NotifyFired => {
                tracing::debug!(seq = e.seq, group, "[{kind}]");
            }
            EventKind::WaitCompleted | EventKind::WaitTimedOut => {
                tracing::info!(
                    seq = e.seq,
                    group,
                    pending = ?e.pending,
                    timeout_ms = ?e.timeout_ms,
                    "[{kind}]"
                );
            }
            EventKind::NotifyRejected | EventKind::SubscriberOverflow => {
                tracing::warn!(seq = e.seq, group, reason = ?e.reason, "[{kind}]");
            }
            EventKind::UnbalancedLeave
            | EventKind::CallbackPanicked
            | EventKind::CallbackLost
            | EventKind::SubscriberPanicked => {
                tracing::error!(seq = e.seq, group, reason = ?e.reason, "[{kind}]");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
