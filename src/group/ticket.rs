//! # Ticket: scoped membership in a group.
//!
//! A [`Ticket`] is issued by [`RendezvousGroup::ticket`]: issuing it calls
//! `enter()`, dropping it calls `leave()`. This keeps enter/leave balanced on
//! every exit path of a worker, including early returns and panics.
//!
//! ```text
//! let t = group.ticket();   // pending += 1
//! ...work...
//! drop(t);                  // pending -= 1 (callback may fire)
//! ```

use std::fmt;

use crate::error::GroupError;

use super::RendezvousGroup;

/// Guard representing one unit of outstanding work in a group.
#[must_use = "dropping a Ticket leaves the group immediately"]
pub struct Ticket {
    group: RendezvousGroup,
    /// Set once `leave()` has run, so drop does not leave twice.
    released: bool,
}

impl Ticket {
    pub(crate) fn issue(group: &RendezvousGroup) -> Self {
        group.enter();
        Self {
            group: group.clone(),
            released: false,
        }
    }

    /// The group this ticket counts against.
    pub fn group(&self) -> &RendezvousGroup {
        &self.group
    }

    /// Leaves the group now and reports the result.
    ///
    /// Dropping the ticket does the same but discards the result.
    pub fn leave(mut self) -> Result<(), GroupError> {
        self.released = true;
        self.group.leave()
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        if !self.released {
            // misuse is already logged and published by leave()
            let _ = self.group.leave();
        }
    }
}

impl fmt::Debug for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ticket")
            .field("group", &self.group.label())
            .field("released", &self.released)
            .finish()
    }
}
