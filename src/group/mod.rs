//! Rendezvous group: counting join primitive and its helpers.
//!
//! - [`rendezvous`]: the [`RendezvousGroup`] itself (enter/leave/wait/notify);
//! - [`ticket`]: RAII membership ([`Ticket`]);
//! - [`builder`]: construction with subscribers or an explicit runtime;
//! - [`status`]: the [`WaitStatus`] returned by waits.

mod builder;
mod rendezvous;
mod status;
mod ticket;

pub use builder::GroupBuilder;
pub use rendezvous::RendezvousGroup;
pub use status::WaitStatus;
pub use ticket::Ticket;
