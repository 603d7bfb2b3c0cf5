//! Doorbell harness built on [`RendezvousGroup`](crate::RendezvousGroup).
//!
//! - [`House`]: lock, windows, lazily booted [`AlarmSystem`], doorbell;
//! - [`ring_and_wait`]: one doorbell round, returns a [`DoorbellOutcome`];
//! - [`Burglar`]: rings, waits, and branches inside a completion callback.

mod alarm;
mod burglar;
mod doorbell;
mod home;

pub use alarm::AlarmSystem;
pub use burglar::{Burglar, Verdict, Visit};
pub use doorbell::{ring_and_wait, ring_and_wait_default, DoorbellEvent, DoorbellOutcome};
pub use home::{House, HouseConfig};
