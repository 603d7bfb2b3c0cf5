//! # Event subscribers for rendezvous groups.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and a built-in [`LogWriter`] for handling events broadcast through the
//! [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! enter/leave/wait/notify ── publish(Event) ──► Bus ──► group listener
//!                                                           │
//!                                                     SubscriberSet::emit
//!                                                   ┌───────┼────────┐
//!                                                   ▼       ▼        ▼
//!                                               LogWriter Metrics  Custom
//! ```

#[cfg(feature = "logging")]
mod log;
mod subscribe;
mod subscriber_set;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscribe::Subscribe;
pub(crate) use subscriber_set::panic_message;
pub use subscriber_set::SubscriberSet;
