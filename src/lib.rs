//! # rendezvous
//!
//! **rendezvous** is a small coordination library for Rust.
//!
//! It provides a counting join primitive, [`RendezvousGroup`], that lets a
//! coordinator wait (under a bounded timeout) until a set of asynchronously
//! started units of work complete, and then run a one-shot completion callback.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   worker #1  │   │   worker #2  │   │   worker #3  │
//!     │ (task/thread)│   │ (task/thread)│   │ (task/thread)│
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ enter/leave      │ enter/leave      │ Ticket (RAII)
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  RendezvousGroup                                                  │
//! │  - Mutex<{ pending, callback }>                                   │
//! │  - Notify (async waiters) + Condvar (blocking waiters)            │
//! │  - Bus (broadcast events)                                         │
//! └──────┬──────────────────────┬──────────────────────────────┬──────┘
//!        ▼                      ▼                              ▼
//!   wait(timeout)         notify(callback)              group listener
//!   Completed / TimedOut  runs on runtime/thread        (if subscribers)
//!                                                              ▼
//!                                                        SubscriberSet
//!                                                     ┌────────┼────────┐
//!                                                     ▼        ▼        ▼
//!                                                 LogWriter  sub2     subN
//! ```
//!
//! ### Round lifecycle
//! ```text
//! enter() ×N ──► pending = N
//!   ├─► notify(cb)       arms the slot (or fires at once if pending = 0)
//!   ├─► wait(T)          suspends until pending = 0 or T elapses
//!   ├─► leave() ×N       pending → 0:
//!   │                      ├─ wake every waiter ──► Completed
//!   │                      ├─ publish Drained
//!   │                      └─ schedule cb (exactly once), slot freed
//!   └─► leave() at 0     ──► GroupError::UnbalancedLeave (count stays 0)
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                         |
//! |-------------------|----------------------------------------------------------|--------------------------------------------|
//! | **Join**          | Count outstanding work, wait with a timeout.             | [`RendezvousGroup`], [`WaitStatus`]        |
//! | **Scoped work**   | Balanced enter/leave via guards or spawned tasks.        | [`Ticket`], [`RendezvousGroup::spawn`]     |
//! | **Subscriber API**| Hook into group events (logging, metrics, audits).       | [`Subscribe`], [`SubscriberSet`]           |
//! | **Errors**        | Typed usage errors.                                      | [`GroupError`]                             |
//! | **Configuration** | Labels, default timeout, bus capacity.                   | [`Config`], [`GroupBuilder`]               |
//! | **Harness**       | Doorbell / burglar scenarios.                            | [`House`], [`Burglar`], [`ring_and_wait`]  |
//!
//! ## Optional features
//! - `logging` (default): exports the built-in `LogWriter` subscriber.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use rendezvous::{RendezvousGroup, WaitStatus};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let group = RendezvousGroup::labeled("apples");
//!
//!     for delay in [10, 20, 30] {
//!         group
//!             .spawn(async move {
//!                 tokio::time::sleep(Duration::from_millis(delay)).await;
//!             })
//!             .expect("inside a runtime");
//!     }
//!     group
//!         .notify(|| println!("all apples have been thrown away"))
//!         .expect("first callback");
//!
//!     assert_eq!(group.wait(Duration::from_secs(5)).await, WaitStatus::Completed);
//! }
//! ```
mod config;
mod error;
mod events;
mod group;
mod house;
mod subscribers;

// ---- Public re-exports ----

pub use config::Config;
pub use error::GroupError;
pub use events::{Bus, Event, EventKind};
pub use group::{GroupBuilder, RendezvousGroup, Ticket, WaitStatus};
pub use house::{
    ring_and_wait, ring_and_wait_default, AlarmSystem, Burglar, DoorbellEvent, DoorbellOutcome,
    House, HouseConfig, Verdict, Visit,
};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber.
// Enable with: `--features logging` (on by default)
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
