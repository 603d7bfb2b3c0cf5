//! # RendezvousGroup: counting join primitive.
//!
//! A coordinator uses a [`RendezvousGroup`] to wait, under a bounded timeout,
//! until a set of asynchronously started units of work have completed, and to
//! run a one-shot completion callback once they have.
//!
//! ## State
//! ```text
//!            enter()                     leave()
//!   pending ────────► pending + 1   ───────────────► pending - 1
//!                                                      │
//!                                          reaches 0 ──┼──► wake waiters (async + blocking)
//!                                                      └──► schedule callback (if armed)
//! ```
//!
//! ## Rules
//! - `pending` never goes negative: `leave()` at zero is reported as
//!   [`GroupError::UnbalancedLeave`] and the count stays at zero.
//! - The counter and the callback slot share one mutex; callbacks never run
//!   while it is held.
//! - At most one callback is pending at a time. It fires exactly once, when the
//!   count next returns to zero (or right away if the count is already zero).
//!   After it fires, the slot is free for the next round.
//! - Callbacks run on the tokio runtime the group was built on, or on a fresh
//!   OS thread when there is none. Never on the caller's stack.
//! - `wait` only bounds the waiter. Outstanding work is not cancelled and its
//!   later `leave()` calls still fire the callback.

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::{broadcast, Notify};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::GroupError;
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::panic_message;

use super::builder::GroupBuilder;
use super::status::WaitStatus;
use super::ticket::Ticket;

type Callback = Box<dyn FnOnce() + Send + 'static>;

/// Counter and callback slot, guarded together.
struct State {
    pending: usize,
    callback: Option<Callback>,
}

struct Inner {
    cfg: Config,
    label: Arc<str>,
    state: Mutex<State>,
    /// Wakes async waiters when `pending` reaches zero.
    drained: Notify,
    /// Wakes blocking waiters when `pending` reaches zero.
    drained_sync: Condvar,
    runtime: Option<Handle>,
    bus: Bus,
    /// Stops the subscriber listener once the last handle is gone.
    listener: CancellationToken,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.listener.cancel();
    }
}

/// Counting join primitive with a bounded wait and a one-shot completion callback.
///
/// Cloning is cheap and every clone refers to the same group, so the group can
/// be handed explicitly to each unit of work.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use rendezvous::{RendezvousGroup, WaitStatus};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let group = RendezvousGroup::labeled("demo");
///
///     group.enter();
///     let worker = group.clone();
///     tokio::spawn(async move {
///         tokio::time::sleep(Duration::from_millis(10)).await;
///         worker.leave().expect("balanced");
///     });
///
///     group.notify(|| println!("all done")).expect("first callback");
///     assert_eq!(group.wait(Duration::from_secs(5)).await, WaitStatus::Completed);
/// }
/// ```
#[derive(Clone)]
pub struct RendezvousGroup {
    inner: Arc<Inner>,
}

impl Default for RendezvousGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RendezvousGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendezvousGroup")
            .field("label", &self.inner.label)
            .field("pending", &self.pending())
            .finish()
    }
}

impl RendezvousGroup {
    /// Creates a group with the default [`Config`].
    ///
    /// Captures the current tokio runtime if there is one.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a group with the default config and a custom label.
    pub fn labeled(label: impl Into<std::borrow::Cow<'static, str>>) -> Self {
        Self::with_config(Config::labeled(label))
    }

    /// Creates a group without subscribers.
    pub fn with_config(cfg: Config) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self::from_parts(
            cfg,
            Handle::try_current().ok(),
            bus,
            CancellationToken::new(),
        )
    }

    /// Returns a builder for groups with subscribers or an explicit runtime.
    pub fn builder(cfg: Config) -> GroupBuilder {
        GroupBuilder::new(cfg)
    }

    pub(crate) fn from_parts(
        cfg: Config,
        runtime: Option<Handle>,
        bus: Bus,
        listener: CancellationToken,
    ) -> Self {
        let label: Arc<str> = Arc::from(cfg.label.as_ref());
        Self {
            inner: Arc::new(Inner {
                cfg,
                label,
                state: Mutex::new(State {
                    pending: 0,
                    callback: None,
                }),
                drained: Notify::new(),
                drained_sync: Condvar::new(),
                runtime,
                bus,
                listener,
            }),
        }
    }

    /// Group label (from [`Config::label`]).
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// Configuration the group was built with.
    pub fn config(&self) -> &Config {
        &self.inner.cfg
    }

    /// Snapshot of the pending count.
    pub fn pending(&self) -> usize {
        self.inner.lock().pending
    }

    /// Subscribes to the raw event stream of this group.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.inner.bus.subscribe()
    }

    /// Registers one unit of outstanding work.
    pub fn enter(&self) {
        let pending = {
            let mut state = self.inner.lock();
            state.pending += 1;
            state.pending
        };
        self.publish(Event::new(EventKind::Entered).with_pending(pending));
    }

    /// Marks one unit of work as finished.
    ///
    /// When the count reaches zero, all waiters are released and the armed
    /// callback (if any) is scheduled.
    ///
    /// # Errors
    /// [`GroupError::UnbalancedLeave`] if the count is already zero. The count
    /// is left untouched.
    pub fn leave(&self) -> Result<(), GroupError> {
        let (pending, callback) = {
            let mut state = self.inner.lock();
            if state.pending == 0 {
                drop(state);
                return Err(self.unbalanced_leave());
            }
            state.pending -= 1;
            let callback = if state.pending == 0 {
                state.callback.take()
            } else {
                None
            };
            (state.pending, callback)
        };

        self.publish(Event::new(EventKind::Left).with_pending(pending));
        if pending == 0 {
            self.inner.drained_sync.notify_all();
            self.inner.drained.notify_waiters();
            tracing::debug!(group = %self.inner.label, "group drained");
            self.publish(Event::new(EventKind::Drained).with_pending(0));

            if let Some(callback) = callback {
                self.schedule(callback);
            }
        }
        Ok(())
    }

    /// Arms a one-shot callback for the moment the count next reaches zero.
    ///
    /// If the count is already zero, the callback is scheduled right away.
    /// The callback never runs on the calling thread.
    ///
    /// # Errors
    /// [`GroupError::NotifyPending`] if a callback is already armed. The first
    /// registration is kept and `callback` is dropped.
    pub fn notify<F>(&self, callback: F) -> Result<(), GroupError>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.inner.lock();
        let pending = state.pending;

        if state.callback.is_some() {
            drop(state);
            tracing::warn!(group = %self.inner.label, pending, "notify() while a callback is pending");
            self.publish(Event::new(EventKind::NotifyRejected).with_pending(pending));
            return Err(GroupError::NotifyPending {
                group: self.label().to_string(),
            });
        }

        if pending == 0 {
            drop(state);
            self.publish(Event::new(EventKind::NotifyRegistered).with_pending(0));
            self.schedule(Box::new(callback));
        } else {
            state.callback = Some(Box::new(callback));
            drop(state);
            self.publish(Event::new(EventKind::NotifyRegistered).with_pending(pending));
        }
        Ok(())
    }

    /// Waits until the count reaches zero or `timeout` elapses.
    ///
    /// Returns immediately with [`WaitStatus::Completed`] when nothing is
    /// pending.
    pub async fn wait(&self, timeout: Duration) -> WaitStatus {
        self.wait_until(Some(timeout)).await
    }

    /// Waits using [`Config::default_timeout`] (unbounded when it is `None`).
    pub async fn wait_default(&self) -> WaitStatus {
        self.wait_until(self.inner.cfg.default_timeout()).await
    }

    async fn wait_until(&self, timeout: Option<Duration>) -> WaitStatus {
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));

        loop {
            // Register before checking so a drain in between is not missed.
            let notified = self.inner.drained.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.pending() == 0 {
                return self.finish_wait(WaitStatus::Completed, timeout);
            }

            match deadline {
                Some(at) => {
                    if time::timeout_at(at, notified).await.is_err() {
                        let status = if self.pending() == 0 {
                            WaitStatus::Completed
                        } else {
                            WaitStatus::TimedOut
                        };
                        return self.finish_wait(status, timeout);
                    }
                }
                None => notified.await,
            }
        }
    }

    /// Blocking flavour of [`wait`](Self::wait) for plain OS threads.
    ///
    /// Must not be called from inside an async task: it parks the thread.
    pub fn wait_blocking(&self, timeout: Duration) -> WaitStatus {
        let deadline = std::time::Instant::now().checked_add(timeout);
        let mut state = self.inner.lock();

        let status = loop {
            if state.pending == 0 {
                break WaitStatus::Completed;
            }
            match deadline {
                Some(at) => {
                    let now = std::time::Instant::now();
                    if now >= at {
                        break WaitStatus::TimedOut;
                    }
                    let (guard, _) = self
                        .inner
                        .drained_sync
                        .wait_timeout(state, at - now)
                        .unwrap_or_else(PoisonError::into_inner);
                    state = guard;
                }
                None => {
                    state = self
                        .inner
                        .drained_sync
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
        };
        drop(state);
        self.finish_wait(status, Some(timeout))
    }

    /// Issues a [`Ticket`]: enters now, leaves when the ticket is dropped.
    pub fn ticket(&self) -> Ticket {
        Ticket::issue(self)
    }

    /// Runs `fut` as a tracked unit of work on the group's runtime.
    ///
    /// The group is entered before spawning and left when the future finishes,
    /// panics, or is aborted.
    ///
    /// # Errors
    /// [`GroupError::RuntimeRequired`] when the group has no runtime and the
    /// caller is not inside one.
    pub fn spawn<F>(&self, fut: F) -> Result<JoinHandle<F::Output>, GroupError>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let runtime = self
            .inner
            .runtime
            .clone()
            .or_else(|| Handle::try_current().ok())
            .ok_or(GroupError::RuntimeRequired { what: "spawn" })?;

        let ticket = self.ticket();
        Ok(runtime.spawn(async move {
            let _ticket = ticket;
            fut.await
        }))
    }

    /// Runs `f` as a tracked unit of work on a new OS thread.
    pub fn spawn_thread<F, R>(&self, f: F) -> std::thread::JoinHandle<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let ticket = self.ticket();
        std::thread::spawn(move || {
            let _ticket = ticket;
            f()
        })
    }

    fn unbalanced_leave(&self) -> GroupError {
        tracing::error!(group = %self.inner.label, "leave() called without a matching enter()");
        self.publish(
            Event::new(EventKind::UnbalancedLeave)
                .with_pending(0)
                .with_reason("leave() without a matching enter()"),
        );
        GroupError::UnbalancedLeave {
            group: self.label().to_string(),
        }
    }

    fn finish_wait(&self, status: WaitStatus, timeout: Option<Duration>) -> WaitStatus {
        let pending = self.pending();
        tracing::debug!(
            group = %self.inner.label,
            status = status.as_label(),
            pending,
            "wait finished"
        );

        let kind = match status {
            WaitStatus::Completed => EventKind::WaitCompleted,
            WaitStatus::TimedOut => EventKind::WaitTimedOut,
        };
        let mut ev = Event::new(kind).with_pending(pending);
        if let Some(t) = timeout {
            ev = ev.with_timeout(t);
        }
        self.publish(ev);
        status
    }

    fn schedule(&self, callback: Callback) {
        let scheduled = ScheduledCallback {
            callback: Some(callback),
            label: Arc::clone(&self.inner.label),
            bus: self.inner.bus.clone(),
        };

        match &self.inner.runtime {
            Some(runtime) => {
                runtime.spawn(async move { scheduled.run() });
            }
            None => scheduled.run_on_thread(),
        }
    }

    fn publish(&self, ev: Event) {
        if self.inner.bus.has_receivers() {
            self.inner
                .bus
                .publish(ev.with_group(Arc::clone(&self.inner.label)));
        }
    }
}

/// A completion callback handed to an executor.
///
/// A runtime that has shut down accepts spawned tasks but drops them unpolled.
/// If that happens the callback is moved to a fresh OS thread on drop, so it
/// still fires exactly once.
struct ScheduledCallback {
    callback: Option<Callback>,
    label: Arc<str>,
    bus: Bus,
}

impl ScheduledCallback {
    fn run(mut self) {
        if let Some(callback) = self.callback.take() {
            run_callback(callback, Arc::clone(&self.label), &self.bus);
        }
    }

    fn run_on_thread(mut self) {
        if let Some(callback) = self.callback.take() {
            spawn_callback_thread(callback, Arc::clone(&self.label), self.bus.clone());
        }
    }
}

impl Drop for ScheduledCallback {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            tracing::warn!(
                group = %self.label,
                "runtime dropped the completion callback, running it on a thread"
            );
            spawn_callback_thread(callback, Arc::clone(&self.label), self.bus.clone());
        }
    }
}

fn spawn_callback_thread(callback: Callback, label: Arc<str>, bus: Bus) {
    let thread_label = Arc::clone(&label);
    let thread_bus = bus.clone();
    let spawned = std::thread::Builder::new()
        .name("rendezvous-callback".into())
        .spawn(move || run_callback(callback, thread_label, &thread_bus));

    if let Err(err) = spawned {
        tracing::error!(group = %label, error = %err, "completion callback lost");
        bus.publish(
            Event::new(EventKind::CallbackLost)
                .with_group(label)
                .with_reason(err.to_string()),
        );
    }
}

/// Runs a completion callback, containing any panic.
fn run_callback(callback: Callback, label: Arc<str>, bus: &Bus) {
    match std::panic::catch_unwind(AssertUnwindSafe(callback)) {
        Ok(()) => bus.publish(Event::new(EventKind::NotifyFired).with_group(label)),
        Err(panic_err) => {
            let info = panic_message(&*panic_err);
            tracing::error!(group = %label, %info, "completion callback panicked");
            bus.publish(
                Event::new(EventKind::CallbackPanicked)
                    .with_group(label)
                    .with_reason(info),
            );
        }
    }
}
