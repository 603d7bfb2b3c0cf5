use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    error::GroupError,
    events::{Bus, Event},
    subscribers::{Subscribe, SubscriberSet},
};

use super::RendezvousGroup;

/// Builder for constructing a [`RendezvousGroup`] with optional features.
pub struct GroupBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    runtime: Option<Handle>,
}

impl GroupBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            runtime: None,
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive group events (enter/leave, waits, callbacks, misuse)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Pins callbacks, spawned work and subscriber workers to `runtime`.
    ///
    /// Defaults to the runtime current at [`build`](Self::build) time.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Builds the group.
    ///
    /// Initializes the event bus and, when subscribers are configured, the
    /// subscriber workers plus the listener that feeds them.
    ///
    /// # Errors
    /// [`GroupError::RuntimeRequired`] if subscribers are configured but no
    /// runtime is available.
    pub fn build(self) -> Result<RendezvousGroup, GroupError> {
        let runtime = self.runtime.or_else(|| Handle::try_current().ok());
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let listener = CancellationToken::new();

        if !self.subscribers.is_empty() {
            let rt = runtime
                .as_ref()
                .ok_or(GroupError::RuntimeRequired {
                    what: "subscribers",
                })?;
            let subs = SubscriberSet::new(self.subscribers, bus.clone(), rt);
            spawn_listener(rt, bus.subscribe(), subs, listener.clone());
        }

        Ok(RendezvousGroup::from_parts(self.cfg, runtime, bus, listener))
    }
}

/// Forwards bus events to the subscriber set until the group is dropped.
///
/// On shutdown, events already buffered on the bus are still delivered and
/// subscriber workers finish their queues.
fn spawn_listener(
    rt: &Handle,
    mut rx: broadcast::Receiver<Event>,
    subs: SubscriberSet,
    token: CancellationToken,
) {
    rt.spawn(async move {
        loop {
            tokio::select! {
                biased;
                res = rx.recv() => match res {
                    Ok(ev) => subs.emit(&ev),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "group listener lagged behind the bus");
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = token.cancelled() => {
                    while let Ok(ev) = rx.try_recv() {
                        subs.emit(&ev);
                    }
                    break;
                }
            }
        }
        subs.shutdown().await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Collect {
        seen: Mutex<Vec<EventKind>>,
    }

    #[async_trait]
    impl Subscribe for Collect {
        async fn on_event(&self, ev: &Event) {
            self.seen.lock().unwrap().push(ev.kind);
        }
        fn name(&self) -> &'static str {
            "collect"
        }
    }

    impl Collect {
        async fn wait_for(&self, kind: EventKind) -> Vec<EventKind> {
            for _ in 0..200 {
                let seen = self.seen.lock().unwrap().clone();
                if seen.contains(&kind) {
                    return seen;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            panic!("{kind:?} never delivered");
        }
    }

    #[tokio::test]
    async fn subscribers_see_group_events_in_order() {
        let collect = Arc::new(Collect::default());
        let group = GroupBuilder::new(Config::labeled("observed"))
            .with_subscribers(vec![collect.clone() as Arc<dyn Subscribe>])
            .build()
            .unwrap();

        group.enter();
        group.leave().unwrap();

        let seen = collect.wait_for(EventKind::Drained).await;
        assert_eq!(
            seen,
            vec![EventKind::Entered, EventKind::Left, EventKind::Drained]
        );
    }

    #[tokio::test]
    async fn dropping_the_group_flushes_buffered_events() {
        let collect = Arc::new(Collect::default());
        let group = GroupBuilder::new(Config::default())
            .with_subscribers(vec![collect.clone() as Arc<dyn Subscribe>])
            .build()
            .unwrap();

        assert!(group.leave().is_err());
        drop(group);

        collect.wait_for(EventKind::UnbalancedLeave).await;
    }

    #[test]
    fn subscribers_need_a_runtime() {
        let res = GroupBuilder::new(Config::default())
            .with_subscribers(vec![Arc::new(Collect::default()) as Arc<dyn Subscribe>])
            .build();
        assert_eq!(
            res.unwrap_err(),
            GroupError::RuntimeRequired {
                what: "subscribers"
            }
        );
    }

    #[test]
    fn explicit_runtime_is_used_outside_of_it() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let group = GroupBuilder::new(Config::default())
            .with_runtime(rt.handle().clone())
            .build()
            .unwrap();

        let handle = group.spawn(async { 41 + 1 }).unwrap();
        assert_eq!(rt.block_on(handle).unwrap(), 42);
        assert_eq!(group.pending(), 0);
    }
}
