//! Periodic polling of the backend resources
//!
//! Every resource gets its own [`PeriodicTask`]. A tick never waits for a
//! fetch: the fetch is spawned as a separate task, so a stalled request only
//! delays its own result. Overlapping fetches of the same resource are
//! allowed and the last one to arrive wins.
//!
//! Successful snapshots are written to the [`SnapshotCache`] and pushed into
//! an unbounded channel drained by the UI thread, which is the only place
//! view state is mutated. Failures are logged and dropped.

use std::sync::Arc;
use std::time::Duration;
use ahash::AHashMap;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use aw_core::{DataSource, Resource, Snapshot};

use crate::SnapshotCache;

/// Called after each delivered snapshot (the app uses it to request a repaint)
pub type RepaintHook = Arc<dyn Fn() + Send + Sync>;

/// Fetch one resource, cache and deliver the result.
///
/// Returns true if a snapshot was delivered. Errors never escape.
pub async fn poll_once(
    source: &dyn DataSource,
    resource: Resource,
    cache: &SnapshotCache,
    sink: &UnboundedSender<Snapshot>,
) -> bool {
    match source.fetch(resource).await {
        Ok(snapshot) => {
            cache.put(snapshot.clone());
            if sink.send(snapshot).is_err() {
                tracing::debug!("Snapshot receiver dropped, discarding {} update", resource);
            }
            true
        }
        Err(err) => {
            tracing::warn!(kind = ?err.kind(), "Failed to fetch {}: {}", resource, err);
            false
        }
    }
}

/// Handle to a running periodic task. Dropping it cancels the task.
pub struct PeriodicTask {
    resource: Resource,
    period: Duration,
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    /// Spawn a ticker that calls `on_tick` with the tick number (starting at 1).
    /// The first tick fires immediately.
    pub fn spawn<F>(runtime: &Handle, resource: Resource, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(u64) + Send + 'static,
    {
        // tokio panics on a zero period
        let period = period.max(Duration::from_millis(1));

        let handle = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut ticks = 0u64;
            loop {
                ticker.tick().await;
                ticks += 1;
                on_tick(ticks);
            }
        });

        Self {
            resource,
            period,
            handle,
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Stop ticking. Fetches already in flight still complete.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Everything a single fetch needs, cheap to clone into spawned tasks
#[derive(Clone)]
struct Poller {
    source: Arc<dyn DataSource>,
    cache: SnapshotCache,
    sink: UnboundedSender<Snapshot>,
    on_update: Option<RepaintHook>,
}

impl Poller {
    async fn poll(&self, resource: Resource) -> bool {
        let delivered = poll_once(self.source.as_ref(), resource, &self.cache, &self.sink).await;
        if delivered {
            if let Some(hook) = &self.on_update {
                hook();
            }
        }
        delivered
    }
}

/// Drives the four resources on a fixed interval
pub struct Scheduler {
    poller: Poller,
    period: Duration,
    runtime: Handle,
    tasks: AHashMap<Resource, PeriodicTask>,
}

impl Scheduler {
    /// Create a scheduler. Nothing is polled until [`Scheduler::start`].
    pub fn new(
        source: Arc<dyn DataSource>,
        cache: SnapshotCache,
        sink: UnboundedSender<Snapshot>,
        period: Duration,
        runtime: Handle,
    ) -> Self {
        Self {
            poller: Poller {
                source,
                cache,
                sink,
                on_update: None,
            },
            period,
            runtime,
            tasks: AHashMap::new(),
        }
    }

    /// Install a hook called after every delivered snapshot
    pub fn with_repaint_hook(mut self, hook: RepaintHook) -> Self {
        self.poller.on_update = Some(hook);
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn source_name(&self) -> &str {
        self.poller.source.source_name()
    }

    /// Start polling every resource
    pub fn start(&mut self) {
        tracing::info!(
            "Polling {} every {:?}",
            self.poller.source.source_name(),
            self.period
        );
        for resource in Resource::ALL {
            self.start_resource(resource);
        }
    }

    /// Start polling one resource, replacing any task already running for it
    pub fn start_resource(&mut self, resource: Resource) {
        let poller = self.poller.clone();
        let runtime = self.runtime.clone();

        let task = PeriodicTask::spawn(&self.runtime, resource, self.period, move |tick| {
            tracing::trace!("{} tick {}", resource, tick);
            let poller = poller.clone();
            runtime.spawn(async move {
                poller.poll(resource).await;
            });
        });

        if let Some(previous) = self.tasks.insert(resource, task) {
            previous.cancel();
        }
    }

    /// Stop polling one resource. Returns false if it was not running.
    pub fn stop(&mut self, resource: Resource) -> bool {
        match self.tasks.remove(&resource) {
            Some(task) => {
                task.cancel();
                true
            }
            None => false,
        }
    }

    pub fn stop_all(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.cancel();
        }
    }

    pub fn is_running(&self, resource: Resource) -> bool {
        self.tasks
            .get(&resource)
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }

    /// Fire a single fetch outside the periodic schedule
    pub fn tick(&self, resource: Resource) -> JoinHandle<bool> {
        let poller = self.poller.clone();
        self.runtime.spawn(async move { poller.poll(resource).await })
    }

    /// Fire a single fetch of every resource
    pub fn tick_all(&self) {
        for resource in Resource::ALL {
            self.tick(resource);
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop_all();
    }
}
