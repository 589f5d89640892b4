//! # Controller Task Scope
//!
//! Every mounted controller owns one [`TaskScope`]. Requests and timers the
//! controller starts run inside it, and their results come back to the
//! orchestrator as [`AppEvent`]s tagged with the scope's [`MountId`].
//!
//! Dropping the scope aborts everything still running in it. An event that
//! was already queued before the drop carries a mount id nobody owns any
//! more and is discarded by the orchestrator, so a discarded controller can
//! never mutate state after the fact.

use std::future::Future;
use std::time::Duration;

use async_channel::Sender;
use tokio::task::JoinSet;
use uuid::Uuid;

use super::events::AppEvent;

/// Identity of one controller mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MountId(Uuid);

impl MountId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MountId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Structured-concurrency scope tied to a controller's lifetime.
///
/// `E` is the controller's own event type; `wrap` lifts it into [`AppEvent`].
pub struct TaskScope<E> {
    id: MountId,
    tasks: JoinSet<()>,
    events: Sender<AppEvent>,
    wrap: fn(MountId, E) -> AppEvent,
}

impl<E: Send + 'static> TaskScope<E> {
    pub fn new(events: Sender<AppEvent>, wrap: fn(MountId, E) -> AppEvent) -> Self {
        Self {
            id: MountId::new(),
            tasks: JoinSet::new(),
            events,
            wrap,
        }
    }

    pub fn id(&self) -> MountId {
        self.id
    }

    /// Run `work` and deliver its output as an event.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(&mut self, work: F)
    where
        F: Future<Output = E> + Send + 'static,
    {
        let events = self.events.clone();
        let wrap = self.wrap;
        let id = self.id;
        self.tasks.spawn(async move {
            let event = work.await;
            if events.send(wrap(id, event)).await.is_err() {
                tracing::debug!(mount = %id, "Event channel closed - dropping task result");
            }
        });
    }

    /// Deliver `event` after `delay`. Not resettable; each call is independent.
    pub fn schedule(&mut self, delay: Duration, event: E) {
        self.spawn(async move {
            tokio::time::sleep(delay).await;
            event
        });
    }

    /// Reap finished tasks so the set does not grow without bound.
    pub fn reap(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            if let Err(e) = result {
                if e.is_panic() {
                    tracing::error!(mount = %self.id, error = %e, "Controller task panicked");
                }
            }
        }
    }

    /// Tasks still running (or finished but not yet reaped).
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }
}

impl<E> Drop for TaskScope<E> {
    fn drop(&mut self) {
        if !self.tasks.is_empty() {
            tracing::debug!(mount = %self.id, tasks = self.tasks.len(), "Aborting controller tasks");
        }
        // JoinSet aborts on drop as well; doing it here makes the ordering explicit.
        self.tasks.abort_all();
    }
}
