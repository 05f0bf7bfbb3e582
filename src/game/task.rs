//! Cancellable background work owned by a round or session.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;
use tracing::{debug, instrument};

use crate::game::GameEvent;

/// Guard for a spawned task. Aborts the task on drop.
#[derive(Debug)]
pub struct TaskGuard {
    label: &'static str,
    handle: Option<AbortHandle>,
}

impl TaskGuard {
    /// Spawns `future` on the runtime and keeps its abort handle.
    #[instrument(skip(future))]
    pub fn spawn<F>(label: &'static str, future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(future).abort_handle();
        Self {
            label,
            handle: Some(handle),
        }
    }

    /// Posts `event` to `events` after `delay`, unless cancelled first.
    #[instrument(skip(events, event), fields(generation = %event.generation()))]
    pub fn delay(
        label: &'static str,
        delay: Duration,
        events: UnboundedSender<GameEvent>,
        event: GameEvent,
    ) -> Self {
        Self::spawn(label, async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the session was dropped.
            let _ = events.send(event);
        })
    }

    /// True while the task has neither finished nor been cancelled.
    pub fn is_pending(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Aborts the task. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                debug!(task = self.label, "Cancelling pending task");
            }
            handle.abort();
        }
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.cancel();
    }
}
