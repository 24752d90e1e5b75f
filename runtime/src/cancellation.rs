//! Registry of running effects keyed by [`EffectId`].
//!
//! Spawned effect tasks register their [`AbortHandle`] under the id of the
//! enclosing [`Effect::Cancellable`](composable_todo_core::effect::Effect::Cancellable).
//! Cancelling an id aborts every task still registered under it.

use composable_todo_core::effect::EffectId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::AbortHandle;

/// Shared map from cancellation id to the tasks running under it
#[derive(Clone, Default)]
pub struct CancellationRegistry {
    inner: Arc<Mutex<HashMap<EffectId, Vec<AbortHandle>>>>,
}

impl CancellationRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `handle` under `id`
    ///
    /// Handles of tasks that already finished are pruned on the way.
    pub fn register(&self, id: &EffectId, handle: AbortHandle) {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let handles = map.entry(id.clone()).or_default();
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    /// Abort every task registered under `id`
    ///
    /// Returns how many still-running tasks were aborted.
    pub fn cancel(&self, id: &EffectId) -> usize {
        let handles = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            map.remove(id).unwrap_or_default()
        };

        let mut aborted = 0;
        for handle in handles {
            if !handle.is_finished() {
                handle.abort();
                aborted += 1;
            }
        }
        aborted
    }

    /// Number of unfinished tasks registered under `id`
    #[must_use]
    pub fn running(&self, id: &EffectId) -> usize {
        let map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        map.get(id)
            .map_or(0, |handles| handles.iter().filter(|h| !h.is_finished()).count())
    }
}

impl std::fmt::Debug for CancellationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("CancellationRegistry")
            .field("ids", &map.keys().collect::<Vec<_>>())
            .finish()
    }
}
