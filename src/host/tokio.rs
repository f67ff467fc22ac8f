// src/host/tokio.rs

//! Tokio host adapter.
//!
//! Tokio has no global "which task is running" introspection hook, so the
//! active id is carried in a task-local instead: [`spawn_traced`] registers
//! the child node from the *spawning* context (which is what makes the
//! parent link correct) and scopes the task-local around the spawned future.
//! Code outside any traced task resolves to the sentinel, i.e. the root.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::task::JoinHandle;

use crate::capture::{CaptureStrategy, Descriptor};
use crate::finder::BreakFinder;
use crate::forest::NodeId;
use crate::host::HostAdapter;

tokio::task_local! {
    static ACTIVE_ID: u64;
}

/// Host adapter for tokio runtimes. The active id is task-local, so this
/// works under both the current-thread and the multi-thread scheduler.
pub struct TokioHost {
    next_id: AtomicU64,
    capture: Box<dyn CaptureStrategy>,
}

impl TokioHost {
    pub fn new(capture: Box<dyn CaptureStrategy>) -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicU64::new(1),
            capture,
        })
    }

    /// Hand out a fresh, process-unique id.
    pub fn allocate_id(&self) -> NodeId {
        NodeId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl HostAdapter for TokioHost {
    fn current_active_id(&self) -> NodeId {
        ACTIVE_ID
            .try_with(|id| NodeId(*id))
            .unwrap_or(NodeId::ROOT)
    }

    fn capture_descriptor(&self) -> Descriptor {
        self.capture.capture()
    }
}

/// Spawn a future as a tracked unit of asynchronous work.
///
/// The node is registered before the spawn, from the current context, so the
/// spawned work is linked to whatever task called this. Completion is *not*
/// reported automatically; call
/// [`BreakFinder::complete`](crate::finder::BreakFinder::complete) once no
/// mark into the task's subtree can still be checked.
pub fn spawn_traced<F>(
    host: &Arc<TokioHost>,
    finder: &Arc<BreakFinder>,
    kind: &str,
    future: F,
) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let id = host.allocate_id();
    finder.on_create(id, kind);
    tokio::spawn(ACTIVE_ID.scope(id.0, future))
}

/// Run a future in place as a tracked unit of work, without spawning.
///
/// The analogue of wrapping a callback so that it executes inside a known
/// async scope: the node is registered under the current context and the
/// future observes itself as the active one.
pub async fn scope_traced<F>(
    host: &Arc<TokioHost>,
    finder: &Arc<BreakFinder>,
    kind: &str,
    future: F,
) -> F::Output
where
    F: Future,
{
    let id = host.allocate_id();
    finder.on_create(id, kind);
    ACTIVE_ID.scope(id.0, future).await
}
