// src/host/sim.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use crate::capture::{CaptureStrategy, Descriptor};
use crate::forest::NodeId;
use crate::host::HostAdapter;

/// A hand-driven cooperative host.
///
/// There is no real scheduler behind it: the caller allocates ids, registers
/// the corresponding work with the finder, and flips the single "currently
/// active" cell via [`activate`]. That is exactly the single-active-context
/// model — at most one unit of work runs at a time, and activation changes
/// only between cooperative steps.
///
/// Used by the demo scenarios and the integration tests.
///
/// [`activate`]: SimHost::activate
pub struct SimHost {
    current: AtomicU64,
    next_id: AtomicU64,
    capture: Box<dyn CaptureStrategy>,
}

impl SimHost {
    pub fn new(capture: Box<dyn CaptureStrategy>) -> Arc<Self> {
        Arc::new(Self {
            current: AtomicU64::new(NodeId::ROOT.0),
            next_id: AtomicU64::new(1),
            capture,
        })
    }

    /// Hand out a fresh, process-unique id.
    pub fn allocate_id(&self) -> NodeId {
        NodeId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Make `id` the currently active context until the returned guard is
    /// dropped, at which point the previous context is restored.
    pub fn activate(&self, id: NodeId) -> ActiveGuard<'_> {
        let previous = self.current.swap(id.0, Ordering::SeqCst);
        trace!(active = %id, previous, "sim host switched active context");
        ActiveGuard {
            host: self,
            previous,
        }
    }
}

impl HostAdapter for SimHost {
    fn current_active_id(&self) -> NodeId {
        NodeId(self.current.load(Ordering::SeqCst))
    }

    fn capture_descriptor(&self) -> Descriptor {
        self.capture.capture()
    }
}

/// Restores the previously active context on drop.
pub struct ActiveGuard<'a> {
    host: &'a SimHost,
    previous: u64,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.host.current.store(self.previous, Ordering::SeqCst);
    }
}
