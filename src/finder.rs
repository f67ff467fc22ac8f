// src/finder.rs

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::config::Options;
use crate::diagnose::{PathValidator, SubtreeNode};
use crate::errors::BreakDetected;
use crate::forest::{CausalityRegistry, NodeId};
use crate::host::HostAdapter;

/// Handle to a previously marked point in the causality forest.
///
/// Obtained from [`BreakFinder::mark`] and later handed to
/// [`BreakFinder::check`] as the ancestor reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    id: NodeId,
}

impl Mark {
    pub fn id(&self) -> NodeId {
        self.id
    }
}

/// The public surface of the causality tracker.
///
/// Owns the registry behind a registry-wide lock so that hosts with genuine
/// parallelism (e.g. the multi-thread tokio scheduler) stay sound; under a
/// cooperative host the lock is simply never contended. The host adapter is
/// injected, keeping this object runtime-agnostic.
pub struct BreakFinder {
    registry: Mutex<CausalityRegistry>,
    options: Options,
}

impl BreakFinder {
    pub fn new(host: Arc<dyn HostAdapter>, options: Options) -> Self {
        Self {
            registry: Mutex::new(CausalityRegistry::new(host)),
            options,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Creation notification: the host adapter calls this synchronously
    /// whenever a new schedulable unit of work is created.
    ///
    /// Panics on duplicate or reserved ids; see
    /// [`CausalityRegistry::register`].
    pub fn on_create(&self, id: NodeId, kind: &str) {
        self.registry().register(id, kind);
    }

    /// Completion notification; prunes finished branches. See
    /// [`CausalityRegistry::complete`].
    pub fn complete(&self, id: NodeId) {
        self.registry().complete(id);
    }

    /// Mark "now": returns a handle to the node representing the current
    /// context, to be used as the ancestor reference of a later check.
    pub fn mark(&self) -> Mark {
        let registry = self.registry();
        let id = registry.current_node().id();
        debug!(%id, "marked current async context");
        Mark { id }
    }

    /// Is the current context causally reachable, through the host's own
    /// context propagation, from the marked point?
    ///
    /// Succeeds immediately when nothing intervened since [`mark`]; fails
    /// with [`BreakDetected`] carrying the two diagnostic subgraphs when the
    /// chain was severed. The live forest is never modified by a check.
    ///
    /// [`mark`]: BreakFinder::mark
    pub fn check(&self, mark: Mark) -> Result<(), BreakDetected> {
        let registry = self.registry();
        let current = registry.current_node().id();
        PathValidator::check(&registry, current, mark.id)
    }

    /// Snapshot the subtree rooted at `id`, if that node is live. For
    /// rendering collaborators that want a picture outside of a failure.
    pub fn snapshot(&self, id: NodeId) -> Option<SubtreeNode> {
        let registry = self.registry();
        registry.lookup(id)?;
        Some(SubtreeNode::snapshot(&registry, id))
    }

    /// Number of live nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.registry().len()
    }

    /// Drop all recorded state except a fresh root.
    pub fn reset(&self) {
        self.registry().reset();
    }

    fn registry(&self) -> MutexGuard<'_, CausalityRegistry> {
        // A poisoning panic was itself a contract violation; the forest is
        // append-only apart from pruning, so the state is still coherent.
        self.registry.lock().unwrap_or_else(|e| e.into_inner())
    }
}
