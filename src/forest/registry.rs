// src/forest/registry.rs

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info};

use crate::capture::Descriptor;
use crate::forest::node::{AsyncNode, NodeId};
use crate::host::HostAdapter;

/// Category tag of the root node.
pub const ROOT_KIND: &str = "root";

/// Id-keyed store that builds and owns the causality forest.
///
/// The registry is an explicit object with a defined lifecycle: construct it
/// at startup (the root node is created then and lives until [`reset`] or
/// drop), feed it creation notifications via [`register`], and optionally
/// feed it completion notifications via [`complete`] so finished branches
/// can be pruned.
///
/// Contract violations — registering an id twice, reusing a pruned id, or
/// the host reporting an active id that was never registered — are
/// programmer/integration errors and panic rather than degrade silently.
///
/// [`register`]: CausalityRegistry::register
/// [`complete`]: CausalityRegistry::complete
/// [`reset`]: CausalityRegistry::reset
pub struct CausalityRegistry {
    nodes: HashMap<NodeId, AsyncNode>,
    /// Ids of pruned nodes. A host must never hand an id out twice, so a
    /// re-registration of a pruned id is rejected just like a duplicate.
    retired: HashSet<NodeId>,
    host: Arc<dyn HostAdapter>,
}

impl CausalityRegistry {
    pub fn new(host: Arc<dyn HostAdapter>) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            NodeId::ROOT,
            AsyncNode::new(NodeId::ROOT, ROOT_KIND, None, Descriptor::empty()),
        );
        Self {
            nodes,
            retired: HashSet::new(),
            host,
        }
    }

    /// Record a newly created unit of asynchronous work.
    ///
    /// The parent is whatever node the host reports as currently active (the
    /// sentinel maps to the root). The new node is appended to its parent's
    /// children and stored under `id`.
    ///
    /// Must be called exactly once per real unit of work.
    ///
    /// # Panics
    ///
    /// If `id` is the reserved root id, was already registered, or was
    /// registered and pruned earlier.
    pub fn register(&mut self, id: NodeId, kind: &str) -> &AsyncNode {
        assert!(
            !id.is_root(),
            "node id {id} is reserved for the root and cannot be registered"
        );
        assert!(
            !self.nodes.contains_key(&id),
            "node id {id} registered twice; host adapters must supply unique ids"
        );
        assert!(
            !self.retired.contains(&id),
            "node id {id} was already registered and pruned; ids must not be reused"
        );

        let parent_id = self.active_id();
        let descriptor = self.host.capture_descriptor();
        let node = AsyncNode::new(id, kind, Some(parent_id), descriptor);

        match self.nodes.get_mut(&parent_id) {
            Some(parent) => parent.push_child(id),
            None => unreachable!("active_id() only returns registered ids"),
        }
        self.nodes.insert(id, node);

        debug!(%id, kind, parent = %parent_id, "registered async node");

        match self.nodes.get(&id) {
            Some(node) => node,
            None => unreachable!("node was just inserted"),
        }
    }

    pub fn lookup(&self, id: NodeId) -> Option<&AsyncNode> {
        self.nodes.get(&id)
    }

    /// The node the host reports as currently active.
    ///
    /// # Panics
    ///
    /// If the host reports a non-sentinel id that was never registered.
    pub fn current_node(&self) -> &AsyncNode {
        let id = self.active_id();
        match self.nodes.get(&id) {
            Some(node) => node,
            None => unreachable!("active_id() only returns registered ids"),
        }
    }

    /// Number of live nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Record that a unit of work finished.
    ///
    /// A completed node with no remaining children is removed from the
    /// forest (and detached from its parent's children), cascading upward
    /// through completed ancestors that become childless. The root is never
    /// removed. This bounds memory growth for long-running processes.
    ///
    /// # Panics
    ///
    /// If `id` is unknown or the root.
    pub fn complete(&mut self, id: NodeId) {
        assert!(!id.is_root(), "the root node never completes");

        match self.nodes.get_mut(&id) {
            Some(node) => node.mark_completed(),
            None => panic!("completion reported for unknown node id {id}"),
        }
        self.prune_upward(id);
    }

    /// Drop every node except a fresh root. Retired ids stay retired.
    pub fn reset(&mut self) {
        let dropped = self.nodes.len().saturating_sub(1);
        self.nodes.clear();
        self.nodes.insert(
            NodeId::ROOT,
            AsyncNode::new(NodeId::ROOT, ROOT_KIND, None, Descriptor::empty()),
        );
        info!(dropped, "causality registry reset");
    }

    fn active_id(&self) -> NodeId {
        let id = self.host.current_active_id();
        if id.is_root() {
            return NodeId::ROOT;
        }
        assert!(
            self.nodes.contains_key(&id),
            "host reported active id {id}, which was never registered"
        );
        id
    }

    fn prune_upward(&mut self, start: NodeId) {
        let mut id = start;
        loop {
            if id.is_root() {
                return;
            }
            let parent = match self.nodes.get(&id) {
                Some(node) if node.is_completed() && node.children().is_empty() => {
                    node.parent()
                }
                _ => return,
            };

            self.nodes.remove(&id);
            self.retired.insert(id);
            debug!(%id, "pruned completed leaf node");

            match parent {
                Some(parent_id) => {
                    if let Some(parent) = self.nodes.get_mut(&parent_id) {
                        parent.remove_child(id);
                    }
                    id = parent_id;
                }
                None => return,
            }
        }
    }
}
