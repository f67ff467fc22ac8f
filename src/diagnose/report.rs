// src/diagnose/report.rs

use crate::capture::Descriptor;
use crate::forest::{CausalityRegistry, NodeId};

/// Standalone snapshot of one node and everything it transitively spawned.
///
/// Built by copying out of the live forest, so it carries no reference to
/// anything above its root and stays valid however the forest changes later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtreeNode {
    pub id: NodeId,
    pub kind: String,
    pub descriptor: Descriptor,
    /// Children in creation order.
    pub children: Vec<SubtreeNode>,
}

impl SubtreeNode {
    /// Snapshot the subtree rooted at `id` as it exists right now.
    ///
    /// # Panics
    ///
    /// If `id` is not a live node.
    pub fn snapshot(registry: &CausalityRegistry, id: NodeId) -> SubtreeNode {
        let node = match registry.lookup(id) {
            Some(node) => node,
            None => panic!("cannot snapshot unknown node id {id}"),
        };

        SubtreeNode {
            id: node.id(),
            kind: node.kind().to_string(),
            descriptor: node.descriptor().clone(),
            children: node
                .children()
                .iter()
                .map(|child| SubtreeNode::snapshot(registry, *child))
                .collect(),
        }
    }
}

/// One entry of the orphan chain, with a forward link to its temporal
/// successor (the node it spawned on the way down to the failing point).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLink {
    pub id: NodeId,
    pub kind: String,
    pub descriptor: Descriptor,
    pub next: Option<Box<ChainLink>>,
}

/// The linear sequence of nodes climbed through during a failed ascent,
/// re-linked in temporal order: oldest traceable ancestor first, the failing
/// node last. Empty when the failing node itself had no parent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrphanChain {
    head: Option<Box<ChainLink>>,
}

impl OrphanChain {
    /// Build the chain from node ids ordered oldest to newest.
    pub(crate) fn from_ascent(registry: &CausalityRegistry, oldest_first: &[NodeId]) -> Self {
        let mut next: Option<Box<ChainLink>> = None;

        for id in oldest_first.iter().rev() {
            let node = match registry.lookup(*id) {
                Some(node) => node,
                None => panic!("orphan chain references unknown node id {id}"),
            };
            next = Some(Box::new(ChainLink {
                id: node.id(),
                kind: node.kind().to_string(),
                descriptor: node.descriptor().clone(),
                next,
            }));
        }

        Self { head: next }
    }

    pub fn head(&self) -> Option<&ChainLink> {
        self.head.as_deref()
    }

    pub fn iter(&self) -> ChainIter<'_> {
        ChainIter {
            next: self.head.as_deref(),
        }
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

/// Iterator over chain links, oldest first.
pub struct ChainIter<'a> {
    next: Option<&'a ChainLink>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = &'a ChainLink;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.next?;
        self.next = link.next.as_deref();
        Some(link)
    }
}

/// The structured evidence for one detected break.
///
/// Immutable value; renderers traverse `ancestor_subtree` via `children` and
/// `orphan_chain` via `next`, nothing here does any rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakReport {
    /// The marked ancestor together with everything it spawned, detached
    /// from whatever lies above it in the forest.
    pub ancestor_subtree: SubtreeNode,
    /// The branch that actually led to the failing point.
    pub orphan_chain: OrphanChain,
}
