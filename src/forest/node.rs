// src/forest/node.rs

use std::fmt;

use crate::capture::Descriptor;

/// Identifier of a unit of asynchronous work.
///
/// Ids are assigned by the host adapter, never generated here, and must stay
/// unique for the lifetime of the registry. [`NodeId::ROOT`] is reserved: it
/// is both the id of the root node and the sentinel a host returns to mean
/// "no active context".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Reserved root/sentinel id.
    pub const ROOT: NodeId = NodeId(0);

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One recorded unit of asynchronous work.
///
/// Immutable after construction except for `children`, which only grows
/// (creation order) and only shrinks through completion pruning in the
/// registry.
#[derive(Debug, Clone)]
pub struct AsyncNode {
    id: NodeId,
    kind: String,
    /// Node active when this one was created. `None` only for the root;
    /// set once at construction, never reassigned.
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    descriptor: Descriptor,
    completed: bool,
}

impl AsyncNode {
    pub(crate) fn new(
        id: NodeId,
        kind: &str,
        parent: Option<NodeId>,
        descriptor: Descriptor,
    ) -> Self {
        Self {
            id,
            kind: kind.to_string(),
            parent,
            children: Vec::new(),
            descriptor,
            completed: false,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Free-form category tag (e.g. `"timer-fired"`, `"deferred-callback"`).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in creation order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    pub(crate) fn remove_child(&mut self, child: NodeId) {
        self.children.retain(|c| *c != child);
    }

    pub(crate) fn mark_completed(&mut self) {
        self.completed = true;
    }
}
