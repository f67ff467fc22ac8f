// src/host/mod.rs

//! Host-runtime adapters.
//!
//! The causality core is runtime-agnostic: everything it needs from the host
//! is the [`HostAdapter`] capability, injected at construction. A host that
//! wants this diagnostic supplies an adapter that can answer "who is active
//! right now" and snapshot the current execution position, and calls
//! [`BreakFinder::on_create`](crate::finder::BreakFinder::on_create)
//! synchronously whenever a new schedulable unit of work comes into being.
//!
//! - [`sim`] is a hand-driven cooperative host for tests and the demo binary.
//! - [`tokio`] propagates the active id through a tokio task-local.

pub mod sim;
pub mod tokio;

use crate::capture::Descriptor;
use crate::forest::NodeId;

pub use self::sim::SimHost;
pub use self::tokio::TokioHost;

/// Capability contract a host runtime implements for the causality core.
///
/// Ids supplied by an adapter must be unique for the process lifetime and
/// must never be [`NodeId::ROOT`], which is reserved as the "no active
/// context" sentinel.
pub trait HostAdapter: Send + Sync {
    /// Id of the unit of work currently executing, or the sentinel
    /// [`NodeId::ROOT`] when nothing is active.
    fn current_active_id(&self) -> NodeId;

    /// Diagnostic snapshot of the current execution position. Opaque to the
    /// core; see [`crate::capture`].
    fn capture_descriptor(&self) -> Descriptor;
}
