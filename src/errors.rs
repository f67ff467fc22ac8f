// src/errors.rs

//! Crate-wide error types and aliases.
//!
//! There is exactly one distinguished failure kind, [`BreakDetected`]. It
//! signals a real application condition (causal tracking lost to scheduling
//! the host cannot see through), never a transient fault: it is not retried
//! and not auto-recovered. Everything else — config parsing, artifact
//! writing — flows through `anyhow` like ordinary I/O plumbing.

use thiserror::Error;

use crate::diagnose::BreakReport;
use crate::forest::NodeId;

pub use anyhow::{Context, Error, Result};

/// The marked ancestor is not reachable via parent links from the current
/// context: async context was lost, probably to userland scheduling.
///
/// Carries the two diagnostic subgraphs for external renderers.
#[derive(Debug, Clone, Error)]
#[error(
    "no async context chain between the marked point (node {marked}) and the \
     current point (node {current}); context was probably lost to userland scheduling"
)]
pub struct BreakDetected {
    /// Id of the marked ancestor.
    pub marked: NodeId,
    /// Id of the node that was active when the check ran.
    pub current: NodeId,
    pub report: BreakReport,
}
