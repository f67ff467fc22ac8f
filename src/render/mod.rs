// src/render/mod.rs

//! Rendering collaborators.
//!
//! Everything here consumes the read-only shapes exposed by
//! [`BreakReport`](crate::diagnose::BreakReport) — `children` on subtree
//! nodes, `next` on chain links — and owes nothing to the core algorithm.
//!
//! - [`dot`] emits Graphviz descriptions.
//! - [`tree`] pretty-prints for a terminal.
//! - [`artifact`] persists an HTML artifact embedding the dot graphs.

pub mod artifact;
pub mod dot;
pub mod tree;

pub use artifact::write_break_artifact;
pub use dot::{chain_to_dot, subtree_to_dot};
pub use tree::{framed, render_chain, render_subtree};
