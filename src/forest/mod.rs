// src/forest/mod.rs

//! The in-memory causality forest.
//!
//! - [`node`] holds one recorded unit of asynchronous work and its links.
//! - [`registry`] is the id-keyed store that builds and owns the forest.

pub mod node;
pub mod registry;

pub use node::{AsyncNode, NodeId};
pub use registry::{CausalityRegistry, ROOT_KIND};
