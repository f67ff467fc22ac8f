// src/diagnose/mod.rs

//! Reachability validation and break diagnostics.
//!
//! - [`validator`] walks parent links looking for a marked ancestor.
//! - [`report`] holds the two diagnostic subgraphs assembled on failure.

pub mod report;
pub mod validator;

pub use report::{BreakReport, ChainLink, OrphanChain, SubtreeNode};
pub use validator::PathValidator;
