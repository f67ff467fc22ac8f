// src/diagnose/validator.rs

use tracing::{debug, warn};

use crate::diagnose::report::{BreakReport, OrphanChain, SubtreeNode};
use crate::errors::BreakDetected;
use crate::forest::{CausalityRegistry, NodeId};

/// Walks a node's parent chain searching for a previously marked ancestor.
pub struct PathValidator;

impl PathValidator {
    /// Check that `ancestor` is reachable from `current` via parent links.
    ///
    /// The walk is a single linear ascent: follow `parent` from `current`
    /// until `ancestor` is encountered (success) or a parentless node is
    /// reached (break). `current == ancestor` succeeds immediately.
    ///
    /// On a break this assembles both diagnostic structures before failing:
    /// a snapshot of the ancestor's subtree (the live forest is left
    /// untouched) and the orphan chain of the failed ascent. The outcome is
    /// deterministic; re-checking the same state yields a structurally
    /// equivalent report.
    ///
    /// # Panics
    ///
    /// If `current` or `ancestor` is not a live node.
    pub fn check(
        registry: &CausalityRegistry,
        current: NodeId,
        ancestor: NodeId,
    ) -> Result<(), BreakDetected> {
        assert!(
            registry.lookup(ancestor).is_some(),
            "check against unknown ancestor id {ancestor} (stale mark?)"
        );

        if current == ancestor {
            debug!(%current, "causal check trivially satisfied");
            return Ok(());
        }

        // Ascent, newest first. Ends with the parentless terminus on failure.
        let mut ascent = vec![current];
        let mut cursor = current;

        loop {
            let node = match registry.lookup(cursor) {
                Some(node) => node,
                None => panic!("check walked through unknown node id {cursor}"),
            };

            match node.parent() {
                Some(parent) if parent == ancestor => {
                    debug!(%current, %ancestor, depth = ascent.len(), "causal chain intact");
                    return Ok(());
                }
                Some(parent) => {
                    ascent.push(parent);
                    cursor = parent;
                }
                None => break,
            }
        }

        // The parentless terminus is where the walk gave up; it is not part
        // of the reported chain.
        ascent.pop();
        ascent.reverse();

        warn!(
            marked = %ancestor,
            current = %current,
            chain_len = ascent.len(),
            "async causal chain broken; assembling diagnostics"
        );

        let report = BreakReport {
            ancestor_subtree: SubtreeNode::snapshot(registry, ancestor),
            orphan_chain: OrphanChain::from_ascent(registry, &ascent),
        };

        Err(BreakDetected {
            marked: ancestor,
            current,
            report,
        })
    }
}
