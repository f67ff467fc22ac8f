use std::sync::Arc;

use asyncbreak::capture::NullCapture;
use asyncbreak::forest::{CausalityRegistry, NodeId, ROOT_KIND};
use asyncbreak::host::{HostAdapter, SimHost};

fn setup() -> (Arc<SimHost>, CausalityRegistry) {
    let host = SimHost::new(Box::new(NullCapture));
    let registry = CausalityRegistry::new(host.clone() as Arc<dyn HostAdapter>);
    (host, registry)
}

/// Register a linear chain under the root and return the ids, deepest last.
fn register_chain(host: &SimHost, registry: &mut CausalityRegistry, len: usize) -> Vec<NodeId> {
    let mut ids = Vec::new();
    let mut guards = Vec::new();
    for _ in 0..len {
        let id = host.allocate_id();
        registry.register(id, "timer-fired");
        guards.push(host.activate(id));
        ids.push(id);
    }
    // Unwind activations newest-first so the root context is restored.
    while let Some(guard) = guards.pop() {
        drop(guard);
    }
    ids
}

#[test]
fn ascent_terminates_at_root_in_depth_steps() {
    let (host, mut registry) = setup();
    let ids = register_chain(&host, &mut registry, 5);

    let mut steps = 0;
    let mut cursor = *ids.last().unwrap();
    loop {
        let node = registry.lookup(cursor).unwrap();
        match node.parent() {
            Some(parent) => {
                steps += 1;
                cursor = parent;
            }
            None => break,
        }
    }

    assert_eq!(cursor, NodeId::ROOT);
    assert_eq!(steps, 5);
}

#[test]
fn children_are_kept_in_creation_order() {
    let (host, mut registry) = setup();

    let parent = host.allocate_id();
    registry.register(parent, "timer-fired");
    let _active = host.activate(parent);

    let mut expected = Vec::new();
    for _ in 0..4 {
        let id = host.allocate_id();
        registry.register(id, "deferred-callback");
        expected.push(id);
    }

    assert_eq!(registry.lookup(parent).unwrap().children(), &expected[..]);
}

#[test]
fn parent_and_children_links_agree() {
    let (host, mut registry) = setup();
    let ids = register_chain(&host, &mut registry, 3);

    for id in ids {
        let node = registry.lookup(id).unwrap();
        let parent_id = node.parent().unwrap();
        let parent = registry.lookup(parent_id).unwrap();
        assert!(parent.children().contains(&id));

        for child in parent.children() {
            assert_eq!(registry.lookup(*child).unwrap().parent(), Some(parent_id));
        }
    }
}

#[test]
fn nodes_default_to_the_root_parent() {
    let (host, mut registry) = setup();
    let id = host.allocate_id();
    registry.register(id, "timer-fired");
    assert_eq!(registry.lookup(id).unwrap().parent(), Some(NodeId::ROOT));
    assert_eq!(registry.lookup(NodeId::ROOT).unwrap().kind(), ROOT_KIND);
}

#[test]
#[should_panic(expected = "registered twice")]
fn duplicate_registration_panics() {
    let (host, mut registry) = setup();
    let id = host.allocate_id();
    registry.register(id, "timer-fired");
    registry.register(id, "timer-fired");
}

#[test]
#[should_panic(expected = "reserved for the root")]
fn registering_the_root_id_panics() {
    let (_host, mut registry) = setup();
    registry.register(NodeId::ROOT, "timer-fired");
}

#[test]
#[should_panic(expected = "never registered")]
fn unknown_active_id_panics() {
    let (host, mut registry) = setup();
    let _active = host.activate(NodeId(99));
    let id = host.allocate_id();
    registry.register(id, "timer-fired");
}

#[test]
fn completing_a_leaf_prunes_it() {
    let (host, mut registry) = setup();
    let ids = register_chain(&host, &mut registry, 2);
    assert_eq!(registry.len(), 3);

    registry.complete(ids[1]);
    assert_eq!(registry.len(), 2);
    assert!(registry.lookup(ids[1]).is_none());
    assert!(registry.lookup(ids[0]).unwrap().children().is_empty());
}

#[test]
fn completion_cascades_through_completed_ancestors() {
    let (host, mut registry) = setup();
    let ids = register_chain(&host, &mut registry, 2);

    // Completing the parent first does not prune it while the child lives.
    registry.complete(ids[0]);
    assert_eq!(registry.len(), 3);

    // Once the child goes, the completed parent becomes a prunable leaf too.
    registry.complete(ids[1]);
    assert_eq!(registry.len(), 1);
    assert!(registry.lookup(NodeId::ROOT).is_some());
}

#[test]
#[should_panic(expected = "must not be reused")]
fn pruned_ids_cannot_be_reused() {
    let (host, mut registry) = setup();
    let id = host.allocate_id();
    registry.register(id, "timer-fired");
    registry.complete(id);
    registry.register(id, "timer-fired");
}

#[test]
#[should_panic(expected = "never completes")]
fn completing_the_root_panics() {
    let (_host, mut registry) = setup();
    registry.complete(NodeId::ROOT);
}

#[test]
#[should_panic(expected = "unknown node")]
fn completing_an_unknown_id_panics() {
    let (_host, mut registry) = setup();
    registry.complete(NodeId(42));
}

#[test]
fn reset_drops_everything_but_a_fresh_root() {
    let (host, mut registry) = setup();
    register_chain(&host, &mut registry, 4);
    assert_eq!(registry.len(), 5);

    registry.reset();
    assert_eq!(registry.len(), 1);
    let root = registry.lookup(NodeId::ROOT).unwrap();
    assert_eq!(root.kind(), ROOT_KIND);
    assert!(root.children().is_empty());
}
