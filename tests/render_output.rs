use std::sync::Arc;

use asyncbreak::capture::{CaptureStrategy, Descriptor, NullCapture};
use asyncbreak::config::Options;
use asyncbreak::finder::BreakFinder;
use asyncbreak::host::{HostAdapter, SimHost};
use asyncbreak::render::{chain_to_dot, framed, render_chain, render_subtree, subtree_to_dot, write_break_artifact};
use asyncbreak::BreakDetected;

/// Capture strategy with a fixed frame, so rendered output is predictable.
struct FixedCapture(&'static str);

impl CaptureStrategy for FixedCapture {
    fn capture(&self) -> Descriptor {
        Descriptor::new(vec![self.0.to_string()])
    }
}

fn broken_report(capture: Box<dyn CaptureStrategy>) -> BreakDetected {
    let host = SimHost::new(capture);
    let finder = BreakFinder::new(host.clone() as Arc<dyn HostAdapter>, Options::default());

    let a = host.allocate_id();
    finder.on_create(a, "timer-fired");
    let mark = {
        let _a_active = host.activate(a);
        let side = host.allocate_id();
        finder.on_create(side, "deferred-callback");
        finder.mark()
    };

    let b = host.allocate_id();
    finder.on_create(b, "timer-fired");
    let _b_active = host.activate(b);

    finder.check(mark).unwrap_err()
}

#[test]
fn subtree_dot_has_nodes_and_edges() {
    let err = broken_report(Box::new(NullCapture));
    let dot = subtree_to_dot(&err.report.ancestor_subtree);

    assert!(dot.starts_with("digraph tree {"));
    assert!(dot.contains("node [fontsize=9,fontname=courier];"));
    // Marked node 1 and its spawned child 2, connected.
    assert!(dot.contains("\"n1\" [shape=plaintext,label=<"));
    assert!(dot.contains("\"n2\" [shape=plaintext,label=<"));
    assert!(dot.contains("\"n1\" -> \"n2\";"));
    assert!(dot.contains("<b><u>timer-fired</u></b>"));
    assert!(dot.contains("<b><u>deferred-callback</u></b>"));
}

#[test]
fn chain_dot_follows_forward_links() {
    let err = broken_report(Box::new(NullCapture));
    let dot = chain_to_dot(&err.report.orphan_chain);

    // The chain holds only the failing sibling (node 3); no edges, no
    // mention of the marked subtree.
    assert!(dot.contains("\"n3\" [shape=plaintext,label=<"));
    assert!(!dot.contains("\"n1\""));
    assert!(!dot.contains("->"));
}

#[test]
fn dot_labels_escape_frames() {
    let err = broken_report(Box::new(FixedCapture("poll<Fut> (src/job.rs:7)")));
    let dot = subtree_to_dot(&err.report.ancestor_subtree);

    assert!(dot.contains("poll&lt;Fut&gt; (src/job.rs:7)"));
    assert!(!dot.contains("poll<Fut>"));
}

#[test]
fn terminal_tree_draws_branches_and_frames() {
    let err = broken_report(Box::new(FixedCapture("handler (src/job.rs:7)")));
    let rendered = render_subtree(&err.report.ancestor_subtree);

    assert!(rendered.contains("### timer-fired ###"));
    assert!(rendered.contains("### deferred-callback ###"));
    assert!(rendered.contains("handler (src/job.rs:7)"));
    assert!(rendered.contains("└──"));
}

#[test]
fn terminal_chain_renders_one_branch() {
    let err = broken_report(Box::new(NullCapture));
    let rendered = render_chain(&err.report.orphan_chain);

    assert!(rendered.contains("### timer-fired ###"));
    assert!(!rendered.contains("├"));
}

#[test]
fn framed_output_is_boxed() {
    let framed = framed("line one\nline two");
    let lines: Vec<&str> = framed.lines().collect();

    assert_eq!(lines.first(), Some(&"╔══════════════"));
    assert_eq!(lines.last(), Some(&"╚══════════════"));
    assert!(lines[1..lines.len() - 1].iter().all(|l| l.starts_with("║ ")));
}

#[test]
fn artifact_is_written_with_the_expected_name_and_content() {
    let err = broken_report(Box::new(NullCapture));
    let dir = tempfile::tempdir().unwrap();

    let path = write_break_artifact(dir.path(), &err.report).unwrap();

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.ends_with(".async-break.html"));
    let millis = name.split('.').next().unwrap();
    assert!(!millis.is_empty() && millis.chars().all(|c| c.is_ascii_digit()));

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.matches("digraph tree {").count(), 2);
    assert!(contents.contains("<b><u>timer-fired</u></b>"));
}
