// src/render/dot.rs

use crate::capture::Descriptor;
use crate::diagnose::{OrphanChain, SubtreeNode};
use crate::forest::NodeId;

/// Graphviz description of an ancestor subtree: one box per node, kind on
/// top, one row per captured frame, edges parent to child.
pub fn subtree_to_dot(tree: &SubtreeNode) -> String {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    walk(tree, &mut nodes, &mut edges);
    assemble(&nodes, &edges)
}

/// Graphviz description of an orphan chain: same node shape, edges along the
/// forward links.
pub fn chain_to_dot(chain: &OrphanChain) -> String {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    for link in chain.iter() {
        nodes.push(node_stmt(link.id, &link.kind, &link.descriptor));
        if let Some(next) = link.next.as_deref() {
            edges.push(edge_stmt(link.id, next.id));
        }
    }

    assemble(&nodes, &edges)
}

fn assemble(nodes: &[String], edges: &[String]) -> String {
    format!(
        "digraph tree {{\n\
         bgcolor=\"transparent\";\n\
         node [fontsize=9,fontname=courier];\n\
         {}\n\
         {}\n\
         }}",
        nodes.join("\n"),
        edges.join("\n")
    )
}

fn walk(tree: &SubtreeNode, nodes: &mut Vec<String>, edges: &mut Vec<String>) {
    nodes.push(node_stmt(tree.id, &tree.kind, &tree.descriptor));
    for child in &tree.children {
        edges.push(edge_stmt(tree.id, child.id));
        walk(child, nodes, edges);
    }
}

fn node_stmt(id: NodeId, kind: &str, descriptor: &Descriptor) -> String {
    format!("\"n{id}\" [shape=plaintext,label=<{}>];", make_label(kind, descriptor))
}

fn edge_stmt(from: NodeId, to: NodeId) -> String {
    format!("\"n{from}\" -> \"n{to}\";")
}

/// An HTML-like table label: underlined kind header, then one left-aligned
/// row per frame.
fn make_label(kind: &str, descriptor: &Descriptor) -> String {
    let rows: String = descriptor
        .frames()
        .iter()
        .map(|frame| {
            format!(
                "<tr><td align=\"left\" point-size=\"10\">{}</td></tr>",
                escape(frame)
            )
        })
        .collect();

    format!(
        "<table border=\"0\" cellborder=\"1\" cellspacing=\"0\" cellpadding=\"2\">\
         <tr><td align=\"center\"><b><u>{}</u></b></td></tr>{rows}</table>",
        escape(kind)
    )
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
