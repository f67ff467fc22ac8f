// src/render/tree.rs

//! Terminal pretty-printer for the diagnostic subgraphs.
//!
//! Draws the classic box-drawing tree (`├─┬`, `└──`, `│`), with each node's
//! kind as a colored heading followed by its captured frames.

use crate::capture::Descriptor;
use crate::diagnose::{ChainLink, OrphanChain, SubtreeNode};

const YELLOW: &str = "\u{1b}[33m";
const RESET: &str = "\u{1b}[0m";

struct TreeItem {
    label: String,
    nodes: Vec<TreeItem>,
}

/// Render an ancestor subtree, children indented under their parent.
pub fn render_subtree(tree: &SubtreeNode) -> String {
    render_item(&item_from_subtree(tree), "")
}

/// Render an orphan chain as a one-branch tree, oldest entry on top.
pub fn render_chain(chain: &OrphanChain) -> String {
    match chain.head() {
        Some(link) => render_item(&item_from_link(link), ""),
        None => String::new(),
    }
}

/// Wrap rendered output in a frame, for embedding in larger messages.
pub fn framed(rendered: &str) -> String {
    let body: Vec<String> = rendered
        .trim_end()
        .lines()
        .map(|line| format!("║ {line}"))
        .collect();
    format!("╔══════════════\n{}\n╚══════════════", body.join("\n"))
}

fn item_from_subtree(tree: &SubtreeNode) -> TreeItem {
    TreeItem {
        label: heading(&tree.kind, &tree.descriptor),
        nodes: tree.children.iter().map(item_from_subtree).collect(),
    }
}

fn item_from_link(link: &ChainLink) -> TreeItem {
    TreeItem {
        label: heading(&link.kind, &link.descriptor),
        nodes: match link.next.as_deref() {
            Some(next) => vec![item_from_link(next)],
            None => Vec::new(),
        },
    }
}

fn heading(kind: &str, descriptor: &Descriptor) -> String {
    let head = format!("{YELLOW}### {kind} ###{RESET}");
    if descriptor.is_empty() {
        head
    } else {
        format!("{head}\n{descriptor}")
    }
}

fn render_item(item: &TreeItem, prefix: &str) -> String {
    // Continuation lines of a multi-line label align under the label and
    // carry the branch rune when children follow below.
    let splitter = format!(
        "\n{prefix}{} ",
        if item.nodes.is_empty() { " " } else { "│" }
    );
    let lines: Vec<&str> = item.label.split('\n').collect();
    let mut out = format!("{prefix}{}\n", lines.join(&splitter));

    let count = item.nodes.len();
    for (ix, child) in item.nodes.iter().enumerate() {
        let last = ix + 1 == count;
        let forks = !child.nodes.is_empty();

        let child_prefix = format!("{prefix}{} ", if last { ' ' } else { '│' });
        let rendered = render_item(child, &child_prefix);

        out.push_str(&format!(
            "{prefix}{}─{} ",
            if last { '└' } else { '├' },
            if forks { '┬' } else { '─' }
        ));
        // The child rendered itself under `child_prefix`; its first line is
        // replaced by the connector above.
        out.push_str(&rendered[child_prefix.len()..]);
    }

    out
}
