// src/render/artifact.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing::info;

use crate::diagnose::BreakReport;
use crate::render::dot::{chain_to_dot, subtree_to_dot};

/// Self-contained HTML page rendering both graphs client-side.
const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>async break report</title>
<script src="https://cdn.jsdelivr.net/npm/@viz-js/viz@3/lib/viz-standalone.js"></script>
</head>
<body>
<h2>Async tree starting at the marked point</h2>
<div id="tree"><pre>{{tree}}</pre></div>
<h2>Async branch leading to the failing point</h2>
<div id="list"><pre>{{list}}</pre></div>
<script>
Viz.instance().then(function (viz) {
  for (const id of ["tree", "list"]) {
    const el = document.getElementById(id);
    el.replaceChildren(viz.renderSVGElement(el.textContent));
  }
});
</script>
</body>
</html>
"#;

/// Persist a break report as an HTML artifact in `dir`.
///
/// The file is named `<unix-millis>.async-break.html` and embeds the two
/// Graphviz descriptions; returns the path written. Failures here are
/// ordinary I/O errors, outside the core's error taxonomy.
pub fn write_break_artifact(dir: &Path, report: &BreakReport) -> Result<PathBuf> {
    let tree_dot = subtree_to_dot(&report.ancestor_subtree);
    let list_dot = chain_to_dot(&report.orphan_chain);

    let html = TEMPLATE
        .replace("{{tree}}", &tree_dot)
        .replace("{{list}}", &list_dot);

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the unix epoch")?
        .as_millis();

    fs::create_dir_all(dir)
        .with_context(|| format!("creating artifact directory at {:?}", dir))?;

    let path = dir.join(format!("{millis}.async-break.html"));
    fs::write(&path, html)
        .with_context(|| format!("writing break artifact to {:?}", path))?;

    info!(path = %path.display(), "wrote break artifact");
    Ok(path)
}
