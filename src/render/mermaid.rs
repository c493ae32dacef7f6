//! Mermaid flowchart output.

use super::graph::Graph;
use super::Section;
use crate::error::Result;
use crate::settings::RenderSettings;
use ahash::AHashMap;

/// Render the derived graph as a left-to-right flowchart.
///
/// Nodes get synthetic ids (`n0`, `n1`, ...) because Mermaid ids cannot hold
/// most of the characters that resource identifiers contain.
pub fn to_mermaid(section: &Section, settings: &RenderSettings) -> Result<String> {
    let columns = settings.graph_columns()?;
    let graph = Graph::from_records(&section.records, columns, &settings.list_separator);

    let mut output = String::new();
    if let Some(title) = &section.title {
        output.push_str(&format!("---\ntitle: {}\n---\n", title));
    }
    output.push_str("flowchart LR\n");

    let mut ids: AHashMap<&str, String> = AHashMap::new();
    for (i, node) in graph.nodes.iter().enumerate() {
        let id = format!("n{}", i);
        output.push_str(&format!("    {}[\"{}\"]\n", id, escape_label(node)));
        ids.insert(node.as_str(), id);
    }

    for (from, to) in &graph.edges {
        if let (Some(from), Some(to)) = (ids.get(from.as_str()), ids.get(to.as_str())) {
            output.push_str(&format!("    {} --> {}\n", from, to));
        }
    }

    Ok(output)
}

fn escape_label(s: &str) -> String {
    s.replace('"', "#quot;")
}
