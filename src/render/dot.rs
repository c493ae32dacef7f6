//! Graphviz DOT output.

use super::graph::Graph;
use super::Section;
use crate::error::Result;
use crate::settings::RenderSettings;

/// One node statement per unique identifier, then one edge statement per
/// derived pair, both in first-seen order
pub fn to_dot(section: &Section, settings: &RenderSettings) -> Result<String> {
    let columns = settings.graph_columns()?;
    let graph = Graph::from_records(&section.records, columns, &settings.list_separator);

    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "derived graph"
    );

    let mut output = String::new();
    output.push_str("digraph G {\n");
    if let Some(title) = &section.title {
        output.push_str(&format!("  label={};\n", quote(title)));
        output.push_str("  labelloc=t;\n");
    }

    for node in &graph.nodes {
        output.push_str(&format!("  {};\n", escape_dot_id(node)));
    }

    for (from, to) in &graph.edges {
        output.push_str(&format!(
            "  {} -> {};\n",
            escape_dot_id(from),
            escape_dot_id(to)
        ));
    }

    output.push_str("}\n");
    Ok(output)
}

/// Escape a string for use as a DOT node ID
fn escape_dot_id(s: &str) -> String {
    if s.chars().all(|c| c.is_alphanumeric() || c == '_')
        && !s.is_empty()
        && !s.starts_with(|c: char| c.is_ascii_digit())
    {
        s.to_string()
    } else {
        quote(s)
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
