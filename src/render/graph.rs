//! Directed graph derived from a from/to column pair.

use crate::record::{RecordCollection, Value};
use crate::settings::GraphColumns;
use ahash::AHashSet;

/// Nodes and edges in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    pub nodes: Vec<String>,
    pub edges: Vec<(String, String)>,
}

impl Graph {
    /// Walk the records in output order.
    ///
    /// The `from` cell names one node; the `to` cell may list several,
    /// separated by `separator`. Blank targets leave `from` as an isolated
    /// node. A blank `from` still declares its targets, without edges.
    pub fn from_records(records: &RecordCollection, columns: &GraphColumns, separator: &str) -> Self {
        let mut graph = Graph::default();
        let mut seen_nodes: AHashSet<String> = AHashSet::new();
        let mut seen_edges: AHashSet<(String, String)> = AHashSet::new();

        for record in records.iter() {
            let from = record.get(&columns.from).and_then(source_id);
            match &from {
                Some(from) => graph.add_node(from, &mut seen_nodes),
                None => tracing::debug!(column = %columns.from, "record has no source node"),
            }

            let targets = record
                .get(&columns.to)
                .map(|v| v.identifiers(separator))
                .unwrap_or_default();
            for target in targets {
                graph.add_node(&target, &mut seen_nodes);
                let Some(from) = &from else { continue };
                let edge = (from.clone(), target);
                if seen_edges.insert(edge.clone()) {
                    graph.edges.push(edge);
                }
            }
        }

        graph
    }

    fn add_node(&mut self, id: &str, seen: &mut AHashSet<String>) {
        if seen.insert(id.to_string()) {
            self.nodes.push(id.to_string());
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// The single node a `from` cell names, if any
fn source_id(value: &Value) -> Option<String> {
    let id = value.sort_text().trim().to_string();
    (!id.is_empty()).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn columns() -> GraphColumns {
        GraphColumns {
            from: "ID".to_string(),
            to: "Targets".to_string(),
        }
    }

    #[test]
    fn test_nodes_and_edges() {
        let mut records = RecordCollection::new();
        records.add(Record::new().with("ID", "a").with("Targets", "b,c"));
        records.add(Record::new().with("ID", "b").with("Targets", ""));

        let graph = Graph::from_records(&records, &columns(), ",");
        assert_eq!(graph.nodes, vec!["a", "b", "c"]);
        assert_eq!(
            graph.edges,
            vec![
                ("a".to_string(), "b".to_string()),
                ("a".to_string(), "c".to_string())
            ]
        );
    }

    #[test]
    fn test_nodes_deduplicated() {
        let mut records = RecordCollection::new();
        records.add(Record::new().with("ID", "a").with("Targets", vec!["b", "b"]));
        records.add(Record::new().with("ID", "b").with("Targets", "a"));
        records.add(Record::new().with("ID", "a").with("Targets", "b"));

        let graph = Graph::from_records(&records, &columns(), ",");
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_missing_from_keeps_targets_as_isolated_nodes() {
        let mut records = RecordCollection::new();
        records.add(Record::new().with("ID", "a").with("Targets", "b"));
        records.add(Record::new().with("ID", "").with("Targets", "x,y"));
        records.add(Record::new().with("Targets", "b"));

        let graph = Graph::from_records(&records, &columns(), ",");
        assert_eq!(graph.nodes, vec!["a", "b", "x", "y"]);
        assert_eq!(graph.edges, vec![("a".to_string(), "b".to_string())]);
    }

    #[test]
    fn test_source_id() {
        assert_eq!(source_id(&Value::from(" a ")), Some("a".to_string()));
        assert_eq!(source_id(&Value::from("")), None);
    }
}
