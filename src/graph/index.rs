//! petgraph-based directed graph over a flat `FlowGraph`, for structural queries.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};

use super::types::{EdgeKind, FlowGraph};
use crate::error::EditorError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeLabel {
    pub source_handle: String,
    pub kind: EdgeKind,
}

pub struct FlowIndex {
    pub graph: DiGraph<String, EdgeLabel>,
    pub node_indices: HashMap<String, NodeIndex>,
}

impl FlowIndex {
    pub fn build(flow: &FlowGraph) -> Result<Self, Vec<EditorError>> {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();
        let mut errors = Vec::new();

        for node in &flow.nodes {
            let idx = graph.add_node(node.id.clone());
            node_indices.insert(node.id.clone(), idx);
        }

        for edge in &flow.edges {
            match (node_indices.get(&edge.source), node_indices.get(&edge.target)) {
                (Some(&s), Some(&t)) => {
                    graph.add_edge(
                        s,
                        t,
                        EdgeLabel {
                            source_handle: edge.source_handle.clone(),
                            kind: edge.kind,
                        },
                    );
                }
                (None, _) => errors.push(EditorError::validate(
                    "V000",
                    format!("Edge '{}' references unknown source node '{}'", edge.id, edge.source),
                    None,
                )),
                (_, None) => errors.push(EditorError::validate(
                    "V000",
                    format!("Edge '{}' references unknown target node '{}'", edge.id, edge.target),
                    None,
                )),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(FlowIndex { graph, node_indices })
    }
}
