//! Graph Model Transformer: backend workflow tree → flat `{nodes, edges}`.
//!
//! A pure function of its input. The same document always yields the same
//! graph, in the same order: stored nodes in backend order, each followed by
//! its split connector and the paths in its occupied slots.

pub mod edges;
pub mod nodes;

use std::collections::{HashMap, HashSet};

use crate::error::EditorError;
use crate::graph::FlowGraph;
use crate::parse::types::WorkflowDocument;
use crate::registry::{BranchSlot, NodeKind};

use edges::TypeLookup;

/// Transform a backend document, reporting every integrity problem found.
pub fn transform(doc: &WorkflowDocument) -> Result<FlowGraph, Vec<EditorError>> {
    let mut errors = Vec::new();
    check_unique_ids(doc, &mut errors);

    let stored: HashSet<&str> = doc.nodes.iter().map(|n| n.id.as_str()).collect();
    let types = type_lookup(doc);
    let mut graph = FlowGraph::empty();

    for node in &doc.nodes {
        if let Some(flat) = nodes::lower_node(node, &mut errors) {
            graph.nodes.push(flat);
        }

        match (&node.path, &node.split_data) {
            (Some(_), Some(_)) => {
                errors.push(EditorError::transform(
                    "T004",
                    format!(
                        "Node '{}' has both a direct path and a split",
                        node.id
                    ),
                    Some(node.id.clone()),
                ));
            }
            (Some(path), None) => {
                if let Some(next) = &path.next_node_id {
                    graph.edges.extend(edges::next_node_edge(
                        &node.id,
                        &node.node_type,
                        next,
                        &stored,
                        &types,
                        &mut errors,
                    ));
                }
            }
            (None, Some(split)) => {
                graph.nodes.push(nodes::split_node(node, split));
                graph
                    .edges
                    .push(edges::normal_edge(&node.id, &node.node_type, &split.id, &types));

                for (slot, branch) in BranchSlot::ALL.into_iter().zip(split.slots()) {
                    let Some(branch) = branch else { continue };
                    graph.nodes.push(nodes::path_node(node, slot, branch, &mut errors));
                    graph.edges.push(edges::split_edge(&split.id, slot, &branch.id));
                    if let Some(next) = &branch.next_node_id {
                        graph.edges.extend(edges::next_node_edge(
                            &branch.id,
                            NodeKind::Path.as_str(),
                            next,
                            &stored,
                            &types,
                            &mut errors,
                        ));
                    }
                }
            }
            (None, None) => {}
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(graph)
}

/// Transform, failing closed: a malformed document logs its errors and
/// yields an empty graph so the canvas renders nothing instead of crashing.
pub fn transform_or_empty(doc: &WorkflowDocument) -> FlowGraph {
    match transform(doc) {
        Ok(graph) => graph,
        Err(errors) => {
            for e in &errors {
                tracing::error!(workflow_id = %doc.id, code = %e.code, node_id = ?e.node_id, "{}", e.message);
            }
            FlowGraph::empty()
        }
    }
}

/// Parse and transform raw backend JSON, failing closed on either step.
pub fn transform_json(json: &str) -> FlowGraph {
    match crate::parse::parse(json) {
        Ok(doc) => transform_or_empty(&doc),
        Err(errors) => {
            for e in &errors {
                tracing::error!(code = %e.code, "{}", e.message);
            }
            FlowGraph::empty()
        }
    }
}

fn check_unique_ids(doc: &WorkflowDocument, errors: &mut Vec<EditorError>) {
    let mut seen = HashSet::new();
    let flat_ids = doc.nodes.iter().flat_map(|node| {
        let split_ids = node.split_data.iter().flat_map(|split| {
            std::iter::once(split.id.as_str())
                .chain(split.slots().into_iter().flatten().map(|b| b.id.as_str()))
        });
        std::iter::once(node.id.as_str()).chain(split_ids)
    });
    for id in flat_ids {
        if !seen.insert(id) {
            errors.push(EditorError::transform(
                "T001",
                format!("Duplicate id '{}' in workflow '{}'", id, doc.id),
                Some(id.to_string()),
            ));
        }
    }
}

fn type_lookup(doc: &WorkflowDocument) -> TypeLookup<'_> {
    let mut types: TypeLookup = HashMap::new();
    for node in &doc.nodes {
        types.insert(node.id.as_str(), node.node_type.as_str());
        if let Some(split) = &node.split_data {
            types.insert(split.id.as_str(), NodeKind::Split.as_str());
            for branch in split.slots().into_iter().flatten() {
                types.insert(branch.id.as_str(), NodeKind::Path.as_str());
            }
        }
    }
    types
}
