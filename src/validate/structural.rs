//! Graph-level structural validation rules (V001–V006).

use std::collections::{HashMap, HashSet};

use petgraph::algo::is_cyclic_directed;
use petgraph::visit::Bfs;

use crate::error::EditorError;
use crate::graph::{EdgeKind, FlowGraph, FlowIndex, NodeData};
use crate::registry::BranchSlot;

/// Run all structural validation rules. Returns all errors found.
pub fn validate_structural(flow: &FlowGraph, index: &FlowIndex) -> Vec<EditorError> {
    let mut errors = Vec::new();

    v001_exactly_one_start(flow, &mut errors);
    v002_all_reachable_from_start(flow, index, &mut errors);
    v003_no_cycles(index, &mut errors);
    v004_one_normal_edge_per_handle(flow, &mut errors);
    v005_split_branch_handles(flow, &mut errors);
    v006_no_unsupported_nodes(flow, &mut errors);

    errors
}

fn v001_exactly_one_start(flow: &FlowGraph, errors: &mut Vec<EditorError>) {
    let count = flow
        .nodes
        .iter()
        .filter(|n| matches!(n.data, NodeData::Start))
        .count();
    if count != 1 {
        errors.push(EditorError::validate(
            "V001",
            format!("Workflow must have exactly 1 START node, found {}", count),
            None,
        ));
    }
}

fn v002_all_reachable_from_start(flow: &FlowGraph, index: &FlowIndex, errors: &mut Vec<EditorError>) {
    let Some(start) = flow.nodes.iter().find(|n| matches!(n.data, NodeData::Start)) else {
        return;
    };
    let Some(&start_idx) = index.node_indices.get(&start.id) else {
        return;
    };

    let mut reachable = HashSet::new();
    let mut bfs = Bfs::new(&index.graph, start_idx);
    while let Some(nx) = bfs.next(&index.graph) {
        reachable.insert(nx);
    }

    for node in &flow.nodes {
        let Some(&idx) = index.node_indices.get(&node.id) else {
            continue;
        };
        if !reachable.contains(&idx) {
            errors.push(EditorError::validate(
                "V002",
                format!("Node '{}' is not reachable from START", node.id),
                Some(node.id.clone()),
            ));
        }
    }
}

fn v003_no_cycles(index: &FlowIndex, errors: &mut Vec<EditorError>) {
    if is_cyclic_directed(&index.graph) {
        errors.push(EditorError::validate(
            "V003",
            "Workflow graph contains a cycle",
            None,
        ));
    }
}

fn v004_one_normal_edge_per_handle(flow: &FlowGraph, errors: &mut Vec<EditorError>) {
    let mut counts: HashMap<(&str, &str), usize> = HashMap::new();
    for edge in flow.edges.iter().filter(|e| e.kind == EdgeKind::Normal) {
        *counts
            .entry((edge.source.as_str(), edge.source_handle.as_str()))
            .or_default() += 1;
    }
    let mut offenders: Vec<_> = counts.into_iter().filter(|(_, n)| *n > 1).collect();
    offenders.sort();
    for ((source, handle), n) in offenders {
        errors.push(EditorError::validate(
            "V004",
            format!(
                "Node '{}' has {} outgoing connections on handle '{}'",
                source, n, handle
            ),
            Some(source.to_string()),
        ));
    }
}

fn v005_split_branch_handles(flow: &FlowGraph, errors: &mut Vec<EditorError>) {
    for node in flow.nodes.iter().filter(|n| matches!(n.data, NodeData::Split(_))) {
        let mut used = HashSet::new();
        for edge in flow.outgoing(&node.id) {
            if edge.kind != EdgeKind::Split || BranchSlot::from_handle(&edge.source_handle).is_none() {
                errors.push(EditorError::validate(
                    "V005",
                    format!(
                        "Split '{}' has an edge on '{}', which is not a branch handle",
                        node.id, edge.source_handle
                    ),
                    Some(node.id.clone()),
                ));
            } else if !used.insert(edge.source_handle.as_str()) {
                errors.push(EditorError::validate(
                    "V005",
                    format!(
                        "Split '{}' uses branch handle '{}' more than once",
                        node.id, edge.source_handle
                    ),
                    Some(node.id.clone()),
                ));
            }
        }
    }
}

fn v006_no_unsupported_nodes(flow: &FlowGraph, errors: &mut Vec<EditorError>) {
    for node in &flow.nodes {
        if let NodeData::Unsupported { type_name } = &node.data {
            errors.push(EditorError::validate(
                "V006",
                format!("Node '{}' has unsupported type '{}'", node.id, type_name),
                Some(node.id.clone()),
            ));
        }
    }
}
