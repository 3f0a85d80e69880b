//! Workflow validation over the flat graph.
//!
//! Clean validation is what allows a draft to be published; enabling
//! additionally needs a published workflow with a valid test run.

pub mod node_rules;
pub mod structural;

use serde::Serialize;

use crate::error::EditorError;
use crate::graph::{FlowGraph, FlowIndex, FlowNode, NodeData};
use crate::parse::types::{WorkflowDocument, WorkflowStatus};

/// Validate the entire graph (structural + node configs).
pub fn validate_graph(flow: &FlowGraph) -> Vec<EditorError> {
    let mut errors = match FlowIndex::build(flow) {
        Ok(index) => structural::validate_structural(flow, &index),
        Err(errors) => return errors,
    };

    for node in &flow.nodes {
        errors.extend(validate_node(node));
    }

    errors
}

/// Validate a single node's configuration.
pub fn validate_node(node: &FlowNode) -> Vec<EditorError> {
    node_rules::validate_node_config(node)
}

/// True when every APP node is backed by an integrated app.
pub fn all_nodes_integrated(flow: &FlowGraph) -> bool {
    flow.nodes.iter().all(|n| match &n.data {
        NodeData::App(app) => app.integrated,
        _ => true,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Readiness {
    pub all_nodes_integrated: bool,
    pub can_publish: bool,
    pub can_enable: bool,
    #[serde(skip)]
    pub blockers: Vec<EditorError>,
}

pub fn readiness(doc: &WorkflowDocument, flow: &FlowGraph) -> Readiness {
    let blockers = validate_graph(flow);
    let can_publish = blockers.is_empty();
    Readiness {
        all_nodes_integrated: all_nodes_integrated(flow),
        can_publish,
        can_enable: can_publish && doc.status == WorkflowStatus::Published && doc.is_valid_test_run,
        blockers,
    }
}
