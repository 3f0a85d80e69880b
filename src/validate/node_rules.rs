//! Per-node configuration validation.

use crate::error::EditorError;
use crate::graph::{FlowNode, NodeData};

/// Validate a single node's configuration. Returns all errors found.
pub fn validate_node_config(node: &FlowNode) -> Vec<EditorError> {
    let mut errors = Vec::new();
    let node_id = Some(node.id.clone());

    match &node.data {
        NodeData::App(app) => {
            if app.app_name.trim().is_empty() {
                errors.push(EditorError::validate(
                    "N001",
                    "APP node must reference an app",
                    node_id.clone(),
                ));
            }
            if !app.integrated {
                errors.push(EditorError::validate(
                    "N002",
                    format!("App '{}' is not integrated", app.app_name),
                    node_id,
                ));
            }
        }
        NodeData::Instruction(ins) => {
            if ins.description.trim().is_empty() {
                errors.push(EditorError::validate(
                    "N003",
                    "Instruction node must have a description",
                    node_id,
                ));
            }
        }
        NodeData::Path(path) => {
            for (i, c) in path.conditions.iter().enumerate() {
                if c.field.trim().is_empty() || c.value.trim().is_empty() {
                    errors.push(EditorError::validate(
                        "N004",
                        format!("Condition {} of path '{}' is incomplete", i + 1, path.label),
                        node_id.clone(),
                    ));
                }
            }
            if path.label.trim().is_empty() {
                errors.push(EditorError::validate(
                    "N005",
                    "Path must have a name",
                    node_id,
                ));
            }
        }
        NodeData::Start | NodeData::Split(_) | NodeData::Unsupported { .. } => {}
    }

    errors
}
