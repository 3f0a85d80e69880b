//! Backend node → flat node(s).

use std::str::FromStr;

use crate::error::EditorError;
use crate::graph::*;
use crate::parse::types::*;
use crate::registry::BranchSlot;

/// Flat node for a stored backend node. Unknown types become placeholders.
pub fn lower_node(node: &BackendNode, errors: &mut Vec<EditorError>) -> Option<FlowNode> {
    let data = match node.node_type.as_str() {
        BACKEND_START => NodeData::Start,
        BACKEND_APP => match &node.app {
            Some(app) => NodeData::App(lower_app(app)),
            None => {
                errors.push(missing_payload(node, "app"));
                return None;
            }
        },
        BACKEND_INSTRUCTION => match &node.instruction {
            Some(ins) => NodeData::Instruction(lower_instruction(ins)),
            None => {
                errors.push(missing_payload(node, "instruction"));
                return None;
            }
        },
        other => {
            tracing::warn!(node_id = %node.id, node_type = %other, "unsupported node type, rendering placeholder");
            NodeData::Unsupported {
                type_name: other.to_string(),
            }
        }
    };

    Some(FlowNode {
        id: node.id.clone(),
        data,
        position: node.position,
        parent_node_id: None,
    })
}

fn missing_payload(node: &BackendNode, field: &str) -> EditorError {
    EditorError::transform(
        "T002",
        format!(
            "{} node '{}' is missing its '{}' payload",
            node.node_type, node.id, field
        ),
        Some(node.id.clone()),
    )
}

fn lower_app(app: &AppPayload) -> AppNodeData {
    AppNodeData {
        app_name: app.app_name.clone(),
        integration_id: app.integration_id.clone(),
        integrated: app.integrated,
        description: app.description.clone(),
        selected_action: app.selected_action.clone(),
        config: app.config.clone(),
    }
}

fn lower_instruction(ins: &InstructionPayload) -> InstructionNodeData {
    let template = match (&ins.service, ins.custom) {
        (service, true) => TemplateSelection::Custom {
            service: service.clone(),
        },
        (Some(service), false) => TemplateSelection::Default {
            service: service.clone(),
            template_id: ins.template_id.clone(),
        },
        (None, false) => TemplateSelection::Unset,
    };
    InstructionNodeData {
        description: ins.description.clone(),
        template,
    }
}

/// The connector node a split is drawn as. Addressed in the backend through `owner`.
pub fn split_node(owner: &BackendNode, split: &SplitData) -> FlowNode {
    let mut slots: [Option<String>; 3] = Default::default();
    for (slot, branch) in split.slots().into_iter().enumerate() {
        slots[slot] = branch.map(|b| b.id.clone());
    }
    FlowNode {
        id: split.id.clone(),
        data: NodeData::Split(SplitNodeData {
            split_id: split.id.clone(),
            slots,
        }),
        position: split.connector_position,
        parent_node_id: Some(owner.id.clone()),
    }
}

pub fn path_node(
    owner: &BackendNode,
    slot: BranchSlot,
    branch: &BackendBranch,
    errors: &mut Vec<EditorError>,
) -> FlowNode {
    let conditions = branch
        .conditions
        .iter()
        .filter_map(|c| match ConditionOperator::from_str(&c.operator) {
            Ok(operator) => Some(Condition {
                id: c.id.clone(),
                field: c.field.clone(),
                operator,
                value: c.value.clone(),
            }),
            Err(message) => {
                errors.push(EditorError::transform("T005", message, Some(branch.id.clone())));
                None
            }
        })
        .collect();

    FlowNode {
        id: branch.id.clone(),
        data: NodeData::Path(PathNodeData {
            branch_id: branch.id.clone(),
            slot,
            label: branch.label.clone(),
            background_color: branch.background_color.clone(),
            text_color: branch.text_color.clone(),
            description: branch.description.clone(),
            conditions,
            available_fields: branch.if_condition.clone(),
            next_node_id: branch.next_node_id.clone(),
        }),
        position: branch.position,
        parent_node_id: Some(owner.id.clone()),
    }
}
