//! Position & Branch Persistence.
//!
//! On drag stop a node's role decides which backend update records its new
//! position. Positions are layout metadata: updates are sent at most once,
//! failures are logged and never retried, and the last write wins.

use serde::Serialize;

use crate::backend::{
    ConnectorPositionPayload, NodePositionPayload, PathPositionPayload, WorkflowBackend,
};
use crate::error::EditorError;
use crate::graph::{FlowNode, NodeData, Position};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "update", rename_all = "camelCase")]
pub enum PositionUpdate {
    Node(NodePositionPayload),
    Connector(ConnectorPositionPayload),
    Path(PathPositionPayload),
}

/// Pick the update for a dragged node, or the reason none applies.
pub fn route_position_update(
    node: &FlowNode,
    position: Position,
) -> Result<PositionUpdate, EditorError> {
    match &node.data {
        NodeData::Start | NodeData::App(_) | NodeData::Instruction(_) => {
            Ok(PositionUpdate::Node(NodePositionPayload {
                node_id: node.id.clone(),
                position,
            }))
        }
        NodeData::Split(_) => {
            let owner = parent_of(node)?;
            Ok(PositionUpdate::Connector(ConnectorPositionPayload {
                node_id: owner,
                connector_position: position,
            }))
        }
        NodeData::Path(path) => {
            let owner = parent_of(node)?;
            Ok(PositionUpdate::Path(PathPositionPayload {
                node_id: owner,
                branch_id: path.branch_id.clone(),
                branch_position: position,
            }))
        }
        NodeData::Unsupported { type_name } => Err(EditorError::persist(
            "M002",
            format!("No position update for node type '{}'", type_name),
            Some(node.id.clone()),
        )),
    }
}

fn parent_of(node: &FlowNode) -> Result<String, EditorError> {
    node.parent_node_id.clone().ok_or_else(|| {
        EditorError::persist(
            "M001",
            format!("{} node '{}' has no parent node", node.type_name(), node.id),
            Some(node.id.clone()),
        )
    })
}

/// Send the matching update. Returns whether the backend accepted it; the
/// caller is never blocked on or told to retry a failure.
pub async fn persist_position<B: WorkflowBackend>(
    backend: &B,
    node: &FlowNode,
    position: Position,
) -> bool {
    let update = match route_position_update(node, position) {
        Ok(update) => update,
        Err(e) => {
            tracing::warn!(node_id = %node.id, code = %e.code, "{}", e.message);
            return false;
        }
    };

    let result = match update {
        PositionUpdate::Node(payload) => backend.update_node_position(payload).await,
        PositionUpdate::Connector(payload) => backend.update_connector_position(payload).await,
        PositionUpdate::Path(payload) => backend.update_path_position(payload).await,
    };

    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(node_id = %node.id, error = %e, "position update failed");
            false
        }
    }
}
