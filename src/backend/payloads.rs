//! Request/response shapes for the backend actions.
//!
//! Field names follow the backend's camelCase JSON so a transport can
//! serialize these directly.

use serde::{Deserialize, Serialize};

use crate::graph::{ConditionOperator, Position};
use crate::registry::NodeKind;

// =============================================================================
// NODES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppPayload {
    pub app_name: String,
    /// `APP` or `INSTRUCTION`.
    pub node_type: String,
    pub position: Position,
    pub workflow_id: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedNode {
    #[serde(rename = "_id")]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteNodePayload {
    pub node_id: String,
    pub workflow_id: String,
}

// =============================================================================
// PATHS & SPLITS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSingleSplitPathPayload {
    pub prev_node_id: String,
    pub branch_positions: Vec<Position>,
    pub workflow_id: String,
    pub is_direct_connection: Option<bool>,
    /// Slot index on an existing split.
    pub branch_direction: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoubleSplitPathPayload {
    pub prev_node_id: String,
    pub branch_positions: [Position; 2],
    pub workflow_id: String,
    pub connector_position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBranch {
    pub branch_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitPathResult {
    #[serde(default)]
    pub split_id: Option<String>,
    pub new_branches: Vec<NewBranch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePathPayload {
    /// Backend node owning the branch.
    pub node_id: String,
    pub branch_id: String,
    pub label: Option<String>,
    pub next_node_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBranchPayload {
    pub branch_id: String,
    pub node_id: String,
    pub workflow_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionPayload {
    pub field: String,
    pub operator: ConditionOperator,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPathConditionPayload {
    pub branch_id: String,
    pub node_id: String,
    pub condition_id: Option<String>,
    pub branch_description: String,
    pub condition: ConditionPayload,
    pub is_new: bool,
}

// =============================================================================
// POSITIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePositionPayload {
    pub node_id: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorPositionPayload {
    /// Node owning the split, not the split's own id.
    pub node_id: String,
    pub connector_position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathPositionPayload {
    pub node_id: String,
    pub branch_id: String,
    pub branch_position: Position,
}

// =============================================================================
// SEARCH
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_id")]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResults {
    pub results: Vec<SearchHit>,
}

impl CreateAppPayload {
    pub fn new(
        kind: NodeKind,
        app_name: impl Into<String>,
        position: Position,
        workflow_id: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        CreateAppPayload {
            app_name: app_name.into(),
            node_type: kind.as_str().to_string(),
            position,
            workflow_id: workflow_id.into(),
            description,
        }
    }
}
