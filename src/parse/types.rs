//! Rust types mirroring the backend workflow document.
//!
//! The backend owns the workflow as a tree: each node owns either a direct
//! path to its successor or a split with up to three branch slots. These
//! types are the serde target for that payload; the flat render model lives
//! in `crate::graph`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::graph::Position;

// =============================================================================
// TOP-LEVEL WORKFLOW
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub status: WorkflowStatus,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub is_valid_test_run: bool,
    #[serde(default)]
    pub all_nodes_integrated: bool,
    pub nodes: Vec<BackendNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Draft,
    Published,
}

// =============================================================================
// NODES
// =============================================================================

/// Backend node kinds that can be stored. `SPLIT` and `PATH` only exist in
/// the flat model, derived from `split_data`.
pub const BACKEND_START: &str = "START";
pub const BACKEND_APP: &str = "APP";
pub const BACKEND_INSTRUCTION: &str = "INSTRUCTION";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendNode {
    #[serde(rename = "_id")]
    pub id: String,
    /// Kept as a string so drifted payloads still parse and degrade to a placeholder.
    #[serde(rename = "type")]
    pub node_type: String,
    pub position: Position,
    #[serde(default)]
    pub app: Option<AppPayload>,
    #[serde(default)]
    pub instruction: Option<InstructionPayload>,
    /// Direct connection to the next node.
    #[serde(default)]
    pub path: Option<BackendBranch>,
    #[serde(default)]
    pub split_data: Option<SplitData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppPayload {
    pub app_name: String,
    #[serde(default)]
    pub integration_id: Option<String>,
    #[serde(default)]
    pub integrated: bool,
    #[serde(default)]
    pub description: Option<String>,
    /// Action key chosen for this app, e.g. `SEND_MESSAGE`.
    #[serde(default)]
    pub selected_action: Option<String>,
    /// Configuration blobs keyed by template.
    #[serde(default)]
    pub config: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionPayload {
    pub description: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub custom: bool,
}

// =============================================================================
// SPLITS & BRANCHES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitData {
    #[serde(rename = "_id")]
    pub id: String,
    pub connector_position: Position,
    #[serde(rename = "branch-0", default)]
    pub branch_0: Option<BackendBranch>,
    #[serde(rename = "branch-1", default)]
    pub branch_1: Option<BackendBranch>,
    #[serde(rename = "branch-2", default)]
    pub branch_2: Option<BackendBranch>,
}

impl SplitData {
    /// Slots in handle order; `None` marks an empty slot.
    pub fn slots(&self) -> [Option<&BackendBranch>; 3] {
        [
            self.branch_0.as_ref(),
            self.branch_1.as_ref(),
            self.branch_2.as_ref(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendBranch {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub position: Position,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub conditions: Vec<BackendCondition>,
    /// Variables made available by upstream nodes, offered as condition fields.
    #[serde(default)]
    pub if_condition: Vec<String>,
    #[serde(default)]
    pub next_node_id: Option<String>,
    #[serde(default)]
    pub is_direct_connection: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendCondition {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub field: String,
    pub operator: String,
    pub value: String,
}
