//! Flat render model: the `{nodes, edges}` pair the canvas consumes.
//!
//! Produced by `crate::transform` and never mutated afterwards; every edit
//! goes through the backend and a fresh transform.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::condition::Condition;
use crate::registry::{BranchSlot, NodeKind};

// =============================================================================
// GEOMETRY
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Position::new(self.x + dx, self.y + dy)
    }
}

// =============================================================================
// GRAPH
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FlowGraph {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

impl FlowGraph {
    pub fn empty() -> Self {
        FlowGraph::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a FlowEdge> + 'a {
        self.edges.iter().filter(move |e| e.source == id)
    }

    /// True if any edge leaves `id` on `handle`. Linear in the edge count.
    pub fn has_edge_from(&self, id: &str, handle: &str) -> bool {
        self.edges
            .iter()
            .any(|e| e.source == id && e.source_handle == handle)
    }
}

// =============================================================================
// NODES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNode {
    pub id: String,
    #[serde(flatten)]
    pub data: NodeData,
    pub position: Position,
    /// Backend node that owns this one. Set for `SPLIT` and `PATH` nodes,
    /// whose own ids are not addressable as backend nodes.
    pub parent_node_id: Option<String>,
}

impl FlowNode {
    /// Registry kind, or `None` for a placeholder built from an unknown type.
    pub fn kind(&self) -> Option<NodeKind> {
        match &self.data {
            NodeData::Start => Some(NodeKind::Start),
            NodeData::App(_) => Some(NodeKind::App),
            NodeData::Instruction(_) => Some(NodeKind::Instruction),
            NodeData::Split(_) => Some(NodeKind::Split),
            NodeData::Path(_) => Some(NodeKind::Path),
            NodeData::Unsupported { .. } => None,
        }
    }

    pub fn type_name(&self) -> &str {
        match &self.data {
            NodeData::Unsupported { type_name } => type_name,
            _ => self.kind().map(NodeKind::as_str).unwrap_or_default(),
        }
    }

    /// Human-readable text shown on the node.
    pub fn label(&self) -> &str {
        match &self.data {
            NodeData::Start => "Start",
            NodeData::App(app) => &app.app_name,
            NodeData::Instruction(ins) => &ins.description,
            NodeData::Split(_) => "Split",
            NodeData::Path(path) => &path.label,
            NodeData::Unsupported { type_name } => type_name,
        }
    }
}

/// Kind-specific payload; the tag doubles as the node `type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum NodeData {
    #[serde(rename = "START")]
    Start,
    #[serde(rename = "APP")]
    App(AppNodeData),
    #[serde(rename = "INSTRUCTION")]
    Instruction(InstructionNodeData),
    #[serde(rename = "SPLIT")]
    Split(SplitNodeData),
    #[serde(rename = "PATH")]
    Path(PathNodeData),
    #[serde(rename = "UNSUPPORTED")]
    Unsupported {
        #[serde(rename = "typeName")]
        type_name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppNodeData {
    pub app_name: String,
    pub integration_id: Option<String>,
    pub integrated: bool,
    pub description: Option<String>,
    pub selected_action: Option<String>,
    pub config: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionNodeData {
    pub description: String,
    pub template: TemplateSelection,
}

/// Template/service picked for an instruction node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum TemplateSelection {
    Unset,
    Default {
        service: String,
        #[serde(rename = "templateId")]
        template_id: Option<String>,
    },
    Custom {
        service: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitNodeData {
    pub split_id: String,
    /// Branch id occupying each slot, in handle order.
    pub slots: [Option<String>; 3],
}

impl SplitNodeData {
    pub fn branch_at(&self, slot: BranchSlot) -> Option<&str> {
        self.slots[slot.index()].as_deref()
    }

    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathNodeData {
    pub branch_id: String,
    pub slot: BranchSlot,
    pub label: String,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub description: Option<String>,
    pub conditions: Vec<Condition>,
    pub available_fields: Vec<String>,
    pub next_node_id: Option<String>,
}

// =============================================================================
// EDGES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EdgeKind {
    Normal,
    Split,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_handle: String,
    pub target_handle: String,
    pub kind: EdgeKind,
}

impl FlowEdge {
    pub fn new(
        kind: EdgeKind,
        source: &str,
        source_handle: &str,
        target: &str,
        target_handle: &str,
    ) -> Self {
        FlowEdge {
            id: format!("{}:{}->{}", source, source_handle, target),
            source: source.to_string(),
            target: target.to_string(),
            source_handle: source_handle.to_string(),
            target_handle: target_handle.to_string(),
            kind,
        }
    }
}
