//! Node Type Registry.
//!
//! Single source of truth for the five node kinds: their declared input and
//! output handles and the component that renders them. Unknown type strings
//! never fail here; they resolve to defaults and a placeholder component.

pub mod action;

use std::fmt;

use serde::Serialize;

pub use action::{ActionKind, ConfigField};

use crate::graph::{FlowNode, NodeData};

pub const DEFAULT_INPUT_HANDLE: &str = "input";
pub const DEFAULT_OUTPUT_HANDLE: &str = "output";

// =============================================================================
// NODE KINDS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeKind {
    Start,
    App,
    Instruction,
    Split,
    Path,
}

impl NodeKind {
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Start,
        NodeKind::App,
        NodeKind::Instruction,
        NodeKind::Split,
        NodeKind::Path,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Start => "START",
            NodeKind::App => "APP",
            NodeKind::Instruction => "INSTRUCTION",
            NodeKind::Split => "SPLIT",
            NodeKind::Path => "PATH",
        }
    }

    pub fn from_type_name(type_name: &str) -> Option<NodeKind> {
        NodeKind::ALL.into_iter().find(|k| k.as_str() == type_name)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// BRANCH SLOTS
// =============================================================================

/// One of the three output handles of a split: `branch-0`, `branch-1`, `branch-2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "&'static str")]
pub struct BranchSlot(u8);

const BRANCH_HANDLES: [&str; 3] = ["branch-0", "branch-1", "branch-2"];

impl BranchSlot {
    pub const ALL: [BranchSlot; 3] = [BranchSlot(0), BranchSlot(1), BranchSlot(2)];

    pub fn new(index: usize) -> Option<BranchSlot> {
        BranchSlot::ALL.get(index).copied()
    }

    pub fn from_handle(handle: &str) -> Option<BranchSlot> {
        BRANCH_HANDLES
            .iter()
            .position(|h| *h == handle)
            .and_then(BranchSlot::new)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn handle(self) -> &'static str {
        BRANCH_HANDLES[self.index()]
    }
}

impl From<BranchSlot> for &'static str {
    fn from(slot: BranchSlot) -> Self {
        slot.handle()
    }
}

// =============================================================================
// HANDLE SPECS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HandleSpec {
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeSpec {
    pub kind: NodeKind,
    pub inputs: &'static [HandleSpec],
    pub outputs: &'static [HandleSpec],
}

const INPUT: HandleSpec = HandleSpec { name: DEFAULT_INPUT_HANDLE };
const OUTPUT: HandleSpec = HandleSpec { name: DEFAULT_OUTPUT_HANDLE };

static REGISTRY: [NodeSpec; 5] = [
    NodeSpec {
        kind: NodeKind::Start,
        inputs: &[],
        outputs: &[OUTPUT],
    },
    NodeSpec {
        kind: NodeKind::App,
        inputs: &[INPUT],
        outputs: &[OUTPUT],
    },
    NodeSpec {
        kind: NodeKind::Instruction,
        inputs: &[INPUT],
        outputs: &[OUTPUT],
    },
    NodeSpec {
        kind: NodeKind::Split,
        inputs: &[INPUT],
        outputs: &[
            HandleSpec { name: BRANCH_HANDLES[0] },
            HandleSpec { name: BRANCH_HANDLES[1] },
            HandleSpec { name: BRANCH_HANDLES[2] },
        ],
    },
    NodeSpec {
        kind: NodeKind::Path,
        inputs: &[INPUT],
        outputs: &[OUTPUT],
    },
];

pub fn resolve(kind: NodeKind) -> &'static NodeSpec {
    match kind {
        NodeKind::Start => &REGISTRY[0],
        NodeKind::App => &REGISTRY[1],
        NodeKind::Instruction => &REGISTRY[2],
        NodeKind::Split => &REGISTRY[3],
        NodeKind::Path => &REGISTRY[4],
    }
}

pub fn resolve_type(type_name: &str) -> Option<&'static NodeSpec> {
    NodeKind::from_type_name(type_name).map(resolve)
}

/// First declared input handle of `type_name`, or `"input"`.
pub fn input_handle_id(type_name: &str) -> &'static str {
    resolve_type(type_name)
        .and_then(|spec| spec.inputs.first())
        .map_or(DEFAULT_INPUT_HANDLE, |h| h.name)
}

/// First declared output handle of `type_name`, or `"output"`.
pub fn output_handle_id(type_name: &str) -> &'static str {
    resolve_type(type_name)
        .and_then(|spec| spec.outputs.first())
        .map_or(DEFAULT_OUTPUT_HANDLE, |h| h.name)
}

/// Every output handle a node of `type_name` may emit edges from.
pub fn output_handles(type_name: &str) -> Vec<&'static str> {
    match resolve_type(type_name) {
        Some(spec) if !spec.outputs.is_empty() => spec.outputs.iter().map(|h| h.name).collect(),
        _ => vec![DEFAULT_OUTPUT_HANDLE],
    }
}

// =============================================================================
// COMPONENT DISPATCH
// =============================================================================

/// Which component renders a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "component", rename_all = "camelCase")]
pub enum NodeComponent {
    Start,
    App { action: Option<ActionKind> },
    Instruction,
    Split,
    Path,
    NotImplemented { type_name: String },
}

pub fn component_for(node: &FlowNode) -> NodeComponent {
    match &node.data {
        NodeData::Start => NodeComponent::Start,
        NodeData::App(app) => NodeComponent::App {
            action: app.selected_action.as_deref().and_then(ActionKind::from_key),
        },
        NodeData::Instruction(_) => NodeComponent::Instruction,
        NodeData::Split(_) => NodeComponent::Split,
        NodeData::Path(_) => NodeComponent::Path,
        NodeData::Unsupported { type_name } => NodeComponent::NotImplemented {
            type_name: type_name.clone(),
        },
    }
}
