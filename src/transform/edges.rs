//! Edge derivation. Edges are never stored by the backend; they follow from
//! direct paths, split slots and branch `nextNodeId` pointers.

use std::collections::{HashMap, HashSet};

use crate::error::EditorError;
use crate::graph::{EdgeKind, FlowEdge};
use crate::registry::{self, BranchSlot, NodeKind};

/// Flat node id → type name, used to pick handle ids on both ends.
pub type TypeLookup<'a> = HashMap<&'a str, &'a str>;

/// `NORMAL` edge from `source`'s output to `target`'s input.
pub fn normal_edge(source: &str, source_type: &str, target: &str, types: &TypeLookup) -> FlowEdge {
    let target_type = types.get(target).copied().unwrap_or_default();
    FlowEdge::new(
        EdgeKind::Normal,
        source,
        registry::output_handle_id(source_type),
        target,
        registry::input_handle_id(target_type),
    )
}

/// `SPLIT` leg from a split connector's `slot` handle to the path drawn there.
pub fn split_edge(split_id: &str, slot: BranchSlot, path_id: &str) -> FlowEdge {
    FlowEdge::new(
        EdgeKind::Split,
        split_id,
        slot.handle(),
        path_id,
        registry::input_handle_id(NodeKind::Path.as_str()),
    )
}

/// Edge to a `nextNodeId` target, which must be a stored node.
pub fn next_node_edge(
    source: &str,
    source_type: &str,
    next_node_id: &str,
    stored_ids: &HashSet<&str>,
    types: &TypeLookup,
    errors: &mut Vec<EditorError>,
) -> Option<FlowEdge> {
    if !stored_ids.contains(next_node_id) {
        errors.push(EditorError::transform(
            "T003",
            format!(
                "'{}' points to node '{}', which does not exist in this workflow",
                source, next_node_id
            ),
            Some(source.to_string()),
        ));
        return None;
    }
    Some(normal_edge(source, source_type, next_node_id, types))
}
