//! Test-run simulation: walk the graph from START with a set of variables.
//!
//! At a split the first occupied slot whose conditions all hold is taken.
//! The run completes at a node with no successor and halts at a split where
//! no branch matches.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::error::EditorError;
use crate::graph::condition::all_hold;
use crate::graph::{EdgeKind, FlowGraph, NodeData};
use crate::registry::BranchSlot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum RunOutcome {
    Completed,
    NoMatchingBranch { split_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestRun {
    /// Flat node ids in visiting order, splits and paths included.
    pub visited: Vec<String>,
    pub outcome: RunOutcome,
}

pub fn simulate(
    graph: &FlowGraph,
    variables: &HashMap<String, String>,
) -> Result<TestRun, EditorError> {
    let start = graph
        .nodes
        .iter()
        .find(|n| matches!(n.data, NodeData::Start))
        .ok_or_else(|| EditorError::validate("V001", "Workflow has no START node", None))?;

    let mut visited = Vec::new();
    let mut seen = HashSet::new();
    let mut current = start;

    loop {
        if !seen.insert(current.id.as_str()) {
            return Err(EditorError::validate(
                "V003",
                format!("Test run revisited node '{}'", current.id),
                Some(current.id.clone()),
            ));
        }
        visited.push(current.id.clone());

        let next_id = match &current.data {
            NodeData::Split(split) => {
                let taken = BranchSlot::ALL.into_iter().find_map(|slot| {
                    let branch_id = split.branch_at(slot)?;
                    match &graph.node(branch_id)?.data {
                        NodeData::Path(path) if all_hold(&path.conditions, variables) => {
                            Some(branch_id)
                        }
                        _ => None,
                    }
                });
                match taken {
                    Some(branch_id) => Some(branch_id),
                    None => {
                        return Ok(TestRun {
                            visited,
                            outcome: RunOutcome::NoMatchingBranch {
                                split_id: current.id.clone(),
                            },
                        });
                    }
                }
            }
            _ => graph
                .outgoing(&current.id)
                .find(|e| e.kind == EdgeKind::Normal)
                .map(|e| e.target.as_str()),
        };

        let Some(next_id) = next_id else {
            return Ok(TestRun {
                visited,
                outcome: RunOutcome::Completed,
            });
        };

        current = graph.node(next_id).ok_or_else(|| {
            EditorError::validate(
                "V000",
                format!("Edge from '{}' leads to unknown node '{}'", current.id, next_id),
                Some(current.id.clone()),
            )
        })?;
    }
}
