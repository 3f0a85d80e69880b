//! Node insertion: after a node, after a path, into a split slot, and the
//! two ways of fanning out into a new two-way split.
//!
//! Preconditions are checked against the graph snapshot before any backend
//! call is made.

use super::FlowContext;
use crate::backend::{
    CreateAppPayload, CreateDoubleSplitPathPayload, CreateSingleSplitPathPayload, SplitPathResult,
    UpdatePathPayload, WorkflowBackend,
};
use crate::error::EditorError;
use crate::graph::{FlowNode, NodeData, Position, SplitNodeData};
use crate::notify::Notifier;
use crate::registry::{BranchSlot, DEFAULT_OUTPUT_HANDLE, NodeKind};

/// What an insertion created in the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Inserted {
    pub node_id: Option<String>,
    pub branch_ids: Vec<String>,
}

impl<'a, B: WorkflowBackend, N: Notifier> FlowContext<'a, B, N> {
    /// Add a node of `node_type` from `handle_name` on the flat node `source_node_id`.
    ///
    /// A plain node's output gets a direct path to the new node (or a new
    /// two-way split when `node_type` is `SPLIT`); a path's output points
    /// its branch at the new node; a split's `branch-k` handle gets a new
    /// branch in slot `k` targeting the new node.
    pub async fn handle_add_node_from_handle(
        &self,
        source_node_id: &str,
        handle_name: &str,
        node_type: NodeKind,
        app_type: Option<&str>,
        position: Position,
    ) -> Result<Inserted, EditorError> {
        let source = self.node(source_node_id).map_err(|e| self.reject(e))?;

        match &source.data {
            NodeData::Start | NodeData::App(_) | NodeData::Instruction(_) => {
                self.expect_handle(source, handle_name, DEFAULT_OUTPUT_HANDLE)?;
                match node_type {
                    NodeKind::Split => self.add_split_after_node(source_node_id, position).await,
                    _ => {
                        self.add_node_after_node(source_node_id, node_type, app_type, position)
                            .await
                    }
                }
            }
            NodeData::Path(path) => {
                self.expect_handle(source, handle_name, DEFAULT_OUTPUT_HANDLE)?;
                let owner = self.owner_of(source)?;
                self.add_node_after_path(&owner, &path.branch_id, node_type, app_type, position)
                    .await
            }
            NodeData::Split(split) => {
                let slot = BranchSlot::from_handle(handle_name).ok_or_else(|| {
                    self.reject(EditorError::action(
                        "A006",
                        format!("'{}' is not a split branch handle", handle_name),
                        Some(source.id.clone()),
                    ))
                })?;
                self.add_node_at_split_slot(source, split, slot, node_type, app_type, position)
                    .await
            }
            NodeData::Unsupported { type_name } => Err(self.reject(EditorError::action(
                "A006",
                format!("Cannot add nodes after unsupported node type '{}'", type_name),
                Some(source.id.clone()),
            ))),
        }
    }

    /// Create a node and connect it from a plain node's output by a direct path.
    pub async fn add_node_after_node(
        &self,
        source_node_id: &str,
        node_type: NodeKind,
        app_type: Option<&str>,
        position: Position,
    ) -> Result<Inserted, EditorError> {
        let source = self.node(source_node_id).map_err(|e| self.reject(e))?;
        self.expect_plain_and_free(source)?;
        let request = self.node_request(node_type, app_type, position)?;

        self.run("add node", async {
            let created = self.call(self.backend.create_app(request)).await?;
            let split = self
                .call(self.backend.create_single_split_path(CreateSingleSplitPathPayload {
                    prev_node_id: source_node_id.to_string(),
                    branch_positions: vec![position],
                    workflow_id: self.workflow_id.to_string(),
                    is_direct_connection: Some(true),
                    branch_direction: None,
                }))
                .await?;
            let branch_id = first_branch(&split, source_node_id)?;
            self.call(self.backend.update_path_name_or_next_node(UpdatePathPayload {
                node_id: source_node_id.to_string(),
                branch_id: branch_id.clone(),
                label: None,
                next_node_id: Some(created.id.clone()),
            }))
            .await?;
            Ok(Inserted {
                node_id: Some(created.id),
                branch_ids: vec![branch_id],
            })
        })
        .await
    }

    /// Create a node and make it the target of an existing, unconnected path.
    pub async fn add_node_after_path(
        &self,
        parent_node_id: &str,
        branch_id: &str,
        node_type: NodeKind,
        app_type: Option<&str>,
        position: Position,
    ) -> Result<Inserted, EditorError> {
        self.expect_free_path(parent_node_id, branch_id)?;
        let request = self.node_request(node_type, app_type, position)?;

        self.run("add node", async {
            let created = self.call(self.backend.create_app(request)).await?;
            self.point_path(parent_node_id, branch_id, &created.id).await?;
            Ok(Inserted {
                node_id: Some(created.id),
                branch_ids: vec![],
            })
        })
        .await
    }

    /// Insert a node after a path and fan it out into a new two-way split
    /// whose connector sits at `connector_position`.
    pub async fn add_split_path_after_path(
        &self,
        parent_node_id: &str,
        branch_id: &str,
        node_type: NodeKind,
        app_type: Option<&str>,
        position: Position,
        connector_position: Position,
    ) -> Result<Inserted, EditorError> {
        self.expect_free_path(parent_node_id, branch_id)?;
        let request = self.node_request(node_type, app_type, position)?;

        self.run("add split", async {
            let created = self.call(self.backend.create_app(request)).await?;
            self.point_path(parent_node_id, branch_id, &created.id).await?;
            let split = self.double_split(&created.id, connector_position).await?;
            Ok(Inserted {
                node_id: Some(created.id),
                branch_ids: branch_ids(split),
            })
        })
        .await
    }

    /// Fan a plain node out into a new two-way split.
    pub async fn add_split_after_node(
        &self,
        source_node_id: &str,
        connector_position: Position,
    ) -> Result<Inserted, EditorError> {
        let source = self.node(source_node_id).map_err(|e| self.reject(e))?;
        self.expect_plain_and_free(source)?;

        self.run("add split", async {
            let split = self.double_split(source_node_id, connector_position).await?;
            Ok(Inserted {
                node_id: None,
                branch_ids: branch_ids(split),
            })
        })
        .await
    }

    async fn add_node_at_split_slot(
        &self,
        split_node: &FlowNode,
        split: &SplitNodeData,
        slot: BranchSlot,
        node_type: NodeKind,
        app_type: Option<&str>,
        position: Position,
    ) -> Result<Inserted, EditorError> {
        if split.branch_at(slot).is_some() || self.has_connection_from_handle(&split_node.id, slot.handle()) {
            return Err(self.reject(EditorError::action(
                "A005",
                format!("Split '{}' already has a branch on '{}'", split_node.id, slot.handle()),
                Some(split_node.id.clone()),
            )));
        }
        let owner = self.owner_of(split_node)?;
        let request = self.node_request(node_type, app_type, position)?;

        self.run("add node", async {
            let created = self.call(self.backend.create_app(request)).await?;
            let result = self
                .call(self.backend.create_single_split_path(CreateSingleSplitPathPayload {
                    prev_node_id: owner.clone(),
                    branch_positions: vec![position],
                    workflow_id: self.workflow_id.to_string(),
                    is_direct_connection: Some(false),
                    branch_direction: Some(slot.index() as u8),
                }))
                .await?;
            let branch_id = first_branch(&result, &owner)?;
            self.point_path(&owner, &branch_id, &created.id).await?;
            Ok(Inserted {
                node_id: Some(created.id),
                branch_ids: vec![branch_id],
            })
        })
        .await
    }

    // -------------------------------------------------------------------------
    // Steps
    // -------------------------------------------------------------------------

    async fn point_path(
        &self,
        parent_node_id: &str,
        branch_id: &str,
        next_node_id: &str,
    ) -> Result<(), EditorError> {
        self.call(self.backend.update_path_name_or_next_node(UpdatePathPayload {
            node_id: parent_node_id.to_string(),
            branch_id: branch_id.to_string(),
            label: None,
            next_node_id: Some(next_node_id.to_string()),
        }))
        .await
    }

    async fn double_split(
        &self,
        prev_node_id: &str,
        connector_position: Position,
    ) -> Result<SplitPathResult, EditorError> {
        self.call(self.backend.create_double_split_path(CreateDoubleSplitPathPayload {
            prev_node_id: prev_node_id.to_string(),
            branch_positions: self.config.split_branch_positions(connector_position),
            workflow_id: self.workflow_id.to_string(),
            connector_position,
        }))
        .await
    }

    // -------------------------------------------------------------------------
    // Preconditions
    // -------------------------------------------------------------------------

    fn node_request(
        &self,
        node_type: NodeKind,
        app_type: Option<&str>,
        position: Position,
    ) -> Result<CreateAppPayload, EditorError> {
        let app_name = match (node_type, app_type) {
            (NodeKind::App, Some(app)) if !app.trim().is_empty() => app.trim().to_string(),
            (NodeKind::App, _) => {
                return Err(self.reject(EditorError::action(
                    "A007",
                    "An APP node needs an app type",
                    None,
                )));
            }
            (NodeKind::Instruction, app) => app.unwrap_or("Instruction").to_string(),
            (other, _) => {
                return Err(self.reject(EditorError::action(
                    "A007",
                    format!("{} nodes cannot be created directly", other),
                    None,
                )));
            }
        };
        Ok(CreateAppPayload::new(
            node_type,
            app_name,
            position,
            self.workflow_id,
            None,
        ))
    }

    fn expect_plain_and_free(&self, source: &FlowNode) -> Result<(), EditorError> {
        if !matches!(
            source.data,
            NodeData::Start | NodeData::App(_) | NodeData::Instruction(_)
        ) {
            return Err(self.reject(EditorError::action(
                "A006",
                format!("'{}' is a {} node, not a plain node", source.id, source.type_name()),
                Some(source.id.clone()),
            )));
        }
        if self.has_outgoing_connection(&source.id, source.type_name()) {
            return Err(self.reject(EditorError::action(
                "A005",
                format!("Node '{}' already has an outgoing connection", source.id),
                Some(source.id.clone()),
            )));
        }
        Ok(())
    }

    fn expect_free_path(&self, parent_node_id: &str, branch_id: &str) -> Result<(), EditorError> {
        let path = self.path(parent_node_id, branch_id).map_err(|e| self.reject(e))?;
        if path.next_node_id.is_some() {
            return Err(self.reject(EditorError::action(
                "A005",
                format!("Path '{}' already leads to a node", branch_id),
                Some(branch_id.to_string()),
            )));
        }
        Ok(())
    }

    fn expect_handle(&self, node: &FlowNode, handle: &str, expected: &str) -> Result<(), EditorError> {
        if handle == expected {
            return Ok(());
        }
        Err(self.reject(EditorError::action(
            "A006",
            format!("{} node '{}' has no output handle '{}'", node.type_name(), node.id, handle),
            Some(node.id.clone()),
        )))
    }

    fn owner_of(&self, node: &FlowNode) -> Result<String, EditorError> {
        node.parent_node_id.clone().ok_or_else(|| {
            self.reject(EditorError::action(
                "A008",
                format!("{} node '{}' has no parent node", node.type_name(), node.id),
                Some(node.id.clone()),
            ))
        })
    }
}

fn first_branch(result: &SplitPathResult, node_id: &str) -> Result<String, EditorError> {
    result
        .new_branches
        .first()
        .map(|b| b.branch_id.clone())
        .ok_or_else(|| {
            EditorError::action(
                "A009",
                "Backend created no branch for the new path",
                Some(node_id.to_string()),
            )
        })
}

fn branch_ids(result: SplitPathResult) -> Vec<String> {
    result.new_branches.into_iter().map(|b| b.branch_id).collect()
}
