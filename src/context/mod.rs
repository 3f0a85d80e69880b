//! Flow Context: the capability set node components use instead of talking
//! to the backend directly.
//!
//! A `FlowContext` is built per render from the current graph snapshot and
//! handed to consumers explicitly. Queries read the snapshot; mutations call
//! the backend and invalidate the cached workflow, never editing the graph
//! in place.

pub mod actions;
pub mod conditions;

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

pub use actions::Inserted;
pub use conditions::{ConditionRow, ConditionSaveError, RowError};

use crate::backend::{BackendError, DeleteBranchPayload, DeleteNodePayload, UpdatePathPayload, WorkflowBackend};
use crate::cache::WorkflowCache;
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::graph::{FlowGraph, FlowNode, NodeData, PathNodeData, Position};
use crate::notify::{Notification, Notifier};
use crate::persist;
use crate::registry;

pub struct FlowContext<'a, B, N> {
    backend: &'a B,
    notifier: &'a N,
    cache: &'a WorkflowCache,
    config: &'a EditorConfig,
    workflow_id: &'a str,
    graph: Rc<FlowGraph>,
    /// Backend calls that have succeeded through this context. Only grows, so
    /// overlapping operations each compare against their own starting count.
    landed: Cell<usize>,
}

impl<'a, B: WorkflowBackend, N: Notifier> FlowContext<'a, B, N> {
    pub fn new(
        backend: &'a B,
        notifier: &'a N,
        cache: &'a WorkflowCache,
        config: &'a EditorConfig,
        workflow_id: &'a str,
        graph: Rc<FlowGraph>,
    ) -> Self {
        FlowContext {
            backend,
            notifier,
            cache,
            config,
            workflow_id,
            graph,
            landed: Cell::new(0),
        }
    }

    pub fn graph(&self) -> &FlowGraph {
        &self.graph
    }

    pub fn workflow_id(&self) -> &str {
        self.workflow_id
    }

    // -------------------------------------------------------------------------
    // Connection queries
    // -------------------------------------------------------------------------

    /// True iff an edge leaves `node_id` on one of `node_type`'s declared outputs.
    pub fn has_outgoing_connection(&self, node_id: &str, node_type: &str) -> bool {
        registry::output_handles(node_type)
            .into_iter()
            .any(|handle| self.graph.has_edge_from(node_id, handle))
    }

    pub fn has_connection_from_handle(&self, node_id: &str, handle_name: &str) -> bool {
        self.graph.has_edge_from(node_id, handle_name)
    }

    // -------------------------------------------------------------------------
    // Paths, nodes, positions
    // -------------------------------------------------------------------------

    pub async fn rename_path(
        &self,
        parent_node_id: &str,
        branch_id: &str,
        label: &str,
    ) -> Result<(), EditorError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(self.reject(EditorError::action(
                "A002",
                "Path name must not be empty",
                Some(branch_id.to_string()),
            )));
        }
        self.run("rename path", async {
            self.call(self.backend.update_path_name_or_next_node(UpdatePathPayload {
                node_id: parent_node_id.to_string(),
                branch_id: branch_id.to_string(),
                label: Some(label.to_string()),
                next_node_id: None,
            }))
            .await
        })
        .await
    }

    pub async fn delete_branch(&self, parent_node_id: &str, branch_id: &str) -> Result<(), EditorError> {
        self.run("delete path", async {
            self.call(self.backend.delete_branch(DeleteBranchPayload {
                branch_id: branch_id.to_string(),
                node_id: parent_node_id.to_string(),
                workflow_id: self.workflow_id.to_string(),
            }))
            .await
        })
        .await
    }

    pub async fn delete_node(&self, node_id: &str) -> Result<(), EditorError> {
        self.run("delete node", async {
            self.call(self.backend.delete_node(DeleteNodePayload {
                node_id: node_id.to_string(),
                workflow_id: self.workflow_id.to_string(),
            }))
            .await
        })
        .await
    }

    /// Persist a dragged node's position. Fire-and-forget: failures are logged.
    pub async fn on_node_drag_stop(&self, node_id: &str, position: Position) -> bool {
        let Some(node) = self.graph.node(node_id) else {
            tracing::warn!(node_id, "dragged node is not in the current graph");
            return false;
        };
        let persisted = persist::persist_position(self.backend, node, position).await;
        if persisted {
            self.cache.invalidate(self.workflow_id);
        }
        persisted
    }

    // -------------------------------------------------------------------------
    // Plumbing
    // -------------------------------------------------------------------------

    fn node(&self, node_id: &str) -> Result<&FlowNode, EditorError> {
        self.graph.node(node_id).ok_or_else(|| {
            EditorError::action(
                "A004",
                format!("Node '{}' is not in the current workflow", node_id),
                Some(node_id.to_string()),
            )
        })
    }

    /// Path drawn for `branch_id` under `parent_node_id`.
    fn path(&self, parent_node_id: &str, branch_id: &str) -> Result<&PathNodeData, EditorError> {
        self.graph
            .nodes
            .iter()
            .filter(|n| n.parent_node_id.as_deref() == Some(parent_node_id))
            .find_map(|n| match &n.data {
                NodeData::Path(path) if path.branch_id == branch_id => Some(path),
                _ => None,
            })
            .ok_or_else(|| {
                EditorError::action(
                    "A004",
                    format!(
                        "Path '{}' of node '{}' is not in the current workflow",
                        branch_id, parent_node_id
                    ),
                    Some(branch_id.to_string()),
                )
            })
    }

    /// Surface an error raised before any backend call.
    fn reject(&self, error: EditorError) -> EditorError {
        self.notifier.notify(Notification::error(error.message.clone()));
        error
    }

    async fn call<T>(
        &self,
        request: impl Future<Output = Result<T, BackendError>>,
    ) -> Result<T, EditorError> {
        let result = request.await;
        if result.is_ok() {
            self.landed.set(self.landed.get() + 1);
        }
        result.map_err(EditorError::from)
    }

    /// Run one user-level operation. If any backend call landed the cached
    /// workflow is invalidated; a failure becomes a single error toast.
    async fn run<T>(
        &self,
        what: &str,
        operation: impl Future<Output = Result<T, EditorError>>,
    ) -> Result<T, EditorError> {
        let before = self.landed.get();
        let result = operation.await;
        if self.landed.get() > before {
            self.cache.invalidate(self.workflow_id);
        }
        if let Err(e) = &result {
            tracing::warn!(workflow_id = %self.workflow_id, code = %e.code, operation = what, "{}", e.message);
            self.notifier
                .notify(Notification::error(format!("Failed to {}: {}", what, e.message)));
        }
        result
    }
}
