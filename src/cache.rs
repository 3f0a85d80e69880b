//! Client-side cache of workflow documents and their derived graphs.
//!
//! The cached document is read-only. Mutations never patch it; they mark the
//! entry invalid and the next load refetches and re-transforms.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::backend::WorkflowBackend;
use crate::error::EditorError;
use crate::graph::FlowGraph;
use crate::parse::types::WorkflowDocument;
use crate::transform;

struct CacheEntry {
    document: Rc<WorkflowDocument>,
    graph: Rc<FlowGraph>,
    fetched_at_ms: u64,
    invalidated: bool,
}

pub struct WorkflowCache {
    entries: RefCell<HashMap<String, CacheEntry>>,
    stale_time_ms: Option<u64>,
}

impl WorkflowCache {
    pub fn new(stale_time_ms: Option<u64>) -> Self {
        WorkflowCache {
            entries: RefCell::new(HashMap::new()),
            stale_time_ms,
        }
    }

    pub fn is_stale(&self, workflow_id: &str, now_ms: u64) -> bool {
        match self.entries.borrow().get(workflow_id) {
            None => true,
            Some(entry) => {
                entry.invalidated
                    || self
                        .stale_time_ms
                        .is_some_and(|ttl| now_ms.saturating_sub(entry.fetched_at_ms) >= ttl)
            }
        }
    }

    /// Cached graph, whether or not it is stale.
    pub fn graph(&self, workflow_id: &str) -> Option<Rc<FlowGraph>> {
        self.entries
            .borrow()
            .get(workflow_id)
            .map(|e| Rc::clone(&e.graph))
    }

    pub fn document(&self, workflow_id: &str) -> Option<Rc<WorkflowDocument>> {
        self.entries
            .borrow()
            .get(workflow_id)
            .map(|e| Rc::clone(&e.document))
    }

    /// Store a freshly fetched document and derive its graph.
    pub fn store(&self, document: WorkflowDocument, now_ms: u64) -> Rc<FlowGraph> {
        let graph = Rc::new(transform::transform_or_empty(&document));
        let id = document.id.clone();
        self.entries.borrow_mut().insert(
            id,
            CacheEntry {
                document: Rc::new(document),
                graph: Rc::clone(&graph),
                fetched_at_ms: now_ms,
                invalidated: false,
            },
        );
        graph
    }

    pub fn invalidate(&self, workflow_id: &str) {
        if let Some(entry) = self.entries.borrow_mut().get_mut(workflow_id) {
            tracing::debug!(workflow_id, "workflow cache invalidated");
            entry.invalidated = true;
        }
    }

    /// Graph for `workflow_id`, refetching when missing or stale. A failed
    /// fetch keeps serving the last known graph if there is one.
    pub async fn load<B: WorkflowBackend>(
        &self,
        backend: &B,
        workflow_id: &str,
        now_ms: u64,
    ) -> Result<Rc<FlowGraph>, EditorError> {
        if !self.is_stale(workflow_id, now_ms) {
            if let Some(graph) = self.graph(workflow_id) {
                return Ok(graph);
            }
        }

        tracing::debug!(workflow_id, "fetching workflow");
        match backend.fetch_workflow(workflow_id).await {
            Ok(document) => Ok(self.store(document, now_ms)),
            Err(e) => {
                tracing::warn!(workflow_id, error = %e, "workflow fetch failed");
                match self.graph(workflow_id) {
                    Some(graph) => Ok(graph),
                    None => Err(EditorError::from(e)),
                }
            }
        }
    }
}
