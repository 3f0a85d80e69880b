//! Top-level Flow Editor composition.
//!
//! Owns the backend, notifier, cache and search state for one workflow.
//! Each render loads the (possibly refetched) graph and builds a
//! `FlowContext` over it for the node components.

use std::collections::HashMap;
use std::rc::Rc;

use crate::backend::WorkflowBackend;
use crate::cache::WorkflowCache;
use crate::config::EditorConfig;
use crate::context::FlowContext;
use crate::error::EditorError;
use crate::graph::FlowGraph;
use crate::notify::{Notification, Notifier};
use crate::search::{HighlightState, SearchController, ViewportCommand};
use crate::simulate::{self, TestRun};
use crate::validate::{self, Readiness};

pub struct FlowEditor<B, N> {
    backend: B,
    notifier: N,
    config: EditorConfig,
    cache: WorkflowCache,
    workflow_id: String,
    search: SearchController,
}

impl<B: WorkflowBackend, N: Notifier> FlowEditor<B, N> {
    pub fn new(backend: B, notifier: N, config: EditorConfig, workflow_id: impl Into<String>) -> Self {
        let cache = WorkflowCache::new(config.workflow_stale_time_ms);
        let search = SearchController::new(&config);
        FlowEditor {
            backend,
            notifier,
            config,
            cache,
            workflow_id: workflow_id.into(),
            search,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn cache(&self) -> &WorkflowCache {
        &self.cache
    }

    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    /// Current graph, refetched if the cache entry is stale. A workflow that
    /// cannot be loaded renders as an empty canvas.
    pub async fn load(&self, now_ms: u64) -> Rc<FlowGraph> {
        match self.cache.load(&self.backend, &self.workflow_id, now_ms).await {
            Ok(graph) => graph,
            Err(e) => {
                tracing::error!(workflow_id = %self.workflow_id, code = %e.code, "{}", e.message);
                self.notifier
                    .notify(Notification::error(format!("Failed to load workflow: {}", e.message)));
                Rc::new(FlowGraph::empty())
            }
        }
    }

    pub fn context(&self, graph: Rc<FlowGraph>) -> FlowContext<'_, B, N> {
        FlowContext::new(
            &self.backend,
            &self.notifier,
            &self.cache,
            &self.config,
            &self.workflow_id,
            graph,
        )
    }

    pub fn highlight(&self) -> &HighlightState {
        self.search.highlight()
    }

    pub fn search_input(&mut self, query: impl Into<String>, now_ms: u64) {
        self.search.input(query, now_ms);
    }

    /// Run a debounced search whose quiet period is over. A failed search
    /// leaves the viewport unchanged.
    pub async fn poll_search(&mut self, now_ms: u64) -> Option<ViewportCommand> {
        let graph = self.cache.graph(&self.workflow_id).unwrap_or_default();
        let result = self
            .search
            .poll(&self.backend, &self.workflow_id, &graph, &self.config, now_ms)
            .await?;
        Some(match result {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!(workflow_id = %self.workflow_id, code = %e.code, "{}", e.message);
                self.notifier.notify(Notification::error(e.message));
                ViewportCommand::Unchanged
            }
        })
    }

    /// Publish/enable readiness of the cached workflow.
    pub fn readiness(&self) -> Option<Readiness> {
        let doc = self.cache.document(&self.workflow_id)?;
        let graph = self.cache.graph(&self.workflow_id)?;
        Some(validate::readiness(&doc, &graph))
    }

    pub fn test_run(&self, variables: &HashMap<String, String>) -> Result<TestRun, EditorError> {
        let graph = self.cache.graph(&self.workflow_id).unwrap_or_default();
        simulate::simulate(&graph, variables)
    }
}
