//! Search & Highlight.
//!
//! Typed queries are debounced, matched node ids come from the backend, and
//! the result is expressed as highlight state plus a viewport command for
//! the renderer. An empty query clears highlights and fits the whole graph;
//! a query with no matches leaves the viewport where it is.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::backend::WorkflowBackend;
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::graph::{FlowGraph, FlowNode};

// =============================================================================
// DEBOUNCE
// =============================================================================

#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay_ms: u64,
    pending: Option<(String, u64)>,
}

impl SearchDebouncer {
    pub fn new(delay_ms: u64) -> Self {
        SearchDebouncer {
            delay_ms,
            pending: None,
        }
    }

    /// Record a keystroke. Restarts the quiet period.
    pub fn input(&mut self, query: impl Into<String>, now_ms: u64) {
        self.pending = Some((query.into(), now_ms.saturating_add(self.delay_ms)));
    }

    /// Query to send, once the quiet period has elapsed.
    pub fn due(&mut self, now_ms: u64) -> Option<String> {
        match &self.pending {
            Some((_, deadline)) if now_ms >= *deadline => self.pending.take().map(|(q, _)| q),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

// =============================================================================
// HIGHLIGHT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    pub border: Option<&'static str>,
    pub background: Option<&'static str>,
    pub box_shadow: Option<&'static str>,
}

const HIGHLIGHTED: NodeStyle = NodeStyle {
    border: Some("2px solid #2563eb"),
    background: Some("#eff6ff"),
    box_shadow: Some("0 0 0 4px rgba(37, 99, 235, 0.25)"),
};

const PLAIN: NodeStyle = NodeStyle {
    border: None,
    background: None,
    box_shadow: None,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightState {
    matched: BTreeSet<String>,
}

impl HighlightState {
    pub fn is_highlighted(&self, node_id: &str) -> bool {
        self.matched.contains(node_id)
    }

    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }

    pub fn matched(&self) -> impl Iterator<Item = &str> {
        self.matched.iter().map(String::as_str)
    }

    pub fn style_for(&self, node_id: &str) -> NodeStyle {
        if self.is_highlighted(node_id) { HIGHLIGHTED } else { PLAIN }
    }
}

// =============================================================================
// VIEWPORT
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum ViewportCommand {
    /// Fit the viewport around these nodes.
    Fit {
        node_ids: Vec<String>,
        bounds: Option<Bounds>,
    },
    Unchanged,
}

/// Padded box around `nodes`, or `None` when there are none.
pub fn fit_bounds<'a>(
    nodes: impl IntoIterator<Item = &'a FlowNode>,
    config: &EditorConfig,
) -> Option<Bounds> {
    let (min_x, min_y, max_x, max_y) = nodes.into_iter().fold(None, |acc, n| {
        let (x0, y0) = (n.position.x, n.position.y);
        let (x1, y1) = (x0 + config.node_width, y0 + config.node_height);
        Some(match acc {
            None => (x0, y0, x1, y1),
            Some((a, b, c, d)) => (f64::min(a, x0), f64::min(b, y0), f64::max(c, x1), f64::max(d, y1)),
        })
    })?;
    let (width, height) = (max_x - min_x, max_y - min_y);
    let (pad_x, pad_y) = (width * config.fit_padding, height * config.fit_padding);
    Some(Bounds {
        x: min_x - pad_x,
        y: min_y - pad_y,
        width: width + 2.0 * pad_x,
        height: height + 2.0 * pad_y,
    })
}

fn fit(graph: &FlowGraph, ids: Vec<String>, config: &EditorConfig) -> ViewportCommand {
    let bounds = fit_bounds(
        graph.nodes.iter().filter(|n| ids.contains(&n.id)),
        config,
    );
    ViewportCommand::Fit {
        node_ids: ids,
        bounds,
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct SearchController {
    debouncer: SearchDebouncer,
    highlight: HighlightState,
}

impl SearchController {
    pub fn new(config: &EditorConfig) -> Self {
        SearchController {
            debouncer: SearchDebouncer::new(config.search_debounce_ms),
            highlight: HighlightState::default(),
        }
    }

    pub fn highlight(&self) -> &HighlightState {
        &self.highlight
    }

    pub fn input(&mut self, query: impl Into<String>, now_ms: u64) {
        self.debouncer.input(query, now_ms);
    }

    /// Run the pending query if its quiet period is over.
    pub async fn poll<B: WorkflowBackend>(
        &mut self,
        backend: &B,
        workflow_id: &str,
        graph: &FlowGraph,
        config: &EditorConfig,
        now_ms: u64,
    ) -> Option<Result<ViewportCommand, EditorError>> {
        let query = self.debouncer.due(now_ms)?;
        Some(self.execute(backend, workflow_id, graph, config, &query).await)
    }

    /// Search immediately, bypassing the debounce.
    pub async fn execute<B: WorkflowBackend>(
        &mut self,
        backend: &B,
        workflow_id: &str,
        graph: &FlowGraph,
        config: &EditorConfig,
        query: &str,
    ) -> Result<ViewportCommand, EditorError> {
        let query = query.trim();
        if query.is_empty() {
            self.highlight = HighlightState::default();
            let all = graph.nodes.iter().map(|n| n.id.clone()).collect();
            return Ok(fit(graph, all, config));
        }

        tracing::debug!(workflow_id, query, "searching workflow");
        let results = backend
            .search_in_workflow(query, workflow_id)
            .await
            .map_err(|e| EditorError::search("S001", format!("Search failed: {}", e)))?;

        let matched: BTreeSet<String> = results
            .results
            .into_iter()
            .map(|hit| hit.id)
            .filter(|id| graph.node(id).is_some())
            .collect();

        if matched.is_empty() {
            self.highlight = HighlightState::default();
            return Ok(ViewportCommand::Unchanged);
        }

        let ids = matched.iter().cloned().collect();
        self.highlight = HighlightState { matched };
        Ok(fit(graph, ids, config))
    }
}
