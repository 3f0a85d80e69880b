//! Editor configuration.
//!
//! Loaded from camelCase JSON; every field falls back to its default when absent.

use serde::{Deserialize, Serialize};

use crate::error::EditorError;
use crate::graph::Position;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Quiet period before a search query is sent.
    pub search_debounce_ms: u64,
    /// Offsets of the two child branches from a new split's connector.
    pub split_branch_offsets: [Position; 2],
    pub node_width: f64,
    pub node_height: f64,
    /// Fraction of the fitted bounds added on each side when fitting the viewport.
    pub fit_padding: f64,
    /// `None` keeps a cached workflow fresh until it is invalidated.
    pub workflow_stale_time_ms: Option<u64>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            search_debounce_ms: 300,
            split_branch_offsets: [Position::new(100.0, -150.0), Position::new(100.0, 150.0)],
            node_width: 240.0,
            node_height: 80.0,
            fit_padding: 0.2,
            workflow_stale_time_ms: None,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        serde_json::from_str(json).map_err(|e| {
            EditorError::parse("P002", format!("Failed to parse editor config JSON: {}", e))
        })
    }

    /// Branch positions for a two-way split whose connector sits at `connector`.
    pub fn split_branch_positions(&self, connector: Position) -> [Position; 2] {
        let [upper, lower] = self.split_branch_offsets;
        [connector.offset(upper.x, upper.y), connector.offset(lower.x, lower.y)]
    }
}
