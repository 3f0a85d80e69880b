//! Parse phase: backend workflow JSON → Rust types.

pub mod types;

pub use types::*;

use crate::error::EditorError;

/// Deserialize a backend workflow JSON string into a `WorkflowDocument`.
pub fn parse(json: &str) -> Result<WorkflowDocument, Vec<EditorError>> {
    serde_json::from_str::<WorkflowDocument>(json).map_err(|e| {
        vec![EditorError::parse(
            "P001",
            format!("Failed to parse workflow JSON: {}", e),
        )]
    })
}
