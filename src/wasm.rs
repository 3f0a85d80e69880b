//! WASM entry points for browser use.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::error::EditorError;
use crate::registry;

/// Transform backend workflow JSON into `{nodes, edges}` for the canvas.
/// Malformed input yields an empty graph.
#[wasm_bindgen]
pub fn transform_workflow(json: &str) -> JsValue {
    let graph = crate::transform::transform_json(json);
    serde_wasm_bindgen::to_value(&graph).unwrap_or(JsValue::NULL)
}

/// Validate backend workflow JSON: parse + transform + graph validation.
/// Returns a JSON array of error objects.
#[wasm_bindgen]
pub fn validate_workflow(json: &str) -> JsValue {
    let result = validate_workflow_inner(json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn validate_workflow_inner(json: &str) -> Vec<ErrorDto> {
    let doc = match crate::parse::parse(json) {
        Ok(doc) => doc,
        Err(errors) => return errors.into_iter().map(ErrorDto::from).collect(),
    };

    let graph = match crate::transform::transform(&doc) {
        Ok(graph) => graph,
        Err(errors) => return errors.into_iter().map(ErrorDto::from).collect(),
    };

    crate::validate::validate_graph(&graph)
        .into_iter()
        .map(ErrorDto::from)
        .collect()
}

/// Input and output handle ids for a node type, with defaults for unknown types.
#[wasm_bindgen]
pub fn node_handles(node_type: &str) -> JsValue {
    let handles = HandlesDto {
        input: registry::input_handle_id(node_type),
        output: registry::output_handle_id(node_type),
        outputs: registry::output_handles(node_type),
    };
    serde_wasm_bindgen::to_value(&handles).unwrap_or(JsValue::NULL)
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ErrorDto {
    code: String,
    phase: String,
    message: String,
    node_id: Option<String>,
}

impl From<EditorError> for ErrorDto {
    fn from(e: EditorError) -> Self {
        ErrorDto {
            code: e.code,
            phase: e.phase.to_string(),
            message: e.message,
            node_id: e.node_id,
        }
    }
}

#[derive(Serialize)]
struct HandlesDto {
    input: &'static str,
    output: &'static str,
    outputs: Vec<&'static str>,
}
