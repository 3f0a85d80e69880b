//! The backend action boundary.
//!
//! Every workflow mutation goes through `WorkflowBackend`; the transport
//! behind it (HTTP, GraphQL, a test double) is the implementor's concern.

pub mod payloads;

pub use payloads::*;

use thiserror::Error;

use crate::parse::types::WorkflowDocument;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("rejected by backend: {message}")]
    Rejected { message: String },

    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

/// Backend actions used by the workflow editor.
///
/// Futures are not required to be `Send`: the editor drives them from a
/// single-threaded event loop.
#[allow(async_fn_in_trait)]
pub trait WorkflowBackend {
    async fn fetch_workflow(&self, workflow_id: &str) -> Result<WorkflowDocument, BackendError>;

    async fn create_app(&self, payload: CreateAppPayload) -> Result<CreatedNode, BackendError>;

    async fn delete_node(&self, payload: DeleteNodePayload) -> Result<(), BackendError>;

    async fn create_single_split_path(
        &self,
        payload: CreateSingleSplitPathPayload,
    ) -> Result<SplitPathResult, BackendError>;

    async fn create_double_split_path(
        &self,
        payload: CreateDoubleSplitPathPayload,
    ) -> Result<SplitPathResult, BackendError>;

    async fn update_path_name_or_next_node(
        &self,
        payload: UpdatePathPayload,
    ) -> Result<(), BackendError>;

    async fn delete_branch(&self, payload: DeleteBranchPayload) -> Result<(), BackendError>;

    async fn add_path_condition(&self, payload: AddPathConditionPayload)
    -> Result<(), BackendError>;

    async fn update_node_position(&self, payload: NodePositionPayload)
    -> Result<(), BackendError>;

    async fn update_connector_position(
        &self,
        payload: ConnectorPositionPayload,
    ) -> Result<(), BackendError>;

    async fn update_path_position(&self, payload: PathPositionPayload)
    -> Result<(), BackendError>;

    async fn search_in_workflow(
        &self,
        query: &str,
        workflow_id: &str,
    ) -> Result<SearchResults, BackendError>;
}
