//! Duplicate-assignment conflict resolution.
//!
//! Assigning software to a person can be refused because the integration is
//! already assigned to another user. The refusal carries the conflicting
//! `(userId, integrationId)`; the user may confirm removing that duplicate,
//! after which the original assignment is retried exactly once.

use serde::{Deserialize, Serialize};

use crate::backend::BackendError;
use crate::error::EditorError;
use crate::notify::{Notification, Notifier};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRequest {
    pub user_id: String,
    pub integration_id: String,
    #[serde(default)]
    pub license_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateConflict {
    pub user_id: String,
    pub integration_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssignmentResponse {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub conflict: Option<DuplicateConflict>,
    #[serde(default)]
    pub message: Option<String>,
}

#[allow(async_fn_in_trait)]
pub trait AssignmentBackend {
    async fn assign(&self, request: &AssignmentRequest) -> Result<AssignmentResponse, BackendError>;

    async fn remove_duplicate(&self, user_id: &str, integration_id: &str) -> Result<(), BackendError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignStatus {
    Assigned,
    /// Show the "remove from user" dialog for this conflict.
    ConfirmationRequired(DuplicateConflict),
}

#[derive(Debug, Default)]
pub struct ConflictResolver {
    pending: Option<(AssignmentRequest, DuplicateConflict)>,
}

impl ConflictResolver {
    pub fn new() -> Self {
        ConflictResolver::default()
    }

    pub fn pending_conflict(&self) -> Option<&DuplicateConflict> {
        self.pending.as_ref().map(|(_, c)| c)
    }

    pub async fn submit<B: AssignmentBackend, N: Notifier>(
        &mut self,
        backend: &B,
        notifier: &N,
        request: AssignmentRequest,
    ) -> Result<AssignStatus, EditorError> {
        let response = backend.assign(&request).await.map_err(|e| fail(notifier, e.into()))?;
        match classify(response) {
            Outcome::Assigned => Ok(AssignStatus::Assigned),
            Outcome::Conflict(conflict) => {
                self.pending = Some((request, conflict.clone()));
                Ok(AssignStatus::ConfirmationRequired(conflict))
            }
            Outcome::Failed(message) => Err(fail(notifier, EditorError::action("A010", message, None))),
        }
    }

    /// Remove the conflicting assignment, then retry the pending one once.
    pub async fn confirm<B: AssignmentBackend, N: Notifier>(
        &mut self,
        backend: &B,
        notifier: &N,
    ) -> Result<AssignStatus, EditorError> {
        let Some((_, conflict)) = &self.pending else {
            return Err(EditorError::action("A011", "No assignment is awaiting confirmation", None));
        };

        // The dialog stays open until the duplicate is gone.
        backend
            .remove_duplicate(&conflict.user_id, &conflict.integration_id)
            .await
            .map_err(|e| fail(notifier, e.into()))?;
        let Some((request, _)) = self.pending.take() else {
            return Err(EditorError::action("A011", "No assignment is awaiting confirmation", None));
        };

        let response = backend.assign(&request).await.map_err(|e| fail(notifier, e.into()))?;
        match classify(response) {
            Outcome::Assigned => {
                notifier.notify(Notification::success("Assigned"));
                Ok(AssignStatus::Assigned)
            }
            Outcome::Conflict(c) => Err(fail(
                notifier,
                EditorError::action(
                    "A010",
                    format!(
                        "Integration '{}' is still assigned to user '{}'",
                        c.integration_id, c.user_id
                    ),
                    None,
                ),
            )),
            Outcome::Failed(message) => Err(fail(notifier, EditorError::action("A010", message, None))),
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

enum Outcome {
    Assigned,
    Conflict(DuplicateConflict),
    Failed(String),
}

fn classify(response: AssignmentResponse) -> Outcome {
    match (response.error, response.conflict) {
        (true, Some(conflict)) => Outcome::Conflict(conflict),
        (true, None) => Outcome::Failed(
            response
                .message
                .unwrap_or_else(|| "Assignment was rejected".to_string()),
        ),
        (false, _) => Outcome::Assigned,
    }
}

fn fail<N: Notifier>(notifier: &N, error: EditorError) -> EditorError {
    tracing::warn!(code = %error.code, "{}", error.message);
    notifier.notify(Notification::error(error.message.clone()));
    error
}
