//! Authoring of a path's condition list.
//!
//! Rows are validated locally, then every upsert for the branch is sent
//! together. The save is reported as a whole: one failed upsert fails the
//! save even though the others may already have been stored.

use futures::future::join_all;
use thiserror::Error;

use super::FlowContext;
use crate::backend::{AddPathConditionPayload, ConditionPayload, WorkflowBackend};
use crate::error::EditorError;
use crate::graph::ConditionOperator;
use crate::notify::{Notification, Notifier};

/// One editable row of the condition form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConditionRow {
    /// Set when the row edits a saved condition.
    pub condition_id: Option<String>,
    pub field: String,
    pub operator: Option<ConditionOperator>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub row: usize,
    pub missing: Vec<&'static str>,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: missing {}", self.row + 1, self.missing.join(", "))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConditionSaveError {
    #[error("{} condition row(s) are incomplete", .0.len())]
    Invalid(Vec<RowError>),

    #[error("{failed} of {total} conditions failed to save: {error}")]
    Failed {
        total: usize,
        failed: usize,
        error: EditorError,
    },
}

/// Check every row; each incomplete row gets its own error.
pub fn validate_rows(rows: &[ConditionRow]) -> Result<Vec<(Option<String>, ConditionPayload)>, Vec<RowError>> {
    let mut valid = Vec::with_capacity(rows.len());
    let mut errors = Vec::new();

    for (row, r) in rows.iter().enumerate() {
        let mut missing = Vec::new();
        if r.field.trim().is_empty() {
            missing.push("field");
        }
        if r.operator.is_none() {
            missing.push("operator");
        }
        if r.value.trim().is_empty() {
            missing.push("value");
        }

        match (r.operator, missing.is_empty()) {
            (Some(operator), true) => valid.push((
                r.condition_id.clone(),
                ConditionPayload {
                    field: r.field.trim().to_string(),
                    operator,
                    value: r.value.trim().to_string(),
                },
            )),
            _ => errors.push(RowError { row, missing }),
        }
    }

    if errors.is_empty() { Ok(valid) } else { Err(errors) }
}

impl<'a, B: WorkflowBackend, N: Notifier> FlowContext<'a, B, N> {
    /// Save all condition rows of one branch. Returns the number saved.
    pub async fn save_path_conditions(
        &self,
        parent_node_id: &str,
        branch_id: &str,
        branch_description: &str,
        rows: &[ConditionRow],
    ) -> Result<usize, ConditionSaveError> {
        let conditions = validate_rows(rows).map_err(ConditionSaveError::Invalid)?;
        let total = conditions.len();

        let requests = conditions.into_iter().map(|(condition_id, condition)| {
            self.backend.add_path_condition(AddPathConditionPayload {
                branch_id: branch_id.to_string(),
                node_id: parent_node_id.to_string(),
                is_new: condition_id.is_none(),
                condition_id,
                branch_description: branch_description.to_string(),
                condition,
            })
        });
        let results = join_all(requests).await;

        let saved = results.iter().filter(|r| r.is_ok()).count();
        if saved > 0 {
            self.cache.invalidate(self.workflow_id);
        }

        match results.into_iter().find_map(Result::err) {
            None => {
                self.notifier.notify(Notification::success("Conditions saved"));
                Ok(saved)
            }
            Some(e) => {
                let failed = total - saved;
                tracing::warn!(branch_id, saved, failed, error = %e, "condition batch save failed");
                self.notifier
                    .notify(Notification::error(format!("Failed to save conditions: {}", e)));
                Err(ConditionSaveError::Failed {
                    total,
                    failed,
                    error: EditorError::from(e).with_node(branch_id),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(field: &str, operator: Option<ConditionOperator>, value: &str) -> ConditionRow {
        ConditionRow {
            condition_id: None,
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    #[test]
    fn complete_rows_pass() {
        let rows = vec![row("department", Some(ConditionOperator::Equals), " Sales ")];
        let valid = validate_rows(&rows).unwrap();
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].1.value, "Sales");
    }

    #[test]
    fn each_incomplete_row_is_reported() {
        let rows = vec![
            row("department", Some(ConditionOperator::Equals), "Sales"),
            row("", None, "x"),
            row("level", Some(ConditionOperator::GreaterThan), "  "),
        ];
        let errors = validate_rows(&rows).unwrap_err();
        assert_eq!(
            errors,
            vec![
                RowError { row: 1, missing: vec!["field", "operator"] },
                RowError { row: 2, missing: vec!["value"] },
            ]
        );
    }
}
