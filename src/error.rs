//! Unified editor error type used across all phases.

use crate::backend::BackendError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Parse,
    Transform,
    Validate,
    Action,
    Persist,
    Search,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Parse => write!(f, "Parse"),
            Phase::Transform => write!(f, "Transform"),
            Phase::Validate => write!(f, "Validate"),
            Phase::Action => write!(f, "Action"),
            Phase::Persist => write!(f, "Persist"),
            Phase::Search => write!(f, "Search"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorError {
    pub code: String,
    pub phase: Phase,
    pub message: String,
    pub node_id: Option<String>,
}

impl std::fmt::Display for EditorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.node_id {
            Some(id) => write!(
                f,
                "[{}:{}] {} (node '{}')",
                self.phase, self.code, self.message, id
            ),
            None => write!(f, "[{}:{}] {}", self.phase, self.code, self.message),
        }
    }
}

impl std::error::Error for EditorError {}

impl From<BackendError> for EditorError {
    fn from(e: BackendError) -> Self {
        EditorError {
            code: "A001".into(),
            phase: Phase::Action,
            message: e.to_string(),
            node_id: None,
        }
    }
}

impl EditorError {
    fn new(phase: Phase, code: &str, message: impl Into<String>, node_id: Option<String>) -> Self {
        EditorError {
            code: code.into(),
            phase,
            message: message.into(),
            node_id,
        }
    }

    pub fn parse(code: &str, message: impl Into<String>) -> Self {
        Self::new(Phase::Parse, code, message, None)
    }

    pub fn transform(code: &str, message: impl Into<String>, node_id: Option<String>) -> Self {
        Self::new(Phase::Transform, code, message, node_id)
    }

    pub fn validate(code: &str, message: impl Into<String>, node_id: Option<String>) -> Self {
        Self::new(Phase::Validate, code, message, node_id)
    }

    pub fn action(code: &str, message: impl Into<String>, node_id: Option<String>) -> Self {
        Self::new(Phase::Action, code, message, node_id)
    }

    pub fn persist(code: &str, message: impl Into<String>, node_id: Option<String>) -> Self {
        Self::new(Phase::Persist, code, message, node_id)
    }

    pub fn search(code: &str, message: impl Into<String>) -> Self {
        Self::new(Phase::Search, code, message, None)
    }

    /// Attach the node a backend failure relates to.
    pub fn with_node(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = Some(node_id.into());
        self
    }
}
