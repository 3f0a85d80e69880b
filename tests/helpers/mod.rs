use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};

use flow_editor::backend::*;
use flow_editor::graph::Position;
use flow_editor::notify::{Notification, NotificationLevel, Notifier};
use flow_editor::parse::types::*;

// =============================================================================
// Document builders
// =============================================================================

pub fn doc(nodes: Vec<BackendNode>) -> WorkflowDocument {
    WorkflowDocument {
        id: "w1".into(),
        name: "Test Workflow".into(),
        status: WorkflowStatus::Draft,
        enabled: false,
        is_valid_test_run: false,
        all_nodes_integrated: false,
        nodes,
    }
}

fn node(id: &str, node_type: &str) -> BackendNode {
    BackendNode {
        id: id.into(),
        node_type: node_type.into(),
        position: Position::new(0.0, 0.0),
        app: None,
        instruction: None,
        path: None,
        split_data: None,
    }
}

pub fn start(id: &str) -> BackendNode {
    node(id, BACKEND_START)
}

pub fn app(id: &str, app_name: &str, integrated: bool) -> BackendNode {
    let mut n = node(id, BACKEND_APP);
    n.app = Some(AppPayload {
        app_name: app_name.into(),
        integration_id: Some(format!("int-{}", id)),
        integrated,
        description: None,
        selected_action: None,
        config: Default::default(),
    });
    n
}

pub fn instruction(id: &str, description: &str) -> BackendNode {
    let mut n = node(id, BACKEND_INSTRUCTION);
    n.instruction = Some(InstructionPayload {
        description: description.into(),
        service: None,
        template_id: None,
        custom: false,
    });
    n
}

pub fn unknown(id: &str, node_type: &str) -> BackendNode {
    node(id, node_type)
}

pub fn at(mut n: BackendNode, x: f64, y: f64) -> BackendNode {
    n.position = Position::new(x, y);
    n
}

pub fn branch(id: &str, label: &str, next: Option<&str>) -> BackendBranch {
    BackendBranch {
        id: id.into(),
        label: label.into(),
        position: Position::new(0.0, 0.0),
        background_color: None,
        text_color: None,
        description: None,
        conditions: vec![],
        if_condition: vec![],
        next_node_id: next.map(String::from),
        is_direct_connection: false,
    }
}

pub fn condition(field: &str, operator: &str, value: &str) -> BackendCondition {
    BackendCondition {
        id: None,
        field: field.into(),
        operator: operator.into(),
        value: value.into(),
    }
}

/// Give `n` a direct path to `next`.
pub fn direct(mut n: BackendNode, branch_id: &str, next: &str) -> BackendNode {
    let mut b = branch(branch_id, "", Some(next));
    b.is_direct_connection = true;
    n.path = Some(b);
    n
}

pub fn with_split(
    mut n: BackendNode,
    split_id: &str,
    slots: [Option<BackendBranch>; 3],
) -> BackendNode {
    let [branch_0, branch_1, branch_2] = slots;
    n.split_data = Some(SplitData {
        id: split_id.into(),
        connector_position: Position::new(0.0, 100.0),
        branch_0,
        branch_1,
        branch_2,
    });
    n
}

/// START → n1 (Slack), n1 without outgoing connection.
pub fn linear_doc() -> WorkflowDocument {
    doc(vec![
        direct(start("start"), "p-start", "n1"),
        app("n1", "Slack", true),
    ])
}

/// START → n1 → split s1 with branch b0 → n2 in slot 0 and an unconnected b2 in slot 2.
pub fn split_doc() -> WorkflowDocument {
    doc(vec![
        direct(start("start"), "p-start", "n1"),
        with_split(
            app("n1", "Slack", true),
            "s1",
            [Some(branch("b0", "Engineering", Some("n2"))), None, Some(branch("b2", "Sales", None))],
        ),
        app("n2", "GitHub", true),
    ])
}

// =============================================================================
// Recording backend
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchWorkflow(String),
    CreateApp(CreateAppPayload),
    DeleteNode(DeleteNodePayload),
    CreateSingleSplitPath(CreateSingleSplitPathPayload),
    CreateDoubleSplitPath(CreateDoubleSplitPathPayload),
    UpdatePath(UpdatePathPayload),
    DeleteBranch(DeleteBranchPayload),
    AddPathCondition(AddPathConditionPayload),
    UpdateNodePosition(NodePositionPayload),
    UpdateConnectorPosition(ConnectorPositionPayload),
    UpdatePathPosition(PathPositionPayload),
    Search(String, String),
}

impl Call {
    pub fn name(&self) -> &'static str {
        match self {
            Call::FetchWorkflow(_) => "fetch_workflow",
            Call::CreateApp(_) => "create_app",
            Call::DeleteNode(_) => "delete_node",
            Call::CreateSingleSplitPath(_) => "create_single_split_path",
            Call::CreateDoubleSplitPath(_) => "create_double_split_path",
            Call::UpdatePath(_) => "update_path_name_or_next_node",
            Call::DeleteBranch(_) => "delete_branch",
            Call::AddPathCondition(_) => "add_path_condition",
            Call::UpdateNodePosition(_) => "update_node_position",
            Call::UpdateConnectorPosition(_) => "update_connector_position",
            Call::UpdatePathPosition(_) => "update_path_position",
            Call::Search(_, _) => "search_in_workflow",
        }
    }
}

/// In-memory backend that records every call and applies node/path
/// mutations to its document so refetches see them.
pub struct MockBackend {
    document: RefCell<WorkflowDocument>,
    calls: RefCell<Vec<Call>>,
    node_ids: RefCell<VecDeque<String>>,
    branch_ids: RefCell<VecDeque<String>>,
    failing: RefCell<HashSet<&'static str>>,
    failing_condition_values: RefCell<HashSet<String>>,
    search_hits: RefCell<Vec<String>>,
    yields: RefCell<HashMap<&'static str, usize>>,
}

impl MockBackend {
    pub fn new(document: WorkflowDocument) -> Self {
        MockBackend {
            document: RefCell::new(document),
            calls: RefCell::new(vec![]),
            node_ids: RefCell::new((2..100).map(|i| format!("n{}", i)).collect()),
            branch_ids: RefCell::new((1..100).map(|i| format!("br{}", i)).collect()),
            failing: RefCell::new(HashSet::new()),
            failing_condition_values: RefCell::new(HashSet::new()),
            search_hits: RefCell::new(vec![]),
            yields: RefCell::new(HashMap::new()),
        }
    }

    pub fn fail(&self, method: &'static str) {
        self.failing.borrow_mut().insert(method);
    }

    pub fn fail_condition_with_value(&self, value: &str) {
        self.failing_condition_values.borrow_mut().insert(value.to_string());
    }

    /// Make `method` yield to the executor `times` times before answering.
    pub fn yield_in(&self, method: &'static str, times: usize) {
        self.yields.borrow_mut().insert(method, times);
    }

    pub fn set_search_hits(&self, ids: &[&str]) {
        *self.search_hits.borrow_mut() = ids.iter().map(|s| s.to_string()).collect();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Recorded calls except refetches.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::FetchWorkflow(_)))
            .collect()
    }

    pub fn call_names(&self) -> Vec<&'static str> {
        self.mutations().iter().map(Call::name).collect()
    }

    async fn record(&self, call: Call) -> Result<(), BackendError> {
        let name = call.name();
        self.calls.borrow_mut().push(call);
        let times = self.yields.borrow().get(name).copied().unwrap_or(0);
        for _ in 0..times {
            tokio::task::yield_now().await;
        }
        if self.failing.borrow().contains(name) {
            return Err(BackendError::Rejected {
                message: format!("{} failed", name),
            });
        }
        Ok(())
    }

    fn next_branch_id(&self) -> String {
        self.branch_ids.borrow_mut().pop_front().unwrap()
    }

    fn with_node<T>(&self, id: &str, f: impl FnOnce(&mut BackendNode) -> T) -> Option<T> {
        self.document
            .borrow_mut()
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .map(f)
    }
}

fn find_branch<'a>(node: &'a mut BackendNode, branch_id: &str) -> Option<&'a mut BackendBranch> {
    if let Some(path) = node.path.as_mut().filter(|p| p.id == branch_id) {
        return Some(path);
    }
    let split = node.split_data.as_mut()?;
    [&mut split.branch_0, &mut split.branch_1, &mut split.branch_2]
        .into_iter()
        .filter_map(|slot| slot.as_mut())
        .find(|b| b.id == branch_id)
}

impl WorkflowBackend for MockBackend {
    async fn fetch_workflow(&self, workflow_id: &str) -> Result<WorkflowDocument, BackendError> {
        self.record(Call::FetchWorkflow(workflow_id.to_string())).await?;
        Ok(self.document.borrow().clone())
    }

    async fn create_app(&self, payload: CreateAppPayload) -> Result<CreatedNode, BackendError> {
        self.record(Call::CreateApp(payload.clone())).await?;
        let id = self.node_ids.borrow_mut().pop_front().unwrap();
        let mut created = if payload.node_type == BACKEND_INSTRUCTION {
            instruction(&id, &payload.app_name)
        } else {
            app(&id, &payload.app_name, false)
        };
        created.position = payload.position;
        self.document.borrow_mut().nodes.push(created);
        Ok(CreatedNode { id })
    }

    async fn delete_node(&self, payload: DeleteNodePayload) -> Result<(), BackendError> {
        self.record(Call::DeleteNode(payload.clone())).await?;
        self.document.borrow_mut().nodes.retain(|n| n.id != payload.node_id);
        Ok(())
    }

    async fn create_single_split_path(
        &self,
        payload: CreateSingleSplitPathPayload,
    ) -> Result<SplitPathResult, BackendError> {
        self.record(Call::CreateSingleSplitPath(payload.clone())).await?;
        let branch_id = self.next_branch_id();
        let mut new_branch = branch(&branch_id, "", None);
        new_branch.position = payload.branch_positions[0];
        new_branch.is_direct_connection = payload.is_direct_connection.unwrap_or(false);

        self.with_node(&payload.prev_node_id, |n| match payload.branch_direction {
            None => n.path = Some(new_branch),
            Some(slot) => {
                if let Some(split) = n.split_data.as_mut() {
                    match slot {
                        0 => split.branch_0 = Some(new_branch),
                        1 => split.branch_1 = Some(new_branch),
                        _ => split.branch_2 = Some(new_branch),
                    }
                }
            }
        });
        Ok(SplitPathResult {
            split_id: None,
            new_branches: vec![NewBranch { branch_id }],
        })
    }

    async fn create_double_split_path(
        &self,
        payload: CreateDoubleSplitPathPayload,
    ) -> Result<SplitPathResult, BackendError> {
        self.record(Call::CreateDoubleSplitPath(payload.clone())).await?;
        let split_id = format!("split-{}", payload.prev_node_id);
        let ids = [self.next_branch_id(), self.next_branch_id()];
        let mut upper = branch(&ids[0], "Path 1", None);
        upper.position = payload.branch_positions[0];
        let mut lower = branch(&ids[1], "Path 2", None);
        lower.position = payload.branch_positions[1];

        self.with_node(&payload.prev_node_id, |n| {
            n.split_data = Some(SplitData {
                id: split_id.clone(),
                connector_position: payload.connector_position,
                branch_0: Some(upper),
                branch_1: None,
                branch_2: Some(lower),
            });
        });
        Ok(SplitPathResult {
            split_id: Some(split_id),
            new_branches: ids.into_iter().map(|branch_id| NewBranch { branch_id }).collect(),
        })
    }

    async fn update_path_name_or_next_node(&self, payload: UpdatePathPayload) -> Result<(), BackendError> {
        self.record(Call::UpdatePath(payload.clone())).await?;
        self.with_node(&payload.node_id, |n| {
            if let Some(b) = find_branch(n, &payload.branch_id) {
                if let Some(label) = &payload.label {
                    b.label = label.clone();
                }
                if let Some(next) = &payload.next_node_id {
                    b.next_node_id = Some(next.clone());
                }
            }
        });
        Ok(())
    }

    async fn delete_branch(&self, payload: DeleteBranchPayload) -> Result<(), BackendError> {
        self.record(Call::DeleteBranch(payload)).await
    }

    async fn add_path_condition(&self, payload: AddPathConditionPayload) -> Result<(), BackendError> {
        let value = payload.condition.value.clone();
        self.record(Call::AddPathCondition(payload)).await?;
        if self.failing_condition_values.borrow().contains(&value) {
            return Err(BackendError::Network(format!("timeout saving '{}'", value)));
        }
        Ok(())
    }

    async fn update_node_position(&self, payload: NodePositionPayload) -> Result<(), BackendError> {
        self.record(Call::UpdateNodePosition(payload)).await
    }

    async fn update_connector_position(&self, payload: ConnectorPositionPayload) -> Result<(), BackendError> {
        self.record(Call::UpdateConnectorPosition(payload)).await
    }

    async fn update_path_position(&self, payload: PathPositionPayload) -> Result<(), BackendError> {
        self.record(Call::UpdatePathPosition(payload)).await
    }

    async fn search_in_workflow(&self, query: &str, workflow_id: &str) -> Result<SearchResults, BackendError> {
        self.record(Call::Search(query.to_string(), workflow_id.to_string())).await?;
        Ok(SearchResults {
            results: self
                .search_hits
                .borrow()
                .iter()
                .map(|id| SearchHit { id: id.clone() })
                .collect(),
        })
    }
}

// =============================================================================
// Recording notifier
// =============================================================================

#[derive(Default)]
pub struct RecordingNotifier {
    notifications: RefCell<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn errors(&self) -> Vec<String> {
        self.notifications
            .borrow()
            .iter()
            .filter(|n| n.level == NotificationLevel::Error)
            .map(|n| n.message.clone())
            .collect()
    }

    pub fn successes(&self) -> Vec<String> {
        self.notifications
            .borrow()
            .iter()
            .filter(|n| n.level == NotificationLevel::Success)
            .map(|n| n.message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.borrow_mut().push(notification);
    }
}
