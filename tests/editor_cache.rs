//! Integration tests for workflow loading, cache staleness and editor config.

#[allow(dead_code)]
mod helpers;

use std::collections::HashMap;

use flow_editor::config::EditorConfig;
use flow_editor::editor::FlowEditor;
use flow_editor::simulate::RunOutcome;
use helpers::*;

fn editor(config: EditorConfig) -> FlowEditor<MockBackend, RecordingNotifier> {
    FlowEditor::new(
        MockBackend::new(split_doc()),
        RecordingNotifier::default(),
        config,
        "w1",
    )
}

fn fetches(ed: &FlowEditor<MockBackend, RecordingNotifier>) -> usize {
    ed.backend()
        .calls()
        .iter()
        .filter(|c| matches!(c, Call::FetchWorkflow(_)))
        .count()
}

#[tokio::test]
async fn fresh_cache_is_reused() {
    let ed = editor(EditorConfig::default());
    let first = ed.load(0).await;
    let second = ed.load(60_000).await;
    assert_eq!(fetches(&ed), 1);
    assert!(std::rc::Rc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn stale_time_triggers_refetch() {
    let config = EditorConfig {
        workflow_stale_time_ms: Some(1_000),
        ..EditorConfig::default()
    };
    let ed = editor(config);
    ed.load(0).await;
    ed.load(500).await;
    assert_eq!(fetches(&ed), 1);
    ed.load(1_000).await;
    assert_eq!(fetches(&ed), 2);
}

#[tokio::test]
async fn failed_refetch_serves_last_graph() {
    let ed = editor(EditorConfig::default());
    let graph = ed.load(0).await;
    ed.cache().invalidate("w1");
    ed.backend().fail("fetch_workflow");

    let again = ed.load(1).await;
    assert_eq!(*again, *graph);
    assert!(ed.notifier().errors().is_empty());
}

#[tokio::test]
async fn failed_first_load_renders_empty_canvas() {
    let ed = editor(EditorConfig::default());
    ed.backend().fail("fetch_workflow");

    let graph = ed.load(0).await;
    assert!(graph.is_empty());
    assert_eq!(ed.notifier().errors().len(), 1);
}

#[tokio::test]
async fn readiness_and_test_run_use_cached_workflow() {
    let ed = editor(EditorConfig::default());
    assert!(ed.readiness().is_none(), "nothing loaded yet");
    ed.load(0).await;

    let ready = ed.readiness().unwrap();
    assert!(ready.all_nodes_integrated);
    assert!(!ready.can_enable);

    let run = ed.test_run(&HashMap::new()).unwrap();
    assert_eq!(run.outcome, RunOutcome::Completed);
    assert_eq!(run.visited, vec!["start", "n1", "s1", "b0", "n2"]);
}

#[tokio::test]
async fn configured_offsets_place_new_split_branches() {
    let config = EditorConfig::from_json(
        r#"{"splitBranchOffsets": [{"x": 50, "y": -80}, {"x": 50, "y": 80}]}"#,
    )
    .unwrap();
    let ed = FlowEditor::new(
        MockBackend::new(linear_doc()),
        RecordingNotifier::default(),
        config,
        "w1",
    );
    let ctx = ed.context(ed.load(0).await);
    ctx.add_split_after_node("n1", flow_editor::graph::Position::new(0.0, 100.0))
        .await
        .unwrap();

    let refreshed = ed.load(1).await;
    let positions: Vec<(f64, f64)> = refreshed
        .nodes
        .iter()
        .filter(|n| n.parent_node_id.as_deref() == Some("n1") && n.id.starts_with("br"))
        .map(|n| (n.position.x, n.position.y))
        .collect();
    assert_eq!(positions, vec![(50.0, 20.0), (50.0, 180.0)]);
}

#[test]
fn malformed_config_is_rejected() {
    let err = EditorConfig::from_json(r#"{"searchDebounceMs": "soon"}"#).unwrap_err();
    assert_eq!(err.code, "P002");
}
