//! Integration tests for debounced workflow search and highlighting.

#[allow(dead_code)]
mod helpers;

use flow_editor::config::EditorConfig;
use flow_editor::editor::FlowEditor;
use flow_editor::search::ViewportCommand;
use helpers::*;

fn editor() -> FlowEditor<MockBackend, RecordingNotifier> {
    FlowEditor::new(
        MockBackend::new(split_doc()),
        RecordingNotifier::default(),
        EditorConfig::default(),
        "w1",
    )
}

fn fitted(command: &ViewportCommand) -> Vec<&str> {
    match command {
        ViewportCommand::Fit { node_ids, .. } => node_ids.iter().map(String::as_str).collect(),
        ViewportCommand::Unchanged => panic!("expected a fit, got Unchanged"),
    }
}

#[tokio::test]
async fn matches_are_highlighted_and_fitted() {
    let mut ed = editor();
    ed.load(0).await;
    ed.backend().set_search_hits(&["n2", "ghost"]);

    ed.search_input("git", 0);
    assert_eq!(ed.poll_search(100).await, None, "still inside the quiet period");
    let command = ed.poll_search(300).await.expect("search should run");

    assert_eq!(fitted(&command), vec!["n2"], "hits outside the graph are dropped");
    assert!(ed.highlight().is_highlighted("n2"));
    assert!(!ed.highlight().is_highlighted("n1"));
    let ViewportCommand::Fit { bounds, .. } = command else { unreachable!() };
    assert!(bounds.is_some());
}

#[tokio::test]
async fn debounce_only_sends_last_query() {
    let mut ed = editor();
    ed.load(0).await;

    ed.search_input("s", 0);
    ed.search_input("sl", 100);
    ed.search_input("sla", 200);
    ed.poll_search(600).await;

    let searches: Vec<_> = ed
        .backend()
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Search(query, workflow_id) => Some((query, workflow_id)),
            _ => None,
        })
        .collect();
    assert_eq!(searches, vec![("sla".to_string(), "w1".to_string())]);
}

#[tokio::test]
async fn empty_query_resets_and_fits_everything() {
    let mut ed = editor();
    let graph = ed.load(0).await;
    ed.backend().set_search_hits(&["n1"]);

    ed.search_input("slack", 0);
    ed.poll_search(1_000).await;
    assert!(!ed.highlight().is_empty());

    ed.search_input("  ", 2_000);
    let command = ed.poll_search(3_000).await.unwrap();
    assert!(ed.highlight().is_empty());

    let all: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(fitted(&command), all);
    assert_eq!(ed.backend().call_names().iter().filter(|n| **n == "search_in_workflow").count(), 1);
}

#[tokio::test]
async fn zero_matches_leave_viewport_unchanged() {
    let mut ed = editor();
    ed.load(0).await;
    ed.backend().set_search_hits(&["n1"]);
    ed.search_input("slack", 0);
    ed.poll_search(1_000).await;

    ed.backend().set_search_hits(&[]);
    ed.search_input("nothing", 2_000);
    let command = ed.poll_search(3_000).await.unwrap();
    assert_eq!(command, ViewportCommand::Unchanged);
    assert!(ed.highlight().is_empty());
}

#[tokio::test]
async fn failed_search_toasts_and_keeps_viewport() {
    let mut ed = editor();
    ed.load(0).await;
    ed.backend().fail("search_in_workflow");

    ed.search_input("slack", 0);
    let command = ed.poll_search(1_000).await.unwrap();
    assert_eq!(command, ViewportCommand::Unchanged);
    assert_eq!(ed.notifier().errors().len(), 1);
}
