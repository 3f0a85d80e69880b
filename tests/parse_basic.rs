//! Integration tests for parsing backend workflow documents.

use flow_editor::parse;
use flow_editor::parse::types::WorkflowStatus;

#[test]
fn parse_onboarding_workflow() {
    let json = include_str!("fixtures/onboarding_workflow.json");
    let doc = parse::parse(json).expect("Should parse successfully");
    assert_eq!(doc.id, "wf-onboarding");
    assert_eq!(doc.name, "Engineering onboarding");
    assert_eq!(doc.status, WorkflowStatus::Draft);
    assert!(!doc.is_valid_test_run);
    assert_eq!(doc.nodes.len(), 4);
}

#[test]
fn parse_split_slots_keep_their_positions() {
    let json = include_str!("fixtures/onboarding_workflow.json");
    let doc = parse::parse(json).unwrap();
    let slack = doc.nodes.iter().find(|n| n.id == "slack").unwrap();
    let split = slack.split_data.as_ref().expect("slack owns a split");
    let [b0, b1, b2] = split.slots();
    assert_eq!(b0.map(|b| b.id.as_str()), Some("b-eng"));
    assert!(b1.is_none(), "null slot stays empty");
    assert_eq!(b2.map(|b| b.id.as_str()), Some("b-rest"));
    assert_eq!(b0.unwrap().conditions[0].operator, "==");
}

#[test]
fn parse_direct_path() {
    let json = include_str!("fixtures/onboarding_workflow.json");
    let doc = parse::parse(json).unwrap();
    let path = doc.nodes[0].path.as_ref().expect("start has a direct path");
    assert!(path.is_direct_connection);
    assert_eq!(path.next_node_id.as_deref(), Some("slack"));
}

#[test]
fn parse_invalid_json_returns_error() {
    let result = parse::parse("{ not json");
    let errors = result.expect_err("Should fail");
    assert!(errors.iter().any(|e| e.code == "P001"), "Expected P001: {:?}", errors);
}

#[test]
fn parse_missing_required_field_returns_error() {
    let result = parse::parse(r#"{"name": "no id", "nodes": []}"#);
    assert!(result.is_err(), "document without _id should not parse");
}
