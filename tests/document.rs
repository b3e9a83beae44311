//! Tests for workflow document parsing
//!
//! Node and link coercion under both node policies, checked on the parsed
//! document before any layout happens.
mod common;
use common::*;
use comfyscope::prelude::*;
use comfyscope::workflow::Vec2;
use serde_json::json;

#[test]
fn test_parses_full_node() {
    let doc = json!({
        "nodes": [{
            "id": 4,
            "type": "CheckpointLoaderSimple",
            "pos": [26, 474],
            "size": {"0": 315, "1": 98},
            "outputs": [{"name": "MODEL", "type": "MODEL", "links": [1], "slot_index": 0}],
            "inputs": [{"name": "clip", "type": "CLIP", "link": 3}],
            "widgets_values": ["v1-5-pruned-emaonly.safetensors"],
            "properties": {"Node name for S&R": "CheckpointLoaderSimple"}
        }],
        "links": []
    });
    let parsed = WorkflowDocument::from_value(&doc, NodePolicy::Strict).unwrap();
    let node = &parsed.nodes[0];
    assert_eq!(node.id, 4);
    assert_eq!(node.node_type, "CheckpointLoaderSimple");
    assert_eq!(node.position, Vec2::new(26.0, 474.0));
    assert_eq!(node.size, Some(Vec2::new(315.0, 98.0)));
    assert_eq!(node.outputs[0].links, vec![1]);
    assert_eq!(node.inputs[0].links, vec![3]);
    assert_eq!(node.widget_values.len(), 1);
    assert!(node.properties.is_some());
}

#[test]
fn test_array_and_object_sizes_agree() {
    let doc = workflow(vec![node(1, "KSampler", 0.0, 0.0)], vec![]);
    let parsed = WorkflowDocument::from_value(&doc, NodePolicy::Strict).unwrap();
    assert_eq!(parsed.nodes[0].size, Some(Vec2::new(315.0, 98.0)));
}

#[test]
fn test_strict_rejects_node_without_pos() {
    let doc = json!({"nodes": [{"id": 1, "pos": [0, 0]}, {"id": 2}], "links": []});
    let err = WorkflowDocument::from_value(&doc, NodePolicy::Strict).unwrap_err();
    assert!(matches!(err, ParseError::MalformedNode { index: 1, .. }));
}

#[test]
fn test_lenient_skips_node_without_pos() {
    let doc = json!({"nodes": [{"id": 1, "pos": [0, 0]}, {"id": 2}], "links": []});
    let parsed = WorkflowDocument::from_value(&doc, NodePolicy::Lenient).unwrap();
    assert_eq!(parsed.nodes.len(), 1);
    assert_eq!(parsed.node_count, 2);
    assert!(matches!(
        parsed.warnings[0],
        GraphWarning::SkippedNode { index: 1, .. }
    ));
}

#[test]
fn test_missing_links_depends_on_policy() {
    let doc = json!({"nodes": [], "last_node_id": 0});
    assert_eq!(
        WorkflowDocument::from_value(&doc, NodePolicy::Strict),
        Err(ParseError::MissingArray { field: "links" })
    );
    let parsed = WorkflowDocument::from_value(&doc, NodePolicy::Lenient).unwrap();
    assert_eq!(parsed.warnings, vec![GraphWarning::MissingLinks]);
}

#[test]
fn test_short_link_tuple_is_ignored() {
    let doc = json!({
        "nodes": [{"id": 1, "pos": [0, 0]}],
        "links": [[1, 1, 0, 1], [2, 1, 0, 1, 0, "IMAGE"]]
    });
    let parsed = WorkflowDocument::from_value(&doc, NodePolicy::Strict).unwrap();
    assert_eq!(parsed.link_count, 2);
    assert_eq!(parsed.links.len(), 1);
    assert_eq!(parsed.links[0].id, 2);
    assert_eq!(parsed.warnings, vec![GraphWarning::MalformedLink { index: 0 }]);
}

#[test]
fn test_invalid_text_is_parse_error() {
    let err = "not json".into_workflow(NodePolicy::Strict).unwrap_err();
    assert!(matches!(err, ParseError::InvalidJson(_)));
    let err = "[1, 2]".into_workflow(NodePolicy::Strict).unwrap_err();
    assert_eq!(err, ParseError::NotAnObject);
}
