//! Tests for fragment classification
mod common;
use common::*;
use comfyscope::classify::{
    fragment_kind, is_config_bundle, is_machine_config, is_model_list, is_workflow_graph,
};
use comfyscope::prelude::*;
use serde_json::json;

#[test]
fn test_reference_classifications() {
    let cases = [
        (r#"{"nodes":[], "links":[]}"#, FragmentKind::WorkflowGraph),
        (
            r#"{"comfyui":"abc","git_custom_nodes":{}}"#,
            FragmentKind::MachineConfig,
        ),
        (
            r#"{"machineConfig":{"comfyui":"abc","git_custom_nodes":{}},"modelsConfig":null}"#,
            FragmentKind::ConfigBundle,
        ),
        (r#"[{"name":"a","type":"b"}]"#, FragmentKind::ModelList),
        ("hello", FragmentKind::PlainText),
    ];
    for (text, expected) in cases {
        assert_eq!(classify_fragment(text).kind(), expected, "{}", text);
    }
}

#[test]
fn test_workflow_with_links_array() {
    // Shape checked by the chat route: `nodes` and `links` arrays.
    assert!(is_workflow_graph(&json!({"nodes": [], "links": []})));
}

#[test]
fn test_workflow_with_last_node_id() {
    // Shape checked by the upload helper: `nodes` plus `last_node_id`.
    assert!(is_workflow_graph(&json!({"nodes": [], "last_node_id": 4})));
}

#[test]
fn test_saved_workflows_classify_as_graphs() {
    assert_eq!(
        classify_fragment(DEFAULT_WORKFLOW_JSON).kind(),
        FragmentKind::WorkflowGraph
    );
    assert_eq!(
        fragment_kind(&three_node_workflow()),
        FragmentKind::WorkflowGraph
    );
}

#[test]
fn test_fragment_keeps_decoded_payload() {
    match classify_fragment(r#"[{"name":"a","type":"b"}]"#) {
        Fragment::ModelList(items) => {
            assert_eq!(items, vec![json!({"name": "a", "type": "b"})]);
        }
        other => panic!("expected a model list, got {:?}", other),
    }
    match classify_fragment(&chat_machine_config().to_string()) {
        Fragment::MachineConfig(value) => assert_eq!(value, chat_machine_config()),
        other => panic!("expected a machine config, got {:?}", other),
    }
}

#[test]
fn test_malformed_text_is_plain() {
    for text in ["", "{", "[{\"name\": \"a\"}]", "{\"nodes\": 3, \"links\": []}", "null"] {
        assert_eq!(
            classify_fragment(text),
            Fragment::PlainText(text.to_string()),
            "{}",
            text
        );
    }
}

#[test]
fn test_classification_feeds_normalizer() {
    let Fragment::WorkflowGraph(value) = classify_fragment(DEFAULT_WORKFLOW_JSON) else {
        panic!("default workflow should be a graph");
    };
    let graph = normalize_workflow(value).unwrap();
    assert_eq!(graph.summary.to_string(), "7 nodes, 9 connections");
}

#[test]
fn test_workflow_wins_over_machine_config() {
    let both = json!({
        "nodes": [], "links": [],
        "comfyui": "abc", "git_custom_nodes": {}
    });
    assert_eq!(fragment_kind(&both), FragmentKind::WorkflowGraph);
}

#[test]
fn test_nodes_alone_is_not_a_workflow() {
    assert_eq!(fragment_kind(&json!({"nodes": []})), FragmentKind::PlainText);
    assert_eq!(
        fragment_kind(&json!({"nodes": {}, "links": []})),
        FragmentKind::PlainText
    );
}

#[test]
fn test_machine_config_needs_both_fields() {
    assert!(is_machine_config(&json!({"comfyui": "abc", "git_custom_nodes": []})));
    assert!(!is_machine_config(&json!({"comfyui": 1, "git_custom_nodes": {}})));
    assert!(!is_machine_config(&json!({"comfyui": "abc", "git_custom_nodes": "x"})));
}

#[test]
fn test_model_list_rules() {
    assert!(!is_model_list(&json!([])));
    assert!(!is_model_list(&json!([{"name": "a", "type": "b"}, {"name": "c"}])));
    assert!(is_model_list(&json!([{"name": "a", "type": "b", "extra": 1}])));
}

#[test]
fn test_scalar_json_is_plain_text() {
    assert_eq!(classify_fragment("42"), Fragment::PlainText("42".to_string()));
    assert_eq!(classify_fragment("\"hi\"").kind(), FragmentKind::PlainText);
}

#[test]
fn test_config_bundle_carries_both_halves() {
    let text = json!({
        "machineConfig": chat_machine_config(),
        "modelsConfig": [{"name": "sdxl", "type": "checkpoints", "url": "https://example.com/sdxl.safetensors"}]
    })
    .to_string();
    let Fragment::ConfigBundle {
        machine_config,
        models,
    } = classify_fragment(&text)
    else {
        panic!("expected a config bundle");
    };
    assert_eq!(machine_config, Some(chat_machine_config()));
    assert_eq!(models.unwrap()[0]["name"], "sdxl");
}

#[test]
fn test_config_bundle_with_one_half() {
    let machine_only = classify_fragment(r#"{"machineConfig": {"comfyui": "abc"}}"#);
    assert_eq!(
        machine_only,
        Fragment::ConfigBundle {
            machine_config: Some(json!({"comfyui": "abc"})),
            models: None,
        }
    );

    let models_only = classify_fragment(r#"{"machineConfig": null, "modelsConfig": []}"#);
    assert_eq!(
        models_only,
        Fragment::ConfigBundle {
            machine_config: None,
            models: Some(vec![]),
        }
    );
}

#[test]
fn test_config_bundle_needs_a_non_null_half() {
    assert!(!is_config_bundle(&json!({"machineConfig": null, "modelsConfig": null})));
    assert!(!is_config_bundle(&json!({"machine_config": {}})));
    assert!(!is_config_bundle(&json!([{"machineConfig": {}}])));
    assert_eq!(
        classify_fragment(r#"{"machineConfig": null}"#).kind(),
        FragmentKind::PlainText
    );
}

#[test]
fn test_bundle_halves_reconcile() {
    let text = json!({
        "machineConfig": {"git_custom_nodes": ["https://github.com/ltdrdata/ComfyUI-Impact-Pack"]},
        "modelsConfig": [{"name": "vae"}]
    })
    .to_string();
    let Fragment::ConfigBundle {
        machine_config: Some(machine),
        models: Some(items),
    } = classify_fragment(&text)
    else {
        panic!("expected both halves");
    };
    let config = reconcile_machine_config(&machine);
    assert_eq!(config.custom_nodes_by_url.len(), 2);
    let models = reconcile_model_list(&Value::Array(items));
    assert_eq!(models[0].save_path, "default");
}
