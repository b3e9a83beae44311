//! Shape detection for text fragments pulled out of chat messages.
//!
//! Each known shape has a detector. Detectors are tried in a fixed priority
//! order and the first match wins; text that is not JSON, or matches none of
//! them, is plain text. Classification never fails.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FragmentKind {
    WorkflowGraph,
    ConfigBundle,
    MachineConfig,
    ModelList,
    PlainText,
}

/// A classified fragment, carrying the decoded JSON for structured kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    WorkflowGraph(Value),
    /// The `{machineConfig, modelsConfig}` envelope the assistant uses to
    /// hand over both halves of a deployment at once. Either half may be
    /// missing.
    ConfigBundle {
        machine_config: Option<Value>,
        models: Option<Vec<Value>>,
    },
    MachineConfig(Value),
    ModelList(Vec<Value>),
    PlainText(String),
}

impl Fragment {
    pub fn kind(&self) -> FragmentKind {
        match self {
            Fragment::WorkflowGraph(_) => FragmentKind::WorkflowGraph,
            Fragment::ConfigBundle { .. } => FragmentKind::ConfigBundle,
            Fragment::MachineConfig(_) => FragmentKind::MachineConfig,
            Fragment::ModelList(_) => FragmentKind::ModelList,
            Fragment::PlainText(_) => FragmentKind::PlainText,
        }
    }
}

type Detector = fn(&Value) -> bool;

/// Detectors in priority order.
const DETECTORS: [(FragmentKind, Detector); 4] = [
    (FragmentKind::WorkflowGraph, is_workflow_graph),
    (FragmentKind::ConfigBundle, is_config_bundle),
    (FragmentKind::MachineConfig, is_machine_config),
    (FragmentKind::ModelList, is_model_list),
];

/// A ComfyUI workflow: a `nodes` array plus either a `links` array or a
/// `last_node_id` field. Both forms are in circulation.
pub fn is_workflow_graph(value: &Value) -> bool {
    let has_nodes = value.get("nodes").is_some_and(Value::is_array);
    let has_links = value.get("links").is_some_and(Value::is_array);
    let has_last_id = value.get("last_node_id").is_some();
    has_nodes && (has_links || has_last_id)
}

/// A config bundle: an object with a non-null `machineConfig` or
/// `modelsConfig`.
pub fn is_config_bundle(value: &Value) -> bool {
    value.is_object()
        && (bundle_part(value, "machineConfig").is_some()
            || bundle_part(value, "modelsConfig").is_some())
}

fn bundle_part<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|part| !part.is_null())
}

/// A machine config: string `comfyui` and an object or array
/// `git_custom_nodes`.
pub fn is_machine_config(value: &Value) -> bool {
    let has_version = value.get("comfyui").is_some_and(Value::is_string);
    let has_nodes = value
        .get("git_custom_nodes")
        .is_some_and(|nodes| nodes.is_object() || nodes.is_array());
    has_version && has_nodes
}

/// A model list: a non-empty array whose every element has string `name`
/// and `type`.
pub fn is_model_list(value: &Value) -> bool {
    value.as_array().is_some_and(|items| {
        !items.is_empty()
            && items.iter().all(|item| {
                item.get("name").is_some_and(Value::is_string)
                    && item.get("type").is_some_and(Value::is_string)
            })
    })
}

/// Classifies an already decoded value.
pub fn fragment_kind(value: &Value) -> FragmentKind {
    DETECTORS
        .iter()
        .find(|(_, detect)| detect(value))
        .map_or(FragmentKind::PlainText, |(kind, _)| *kind)
}

/// Classifies `text`, keeping the decoded JSON for structured kinds.
pub fn classify_fragment(text: &str) -> Fragment {
    let Ok(value) = serde_json::from_str::<Value>(text) else {
        return Fragment::PlainText(text.to_string());
    };
    match (fragment_kind(&value), value) {
        (FragmentKind::WorkflowGraph, value) => Fragment::WorkflowGraph(value),
        (FragmentKind::ConfigBundle, value) => Fragment::ConfigBundle {
            machine_config: bundle_part(&value, "machineConfig").cloned(),
            models: bundle_part(&value, "modelsConfig")
                .and_then(Value::as_array)
                .cloned(),
        },
        (FragmentKind::MachineConfig, value) => Fragment::MachineConfig(value),
        (FragmentKind::ModelList, Value::Array(items)) => Fragment::ModelList(items),
        _ => Fragment::PlainText(text.to_string()),
    }
}
