use indexmap::IndexMap;
use log::debug;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;

static CUSTOM_NODE_LIST: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"custom_nodes['"]*\s*:\s*(\[[\s\S]*?\])"#).ok());

/// The ComfyUI commit every exported machine is pinned to.
pub const REQUIRED_COMFYUI_VERSION: &str = "22ad513c72b891322f7baf6b459aa41858087b3b";

/// Repository of the custom node that must be installed on every machine.
pub const BASELINE_NODE_URL: &str = "https://github.com/rossman22590/comfyui-deploy.git";

/// Commit the baseline custom node is pinned to.
pub const BASELINE_NODE_HASH: &str = "40fc9d2914b8f1fc68534635146241d2cebca72b";

/// Install state of one custom node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CustomNode {
    /// Pinned commit; empty means "not pinned yet".
    #[serde(rename = "hash")]
    pub commit_hash: String,
    pub disabled: bool,
}

impl CustomNode {
    pub fn pinned(commit_hash: impl Into<String>) -> Self {
        Self {
            commit_hash: commit_hash.into(),
            disabled: false,
        }
    }

    /// The fixed entry for [`BASELINE_NODE_URL`].
    pub fn baseline() -> Self {
        Self::pinned(BASELINE_NODE_HASH)
    }

    /// Coerces an arbitrary JSON value; wrong-typed fields fall back to
    /// `""` / `false`.
    pub fn from_value(value: &Value) -> Self {
        Self {
            commit_hash: value
                .get("hash")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            disabled: value
                .get("disabled")
                .and_then(Value::as_bool)
                .unwrap_or_default(),
        }
    }

    pub fn has_hash(&self) -> bool {
        !self.commit_hash.is_empty()
    }
}

/// Repository URL → [`CustomNode`], in insertion order.
///
/// Re-inserting a URL replaces its value but keeps its original position.
/// Equality is order-sensitive, since the order is part of the export.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct CustomNodes {
    entries: IndexMap<String, CustomNode>,
}

impl CustomNodes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the entry for `url`, returning the previous value.
    pub fn insert(&mut self, url: impl Into<String>, node: CustomNode) -> Option<CustomNode> {
        self.entries.insert(url.into(), node)
    }

    pub fn get(&self, url: &str) -> Option<&CustomNode> {
        self.entries.get(url)
    }

    pub fn get_mut(&mut self, url: &str) -> Option<&mut CustomNode> {
        self.entries.get_mut(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CustomNode)> {
        self.entries.iter().map(|(u, n)| (u.as_str(), n))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut CustomNode)> {
        self.entries.iter_mut().map(|(u, n)| (u.as_str(), n))
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for CustomNodes {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for CustomNodes {}

impl<S: Into<String>> FromIterator<(S, CustomNode)> for CustomNodes {
    fn from_iter<I: IntoIterator<Item = (S, CustomNode)>>(iter: I) -> Self {
        let mut nodes = CustomNodes::new();
        for (url, node) in iter {
            nodes.insert(url, node);
        }
        nodes
    }
}

impl IntoIterator for CustomNodes {
    type Item = (String, CustomNode);
    type IntoIter = indexmap::map::IntoIter<String, CustomNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// The canonical machine configuration, as written to the export file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineConfig {
    #[serde(rename = "comfyui")]
    pub comfyui_version: String,
    /// Always starts with the baseline entry.
    #[serde(rename = "git_custom_nodes")]
    pub custom_nodes_by_url: CustomNodes,
    pub file_custom_nodes: Vec<Value>,
}

/// The two shapes `git_custom_nodes` has been seen in.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomNodesInput {
    /// Legacy shape: a bare list of repository URLs.
    Urls(Vec<String>),
    ByUrl(CustomNodes),
}

/// A machine configuration fragment from chat extraction, a tool call, or a
/// form. Every field is optional.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PartialMachineConfig {
    pub comfyui_version: Option<String>,
    pub custom_nodes: Option<CustomNodesInput>,
    pub file_custom_nodes: Vec<Value>,
}

impl PartialMachineConfig {
    /// Reads whatever can be read from `value`. Never fails: a non-object
    /// yields an empty fragment.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let custom_nodes = match obj.get("git_custom_nodes") {
            Some(Value::Array(urls)) => Some(CustomNodesInput::Urls(
                urls.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
            )),
            Some(Value::Object(map)) => Some(CustomNodesInput::ByUrl(
                map.iter()
                    .map(|(url, node)| (url.as_str(), CustomNode::from_value(node)))
                    .collect(),
            )),
            _ => None,
        };

        Self {
            comfyui_version: obj
                .get("comfyui")
                .and_then(Value::as_str)
                .map(str::to_string),
            custom_nodes,
            file_custom_nodes: obj
                .get("file_custom_nodes")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
        }
    }

    /// Reads a chat "custom node list": `[{"name", "git_url"}, ..]`, bare or
    /// wrapped as `{"custom_nodes": [..]}`. Entries missing either field are
    /// skipped.
    pub fn from_custom_node_list(value: &Value) -> Self {
        let list = value
            .get("custom_nodes")
            .unwrap_or(value)
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or_default();

        let nodes: CustomNodes = list
            .iter()
            .filter(|entry| entry.get("name").and_then(Value::as_str).is_some())
            .filter_map(|entry| entry.get("git_url").and_then(Value::as_str))
            .map(|url| (url, CustomNode::default()))
            .collect();

        Self {
            custom_nodes: Some(CustomNodesInput::ByUrl(nodes)),
            ..Self::default()
        }
    }

    /// Finds a custom node list embedded in free text, as in an assistant
    /// reply like `Install these: "custom_nodes": [{"name": .., "git_url": ..}]`.
    ///
    /// `None` unless the text mentions both `"custom_nodes"` and `"git_url"`
    /// and the bracketed list after `custom_nodes:` is valid JSON.
    pub fn from_custom_node_text(text: &str) -> Option<Self> {
        if !(text.contains("\"custom_nodes\"") && text.contains("\"git_url\"")) {
            return None;
        }
        let pattern = CUSTOM_NODE_LIST.as_ref()?;
        let list = pattern.captures(text)?.get(1)?.as_str();
        match serde_json::from_str::<Value>(list) {
            Ok(value) if value.is_array() => Some(Self::from_custom_node_list(&value)),
            Ok(_) => None,
            Err(e) => {
                debug!("Custom node list in text is not JSON: {}", e);
                None
            }
        }
    }

    /// Combines two fragments, `other` taking precedence.
    ///
    /// A non-empty version in `other` replaces this one. Custom nodes are
    /// merged by URL: each URL keeps the position it was first seen at and
    /// takes the settings given last. URLs from a legacy list carry no
    /// settings, so they never overwrite an existing entry. File custom nodes
    /// are appended, skipping ones already present.
    pub fn merge(mut self, other: PartialMachineConfig) -> Self {
        if let Some(version) = other.comfyui_version.filter(|v| !v.is_empty()) {
            self.comfyui_version = Some(version);
        }

        self.custom_nodes = match (self.custom_nodes, other.custom_nodes) {
            (current, None) => current,
            (None, incoming) => incoming,
            (Some(current), Some(incoming)) => {
                let mut nodes = current.into_nodes();
                match incoming {
                    CustomNodesInput::Urls(urls) => {
                        for url in urls {
                            if !nodes.contains(&url) {
                                nodes.insert(url, CustomNode::default());
                            }
                        }
                    }
                    CustomNodesInput::ByUrl(incoming) => {
                        for (url, node) in incoming {
                            nodes.insert(url, node);
                        }
                    }
                }
                Some(CustomNodesInput::ByUrl(nodes))
            }
        };

        for item in other.file_custom_nodes {
            if !self.file_custom_nodes.contains(&item) {
                self.file_custom_nodes.push(item);
            }
        }
        self
    }
}

impl CustomNodesInput {
    /// Legacy URLs become unpinned, enabled entries.
    pub fn into_nodes(self) -> CustomNodes {
        match self {
            CustomNodesInput::Urls(urls) => urls
                .into_iter()
                .map(|url| (url, CustomNode::default()))
                .collect(),
            CustomNodesInput::ByUrl(nodes) => nodes,
        }
    }
}

impl From<&Value> for PartialMachineConfig {
    fn from(value: &Value) -> Self {
        Self::from_value(value)
    }
}

impl From<Value> for PartialMachineConfig {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

impl From<MachineConfig> for PartialMachineConfig {
    fn from(config: MachineConfig) -> Self {
        Self {
            comfyui_version: Some(config.comfyui_version),
            custom_nodes: Some(CustomNodesInput::ByUrl(config.custom_nodes_by_url)),
            file_custom_nodes: config.file_custom_nodes,
        }
    }
}

impl From<&MachineConfig> for PartialMachineConfig {
    fn from(config: &MachineConfig) -> Self {
        config.clone().into()
    }
}
