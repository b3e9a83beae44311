use super::graph::GraphWarning;
use crate::error::ParseError;
use log::warn;
use serde::Serialize;
use serde_json::{Map, Value};

/// A 2D coordinate or extent, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// How the parser treats a node entry that lacks a numeric `id` or `pos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodePolicy {
    /// One malformed node (or a missing `links` array) rejects the whole document.
    #[default]
    Strict,
    /// Malformed nodes are skipped and a missing `links` array reads as empty.
    /// Every recovery is recorded as a [`GraphWarning`].
    Lenient,
}

/// An input or output slot of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct PortSpec {
    pub name: String,
    pub data_type: String,
    /// Link ids attached to this slot. Inputs carry at most one.
    pub links: Vec<i64>,
}

/// A single node as found in the workflow document.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub id: i64,
    pub node_type: String,
    pub position: Vec2,
    pub size: Option<Vec2>,
    pub inputs: Vec<PortSpec>,
    pub outputs: Vec<PortSpec>,
    pub widget_values: Vec<Value>,
    pub properties: Option<Map<String, Value>>,
}

/// A `(link_id, source, source_slot, target, target_slot, type)` tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSpec {
    pub id: i64,
    pub source_id: i64,
    pub source_slot: u32,
    pub target_id: i64,
    pub target_slot: u32,
    pub data_type: String,
}

/// The parsed form of a ComfyUI workflow document.
///
/// Produced from raw JSON by [`WorkflowDocument::from_value`] or through the
/// [`IntoWorkflow`] trait. The source value is never modified.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowDocument {
    pub nodes: Vec<NodeSpec>,
    pub links: Vec<LinkSpec>,
    /// Length of the `nodes` array as written in the document.
    pub node_count: usize,
    /// Length of the `links` array as written in the document.
    pub link_count: usize,
    /// Recoveries made while parsing (skipped nodes, malformed links).
    pub warnings: Vec<GraphWarning>,
}

impl WorkflowDocument {
    /// Parses a workflow document from an already decoded JSON value.
    pub fn from_value(value: &Value, policy: NodePolicy) -> Result<Self, ParseError> {
        let root = value.as_object().ok_or(ParseError::NotAnObject)?;
        let raw_nodes = root
            .get("nodes")
            .and_then(Value::as_array)
            .ok_or(ParseError::MissingArray { field: "nodes" })?;

        let mut warnings = Vec::new();
        let raw_links: &[Value] = match root.get("links").and_then(Value::as_array) {
            Some(links) => links.as_slice(),
            None if policy == NodePolicy::Lenient => {
                warn!("Workflow has no 'links' array; continuing without edges");
                warnings.push(GraphWarning::MissingLinks);
                &[]
            }
            None => return Err(ParseError::MissingArray { field: "links" }),
        };

        let mut nodes = Vec::with_capacity(raw_nodes.len());
        for (index, raw) in raw_nodes.iter().enumerate() {
            match parse_node(raw) {
                Ok(node) => nodes.push(node),
                Err(reason) if policy == NodePolicy::Lenient => {
                    warn!("Skipping node at index {}: {}", index, reason);
                    warnings.push(GraphWarning::SkippedNode { index, reason });
                }
                Err(reason) => return Err(ParseError::MalformedNode { index, reason }),
            }
        }

        let mut links = Vec::with_capacity(raw_links.len());
        for (index, raw) in raw_links.iter().enumerate() {
            match parse_link(raw) {
                Some(link) => links.push(link),
                None => {
                    warn!("Ignoring malformed link tuple at index {}", index);
                    warnings.push(GraphWarning::MalformedLink { index });
                }
            }
        }

        Ok(Self {
            nodes,
            links,
            node_count: raw_nodes.len(),
            link_count: raw_links.len(),
            warnings,
        })
    }
}

/// A trait for inputs that can be turned into a [`WorkflowDocument`].
///
/// The graph visualization receives workflows either as raw text or as an
/// already decoded JSON value; both go through this conversion. Implement it
/// on your own types to feed other document shapes into the normalizer.
pub trait IntoWorkflow {
    fn into_workflow(self, policy: NodePolicy) -> Result<WorkflowDocument, ParseError>;
}

impl IntoWorkflow for &str {
    fn into_workflow(self, policy: NodePolicy) -> Result<WorkflowDocument, ParseError> {
        let value: Value =
            serde_json::from_str(self).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
        WorkflowDocument::from_value(&value, policy)
    }
}

impl IntoWorkflow for &String {
    fn into_workflow(self, policy: NodePolicy) -> Result<WorkflowDocument, ParseError> {
        self.as_str().into_workflow(policy)
    }
}

impl IntoWorkflow for String {
    fn into_workflow(self, policy: NodePolicy) -> Result<WorkflowDocument, ParseError> {
        self.as_str().into_workflow(policy)
    }
}

impl IntoWorkflow for &Value {
    fn into_workflow(self, policy: NodePolicy) -> Result<WorkflowDocument, ParseError> {
        WorkflowDocument::from_value(self, policy)
    }
}

impl IntoWorkflow for Value {
    fn into_workflow(self, policy: NodePolicy) -> Result<WorkflowDocument, ParseError> {
        WorkflowDocument::from_value(&self, policy)
    }
}

impl IntoWorkflow for WorkflowDocument {
    fn into_workflow(self, _policy: NodePolicy) -> Result<WorkflowDocument, ParseError> {
        Ok(self)
    }
}

fn parse_node(raw: &Value) -> Result<NodeSpec, String> {
    let obj = raw
        .as_object()
        .ok_or_else(|| "node entry is not a JSON object".to_string())?;

    let id = obj
        .get("id")
        .and_then(as_integer)
        .ok_or_else(|| "missing numeric 'id'".to_string())?;

    let position = obj
        .get("pos")
        .or_else(|| obj.get("position"))
        .and_then(as_pair)
        .ok_or_else(|| format!("node {} has no 2-element numeric 'pos'", id))?;

    Ok(NodeSpec {
        id,
        node_type: obj
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        position,
        size: obj.get("size").and_then(as_pair),
        inputs: parse_ports(obj.get("inputs")),
        outputs: parse_ports(obj.get("outputs")),
        widget_values: match obj.get("widgets_values") {
            Some(Value::Array(values)) => values.clone(),
            // Some custom nodes store their widgets as a keyed object.
            Some(Value::Object(values)) => values.values().cloned().collect(),
            _ => Vec::new(),
        },
        properties: obj.get("properties").and_then(Value::as_object).cloned(),
    })
}

fn parse_ports(raw: Option<&Value>) -> Vec<PortSpec> {
    let Some(ports) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };
    ports
        .iter()
        .filter_map(Value::as_object)
        .map(|port| {
            let mut links: Vec<i64> = port
                .get("links")
                .and_then(Value::as_array)
                .map(|ids| ids.iter().filter_map(as_integer).collect())
                .unwrap_or_default();
            if let Some(link) = port.get("link").and_then(as_integer) {
                links.push(link);
            }
            PortSpec {
                name: port
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                data_type: port
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                links,
            }
        })
        .collect()
}

fn parse_link(raw: &Value) -> Option<LinkSpec> {
    let tuple = raw.as_array().filter(|t| t.len() >= 6)?;
    Some(LinkSpec {
        id: as_integer(&tuple[0])?,
        source_id: as_integer(&tuple[1])?,
        source_slot: as_slot(&tuple[2])?,
        target_id: as_integer(&tuple[3])?,
        target_slot: as_slot(&tuple[4])?,
        data_type: tuple[5].as_str().unwrap_or_default().to_string(),
    })
}

/// Reads an integer, accepting floats with no fractional part (`3.0`).
fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn as_slot(value: &Value) -> Option<u32> {
    as_integer(value).and_then(|v| u32::try_from(v).ok())
}

/// Reads `[x, y]` or the `{"0": x, "1": y}` form some editors save.
fn as_pair(value: &Value) -> Option<Vec2> {
    match value {
        Value::Array(items) if items.len() == 2 => {
            Some(Vec2::new(items[0].as_f64()?, items[1].as_f64()?))
        }
        Value::Object(map) => Some(Vec2::new(
            map.get("0")?.as_f64()?,
            map.get("1")?.as_f64()?,
        )),
        _ => None,
    }
}
