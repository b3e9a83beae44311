use super::document::{LinkSpec, Vec2};
use super::palette::edge_color;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// A layout-ready node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: i64,
    #[serde(rename = "type")]
    pub node_type: String,
    /// Position after declustering; always finite.
    pub position: Vec2,
    pub size: NodeSize,
    /// Index of the spatial group this node was placed in.
    pub group: usize,
    /// Header colour, derived from the node type.
    pub color: &'static str,
    pub port_data: PortData,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeSize {
    pub width: f64,
    pub height: Option<f64>,
}

/// Slot and widget data carried over from the source node for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortData {
    pub inputs: Vec<RenderPort>,
    pub outputs: Vec<RenderPort>,
    pub widget_values: Vec<Value>,
    pub properties: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPort {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub color: &'static str,
    pub links: Vec<i64>,
}

/// An edge whose two endpoints are both present in the render-node set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderEdge {
    pub id: i64,
    pub source_id: i64,
    pub source_port: u32,
    pub target_id: i64,
    pub target_port: u32,
    pub data_type: String,
    pub color: &'static str,
}

impl From<&LinkSpec> for RenderEdge {
    fn from(link: &LinkSpec) -> Self {
        Self {
            id: link.id,
            source_id: link.source_id,
            source_port: link.source_slot,
            target_id: link.target_id,
            target_port: link.target_slot,
            data_type: link.data_type.clone(),
            color: edge_color(&link.data_type),
        }
    }
}

/// A recoverable problem found while normalizing. Never fatal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GraphWarning {
    /// A link names a node that is not in the render set; the edge was dropped.
    DanglingLink { link_id: i64, missing_node_id: i64 },
    /// A `links` entry was not a well-formed 6-tuple.
    MalformedLink { index: usize },
    /// Lenient mode only: a node without a usable `id`/`pos` was left out.
    SkippedNode { index: usize, reason: String },
    /// Lenient mode only: the document had no `links` array.
    MissingLinks,
}

impl fmt::Display for GraphWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphWarning::DanglingLink {
                link_id,
                missing_node_id,
            } => write!(
                f,
                "link {} dropped: node {} does not exist",
                link_id, missing_node_id
            ),
            GraphWarning::MalformedLink { index } => {
                write!(f, "link entry {} is not a valid link tuple", index)
            }
            GraphWarning::SkippedNode { index, reason } => {
                write!(f, "node entry {} skipped: {}", index, reason)
            }
            GraphWarning::MissingLinks => write!(f, "document has no 'links' array"),
        }
    }
}

/// Counts for the status readout next to the diagram.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSummary {
    /// Entries in the document's `nodes` array.
    pub node_count: usize,
    /// Entries in the document's `links` array.
    pub link_count: usize,
    /// Edges that survived endpoint validation.
    pub edge_count: usize,
    pub group_count: usize,
    /// Whether the layout was spread out enough to be split into groups.
    pub declustered: bool,
    pub warnings: Vec<GraphWarning>,
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes, {} connections",
            self.node_count, self.link_count
        )
    }
}

/// The output of the normalizer: an immutable snapshot of nodes and edges.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedGraph {
    pub render_nodes: Vec<RenderNode>,
    pub render_edges: Vec<RenderEdge>,
    pub summary: GraphSummary,
}

impl NormalizedGraph {
    pub fn node(&self, id: i64) -> Option<&RenderNode> {
        self.render_nodes.iter().find(|n| n.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.render_nodes.is_empty()
    }
}
