use super::document::{IntoWorkflow, NodePolicy, PortSpec, WorkflowDocument};
use super::graph::{
    GraphSummary, GraphWarning, NodeSize, NormalizedGraph, PortData, RenderEdge, RenderNode,
    RenderPort,
};
use super::layout::{LayoutOptions, PlacedNode, arrange, render_width};
use super::palette::{edge_color, node_color};
use crate::error::ParseError;
use ahash::AHashSet;
use log::{debug, trace};

/// Turns workflow documents into layout-ready graphs.
///
/// A `Normalizer` is configured once through [`Normalizer::builder`] and can
/// then be reused for any number of documents. Normalization is a pure
/// function of the input: the same document always yields the same graph.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    layout: LayoutOptions,
    policy: NodePolicy,
}

#[derive(Debug, Clone, Default)]
pub struct NormalizerBuilder {
    layout: LayoutOptions,
    policy: NodePolicy,
}

impl NormalizerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_node_policy(mut self, policy: NodePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Shorthand for `with_node_policy(NodePolicy::Lenient)`.
    pub fn lenient(self) -> Self {
        self.with_node_policy(NodePolicy::Lenient)
    }

    pub fn build(self) -> Normalizer {
        Normalizer {
            layout: self.layout,
            policy: self.policy,
        }
    }
}

impl Normalizer {
    pub fn builder() -> NormalizerBuilder {
        NormalizerBuilder::new()
    }

    pub fn layout(&self) -> &LayoutOptions {
        &self.layout
    }

    pub fn node_policy(&self) -> NodePolicy {
        self.policy
    }

    /// Parses and normalizes a workflow given as text, a JSON value, or a
    /// pre-parsed document.
    ///
    /// Returns `Err` only when the document as a whole is unusable; callers
    /// should render a fallback message in that case.
    pub fn normalize<W: IntoWorkflow>(&self, input: W) -> Result<NormalizedGraph, ParseError> {
        let document = input.into_workflow(self.policy)?;
        Ok(self.normalize_document(&document))
    }

    /// Normalizes an already parsed document. Never fails.
    pub fn normalize_document(&self, document: &WorkflowDocument) -> NormalizedGraph {
        let layout = arrange(&document.nodes, &self.layout);
        let render_nodes: Vec<RenderNode> = layout
            .placed
            .iter()
            .map(|placed| self.render_node(placed))
            .collect();

        let present: AHashSet<i64> = render_nodes.iter().map(|n| n.id).collect();
        let mut warnings = document.warnings.clone();
        let mut render_edges = Vec::with_capacity(document.links.len());
        for link in &document.links {
            let missing = [link.source_id, link.target_id]
                .into_iter()
                .find(|id| !present.contains(id));
            match missing {
                None => render_edges.push(RenderEdge::from(link)),
                Some(missing_node_id) => {
                    trace!(
                        "Dropping link {}: node {} is not in the graph",
                        link.id, missing_node_id
                    );
                    warnings.push(GraphWarning::DanglingLink {
                        link_id: link.id,
                        missing_node_id,
                    });
                }
            }
        }

        debug!(
            "Normalized workflow: {} render nodes, {} of {} links kept, {} groups",
            render_nodes.len(),
            render_edges.len(),
            document.link_count,
            layout.group_count
        );

        let summary = GraphSummary {
            node_count: document.node_count,
            link_count: document.link_count,
            edge_count: render_edges.len(),
            group_count: layout.group_count,
            declustered: layout.declustered,
            warnings,
        };

        NormalizedGraph {
            render_nodes,
            render_edges,
            summary,
        }
    }

    fn render_node(&self, placed: &PlacedNode<'_>) -> RenderNode {
        let node = placed.node;
        let size = NodeSize {
            width: render_width(node, &self.layout),
            height: node.size.map(|s| s.y),
        };
        RenderNode {
            id: node.id,
            node_type: node.node_type.clone(),
            position: placed.position,
            size,
            group: placed.group,
            color: node_color(&node.node_type),
            port_data: PortData {
                inputs: node.inputs.iter().map(render_port).collect(),
                outputs: node.outputs.iter().map(render_port).collect(),
                widget_values: node.widget_values.clone(),
                properties: node.properties.clone(),
            },
        }
    }
}

fn render_port(port: &PortSpec) -> RenderPort {
    RenderPort {
        name: port.name.clone(),
        data_type: port.data_type.clone(),
        color: edge_color(&port.data_type),
        links: port.links.clone(),
    }
}

/// Normalizes a workflow with the default layout and strict node handling.
pub fn normalize_workflow<W: IntoWorkflow>(input: W) -> Result<NormalizedGraph, ParseError> {
    Normalizer::default().normalize(input)
}
