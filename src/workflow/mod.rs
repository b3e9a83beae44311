//! Graph normalization for ComfyUI workflow documents.
//!
//! A workflow document is a list of nodes (with positions, sizes and slots)
//! and a list of link tuples. The normalizer parses it, splits pathologically
//! spread-out layouts into separate spatial groups, re-homes each group next
//! to the others, and keeps only the links whose endpoints both exist.

mod document;
mod graph;
mod layout;
mod normalizer;
pub mod palette;

pub use document::{
    IntoWorkflow, LinkSpec, NodePolicy, NodeSpec, PortSpec, Vec2, WorkflowDocument,
};
pub use graph::{
    GraphSummary, GraphWarning, NodeSize, NormalizedGraph, PortData, RenderEdge, RenderNode,
    RenderPort,
};
pub use layout::{
    DEFAULT_CELL_SIZE, DEFAULT_GROUP_MARGIN, DEFAULT_GROUP_STEP_X, DEFAULT_GROUP_STEP_Y,
    DEFAULT_MIN_NODE_WIDTH, DEFAULT_ROW_WRAP_X, DEFAULT_SPREAD_THRESHOLD, LayoutOptions,
};
pub use normalizer::{Normalizer, NormalizerBuilder, normalize_workflow};
