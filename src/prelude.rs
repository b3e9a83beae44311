//! Prelude module for convenient imports
//!
//! Re-exports the types and functions most callers need. Import this module to
//! classify, normalize and reconcile without importing each item separately.
//!
//! # Example
//!
//! ```rust,no_run
//! use comfyscope::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let workflow = std::fs::read_to_string("path/to/workflow.json")?;
//! let graph = normalize_workflow(&workflow)?;
//! println!("{} ({} groups)", graph.summary, graph.summary.group_count);
//!
//! let config = reconcile_machine_config(&serde_json::json!({
//!     "git_custom_nodes": ["https://github.com/ltdrdata/ComfyUI-Impact-Pack"]
//! }));
//! println!("{}", export_json(&config)?);
//! # Ok(())
//! # }
//! ```

// Classification
pub use crate::classify::{Fragment, FragmentKind, classify_fragment};

// Graph normalization
pub use crate::workflow::{
    GraphSummary, GraphWarning, IntoWorkflow, LayoutOptions, NodePolicy, NormalizedGraph,
    Normalizer, RenderEdge, RenderNode, WorkflowDocument, normalize_workflow,
};

// Config reconciliation
pub use crate::config::{
    MachineConfig, ModelEntry, ModelList, NodeDirectory, PartialMachineConfig, Reconciler,
    VersionPolicy, cross_reference_custom_nodes, export_json, extract_model_data,
    reconcile_machine_config, reconcile_machine_configs, reconcile_model_list,
};

// Error types
pub use crate::error::{ExportError, ParseError};

pub use serde_json::Value;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
