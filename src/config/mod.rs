//! Canonical machine configurations and model lists.
//!
//! Fragments arrive from chat extraction, tool calls and form edits in
//! whatever shape the producer chose. The reconciler folds each into exactly
//! one canonical object with a fixed, user-facing JSON shape, ready for
//! export.

mod directory;
mod machine;
mod models;
mod reconciler;

pub use directory::{DirectoryEntry, NodeDirectory};
pub use machine::{
    BASELINE_NODE_HASH, BASELINE_NODE_URL, CustomNode, CustomNodes, CustomNodesInput,
    MachineConfig, PartialMachineConfig, REQUIRED_COMFYUI_VERSION,
};
pub use models::{
    DEFAULT_MODEL_TYPE, DEFAULT_SAVE_PATH, MODEL_FILE_EXTENSIONS, ModelEntry, ModelList,
    extract_model_data, looks_like_model_url, model_from_url, reconcile_model_list,
};
pub use reconciler::{
    Reconciler, ReconcilerBuilder, VersionPolicy, cross_reference_custom_nodes,
    reconcile_machine_config, reconcile_machine_configs,
};

use crate::error::ExportError;
use serde::Serialize;

/// Renders a canonical object as the pretty-printed JSON used for downloads.
pub fn export_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(value)?)
}
