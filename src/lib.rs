//! # ComfyScope - Workflow Normalization and Config Reconciliation
//!
//! **ComfyScope** is the data core behind a ComfyUI deployment assistant. It
//! takes the loosely shaped JSON that users paste into a chat, upload, or edit
//! in forms, and turns it into data the rest of the application can trust.
//!
//! ## Core Workflow
//!
//! 1.  **Classify**: `classify_fragment` decides whether a piece of text is a
//!     workflow graph, a config bundle, a machine config, a model list, or
//!     plain text.
//! 2.  **Normalize workflows**: the `Normalizer` parses a workflow document,
//!     splits pathologically spread-out layouts into separate groups, and drops
//!     links whose endpoints do not exist. The result is ready to render.
//! 3.  **Reconcile configs**: the `Reconciler` folds machine-config and
//!     model-list fragments into one canonical object each, pins the required
//!     baseline custom node, and can fill missing commit hashes from a node
//!     directory the caller fetched.
//! 4.  **Export**: `export_json` renders canonical objects for download.
//!
//! Everything is synchronous and pure. The only failure signals are
//! `ParseError` for unusable workflow documents and `ExportError` for
//! serialization; every other problem is recovered and logged through the
//! `log` facade.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use comfyscope::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let text = std::fs::read_to_string("workflow.json")?;
//!
//!     match classify_fragment(&text) {
//!         Fragment::WorkflowGraph(value) => {
//!             let normalizer = Normalizer::builder().lenient().build();
//!             let graph = normalizer.normalize(&value)?;
//!             println!("{}", graph.summary);
//!             for warning in &graph.summary.warnings {
//!                 println!("  warning: {}", warning);
//!             }
//!         }
//!         Fragment::ConfigBundle { machine_config, models } => {
//!             if let Some(value) = machine_config {
//!                 println!("{}", export_json(&reconcile_machine_config(&value))?);
//!             }
//!             if let Some(items) = models {
//!                 println!("{}", export_json(&reconcile_model_list(&Value::Array(items)))?);
//!             }
//!         }
//!         Fragment::MachineConfig(value) => {
//!             let config = reconcile_machine_config(&value);
//!             println!("{}", export_json(&config)?);
//!         }
//!         Fragment::ModelList(items) => {
//!             let models = reconcile_model_list(&Value::Array(items));
//!             println!("{}", export_json(&models)?);
//!         }
//!         Fragment::PlainText(_) => println!("Nothing structured found."),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod prelude;
pub mod workflow;
