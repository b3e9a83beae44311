use super::directory::NodeDirectory;
use super::machine::{
    BASELINE_NODE_URL, CustomNode, CustomNodes, CustomNodesInput, MachineConfig,
    PartialMachineConfig, REQUIRED_COMFYUI_VERSION,
};
use super::models::{self, ModelList};
use log::debug;
use serde_json::Value;

/// Which ComfyUI version ends up in the canonical config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionPolicy {
    /// Always [`REQUIRED_COMFYUI_VERSION`], whatever the fragment says.
    #[default]
    Pinned,
    /// Keep a non-empty version from the fragment.
    PreferInput,
}

/// Produces canonical machine configs and model lists from fragments.
///
/// All operations are total: malformed fields fall back to their defaults
/// and nothing here returns an error.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    version_policy: VersionPolicy,
}

#[derive(Debug, Clone, Default)]
pub struct ReconcilerBuilder {
    version_policy: VersionPolicy,
}

impl ReconcilerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version_policy(mut self, policy: VersionPolicy) -> Self {
        self.version_policy = policy;
        self
    }

    pub fn build(self) -> Reconciler {
        Reconciler {
            version_policy: self.version_policy,
        }
    }
}

impl Reconciler {
    pub fn builder() -> ReconcilerBuilder {
        ReconcilerBuilder::new()
    }

    pub fn version_policy(&self) -> VersionPolicy {
        self.version_policy
    }

    /// Builds the canonical [`MachineConfig`] for a fragment.
    ///
    /// The baseline custom node is always first and always carries its fixed
    /// hash; a caller entry for the same URL is replaced, not merged. Other
    /// entries follow in input order. Applying this to its own output gives
    /// the same output.
    pub fn machine_config<P: Into<PartialMachineConfig>>(&self, partial: P) -> MachineConfig {
        let partial = partial.into();

        let mut custom_nodes = CustomNodes::new();
        custom_nodes.insert(BASELINE_NODE_URL, CustomNode::baseline());

        let requested = partial
            .custom_nodes
            .map(CustomNodesInput::into_nodes)
            .unwrap_or_default();
        for (url, node) in requested {
            if url == BASELINE_NODE_URL {
                if node != CustomNode::baseline() {
                    debug!(
                        "Ignoring caller settings for baseline node {:?}; using the pinned entry",
                        node
                    );
                }
                continue;
            }
            custom_nodes.insert(url, node);
        }

        let comfyui_version = match (self.version_policy, partial.comfyui_version) {
            (VersionPolicy::PreferInput, Some(version)) if !version.is_empty() => version,
            _ => REQUIRED_COMFYUI_VERSION.to_string(),
        };

        MachineConfig {
            comfyui_version,
            custom_nodes_by_url: custom_nodes,
            file_custom_nodes: partial.file_custom_nodes,
        }
    }

    /// Folds several fragments, in order, into one canonical config.
    ///
    /// Later fragments win per field and per custom node URL (see
    /// [`PartialMachineConfig::merge`]). No fragments gives the baseline-only
    /// config.
    pub fn machine_config_from_fragments<I, P>(&self, fragments: I) -> MachineConfig
    where
        I: IntoIterator<Item = P>,
        P: Into<PartialMachineConfig>,
    {
        let merged = fragments
            .into_iter()
            .map(Into::into)
            .fold(PartialMachineConfig::default(), PartialMachineConfig::merge);
        self.machine_config(merged)
    }

    /// Canonicalizes a model list fragment element by element.
    pub fn model_list(&self, value: &Value) -> ModelList {
        models::reconcile_model_list(value)
    }

    /// Fills empty commit hashes from a node directory.
    ///
    /// Non-empty hashes are never touched. With no directory (the fetch
    /// failed or was skipped) the config comes back unchanged.
    pub fn cross_reference(
        &self,
        mut config: MachineConfig,
        directory: Option<&NodeDirectory>,
    ) -> MachineConfig {
        let Some(directory) = directory else {
            debug!("Node directory unavailable; custom node hashes left as-is");
            return config;
        };

        let mut filled = 0;
        for (url, node) in config.custom_nodes_by_url.iter_mut() {
            if node.has_hash() {
                continue;
            }
            if let Some(hash) = directory.lookup(url).and_then(|entry| entry.hash.as_ref()) {
                node.commit_hash = hash.clone();
                filled += 1;
            }
        }
        debug!("Filled {} custom node hashes from the directory", filled);
        config
    }
}

/// [`Reconciler::machine_config`] with the default (pinned) version policy.
pub fn reconcile_machine_config<P: Into<PartialMachineConfig>>(partial: P) -> MachineConfig {
    Reconciler::default().machine_config(partial)
}

/// [`Reconciler::machine_config_from_fragments`] with the default (pinned)
/// version policy.
pub fn reconcile_machine_configs<I, P>(fragments: I) -> MachineConfig
where
    I: IntoIterator<Item = P>,
    P: Into<PartialMachineConfig>,
{
    Reconciler::default().machine_config_from_fragments(fragments)
}

/// [`Reconciler::cross_reference`] with default settings.
pub fn cross_reference_custom_nodes(
    config: MachineConfig,
    directory: Option<&NodeDirectory>,
) -> MachineConfig {
    Reconciler::default().cross_reference(config, directory)
}
