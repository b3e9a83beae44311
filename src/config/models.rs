use log::{debug, warn};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;
use url::Url;

pub const DEFAULT_MODEL_TYPE: &str = "checkpoints";
pub const DEFAULT_SAVE_PATH: &str = "default";

static BRACKETED: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?s)\[.*\]").ok());
static HTTP_LINK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s"']+"#).ok());

/// Weight-file extensions recognised in model download links.
pub const MODEL_FILE_EXTENSIONS: [&str; 5] = [".safetensors", ".ckpt", ".pt", ".pth", ".bin"];

/// One model to download onto a machine, in its export shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub model_type: String,
    pub base: String,
    pub save_path: String,
    pub description: String,
    pub reference: String,
    pub filename: String,
    pub url: String,
}

pub type ModelList = Vec<ModelEntry>;

impl Default for ModelEntry {
    fn default() -> Self {
        Self {
            name: String::new(),
            model_type: DEFAULT_MODEL_TYPE.to_string(),
            base: String::new(),
            save_path: DEFAULT_SAVE_PATH.to_string(),
            description: String::new(),
            reference: String::new(),
            filename: String::new(),
            url: String::new(),
        }
    }
}

impl ModelEntry {
    /// Builds an entry from any JSON value, substituting the default for
    /// every field that is absent, empty where that matters, or not a string.
    pub fn with_defaults(value: &Value) -> Self {
        let field = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        let non_empty = |key: &str, default: &str| {
            field(key)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            name: field("name").unwrap_or_default(),
            model_type: non_empty("type", DEFAULT_MODEL_TYPE),
            base: field("base").unwrap_or_default(),
            save_path: non_empty("save_path", DEFAULT_SAVE_PATH),
            description: field("description").unwrap_or_default(),
            reference: field("reference").unwrap_or_default(),
            filename: field("filename").unwrap_or_default(),
            url: field("url").unwrap_or_default(),
        }
    }
}

impl From<&Value> for ModelEntry {
    fn from(value: &Value) -> Self {
        Self::with_defaults(value)
    }
}

/// Canonicalizes every element of a model list fragment independently.
/// Anything other than an array reads as an empty list.
pub fn reconcile_model_list(value: &Value) -> ModelList {
    value
        .as_array()
        .map(|items| items.iter().map(ModelEntry::with_defaults).collect())
        .unwrap_or_default()
}

/// Whether a chat message is just a direct link to a weights file.
pub fn looks_like_model_url(text: &str) -> bool {
    let text = text.trim();
    text.starts_with("http") && MODEL_FILE_EXTENSIONS.iter().any(|ext| text.contains(ext))
}

/// Guesses a [`ModelEntry`] from a direct download link such as
/// `https://huggingface.co/<org>/<repo>/resolve/main/<file>.safetensors`.
///
/// Type and base are inferred from keywords in the URL. A link that cannot
/// be parsed yields a placeholder entry that still carries the URL.
pub fn model_from_url(link: &str) -> ModelEntry {
    let parsed = match Url::parse(link) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Could not parse model URL '{}': {}", link, e);
            return ModelEntry {
                name: "Unknown Model".to_string(),
                base: "SD1.5".to_string(),
                description: format!("Model from {}", link),
                filename: "model.safetensors".to_string(),
                url: link.to_string(),
                ..ModelEntry::default()
            };
        }
    };

    let filename = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default()
        .to_string();
    let name = if filename.is_empty() {
        "Unknown Model".to_string()
    } else {
        MODEL_FILE_EXTENSIONS
            .iter()
            .find_map(|ext| filename.strip_suffix(ext))
            .unwrap_or(&filename)
            .to_string()
    };

    let lower = link.to_lowercase();
    let model_type = ["lora", "vae", "embedding", "controlnet", "upscaler"]
        .into_iter()
        .find(|keyword| lower.contains(keyword))
        .unwrap_or(DEFAULT_MODEL_TYPE);
    let (base, description) = if ["sd-xl", "sdxl", "xl-base"].iter().any(|k| lower.contains(k)) {
        ("SDXL", "Stable Diffusion XL model")
    } else if ["sd15", "sd-1.5", "v1-5"].iter().any(|k| lower.contains(k)) {
        ("SD1.5", "Stable Diffusion 1.5 model")
    } else if ["sd2", "sd-2"].iter().any(|k| lower.contains(k)) {
        ("SD2.0", "Stable Diffusion 2.0 model")
    } else {
        ("SD1.5", "")
    };

    ModelEntry {
        name,
        model_type: model_type.to_string(),
        base: base.to_string(),
        save_path: DEFAULT_SAVE_PATH.to_string(),
        description: description.to_string(),
        reference: link.split("/resolve/").next().unwrap_or_default().to_string(),
        filename,
        url: link.to_string(),
    }
}

/// Pulls a model list out of an assistant reply.
///
/// The widest bracketed span (first `[` to last `]`) is tried as a JSON
/// array first; it counts only if its first element has a `url`. Failing
/// that, every http(s) link in the text becomes a checkpoint entry named
/// after its last path segment. `None` if neither yields anything.
pub fn extract_model_data(text: &str) -> Option<ModelList> {
    if let Some(models) = bracketed_model_list(text) {
        return Some(models);
    }

    let links = HTTP_LINK.as_ref()?;
    let models: ModelList = links
        .find_iter(text)
        .map(|link| link_entry(link.as_str()))
        .collect();
    (!models.is_empty()).then_some(models)
}

fn bracketed_model_list(text: &str) -> Option<ModelList> {
    let span = BRACKETED.as_ref()?.find(text)?;
    let value = match serde_json::from_str::<Value>(span.as_str()) {
        Ok(value) => value,
        Err(e) => {
            debug!("Bracketed text is not a JSON model list: {}", e);
            return None;
        }
    };
    let has_url = value
        .as_array()?
        .first()
        .is_some_and(|first| first.get("url").is_some());
    has_url.then(|| reconcile_model_list(&value))
}

fn link_entry(link: &str) -> ModelEntry {
    let segment = link.rsplit('/').next().filter(|s| !s.is_empty());
    ModelEntry {
        name: segment.unwrap_or("model").to_string(),
        filename: segment.unwrap_or("model.safetensors").to_string(),
        url: link.to_string(),
        ..ModelEntry::default()
    }
}
