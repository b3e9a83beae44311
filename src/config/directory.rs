use ahash::AHashMap;
use serde_json::Value;

/// One entry of an external custom-node manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Repository URL as written in the manifest.
    pub url: String,
    /// Latest known commit, if the manifest has one.
    pub hash: Option<String>,
    pub title: Option<String>,
}

/// A lookup of known custom nodes by repository URL.
///
/// The caller fetches the manifest; this type only indexes it. URLs are
/// compared without a trailing `/` or `.git`, so
/// `https://github.com/a/b.git` and `https://github.com/a/b/` match.
#[derive(Debug, Clone, Default)]
pub struct NodeDirectory {
    entries: AHashMap<String, DirectoryEntry>,
}

impl NodeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes a manifest given as `{"custom_nodes": [..]}`, a bare array of
    /// entries, or an object of entries keyed by name or URL.
    ///
    /// An entry's URL is its `repository`, else its `reference`, else (object
    /// form only) its key. Entries with no URL are ignored.
    pub fn from_manifest(manifest: &Value) -> Self {
        let mut directory = Self::new();
        match manifest.get("custom_nodes").unwrap_or(manifest) {
            Value::Array(items) => {
                for item in items {
                    if let Some(entry) = entry_from_value(item, None) {
                        directory.insert(entry);
                    }
                }
            }
            Value::Object(map) => {
                for (key, item) in map {
                    if let Some(entry) = entry_from_value(item, Some(key)) {
                        directory.insert(entry);
                    }
                }
            }
            _ => {}
        }
        directory
    }

    /// Parses manifest text; `None` if it is not JSON, which callers treat
    /// as "directory unavailable".
    pub fn from_json(text: &str) -> Option<Self> {
        serde_json::from_str::<Value>(text)
            .ok()
            .map(|manifest| Self::from_manifest(&manifest))
    }

    /// Adds an entry. A later entry for the same repository replaces an
    /// earlier one.
    pub fn insert(&mut self, entry: DirectoryEntry) {
        self.entries.insert(normalize_url(&entry.url).to_string(), entry);
    }

    pub fn lookup(&self, url: &str) -> Option<&DirectoryEntry> {
        self.entries.get(normalize_url(url))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn entry_from_value(item: &Value, key: Option<&String>) -> Option<DirectoryEntry> {
    let text = |field: &str| item.get(field).and_then(Value::as_str).map(str::to_string);
    let url = text("repository")
        .or_else(|| text("reference"))
        .or_else(|| key.cloned())
        .filter(|url| !url.is_empty())?;
    Some(DirectoryEntry {
        url,
        hash: text("hash").filter(|h| !h.is_empty()),
        title: text("title"),
    })
}

fn normalize_url(url: &str) -> &str {
    let url = url.trim().trim_end_matches('/');
    url.strip_suffix(".git").unwrap_or(url)
}
