use thiserror::Error;

/// Errors that make a workflow document unusable as a whole.
///
/// Everything short of these (dangling links, malformed link tuples, skipped
/// nodes in lenient mode) is recovered and reported as a
/// [`GraphWarning`](crate::workflow::GraphWarning) instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Invalid workflow JSON: {0}")]
    InvalidJson(String),

    #[error("Invalid workflow JSON: the document is not a JSON object")]
    NotAnObject,

    #[error("Invalid workflow JSON: missing or non-array '{field}' field")]
    MissingArray { field: &'static str },

    #[error("Invalid workflow JSON: node at index {index} is malformed: {reason}")]
    MalformedNode { index: usize, reason: String },
}

/// Errors that can occur while rendering a canonical object for download.
#[derive(Error, Debug, Clone)]
pub enum ExportError {
    #[error("Failed to serialize export data: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::Serialize(e.to_string())
    }
}
