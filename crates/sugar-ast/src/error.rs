//! Error types for document decoding.

/// Error reading or writing a document or its metadata.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CodecError {
    /// Malformed JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Well-formed JSON that does not have the shape of a pandoc AST.
    #[error("invalid {context}: {message}")]
    Shape {
        /// Element being decoded (e.g. "Div", "Attr").
        context: String,
        /// What was wrong with it.
        message: String,
    },
}

impl CodecError {
    pub(crate) fn shape(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Shape {
            context: context.into(),
            message: message.into(),
        }
    }
}
