//! Error types for rule configuration.

/// Malformed rule table in document metadata or project configuration.
///
/// Fatal for the whole conversion: it indicates an authoring mistake in the
/// tables rather than in a single node.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The table itself is not a mapping.
    #[error("`{table}` must be a mapping, found {found}")]
    MalformedTable {
        /// Table name (e.g. "super-links").
        table: String,
        /// JSON type actually found.
        found: &'static str,
    },

    /// A link entry that is neither a string nor a mapping.
    #[error("`{table}.{key}` must be a string or a mapping with a `target`, found {found}")]
    MalformedSpec {
        /// Table name.
        table: String,
        /// Entry key.
        key: String,
        /// JSON type actually found.
        found: &'static str,
    },

    /// A link mapping with missing or mistyped fields.
    #[error("`{table}.{key}`: {source}")]
    InvalidSpec {
        /// Table name.
        table: String,
        /// Entry key.
        key: String,
        /// Field-level deserialization error.
        source: serde_json::Error,
    },

    /// A class or environment entry that is not a string.
    #[error("`{table}.{key}` must be a string, found {found}")]
    MalformedClass {
        /// Table name.
        table: String,
        /// Entry key.
        key: String,
        /// JSON type actually found.
        found: &'static str,
    },
}

/// Attribute lookup failure. Local to one node; callers fall back.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AttributeError {
    /// Attribute absent or empty.
    #[error("missing required attribute `{0}`")]
    Missing(String),
}

/// Unrecognized rule name.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown rule `{0}` (expected one of: admonitions, links, columns, environments)")]
pub struct UnknownRuleError(pub String);
