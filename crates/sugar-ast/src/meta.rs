//! Document-level metadata.

use serde_json::{Map, Value};

use crate::CodecError;
use crate::pandoc::{decode_blocks, decode_inlines};
use crate::text::stringify_all;

/// Metadata map scoped to a whole document.
///
/// Values are plain JSON: pandoc `MetaValue`s are unwrapped on load so
/// `MetaInlines` become strings and `MetaBool` becomes a boolean, matching
/// what an author wrote in the YAML front matter.
///
/// # Example
///
/// ```
/// use sugar_ast::Metadata;
///
/// let meta = Metadata::from_yaml("adoc-admonition:\n  TIP: tipbox\n").unwrap();
/// assert_eq!(meta.get("adoc-admonition").unwrap()["TIP"], "tipbox");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    entries: Map<String, Value>,
}

impl Metadata {
    /// Create empty metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse metadata from a YAML mapping. Empty input yields empty metadata.
    pub fn from_yaml(content: &str) -> Result<Self, CodecError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_yaml::from_str(trimmed)?;
        Self::from_value(value)
    }

    /// Build metadata from a JSON object.
    pub fn from_value(value: Value) -> Result<Self, CodecError> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            Value::Null => Ok(Self::default()),
            other => Err(CodecError::shape(
                "metadata",
                format!("expected a mapping, found {}", json_type_name(&other)),
            )),
        }
    }

    /// Build metadata from pandoc's `meta` object of `MetaValue`s.
    pub fn from_pandoc(meta: &Value) -> Result<Self, CodecError> {
        let Some(object) = meta.as_object() else {
            return Err(CodecError::shape("meta", "expected an object"));
        };

        let mut entries = Map::new();
        for (key, value) in object {
            entries.insert(key.clone(), unwrap_meta_value(value)?);
        }
        Ok(Self { entries })
    }

    /// Look up a top-level key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Look up a top-level key, falling back to `default` when absent.
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.entries.get(key).unwrap_or(default)
    }

    /// Set a top-level key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    /// Replace top-level keys with those from `other`.
    pub fn overlay(&mut self, other: Metadata) {
        self.entries.extend(other.entries);
    }

    /// Check whether the metadata has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Unwrap a pandoc `MetaValue` (`{"t": ..., "c": ...}`) to plain JSON.
fn unwrap_meta_value(value: &Value) -> Result<Value, CodecError> {
    let tag = value.get("t").and_then(Value::as_str).unwrap_or_default();
    let content = value.get("c").unwrap_or(&Value::Null);

    Ok(match tag {
        "MetaMap" => {
            let Some(object) = content.as_object() else {
                return Err(CodecError::shape("MetaMap", "expected an object"));
            };
            let mut map = Map::new();
            for (key, item) in object {
                map.insert(key.clone(), unwrap_meta_value(item)?);
            }
            Value::Object(map)
        }
        "MetaList" => {
            let Some(items) = content.as_array() else {
                return Err(CodecError::shape("MetaList", "expected an array"));
            };
            Value::Array(
                items
                    .iter()
                    .map(unwrap_meta_value)
                    .collect::<Result<_, _>>()?,
            )
        }
        "MetaBool" => Value::Bool(content.as_bool().unwrap_or_default()),
        "MetaString" => Value::String(content.as_str().unwrap_or_default().to_owned()),
        "MetaInlines" => Value::String(stringify_all(&decode_inlines(content)?)),
        "MetaBlocks" => Value::String(stringify_all(&decode_blocks(content)?)),
        other => {
            return Err(CodecError::shape(
                "MetaValue",
                format!("unknown constructor `{other}`"),
            ));
        }
    })
}

/// Human-readable JSON type name for error messages.
#[must_use]
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
