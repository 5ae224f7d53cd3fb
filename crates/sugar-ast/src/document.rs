//! Whole documents in pandoc's JSON interchange format.

use std::io::{Read, Write};

use serde_json::{Map, Value, json};

use crate::pandoc::{decode_blocks, encode_nodes};
use crate::{CodecError, Metadata, Node};

/// API version written when a document did not carry one.
const DEFAULT_API_VERSION: [u32; 3] = [1, 23, 1];

/// A parsed document: metadata plus a sequence of top-level blocks.
///
/// The raw pandoc `meta` object and API version are kept so they are
/// written back unchanged; rules read the unwrapped [`Metadata`].
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    /// Unwrapped metadata used for rule configuration.
    pub meta: Metadata,
    /// Top-level blocks.
    pub blocks: Vec<Node>,
    api_version: Value,
    raw_meta: Value,
}

impl Document {
    /// Create a document from metadata and blocks.
    #[must_use]
    pub fn new(meta: Metadata, blocks: Vec<Node>) -> Self {
        Self {
            meta,
            blocks,
            api_version: json!(DEFAULT_API_VERSION),
            raw_meta: Value::Object(Map::new()),
        }
    }

    /// Parse a pandoc JSON document.
    pub fn from_json(input: &str) -> Result<Self, CodecError> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(&value)
    }

    /// Read and parse a pandoc JSON document.
    pub fn from_reader(reader: impl Read) -> Result<Self, CodecError> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(&value)
    }

    /// Decode a document from its JSON value.
    pub fn from_value(value: &Value) -> Result<Self, CodecError> {
        let blocks = value
            .get("blocks")
            .ok_or_else(|| CodecError::shape("document", "missing `blocks`"))?;
        let raw_meta = value
            .get("meta")
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));

        Ok(Self {
            meta: Metadata::from_pandoc(&raw_meta)?,
            blocks: decode_blocks(blocks)?,
            api_version: value
                .get("pandoc-api-version")
                .cloned()
                .unwrap_or_else(|| json!(DEFAULT_API_VERSION)),
            raw_meta,
        })
    }

    /// Encode the document as a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!({
            "pandoc-api-version": self.api_version,
            "meta": self.raw_meta,
            "blocks": encode_nodes(&self.blocks),
        })
    }

    /// Encode the document as a JSON string.
    #[must_use]
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }

    /// Write the document as JSON.
    pub fn to_writer(&self, writer: impl Write) -> Result<(), CodecError> {
        serde_json::to_writer(writer, &self.to_value())?;
        Ok(())
    }
}
