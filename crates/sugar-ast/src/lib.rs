//! Document tree model for sugar rewrite rules.
//!
//! Provides the [`Node`] tree the rules operate on, the per-document
//! [`Metadata`] map, the [`TargetFormat`] being produced, plain-text
//! flattening via [`stringify`], and a codec for pandoc's JSON AST so
//! documents can be exchanged with a host pipeline.
//!
//! # Example
//!
//! ```
//! use sugar_ast::{Attr, Node, stringify};
//!
//! let attr = Attr {
//!     identifier: "l".to_owned(),
//!     ..Attr::with_class("wiki")
//! };
//! let span = Node::span(attr, Node::text("Arabidopsis thaliana"));
//! assert_eq!(stringify(&span), "Arabidopsis thaliana");
//! ```

mod attr;
mod document;
mod error;
mod format;
mod meta;
mod node;
pub mod pandoc;
mod text;

pub use attr::Attr;
pub use document::Document;
pub use error::CodecError;
pub use format::{RAW_TEX, TargetFormat};
pub use meta::{Metadata, json_type_name};
pub use node::{Node, NodeKind};
pub use text::{stringify, stringify_all};
