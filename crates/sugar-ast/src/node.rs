//! Document tree nodes.

use serde_json::Value;

use crate::Attr;

/// Variant tag of a [`Node`], with the per-variant payload.
///
/// Container variants keep their content in [`Node::children`]; leaf
/// variants carry their text here.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    // Blocks
    Para,
    Plain,
    Header {
        level: u32,
    },
    Div,
    BlockQuote,
    HorizontalRule,
    CodeBlock {
        text: String,
    },
    RawBlock {
        format: String,
        text: String,
    },
    BulletList,
    /// Ordered list; `attributes` is pandoc's `ListAttributes` triple.
    OrderedList {
        attributes: Value,
    },
    /// One item of a bullet or ordered list, holding blocks.
    ListItem,

    // Inlines
    Str {
        text: String,
    },
    Space,
    SoftBreak,
    LineBreak,
    Emph,
    Strong,
    Underline,
    Strikeout,
    Superscript,
    Subscript,
    SmallCaps,
    /// `quote` is `SingleQuote` or `DoubleQuote`.
    Quoted {
        quote: String,
    },
    Code {
        text: String,
    },
    /// `math` is `InlineMath` or `DisplayMath`.
    Math {
        math: String,
        text: String,
    },
    RawInline {
        format: String,
        text: String,
    },
    Link {
        target: String,
        title: String,
    },
    Image {
        target: String,
        title: String,
    },
    /// Footnote, holding blocks.
    Note,
    Span,

    /// Element whose content lists sit at fixed positions inside a larger
    /// payload (`Table`, `Figure`, `DefinitionList`, `LineBlock`, `Cite`).
    /// `layout` is the payload with every content list emptied; the lists
    /// themselves are the [`NodeKind::Slot`] children, in payload order.
    Compound {
        tag: String,
        layout: Value,
    },
    /// One content list of a [`NodeKind::Compound`], holding blocks or inlines.
    Slot,

    /// Unknown constructor, kept verbatim and never traversed.
    Opaque {
        value: Value,
    },
}

impl NodeKind {
    /// Check whether this variant is block-level.
    #[must_use]
    pub fn is_block(&self) -> bool {
        if let Self::Compound { tag, .. } = self {
            return tag != "Cite";
        }
        matches!(
            self,
            Self::Para
                | Self::Plain
                | Self::Header { .. }
                | Self::Div
                | Self::BlockQuote
                | Self::HorizontalRule
                | Self::CodeBlock { .. }
                | Self::RawBlock { .. }
                | Self::BulletList
                | Self::OrderedList { .. }
                | Self::ListItem
        )
    }

    /// Short name of the variant, as used by pandoc's `t` tag.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Para => "Para",
            Self::Plain => "Plain",
            Self::Header { .. } => "Header",
            Self::Div => "Div",
            Self::BlockQuote => "BlockQuote",
            Self::HorizontalRule => "HorizontalRule",
            Self::CodeBlock { .. } => "CodeBlock",
            Self::RawBlock { .. } => "RawBlock",
            Self::BulletList => "BulletList",
            Self::OrderedList { .. } => "OrderedList",
            Self::ListItem => "ListItem",
            Self::Str { .. } => "Str",
            Self::Space => "Space",
            Self::SoftBreak => "SoftBreak",
            Self::LineBreak => "LineBreak",
            Self::Emph => "Emph",
            Self::Strong => "Strong",
            Self::Underline => "Underline",
            Self::Strikeout => "Strikeout",
            Self::Superscript => "Superscript",
            Self::Subscript => "Subscript",
            Self::SmallCaps => "SmallCaps",
            Self::Quoted { .. } => "Quoted",
            Self::Code { .. } => "Code",
            Self::Math { .. } => "Math",
            Self::RawInline { .. } => "RawInline",
            Self::Link { .. } => "Link",
            Self::Image { .. } => "Image",
            Self::Note => "Note",
            Self::Span => "Span",
            Self::Compound { tag, .. } => tag,
            Self::Slot => "Slot",
            Self::Opaque { value } => value.get("t").and_then(Value::as_str).unwrap_or("Opaque"),
        }
    }
}

/// One element of the document tree.
///
/// Children order is significant. A node created by a rewrite is owned by
/// exactly one position in the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Variant tag and payload.
    pub kind: NodeKind,
    /// Identifier, classes and attributes. Empty for variants without `Attr`.
    pub attr: Attr,
    /// Ordered child nodes.
    pub children: Vec<Node>,
}

impl Node {
    /// Create a node without attributes.
    #[must_use]
    pub fn new(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            kind,
            attr: Attr::default(),
            children,
        }
    }

    /// Create a node with attributes.
    #[must_use]
    pub fn with_attr(kind: NodeKind, attr: Attr, children: Vec<Node>) -> Self {
        Self {
            kind,
            attr,
            children,
        }
    }

    /// Paragraph of inlines.
    #[must_use]
    pub fn para(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Para, children)
    }

    /// Plain block (paragraph without trailing blank line).
    #[must_use]
    pub fn plain(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Plain, children)
    }

    /// Generic block container.
    #[must_use]
    pub fn div(attr: Attr, children: Vec<Node>) -> Self {
        Self::with_attr(NodeKind::Div, attr, children)
    }

    /// Generic inline container.
    #[must_use]
    pub fn span(attr: Attr, children: Vec<Node>) -> Self {
        Self::with_attr(NodeKind::Span, attr, children)
    }

    /// Horizontal rule (`* * *` or `---`).
    #[must_use]
    pub fn rule() -> Self {
        Self::new(NodeKind::HorizontalRule, Vec::new())
    }

    /// Single text run. May contain spaces.
    #[must_use]
    pub fn str(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Str { text: text.into() }, Vec::new())
    }

    /// Split `text` into `Str` words separated by `Space` nodes, the way
    /// a markdown reader tokenizes a line.
    #[must_use]
    pub fn text(text: &str) -> Vec<Self> {
        let mut nodes = Vec::new();
        for word in text.split_whitespace() {
            if !nodes.is_empty() {
                nodes.push(Self::new(NodeKind::Space, Vec::new()));
            }
            nodes.push(Self::str(word));
        }
        nodes
    }

    /// Raw block in the given output format.
    #[must_use]
    pub fn raw_block(format: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(
            NodeKind::RawBlock {
                format: format.into(),
                text: text.into(),
            },
            Vec::new(),
        )
    }

    /// Raw inline in the given output format.
    #[must_use]
    pub fn raw_inline(format: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(
            NodeKind::RawInline {
                format: format.into(),
                text: text.into(),
            },
            Vec::new(),
        )
    }

    /// Hyperlink with the given destination and inline content.
    #[must_use]
    pub fn link(attr: Attr, target: impl Into<String>, children: Vec<Node>) -> Self {
        Self::with_attr(
            NodeKind::Link {
                target: target.into(),
                title: String::new(),
            },
            attr,
            children,
        )
    }

    /// Check whether this node is a paragraph.
    #[must_use]
    pub fn is_para(&self) -> bool {
        matches!(self.kind, NodeKind::Para)
    }

    /// Check whether this node is a div.
    #[must_use]
    pub fn is_div(&self) -> bool {
        matches!(self.kind, NodeKind::Div)
    }

    /// Check whether this node is a span.
    #[must_use]
    pub fn is_span(&self) -> bool {
        matches!(self.kind, NodeKind::Span)
    }

    /// Check whether this node is a horizontal rule.
    #[must_use]
    pub fn is_rule(&self) -> bool {
        matches!(self.kind, NodeKind::HorizontalRule)
    }

    /// Find the first descendant (pre-order, excluding `self`) matching `pred`.
    pub fn find_descendant_mut<F>(&mut self, pred: &F) -> Option<&mut Node>
    where
        F: Fn(&Node) -> bool,
    {
        for child in &mut self.children {
            if pred(child) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant_mut(pred) {
                return Some(found);
            }
        }
        None
    }
}
