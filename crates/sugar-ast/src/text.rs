//! Plain-text flattening of nodes.

use crate::{Node, NodeKind};

/// Flatten a node's content to plain text.
///
/// Text runs, code and math contribute their text. Spaces, soft breaks and
/// hard line breaks all become a single space. Raw markup and opaque nodes
/// contribute nothing. Sibling blocks are separated by a blank line, the
/// content lists of a table or definition list by a space.
///
/// # Example
///
/// ```
/// use sugar_ast::{Node, stringify};
///
/// let para = Node::para(Node::text("NOTE: hello world"));
/// assert_eq!(stringify(&para), "NOTE: hello world");
/// ```
#[must_use]
pub fn stringify(node: &Node) -> String {
    let mut out = String::new();
    push_node(&mut out, node);
    out
}

/// Flatten a sequence of sibling nodes to plain text.
#[must_use]
pub fn stringify_all(nodes: &[Node]) -> String {
    let mut out = String::new();
    push_children(&mut out, nodes);
    out
}

fn push_node(out: &mut String, node: &Node) {
    match &node.kind {
        NodeKind::Str { text } | NodeKind::Code { text } | NodeKind::Math { text, .. } => {
            out.push_str(text);
        }
        NodeKind::Space | NodeKind::SoftBreak | NodeKind::LineBreak => out.push(' '),
        NodeKind::Quoted { quote } => {
            let (open, close) = if quote == "SingleQuote" {
                ('\u{2018}', '\u{2019}')
            } else {
                ('\u{201C}', '\u{201D}')
            };
            out.push(open);
            push_children(out, &node.children);
            out.push(close);
        }
        NodeKind::RawBlock { .. }
        | NodeKind::RawInline { .. }
        | NodeKind::HorizontalRule
        | NodeKind::Opaque { .. } => {}
        NodeKind::CodeBlock { text } => out.push_str(text),
        NodeKind::Compound { .. } => {
            let texts = node.children.iter().map(stringify).filter(|t| !t.is_empty());
            for (i, text) in texts.enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                out.push_str(&text);
            }
        }
        _ => push_children(out, &node.children),
    }
}

fn push_children(out: &mut String, children: &[Node]) {
    let mut previous_block = false;
    for child in children {
        let is_block = child.kind.is_block();
        if is_block && previous_block {
            out.push_str("\n\n");
        }
        push_node(out, child);
        previous_block = is_block;
    }
}
