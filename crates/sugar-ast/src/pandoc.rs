//! Pandoc JSON AST codec.
//!
//! Converts between pandoc's positional JSON encoding (`{"t": "Div", "c": [attr, blocks]}`)
//! and [`Node`] trees. Tables, figures, definition lists, line blocks and
//! citations decode to [`NodeKind::Compound`]: their content lists become
//! [`NodeKind::Slot`] children and everything else stays in the layout, so
//! they are rewritten like any other container and written back unchanged.
//! Unknown constructors decode to [`NodeKind::Opaque`].

use serde_json::{Value, json};

use crate::{Attr, CodecError, Node, NodeKind};

/// Decode a JSON array of pandoc blocks.
pub fn decode_blocks(value: &Value) -> Result<Vec<Node>, CodecError> {
    as_array(value, "blocks")?.iter().map(decode_block).collect()
}

/// Decode a JSON array of pandoc inlines.
pub fn decode_inlines(value: &Value) -> Result<Vec<Node>, CodecError> {
    as_array(value, "inlines")?.iter().map(decode_inline).collect()
}

/// Encode nodes back to a JSON array of pandoc elements.
#[must_use]
pub fn encode_nodes(nodes: &[Node]) -> Value {
    Value::Array(nodes.iter().map(encode_node).collect())
}

fn decode_block(value: &Value) -> Result<Node, CodecError> {
    let tag = tag_of(value)?;
    let content = value.get("c").unwrap_or(&Value::Null);

    let node = match tag {
        "Para" => Node::para(decode_inlines(content)?),
        "Plain" => Node::plain(decode_inlines(content)?),
        "Header" => {
            let [level, attr, inlines] = fields(content, tag)?;
            let level = level
                .as_u64()
                .and_then(|l| u32::try_from(l).ok())
                .ok_or_else(|| CodecError::shape(tag, "level must be a small integer"))?;
            Node::with_attr(
                NodeKind::Header { level },
                decode_attr(attr)?,
                decode_inlines(inlines)?,
            )
        }
        "Div" => {
            let [attr, blocks] = fields(content, tag)?;
            Node::div(decode_attr(attr)?, decode_blocks(blocks)?)
        }
        "BlockQuote" => Node::new(NodeKind::BlockQuote, decode_blocks(content)?),
        "HorizontalRule" => Node::rule(),
        "CodeBlock" => {
            let [attr, text] = fields(content, tag)?;
            Node::with_attr(
                NodeKind::CodeBlock {
                    text: as_string(text, tag)?,
                },
                decode_attr(attr)?,
                Vec::new(),
            )
        }
        "RawBlock" => {
            let [format, text] = fields(content, tag)?;
            Node::raw_block(as_string(format, tag)?, as_string(text, tag)?)
        }
        "BulletList" => Node::new(NodeKind::BulletList, decode_items(content)?),
        "OrderedList" => {
            let [attributes, items] = fields(content, tag)?;
            Node::new(
                NodeKind::OrderedList {
                    attributes: attributes.clone(),
                },
                decode_items(items)?,
            )
        }
        "Table" | "Figure" | "DefinitionList" | "LineBlock" => decode_compound(tag, content)?,
        _ => opaque(value),
    };

    Ok(node)
}

fn decode_items(value: &Value) -> Result<Vec<Node>, CodecError> {
    as_array(value, "list items")?
        .iter()
        .map(|item| -> Result<Node, CodecError> {
            Ok(Node::new(NodeKind::ListItem, decode_blocks(item)?))
        })
        .collect()
}

fn decode_inline(value: &Value) -> Result<Node, CodecError> {
    let tag = tag_of(value)?;
    let content = value.get("c").unwrap_or(&Value::Null);

    let container = |kind: NodeKind| -> Result<Node, CodecError> {
        Ok(Node::new(kind, decode_inlines(content)?))
    };

    let node = match tag {
        "Str" => Node::str(as_string(content, tag)?),
        "Space" => Node::new(NodeKind::Space, Vec::new()),
        "SoftBreak" => Node::new(NodeKind::SoftBreak, Vec::new()),
        "LineBreak" => Node::new(NodeKind::LineBreak, Vec::new()),
        "Emph" => container(NodeKind::Emph)?,
        "Strong" => container(NodeKind::Strong)?,
        "Underline" => container(NodeKind::Underline)?,
        "Strikeout" => container(NodeKind::Strikeout)?,
        "Superscript" => container(NodeKind::Superscript)?,
        "Subscript" => container(NodeKind::Subscript)?,
        "SmallCaps" => container(NodeKind::SmallCaps)?,
        "Quoted" => {
            let [quote, inlines] = fields(content, tag)?;
            Node::new(
                NodeKind::Quoted {
                    quote: tag_of(quote)?.to_owned(),
                },
                decode_inlines(inlines)?,
            )
        }
        "Code" => {
            let [attr, text] = fields(content, tag)?;
            Node::with_attr(
                NodeKind::Code {
                    text: as_string(text, tag)?,
                },
                decode_attr(attr)?,
                Vec::new(),
            )
        }
        "Math" => {
            let [math, text] = fields(content, tag)?;
            Node::new(
                NodeKind::Math {
                    math: tag_of(math)?.to_owned(),
                    text: as_string(text, tag)?,
                },
                Vec::new(),
            )
        }
        "RawInline" => {
            let [format, text] = fields(content, tag)?;
            Node::raw_inline(as_string(format, tag)?, as_string(text, tag)?)
        }
        "Link" | "Image" => {
            let [attr, inlines, target] = fields(content, tag)?;
            let [url, title] = fields(target, tag)?;
            let (target, title) = (as_string(url, tag)?, as_string(title, tag)?);
            let kind = if tag == "Link" {
                NodeKind::Link { target, title }
            } else {
                NodeKind::Image { target, title }
            };
            Node::with_attr(kind, decode_attr(attr)?, decode_inlines(inlines)?)
        }
        "Note" => Node::new(NodeKind::Note, decode_blocks(content)?),
        "Span" => {
            let [attr, inlines] = fields(content, tag)?;
            Node::span(decode_attr(attr)?, decode_inlines(inlines)?)
        }
        "Cite" => decode_compound(tag, content)?,
        _ => opaque(value),
    };

    Ok(node)
}

/// Move every content list of `content` into a slot, leaving an empty
/// array in its place.
fn decode_compound(tag: &str, content: &Value) -> Result<Node, CodecError> {
    let mut layout = content.clone();
    let mut slots = Vec::new();
    let mut error = None;

    for_each_slot(tag, &mut layout, &mut |slot: &mut Value, level: SlotLevel| {
        if error.is_some() {
            return;
        }
        let decoded = match level {
            SlotLevel::Blocks => decode_blocks(slot),
            SlotLevel::Inlines => decode_inlines(slot),
        };
        match decoded {
            Ok(children) => {
                slots.push(Node::new(NodeKind::Slot, children));
                *slot = Value::Array(Vec::new());
            }
            Err(err) => error = Some(err),
        }
    });

    if let Some(err) = error {
        return Err(err);
    }
    Ok(Node::new(
        NodeKind::Compound {
            tag: tag.to_owned(),
            layout,
        },
        slots,
    ))
}

fn encode_compound(tag: &str, layout: &Value, slots: &[Node]) -> Value {
    let mut content = layout.clone();
    let mut slots = slots.iter();
    for_each_slot(tag, &mut content, &mut |slot: &mut Value, _: SlotLevel| {
        *slot = slots
            .next()
            .map_or_else(|| Value::Array(Vec::new()), |s| encode_nodes(&s.children));
    });
    json!({"t": tag, "c": content})
}

#[derive(Clone, Copy)]
enum SlotLevel {
    Blocks,
    Inlines,
}

/// Visit the content lists of a compound payload in positional order.
///
/// Parts that do not have the expected shape are skipped and stay in the
/// layout as they are.
fn for_each_slot(tag: &str, content: &mut Value, f: &mut dyn FnMut(&mut Value, SlotLevel)) {
    match tag {
        "LineBlock" => {
            for line in items_mut(content) {
                f(line, SlotLevel::Inlines);
            }
        }
        "DefinitionList" => {
            for item in items_mut(content) {
                if let [term, definitions] = items_mut(item) {
                    f(term, SlotLevel::Inlines);
                    for definition in items_mut(definitions) {
                        f(definition, SlotLevel::Blocks);
                    }
                }
            }
        }
        "Figure" => {
            if let [_, caption, blocks] = items_mut(content) {
                caption_slots(caption, f);
                f(blocks, SlotLevel::Blocks);
            }
        }
        "Table" => {
            if let [_, caption, _, head, bodies, foot] = items_mut(content) {
                caption_slots(caption, f);
                if let [_, rows] = items_mut(head) {
                    row_slots(rows, f);
                }
                for body in items_mut(bodies) {
                    if let [_, _, head_rows, rows] = items_mut(body) {
                        row_slots(head_rows, f);
                        row_slots(rows, f);
                    }
                }
                if let [_, rows] = items_mut(foot) {
                    row_slots(rows, f);
                }
            }
        }
        "Cite" => {
            if let [citations, inlines] = items_mut(content) {
                for citation in items_mut(citations) {
                    for key in ["citationPrefix", "citationSuffix"] {
                        if let Some(affix) = citation.get_mut(key) {
                            f(affix, SlotLevel::Inlines);
                        }
                    }
                }
                f(inlines, SlotLevel::Inlines);
            }
        }
        _ => {}
    }
}

/// `[short caption or null, blocks]`
fn caption_slots(caption: &mut Value, f: &mut dyn FnMut(&mut Value, SlotLevel)) {
    if let [short, long] = items_mut(caption) {
        if !short.is_null() {
            f(short, SlotLevel::Inlines);
        }
        f(long, SlotLevel::Blocks);
    }
}

/// Rows are `[attr, cells]`, cells `[attr, alignment, rowspan, colspan, blocks]`.
fn row_slots(rows: &mut Value, f: &mut dyn FnMut(&mut Value, SlotLevel)) {
    for row in items_mut(rows) {
        if let [_, cells] = items_mut(row) {
            for cell in items_mut(cells) {
                if let [_, _, _, _, blocks] = items_mut(cell) {
                    f(blocks, SlotLevel::Blocks);
                }
            }
        }
    }
}

fn items_mut(value: &mut Value) -> &mut [Value] {
    match value.as_array_mut() {
        Some(items) => items.as_mut_slice(),
        None => &mut [],
    }
}

fn decode_attr(value: &Value) -> Result<Attr, CodecError> {
    let [identifier, classes, attributes] = fields(value, "Attr")?;

    let mut attr = Attr {
        identifier: as_string(identifier, "Attr")?,
        ..Attr::default()
    };
    for class in as_array(classes, "Attr classes")? {
        attr.classes.push(as_string(class, "Attr classes")?);
    }
    for pair in as_array(attributes, "Attr attributes")? {
        let [key, value] = fields(pair, "Attr attributes")?;
        attr.attributes.push((
            as_string(key, "Attr attributes")?,
            as_string(value, "Attr attributes")?,
        ));
    }

    Ok(attr)
}

fn encode_node(node: &Node) -> Value {
    let children = || encode_nodes(&node.children);
    let attr = || encode_attr(&node.attr);

    match &node.kind {
        NodeKind::Para => json!({"t": "Para", "c": children()}),
        NodeKind::Plain => json!({"t": "Plain", "c": children()}),
        NodeKind::Header { level } => json!({"t": "Header", "c": [level, attr(), children()]}),
        NodeKind::Div | NodeKind::ListItem => json!({"t": "Div", "c": [attr(), children()]}),
        NodeKind::BlockQuote => json!({"t": "BlockQuote", "c": children()}),
        NodeKind::HorizontalRule => json!({"t": "HorizontalRule"}),
        NodeKind::CodeBlock { text } => json!({"t": "CodeBlock", "c": [attr(), text]}),
        NodeKind::RawBlock { format, text } => json!({"t": "RawBlock", "c": [format, text]}),
        NodeKind::BulletList => json!({"t": "BulletList", "c": encode_items(&node.children)}),
        NodeKind::OrderedList { attributes } => {
            json!({"t": "OrderedList", "c": [attributes, encode_items(&node.children)]})
        }
        NodeKind::Str { text } => json!({"t": "Str", "c": text}),
        NodeKind::Space => json!({"t": "Space"}),
        NodeKind::SoftBreak => json!({"t": "SoftBreak"}),
        NodeKind::LineBreak => json!({"t": "LineBreak"}),
        NodeKind::Emph
        | NodeKind::Strong
        | NodeKind::Underline
        | NodeKind::Strikeout
        | NodeKind::Superscript
        | NodeKind::Subscript
        | NodeKind::SmallCaps
        | NodeKind::Note => json!({"t": node.kind.name(), "c": children()}),
        NodeKind::Quoted { quote } => json!({"t": "Quoted", "c": [{"t": quote}, children()]}),
        NodeKind::Code { text } => json!({"t": "Code", "c": [attr(), text]}),
        NodeKind::Math { math, text } => json!({"t": "Math", "c": [{"t": math}, text]}),
        NodeKind::RawInline { format, text } => json!({"t": "RawInline", "c": [format, text]}),
        NodeKind::Link { target, title } => {
            json!({"t": "Link", "c": [attr(), children(), [target, title]]})
        }
        NodeKind::Image { target, title } => {
            json!({"t": "Image", "c": [attr(), children(), [target, title]]})
        }
        NodeKind::Span => json!({"t": "Span", "c": [attr(), children()]}),
        NodeKind::Compound { tag, layout } => encode_compound(tag, layout, &node.children),
        NodeKind::Slot => children(),
        NodeKind::Opaque { value } => value.clone(),
    }
}

fn encode_items(items: &[Node]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|item| match item.kind {
                NodeKind::ListItem => encode_nodes(&item.children),
                _ => encode_nodes(std::slice::from_ref(item)),
            })
            .collect(),
    )
}

fn encode_attr(attr: &Attr) -> Value {
    let pairs: Vec<Value> = attr
        .attributes
        .iter()
        .map(|(key, value)| json!([key, value]))
        .collect();
    json!([attr.identifier, attr.classes, pairs])
}

fn opaque(value: &Value) -> Node {
    Node::new(
        NodeKind::Opaque {
            value: value.clone(),
        },
        Vec::new(),
    )
}

fn tag_of(value: &Value) -> Result<&str, CodecError> {
    value
        .get("t")
        .and_then(Value::as_str)
        .ok_or_else(|| CodecError::shape("element", "missing `t` tag"))
}

fn as_array<'a>(value: &'a Value, context: &str) -> Result<&'a [Value], CodecError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| CodecError::shape(context, "expected an array"))
}

fn as_string(value: &Value, context: &str) -> Result<String, CodecError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| CodecError::shape(context, "expected a string"))
}

/// Destructure a fixed-size positional array.
fn fields<'a, const N: usize>(
    value: &'a Value,
    context: &str,
) -> Result<[&'a Value; N], CodecError> {
    let items = as_array(value, context)?;
    if items.len() != N {
        return Err(CodecError::shape(
            context,
            format!("expected {N} fields, found {}", items.len()),
        ));
    }
    Ok(std::array::from_fn(|i| &items[i]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_span_with_attr() {
        let value = json!([{
            "t": "Span",
            "c": [
                ["l", ["wiki"], [["title", "Thale cress"]]],
                [{"t": "Str", "c": "Arabidopsis"}, {"t": "Space"}, {"t": "Str", "c": "thaliana"}]
            ]
        }]);

        let nodes = decode_inlines(&value).unwrap();
        assert_eq!(
            nodes,
            vec![Node::span(
                Attr::parse(r#"#l .wiki title="Thale cress""#),
                Node::text("Arabidopsis thaliana"),
            )]
        );
    }

    #[test]
    fn test_decode_div_with_rule() {
        let value = json!([{
            "t": "Div",
            "c": [
                ["", ["twocol"], [["align", "top,bottom"]]],
                [
                    {"t": "Para", "c": [{"t": "Str", "c": "left"}]},
                    {"t": "HorizontalRule"},
                    {"t": "Para", "c": [{"t": "Str", "c": "right"}]}
                ]
            ]
        }]);

        let nodes = decode_blocks(&value).unwrap();
        assert_eq!(
            nodes,
            vec![Node::div(
                Attr::parse(".twocol align=top,bottom"),
                vec![
                    Node::para(vec![Node::str("left")]),
                    Node::rule(),
                    Node::para(vec![Node::str("right")]),
                ],
            )]
        );
    }

    #[test]
    fn test_round_trip_preserves_json() {
        let value = json!([
            {"t": "Header", "c": [1, ["intro", [], []], [{"t": "Str", "c": "Intro"}]]},
            {"t": "Para", "c": [
                {"t": "Emph", "c": [{"t": "Str", "c": "a"}]},
                {"t": "SoftBreak"},
                {"t": "Quoted", "c": [{"t": "DoubleQuote"}, [{"t": "Str", "c": "q"}]]},
                {"t": "Math", "c": [{"t": "InlineMath"}, "x"]},
                {"t": "Link", "c": [["", [], []], [{"t": "Str", "c": "site"}], ["https://x.org", ""]]},
                {"t": "Note", "c": [{"t": "Para", "c": [{"t": "Str", "c": "fn"}]}]},
                {"t": "Cite", "c": [[], [{"t": "Str", "c": "@k"}]]}
            ]},
            {"t": "BulletList", "c": [
                [{"t": "Plain", "c": [{"t": "Str", "c": "one"}]}],
                [{"t": "Plain", "c": [{"t": "Str", "c": "two"}]}]
            ]},
            {"t": "OrderedList", "c": [
                [1, {"t": "Decimal"}, {"t": "Period"}],
                [[{"t": "Plain", "c": [{"t": "Str", "c": "first"}]}]]
            ]},
            {"t": "CodeBlock", "c": [["", ["rust"], []], "fn main() {}"]},
            {"t": "RawBlock", "c": ["tex", "\\newpage"]},
            {"t": "Unknown", "c": ["opaque", 1, 2]},
            {"t": "BlockQuote", "c": [{"t": "Para", "c": [{"t": "Str", "c": "q"}]}]}
        ]);

        let nodes = decode_blocks(&value).unwrap();
        assert_eq!(encode_nodes(&nodes), value);
    }

    fn link_span() -> Value {
        json!({"t": "Span", "c": [["l", ["wiki"], []], [{"t": "Str", "c": "Rust"}]]})
    }

    fn cell(blocks: Value) -> Value {
        json!([["", [], []], {"t": "AlignDefault"}, 1, 1, blocks])
    }

    #[test]
    fn test_repeated_attribute_keys_round_trip() {
        let value = json!([{
            "t": "Div",
            "c": [["", ["note"], [["data-x", "1"], ["data-x", "2"]]], []]
        }]);

        let nodes = decode_blocks(&value).unwrap();
        assert_eq!(nodes[0].attr.attributes.len(), 2);
        assert_eq!(nodes[0].attr.get("data-x"), Some("1"));
        assert_eq!(encode_nodes(&nodes), value);
    }

    #[test]
    fn test_unknown_constructor_is_opaque() {
        let value = json!([{"t": "Unknown", "c": [{"t": "Div"}]}]);
        let nodes = decode_blocks(&value).unwrap();
        assert!(matches!(nodes[0].kind, NodeKind::Opaque { .. }));
        assert!(nodes[0].children.is_empty());
    }

    #[test]
    fn test_definition_list_slots() {
        let value = json!([{"t": "DefinitionList", "c": [[
            [{"t": "Str", "c": "term"}],
            [[{"t": "Para", "c": [link_span()]}], [{"t": "Plain", "c": []}]]
        ]]}]);

        let nodes = decode_blocks(&value).unwrap();
        let slots = &nodes[0].children;
        assert_eq!(nodes[0].kind.name(), "DefinitionList");
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].children, vec![Node::str("term")]);
        assert!(slots[1].children[0].is_para());
        assert!(slots[1].children[0].children[0].is_span());
        assert_eq!(encode_nodes(&nodes), value);
    }

    #[test]
    fn test_table_cells_are_slots() {
        let row = |text: &str| {
            let blocks = json!([{"t": "Plain", "c": [{"t": "Str", "c": text}]}]);
            json!([["", [], []], [cell(blocks)]])
        };
        let value = json!([{"t": "Table", "c": [
            ["tbl", [], []],
            [null, [{"t": "Plain", "c": [{"t": "Str", "c": "caption"}]}]],
            [[{"t": "AlignDefault"}, {"t": "ColWidthDefault"}]],
            [["", [], []], [row("head")]],
            [[["", [], []], 0, [], [row("body")]]],
            [["", [], []], [row("foot")]]
        ]}]);

        let nodes = decode_blocks(&value).unwrap();
        let texts: Vec<String> = nodes[0].children.iter().map(crate::stringify).collect();
        assert_eq!(texts, vec!["caption", "head", "body", "foot"]);
        assert_eq!(encode_nodes(&nodes), value);
    }

    #[test]
    fn test_figure_line_block_and_cite_round_trip() {
        let value = json!([
            {"t": "Figure", "c": [
                ["fig", [], []],
                [[{"t": "Str", "c": "short"}], [{"t": "Plain", "c": [{"t": "Str", "c": "long"}]}]],
                [{"t": "Para", "c": [{"t": "Image", "c": [["", [], []], [], ["a.png", ""]]}]}]
            ]},
            {"t": "LineBlock", "c": [
                [{"t": "Str", "c": "one"}],
                [{"t": "Str", "c": "two"}, {"t": "Space"}, link_span()]
            ]},
            {"t": "Para", "c": [{"t": "Cite", "c": [
                [{
                    "citationId": "knuth",
                    "citationPrefix": [{"t": "Str", "c": "see"}],
                    "citationSuffix": [],
                    "citationMode": {"t": "NormalCitation"},
                    "citationNoteNum": 1,
                    "citationHash": 0
                }],
                [{"t": "Str", "c": "[see"}, {"t": "Space"}, {"t": "Str", "c": "@knuth]"}]
            ]}]}
        ]);

        let nodes = decode_blocks(&value).unwrap();
        assert_eq!(nodes[0].children.len(), 3);
        assert_eq!(nodes[1].children.len(), 2);
        assert!(nodes[1].children[1].children[2].is_span());
        let cite = &nodes[2].children[0];
        assert!(!cite.kind.is_block());
        assert_eq!(cite.children.len(), 3);
        assert_eq!(encode_nodes(&nodes), value);
    }

    #[test]
    fn test_bad_inline_in_slot_is_error() {
        let value = json!([{"t": "LineBlock", "c": [[{"c": "no tag"}]]}]);
        assert!(matches!(
            decode_blocks(&value).unwrap_err(),
            CodecError::Shape { .. }
        ));
    }

    #[test]
    fn test_wrong_arity_is_shape_error() {
        let value = json!([{"t": "Div", "c": [["", [], []]]}]);
        let err = decode_blocks(&value).unwrap_err();
        assert!(matches!(err, CodecError::Shape { .. }));
        assert!(err.to_string().contains("expected 2 fields"));
    }

    #[test]
    fn test_missing_tag_is_shape_error() {
        let value = json!([{"c": []}]);
        assert!(decode_blocks(&value).is_err());
    }
}
