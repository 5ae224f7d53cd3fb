//! Traversal driver applying rules to a document.

use std::collections::BTreeMap;
use std::mem;

use sugar_ast::{Document, Metadata, Node, TargetFormat};

use crate::config::Tables;
use crate::{ConfigError, RewriteContext, Rule, RuleKind, RuleOutput};

/// Per-rule rewrite counts of a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RewriteStats {
    counts: BTreeMap<String, usize>,
}

impl RewriteStats {
    fn record(&mut self, rule: &str) {
        *self.counts.entry(rule.to_owned()).or_default() += 1;
    }

    /// Number of nodes rewritten by `rule`.
    #[must_use]
    pub fn get(&self, rule: &str) -> usize {
        self.counts.get(rule).copied().unwrap_or(0)
    }

    /// Number of nodes rewritten by all rules.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Iterate over `(rule, count)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(rule, count)| (rule.as_str(), *count))
    }
}

/// Applies a sequence of rules to a document tree.
///
/// Each rule runs as its own depth-first pass, children before parents,
/// like a chain of independent filters. Nodes produced by a rule are not
/// visited again by that rule in the same pass.
///
/// # Example
///
/// ```
/// use sugar_ast::{Node, TargetFormat};
/// use sugar_rules::{RewriteContext, Rewriter, RuleKind, Tables};
///
/// let ctx = RewriteContext::new(TargetFormat::Html, Tables::builtin());
/// let mut rewriter = Rewriter::new(ctx).with_rules(RuleKind::ALL);
///
/// let mut blocks = vec![Node::para(Node::text("NOTE: hello"))];
/// rewriter.rewrite_blocks(&mut blocks);
///
/// assert!(blocks[0].is_div());
/// assert_eq!(rewriter.stats().get("admonitions"), 1);
/// ```
pub struct Rewriter {
    ctx: RewriteContext,
    rules: Vec<Box<dyn Rule>>,
    stats: RewriteStats,
    warnings: Vec<String>,
}

impl Rewriter {
    /// Create a rewriter without rules.
    #[must_use]
    pub fn new(ctx: RewriteContext) -> Self {
        Self {
            ctx,
            rules: Vec::new(),
            stats: RewriteStats::default(),
            warnings: Vec::new(),
        }
    }

    /// Create a rewriter whose tables are `base` overlaid with the
    /// document's metadata tables.
    pub fn for_document(
        meta: &Metadata,
        format: TargetFormat,
        base: &Tables,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(RewriteContext::for_document(meta, format, base)?))
    }

    /// Append a rule.
    #[must_use]
    pub fn with_rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Append built-in rules in the given order.
    #[must_use]
    pub fn with_rules(mut self, kinds: impl IntoIterator<Item = RuleKind>) -> Self {
        self.rules.extend(kinds.into_iter().map(RuleKind::build));
        self
    }

    /// Context shared by all rules.
    #[must_use]
    pub fn context(&self) -> &RewriteContext {
        &self.ctx
    }

    /// Rewrite a block list in place.
    pub fn rewrite_blocks(&mut self, blocks: &mut Vec<Node>) {
        let ctx = &self.ctx;

        for rule in &self.rules {
            if !rule.is_active(ctx) {
                tracing::debug!(rule = rule.name(), format = %ctx.format(), "Rule inactive");
                continue;
            }
            let mut pass = Pass {
                rule: rule.as_ref(),
                ctx,
                stats: &mut self.stats,
                warnings: &mut self.warnings,
            };
            pass.rewrite_list(blocks);
        }
    }

    /// Rewrite the blocks of a document in place.
    pub fn rewrite_document(&mut self, doc: &mut Document) {
        self.rewrite_blocks(&mut doc.blocks);
        tracing::info!(
            format = %self.ctx.format(),
            rewrites = self.stats.total(),
            warnings = self.warnings.len(),
            "Rewrote document"
        );
    }

    /// Rewrite counts so far.
    #[must_use]
    pub fn stats(&self) -> &RewriteStats {
        &self.stats
    }

    /// Warnings for nodes that looked intended for a rule but were malformed.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

/// One rule's traversal over the tree.
struct Pass<'a> {
    rule: &'a dyn Rule,
    ctx: &'a RewriteContext,
    stats: &'a mut RewriteStats,
    warnings: &'a mut Vec<String>,
}

impl Pass<'_> {
    fn rewrite_list(&mut self, nodes: &mut Vec<Node>) {
        let input = mem::take(nodes);
        nodes.reserve(input.len());

        for mut node in input {
            self.rewrite_list(&mut node.children);

            let kind = node.kind.name().to_owned();
            match self.rule.apply(&mut node, self.ctx) {
                RuleOutput::Rewritten => {
                    self.record(&kind);
                    nodes.push(node);
                }
                RuleOutput::Replace(replacement) => {
                    self.record(&kind);
                    nodes.push(replacement);
                }
                RuleOutput::Splice(replacement) => {
                    self.record(&kind);
                    nodes.extend(replacement);
                }
                RuleOutput::Skip(reason) => {
                    if reason.is_degraded() {
                        tracing::warn!(
                            rule = self.rule.name(),
                            node = %kind,
                            %reason,
                            "Rule skipped node"
                        );
                        self.warnings.push(format!(
                            "{}: skipped {kind} {}: {reason}",
                            self.rule.name(),
                            node.attr
                        ));
                    }
                    nodes.push(node);
                }
            }
        }
    }

    fn record(&mut self, kind: &str) {
        tracing::debug!(rule = self.rule.name(), node = kind, "Rewrote node");
        self.stats.record(self.rule.name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SkipReason;
    use crate::config::ClassTable;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use sugar_ast::pandoc::{decode_blocks, encode_nodes};
    use sugar_ast::{Attr, NodeKind, stringify};

    fn para(text: &str) -> Node {
        Node::para(Node::text(text))
    }

    fn rewriter(format: TargetFormat) -> Rewriter {
        let environments: ClassTable = [("ubuntu".to_owned(), "ubuntu".to_owned())].into();
        let tables = Tables {
            environments: Some(environments),
            ..Tables::builtin()
        };
        Rewriter::new(RewriteContext::new(format, tables)).with_rules(RuleKind::ALL)
    }

    /// Wraps every paragraph in a div holding a paragraph.
    struct WrapParagraphs;

    impl Rule for WrapParagraphs {
        fn name(&self) -> &'static str {
            "wrap"
        }

        fn apply(&self, node: &mut Node, _ctx: &RewriteContext) -> RuleOutput {
            if node.is_para() {
                RuleOutput::Replace(Node::div(Attr::default(), vec![node.clone()]))
            } else {
                RuleOutput::Skip(SkipReason::NoMatch)
            }
        }
    }

    #[test]
    fn test_splice_keeps_order() {
        let mut blocks = vec![para("before"), para("NOTE: hello"), para("after")];
        let mut rewriter = rewriter(TargetFormat::Latex);
        rewriter.rewrite_blocks(&mut blocks);

        assert_eq!(
            blocks,
            vec![
                para("before"),
                Node::raw_block("tex", "\\begin{note}"),
                Node::para(vec![Node::str("hello")]),
                Node::raw_block("tex", "\\end{note}"),
                para("after"),
            ]
        );
    }

    #[test]
    fn test_produced_nodes_not_revisited() {
        let mut blocks = vec![para("a"), para("b")];
        let mut rewriter =
            Rewriter::new(RewriteContext::new(TargetFormat::Html, Tables::builtin()))
                .with_rule(WrapParagraphs);
        rewriter.rewrite_blocks(&mut blocks);

        assert_eq!(
            blocks,
            vec![
                Node::div(Attr::default(), vec![para("a")]),
                Node::div(Attr::default(), vec![para("b")]),
            ]
        );
        assert_eq!(rewriter.stats().get("wrap"), 2);
    }

    #[test]
    fn test_nested_rewrites() {
        let mut blocks = vec![Node::div(
            Attr::with_class("twocol"),
            vec![
                Node::para(vec![Node::span(Attr::parse("#l .github"), Node::text("acme"))]),
                Node::rule(),
                para("TIP: right side"),
            ],
        )];
        let mut rewriter = rewriter(TargetFormat::Beamer);
        rewriter.rewrite_blocks(&mut blocks);

        let columns = &blocks[0];
        assert!(columns.attr.has_primary_class("columns"));
        let left = &columns.children[0].children[0];
        assert!(matches!(
            &left.children[0].kind,
            NodeKind::Link { target, .. } if target == "https://github.com/acme"
        ));
        let right = &columns.children[1].children;
        assert_eq!(right[0], Node::raw_block("tex", "\\begin{tip}"));
        assert_eq!(stringify(&right[1]), "right side");

        assert_eq!(rewriter.stats().get("links"), 1);
        assert_eq!(rewriter.stats().get("columns"), 1);
        assert_eq!(rewriter.stats().get("admonitions"), 1);
        assert_eq!(rewriter.stats().total(), 3);
    }

    #[test]
    fn test_admonition_inside_environment() {
        let mut blocks = vec![Node::div(
            Attr::with_class("ubuntu"),
            vec![para("NOTE: inside")],
        )];
        let mut rewriter = rewriter(TargetFormat::Latex);
        rewriter.rewrite_blocks(&mut blocks);

        let opened = vec![Node::raw_inline("tex", "\\begin{ubuntu}"), Node::str("inside")];
        assert_eq!(
            blocks[0].children,
            vec![
                Node::raw_block("tex", "\\begin{note}"),
                Node::para(opened),
                Node::raw_block("tex", "\\end{note}"),
                Node::plain(vec![Node::raw_inline("tex", "\\end{ubuntu}")]),
            ]
        );
    }

    fn wiki_span() -> Value {
        json!({"t": "Span", "c": [["l", ["wiki"], []], [{"t": "Str", "c": "Rust"}]]})
    }

    fn rewrite_json(blocks: &Value) -> (Value, usize) {
        let mut nodes = decode_blocks(blocks).unwrap();
        let mut rewriter = rewriter(TargetFormat::Html);
        rewriter.rewrite_blocks(&mut nodes);
        (encode_nodes(&nodes), rewriter.stats().total())
    }

    fn wiki_link() -> Value {
        json!({"t": "Link", "c": [
            ["", ["wiki"], []],
            [{"t": "Str", "c": "Rust"}],
            ["https://en.wikipedia.org/wiki/Rust", ""]
        ]})
    }

    #[test]
    fn test_link_inside_definition_list() {
        let blocks = json!([{"t": "DefinitionList", "c": [[
            [{"t": "Str", "c": "term"}],
            [[{"t": "Para", "c": [wiki_span()]}]]
        ]]}]);

        let (output, rewrites) = rewrite_json(&blocks);

        assert_eq!(rewrites, 1);
        assert_eq!(
            output,
            json!([{"t": "DefinitionList", "c": [[
                [{"t": "Str", "c": "term"}],
                [[{"t": "Para", "c": [wiki_link()]}]]
            ]]}])
        );
    }

    /// Single-cell table whose cell holds `inline`.
    fn table_with_cell(inline: Value) -> Value {
        let blocks = json!([{"t": "Plain", "c": [inline]}]);
        let cell = json!([["", [], []], {"t": "AlignDefault"}, 1, 1, blocks]);
        json!([{"t": "Table", "c": [
            ["", [], []],
            [null, []],
            [[{"t": "AlignDefault"}, {"t": "ColWidthDefault"}]],
            [["", [], []], []],
            [[["", [], []], 0, [], [[["", [], []], [cell]]]]],
            [["", [], []], []]
        ]}])
    }

    #[test]
    fn test_link_inside_table_cell() {
        let (output, rewrites) = rewrite_json(&table_with_cell(wiki_span()));

        assert_eq!(rewrites, 1);
        assert_eq!(output, table_with_cell(wiki_link()));
    }

    #[test]
    fn test_admonition_inside_definition() {
        let note = json!({"t": "Para", "c": [
            {"t": "Str", "c": "NOTE:"}, {"t": "Space"}, {"t": "Str", "c": "hi"}
        ]});
        let term = json!([{"t": "Str", "c": "term"}]);
        let blocks = json!([{"t": "DefinitionList", "c": [[term, [[note]]]]}]);

        let (output, rewrites) = rewrite_json(&blocks);

        let div = json!({"t": "Div", "c": [
            ["", ["note"], []],
            [{"t": "Para", "c": [{"t": "Str", "c": "hi"}]}]
        ]});
        assert_eq!(rewrites, 1);
        assert_eq!(
            output,
            json!([{"t": "DefinitionList", "c": [[term, [[div]]]]}])
        );
    }

    #[test]
    fn test_degraded_skip_warns() {
        let original = Node::div(Attr::with_class("twocol"), vec![para("no rule")]);
        let mut blocks = vec![original.clone()];
        let mut rewriter = rewriter(TargetFormat::Beamer);
        rewriter.rewrite_blocks(&mut blocks);

        assert_eq!(blocks, vec![original]);
        assert_eq!(rewriter.warnings().len(), 1);
        assert!(rewriter.warnings()[0].starts_with("columns: skipped Div {.twocol}"));
        assert_eq!(rewriter.stats().total(), 0);
    }

    #[test]
    fn test_links_idempotent() {
        let mut blocks = vec![Node::para(vec![Node::span(
            Attr::parse("#l .wiki"),
            Node::text("Arabidopsis thaliana"),
        )])];
        let mut first = rewriter(TargetFormat::Html);
        first.rewrite_blocks(&mut blocks);
        let once = blocks.clone();

        let mut second = rewriter(TargetFormat::Html);
        second.rewrite_blocks(&mut blocks);
        assert_eq!(blocks, once);
        assert_eq!(second.stats().total(), 0);
    }

    #[test]
    fn test_rewrite_document_uses_metadata() {
        let meta = Metadata::from_yaml("adoc-admonition:\n  HINT: hint\n").unwrap();
        let mut doc = Document::new(meta, vec![para("HINT: look here")]);
        let mut rewriter = Rewriter::for_document(&doc.meta, TargetFormat::Html, &Tables::builtin())
            .unwrap()
            .with_rules(RuleKind::ALL);
        rewriter.rewrite_document(&mut doc);

        assert_eq!(
            doc.blocks,
            vec![Node::div(
                Attr::with_class("hint"),
                vec![Node::para(vec![Node::str("look here")])]
            )]
        );
    }
}
