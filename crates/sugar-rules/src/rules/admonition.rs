//! Admonition paragraphs: `NOTE: text`.
//!
//! A paragraph whose text starts with a trigger word from the admonition
//! table followed by `": "` becomes a classed div (structured output) or a
//! LaTeX environment (raw-markup output). The trigger must sit in the first
//! column and match case-sensitively.

use sugar_ast::{Attr, Node, RAW_TEX, stringify};

use crate::{RewriteContext, Rule, RuleOutput, SkipReason};

const SEPARATOR: &str = ": ";

/// Rewrites admonition paragraphs.
pub struct AdmonitionRule;

impl Rule for AdmonitionRule {
    fn name(&self) -> &'static str {
        "admonitions"
    }

    fn apply(&self, node: &mut Node, ctx: &RewriteContext) -> RuleOutput {
        if !node.is_para() {
            return RuleOutput::Skip(SkipReason::NoMatch);
        }

        let text = stringify(node);
        if text.is_empty() {
            return RuleOutput::Skip(SkipReason::EmptyText);
        }

        let Some((trigger, body)) = text.split_once(SEPARATOR) else {
            return RuleOutput::Skip(SkipReason::NoMatch);
        };
        let Some(class) = ctx.admonitions().get(trigger) else {
            return RuleOutput::Skip(SkipReason::NoMatch);
        };

        let para = Node::para(if body.is_empty() {
            Vec::new()
        } else {
            vec![Node::str(body)]
        });

        if ctx.format().is_raw_markup() {
            RuleOutput::Splice(vec![
                Node::raw_block(RAW_TEX, format!("\\begin{{{class}}}")),
                para,
                Node::raw_block(RAW_TEX, format!("\\end{{{class}}}")),
            ])
        } else {
            RuleOutput::Replace(Node::div(Attr::with_class(class.as_str()), vec![para]))
        }
    }
}
