//! Divs mapped to LaTeX environments via the `div-env` table.
//!
//! The opening marker goes inline at the start of the div's first
//! paragraph, so no blank line follows `\begin{env}`. The closing marker is
//! appended as a trailing plain block.

use sugar_ast::{Node, RAW_TEX};

use crate::{RewriteContext, Rule, RuleOutput, SkipReason};

/// Wraps configured divs in LaTeX environments.
pub struct EnvironmentWrapRule;

impl Rule for EnvironmentWrapRule {
    fn name(&self) -> &'static str {
        "environments"
    }

    fn is_active(&self, ctx: &RewriteContext) -> bool {
        ctx.format().is_raw_markup() && ctx.environments().is_some_and(|envs| !envs.is_empty())
    }

    fn apply(&self, node: &mut Node, ctx: &RewriteContext) -> RuleOutput {
        let Some(environments) = ctx.environments() else {
            return RuleOutput::Skip(SkipReason::Inert);
        };
        if !node.is_div() {
            return RuleOutput::Skip(SkipReason::NoMatch);
        }
        let Some(env) = node
            .attr
            .primary_class()
            .and_then(|class| environments.get(class))
        else {
            return RuleOutput::Skip(SkipReason::NoMatch);
        };
        if !ctx.format().is_raw_markup() {
            return RuleOutput::Skip(SkipReason::Inert);
        }

        let opening = opening_marker(env, node);
        let Some(para) = node.find_descendant_mut(&Node::is_para) else {
            return RuleOutput::Skip(SkipReason::NoParagraph);
        };
        para.children.insert(0, Node::raw_inline(RAW_TEX, opening));
        node.children.push(Node::plain(vec![Node::raw_inline(
            RAW_TEX,
            format!("\\end{{{env}}}"),
        )]));

        RuleOutput::Rewritten
    }
}

/// `\begin{env}[title]\label{id}`, with the optional parts omitted when empty.
/// An empty `title=""` gives no `[]`.
fn opening_marker(env: &str, node: &Node) -> String {
    let mut marker = format!("\\begin{{{env}}}");
    if let Some(title) = node.attr.get("title").filter(|title| !title.is_empty()) {
        marker.push('[');
        marker.push_str(title);
        marker.push(']');
    }
    if !node.attr.identifier.is_empty() {
        marker.push_str("\\label{");
        marker.push_str(&node.attr.identifier);
        marker.push('}');
    }
    marker
}
