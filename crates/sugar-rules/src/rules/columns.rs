//! Two-column slides: a `.twocol` div split at its horizontal rule.
//!
//! ```markdown
//! ::: {.twocol align="top,center" width="40%,60%" .onlytextwidth}
//! Left
//!
//! * * *
//! Right
//! :::
//! ```
//!
//! becomes `Div.columns > [Div.column, Div.column]`, which the beamer writer
//! renders as a `columns` environment.

use sugar_ast::{Attr, Node};

use crate::attrs::split_pair;
use crate::{RewriteContext, Rule, RuleOutput, SkipReason};

const TWOCOL: &str = "twocol";
const COLUMNS: &str = "columns";
const COLUMN: &str = "column";

/// Attributes whose values are given per column as `"left,right"`.
const SPLIT_ATTRIBUTES: [&str; 2] = ["align", "width"];

/// Splits `.twocol` divs into two columns.
pub struct ColumnSplitRule;

impl Rule for ColumnSplitRule {
    fn name(&self) -> &'static str {
        "columns"
    }

    fn is_active(&self, ctx: &RewriteContext) -> bool {
        ctx.format().is_slides()
    }

    fn apply(&self, node: &mut Node, ctx: &RewriteContext) -> RuleOutput {
        if !node.is_div() || !node.attr.has_primary_class(TWOCOL) {
            return RuleOutput::Skip(SkipReason::NoMatch);
        }
        if !self.is_active(ctx) {
            return RuleOutput::Skip(SkipReason::Inert);
        }
        let Some(rule_pos) = node.children.iter().position(Node::is_rule) else {
            return RuleOutput::Skip(SkipReason::NoSeparator);
        };

        let mut shared = std::mem::take(&mut node.attr);
        let mut left_attrs = Vec::new();
        let mut right_attrs = Vec::new();
        for name in SPLIT_ATTRIBUTES {
            if let Some(value) = shared.remove(name) {
                let (left, right) = split_pair(&value);
                left_attrs.push((name, left));
                right_attrs.push((name, right));
            }
        }

        let mut right_children = node.children.split_off(rule_pos);
        right_children.remove(0);
        let left_children = std::mem::take(&mut node.children);

        let left = Node::div(column_attr(&shared, left_attrs), left_children);
        let right = Node::div(column_attr(&shared, right_attrs), right_children);

        let mut outer = Attr::with_class(COLUMNS);
        outer.identifier = shared.identifier;
        outer.classes.extend(shared.classes.into_iter().skip(1));

        RuleOutput::Replace(Node::div(outer, vec![left, right]))
    }
}

/// Column attributes: the shared ones, overridden by the half-specific values.
fn column_attr(shared: &Attr, own: Vec<(&str, String)>) -> Attr {
    let mut attr = Attr::with_class(COLUMN);
    attr.attributes.clone_from(&shared.attributes);
    for (name, value) in own {
        attr.insert(name, value);
    }
    attr
}
