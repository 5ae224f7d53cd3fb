//! Shorthand links: `[text]{#l .wiki}` or `[text]{#l type=wiki}`.
//!
//! The span text is appended to the target of the link type, and the
//! displayed text can be replaced with `title` and decorated with
//! `before`/`after`.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sugar_ast::{Node, stringify};

use crate::attrs::{require_one_of, resolve};
use crate::config::TargetSpec;
use crate::{RewriteContext, Rule, RuleOutput, SkipReason};

/// Identifier marking a span as a shorthand link.
pub const LINK_IDENTIFIER: &str = "l";

/// Characters escaped by form encoding: everything except unreserved
/// characters and space (which becomes `+`).
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b' ');

/// Rewrites marked spans into links.
pub struct LinkRule;

impl Rule for LinkRule {
    fn name(&self) -> &'static str {
        "links"
    }

    fn apply(&self, node: &mut Node, ctx: &RewriteContext) -> RuleOutput {
        if !node.is_span() || node.attr.identifier != LINK_IDENTIFIER {
            return RuleOutput::Skip(SkipReason::NoMatch);
        }

        let key = match require_one_of(&node.attr, "type") {
            Ok(key) => Some(key),
            Err(_) => node.attr.primary_class(),
        };
        let Some(spec) = key.and_then(|key| ctx.links().get(key)) else {
            return RuleOutput::Skip(SkipReason::NoMatch);
        };

        let base = stringify(node);
        if base.is_empty() {
            return RuleOutput::Skip(SkipReason::EmptyText);
        }

        let url = build_url(spec, &base);
        let text = format!(
            "{}{}{}",
            resolve(&node.attr, "before", &spec.before),
            resolve(&node.attr, "title", &base),
            resolve(&node.attr, "after", &spec.after),
        );

        let mut attr = std::mem::take(&mut node.attr);
        attr.identifier.clear();
        RuleOutput::Replace(Node::link(attr, url, vec![Node::str(text)]))
    }
}

/// Join the target and the span text with exactly one added `/`.
fn build_url(spec: &TargetSpec, text: &str) -> String {
    let slash = if spec.target.ends_with('/') { "" } else { "/" };
    let text = if spec.encode {
        form_encode(text)
    } else {
        text.to_owned()
    };
    format!("{}{slash}{text}", spec.target)
}

/// Form-urlencode `text`: unreserved characters kept, space as `+`.
fn form_encode(text: &str) -> String {
    utf8_percent_encode(text, FORM_ENCODE_SET)
        .to_string()
        .replace(' ', "+")
}
