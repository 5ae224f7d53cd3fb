//! Attribute resolution shared by the rules.

use sugar_ast::Attr;

use crate::AttributeError;

/// Value of attribute `name`, or `fallback` when it is absent or empty.
#[must_use]
pub fn resolve(attr: &Attr, name: &str, fallback: &str) -> String {
    match attr.get(name) {
        Some(value) if !value.is_empty() => value.to_owned(),
        _ => fallback.to_owned(),
    }
}

/// Value of a required attribute. Empty counts as missing.
pub fn require_one_of<'a>(attr: &'a Attr, name: &str) -> Result<&'a str, AttributeError> {
    attr.get(name)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AttributeError::Missing(name.to_owned()))
}

/// Split `"left,right"` into its halves, trimmed. A value without a comma
/// applies to both halves.
#[must_use]
pub fn split_pair(value: &str) -> (String, String) {
    match value.split_once(',') {
        Some((left, right)) => (left.trim().to_owned(), right.trim().to_owned()),
        None => {
            let both = value.trim().to_owned();
            (both.clone(), both)
        }
    }
}
