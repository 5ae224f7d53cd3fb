//! Node attributes: identifier, classes and key-value pairs.
//!
//! Renders the `{#id .class key="value"}` syntax used by bracketed spans
//! and fenced divs, for diagnostics.

use std::fmt;

/// Identifier, classes and key-value attributes of a node.
///
/// The first class is the node's *primary type*; rules dispatch on it.
/// Attributes are kept as pandoc stores them: ordered pairs, repeated keys
/// included, so documents round-trip unchanged. Lookups see the first pair
/// with a given key.
///
/// # Example
///
/// ```
/// use sugar_ast::Attr;
///
/// let mut attr = Attr {
///     identifier: "l".to_owned(),
///     ..Attr::with_class("wiki")
/// };
/// attr.insert("title", "Thale cress");
/// assert_eq!(attr.primary_class(), Some("wiki"));
/// assert_eq!(attr.get("title"), Some("Thale cress"));
/// assert_eq!(attr.to_string(), r#"{#l .wiki title="Thale cress"}"#);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attr {
    /// Identifier from `{#id}` (empty string if not set).
    pub identifier: String,
    /// Classes from `{.class1 .class2}`.
    pub classes: Vec<String>,
    /// Key-value attributes from `{key="value"}`, in source order.
    pub attributes: Vec<(String, String)>,
}

impl Attr {
    /// Create an attribute set with a single class.
    #[must_use]
    pub fn with_class(class: impl Into<String>) -> Self {
        Self {
            classes: vec![class.into()],
            ..Default::default()
        }
    }

    /// First class, if any.
    #[must_use]
    pub fn primary_class(&self) -> Option<&str> {
        self.classes.first().map(String::as_str)
    }

    /// Check whether the primary class equals `class`.
    #[must_use]
    pub fn has_primary_class(&self, class: &str) -> bool {
        self.primary_class() == Some(class)
    }

    /// Get the value of the first attribute named `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute. Overwrites the first pair named `key` in place,
    /// or appends a new pair.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Remove every pair named `key`, returning the first value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let first = self.attributes.iter().position(|(k, _)| k == key)?;
        let (_, value) = self.attributes.remove(first);
        self.attributes.retain(|(k, _)| k != key);
        Some(value)
    }

    /// Check whether identifier, classes and attributes are all empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identifier.is_empty() && self.classes.is_empty() && self.attributes.is_empty()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Attr {
    /// Build an attribute set from the brace syntax without braces, e.g.
    /// `#l .wiki title="Thale cress"` or `#id.twocol width=50%`.
    ///
    /// Values may be double-quoted, single-quoted or bare. Tokens that are
    /// neither `#id`, `.class` nor `key=value` are ignored.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let mut attr = Self::default();
        for token in tokens(source) {
            if let Some((key, value)) = token.split_once('=') {
                attr.attributes.push((key.to_owned(), unquote(value).to_owned()));
                continue;
            }

            let mut rest = token;
            while let Some(sigil) = rest.chars().next() {
                let end = rest
                    .char_indices()
                    .skip(1)
                    .find(|&(_, c)| c == '#' || c == '.')
                    .map_or(rest.len(), |(i, _)| i);
                let name = &rest[sigil.len_utf8()..end];
                match sigil {
                    '#' => name.clone_into(&mut attr.identifier),
                    '.' => attr.classes.push(name.to_owned()),
                    _ => {}
                }
                rest = &rest[end..];
            }
        }
        attr
    }
}

/// Split on whitespace outside of quotes.
#[cfg(any(test, feature = "test-support"))]
fn tokens(source: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = None;
    let mut quote = None;

    for (i, c) in source.char_indices() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => {}
            None if c.is_whitespace() => {
                if let Some(s) = start.take() {
                    tokens.push(&source[s..i]);
                }
            }
            None => {
                if start.is_none() {
                    start = Some(i);
                }
                if c == '"' || c == '\'' {
                    quote = Some(c);
                }
            }
        }
    }
    if let Some(s) = start {
        tokens.push(&source[s..]);
    }
    tokens
}

#[cfg(any(test, feature = "test-support"))]
fn unquote(value: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .find_map(|q| value.strip_prefix(q)?.strip_suffix(q))
        .unwrap_or(value)
}

/// Renders the brace syntax: `{#id .class key="value"}`, or nothing when empty.
impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }

        let mut parts = Vec::new();
        if !self.identifier.is_empty() {
            parts.push(format!("#{}", self.identifier));
        }
        for class in &self.classes {
            parts.push(format!(".{class}"));
        }
        for (key, value) in &self.attributes {
            let escaped = value.replace('"', r#"\""#);
            parts.push(format!(r#"{key}="{escaped}""#));
        }

        write!(f, "{{{}}}", parts.join(" "))
    }
}
