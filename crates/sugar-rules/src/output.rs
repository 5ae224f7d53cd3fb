//! Rule results.

use std::fmt;

use sugar_ast::Node;

/// Result of applying a rule to one node.
#[derive(Clone, Debug, PartialEq)]
pub enum RuleOutput {
    /// The node was modified in place.
    Rewritten,
    /// Replace the node with another one.
    Replace(Node),
    /// Replace the node with a sequence of siblings.
    Splice(Vec<Node>),
    /// Leave the node as it was.
    Skip(SkipReason),
}

/// Why a rule left a node alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The node is not a candidate (wrong variant, class, trigger or key).
    NoMatch,
    /// The node's text is empty.
    EmptyText,
    /// The rule does nothing for this target format or configuration.
    Inert,
    /// A two-column div without a horizontal rule.
    NoSeparator,
    /// An environment div without a paragraph to carry the opening marker.
    NoParagraph,
}

impl SkipReason {
    /// Check whether the node looked intended for the rule but was malformed.
    ///
    /// Degraded skips are reported as warnings.
    #[must_use]
    pub fn is_degraded(self) -> bool {
        matches!(self, Self::NoSeparator | Self::NoParagraph)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::NoMatch => "no match",
            Self::EmptyText => "empty text",
            Self::Inert => "inactive for this target",
            Self::NoSeparator => "no horizontal rule separating the columns",
            Self::NoParagraph => "no paragraph to attach the environment to",
        };
        f.write_str(message)
    }
}
