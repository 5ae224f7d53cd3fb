//! Rule trait and the set of built-in rules.

use std::fmt;
use std::str::FromStr;

use sugar_ast::Node;

use crate::rules::{AdmonitionRule, ColumnSplitRule, EnvironmentWrapRule, LinkRule};
use crate::{RewriteContext, RuleOutput, UnknownRuleError};

/// A rewrite rule applied to every node of a document.
///
/// The [`Rewriter`](crate::Rewriter) calls [`apply`](Self::apply) on each
/// node after its children have been visited.
///
/// # Thread Safety
///
/// Rules implement `Send` only (not `Sync`) since each run builds its own
/// rule instances.
///
/// # Example
///
/// ```
/// use sugar_ast::{Node, NodeKind};
/// use sugar_rules::{RewriteContext, Rule, RuleOutput, SkipReason};
///
/// struct DropRules;
///
/// impl Rule for DropRules {
///     fn name(&self) -> &str { "drop-rules" }
///
///     fn apply(&self, node: &mut Node, _ctx: &RewriteContext) -> RuleOutput {
///         if node.is_rule() {
///             RuleOutput::Splice(Vec::new())
///         } else {
///             RuleOutput::Skip(SkipReason::NoMatch)
///         }
///     }
/// }
/// ```
pub trait Rule: Send {
    /// Rule name used in logs and statistics.
    fn name(&self) -> &str;

    /// Check whether the rule does anything for this run.
    ///
    /// Inactive rules are not traversed at all.
    fn is_active(&self, _ctx: &RewriteContext) -> bool {
        true
    }

    /// Rewrite one node.
    ///
    /// Must leave `node` untouched when returning [`RuleOutput::Skip`].
    fn apply(&self, node: &mut Node, ctx: &RewriteContext) -> RuleOutput;
}

/// Built-in rules, selectable by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleKind {
    /// `NOTE: text` paragraphs.
    Admonitions,
    /// `[text]{#l .wiki}` spans.
    Links,
    /// `.twocol` divs on slides.
    Columns,
    /// Divs mapped to LaTeX environments.
    Environments,
}

impl RuleKind {
    /// All rules in their default order.
    pub const ALL: [Self; 4] = [
        Self::Admonitions,
        Self::Links,
        Self::Columns,
        Self::Environments,
    ];

    /// Canonical name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Admonitions => "admonitions",
            Self::Links => "links",
            Self::Columns => "columns",
            Self::Environments => "environments",
        }
    }

    /// Instantiate the rule.
    #[must_use]
    pub fn build(self) -> Box<dyn Rule> {
        match self {
            Self::Admonitions => Box::new(AdmonitionRule),
            Self::Links => Box::new(LinkRule),
            Self::Columns => Box::new(ColumnSplitRule),
            Self::Environments => Box::new(EnvironmentWrapRule),
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts canonical names, their singular forms, and the names of the
/// standalone filters (`adoc-admonitions`, `super-links`, `beamer-twocol`,
/// `divs-to-latex`).
impl FromStr for RuleKind {
    type Err = UnknownRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admonitions" | "admonition" | "adoc-admonitions" => Ok(Self::Admonitions),
            "links" | "link" | "super-links" => Ok(Self::Links),
            "columns" | "column" | "twocol" | "beamer-twocol" => Ok(Self::Columns),
            "environments" | "environment" | "divs-to-latex" => Ok(Self::Environments),
            _ => Err(UnknownRuleError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("links".parse(), Ok(RuleKind::Links));
        assert_eq!("Column".parse(), Ok(RuleKind::Columns));
        assert_eq!("divs-to-latex".parse(), Ok(RuleKind::Environments));
        assert_eq!(" adoc-admonitions ".parse(), Ok(RuleKind::Admonitions));
    }

    #[test]
    fn test_parse_unknown() {
        let err = "tables".parse::<RuleKind>().unwrap_err();
        assert_eq!(err, UnknownRuleError("tables".to_owned()));
        assert!(err.to_string().contains("admonitions, links"));
    }

    #[test]
    fn test_display_round_trip() {
        for kind in RuleKind::ALL {
            assert_eq!(kind.to_string().parse(), Ok(kind));
        }
    }

    #[test]
    fn test_build_names() {
        let names: Vec<_> = RuleKind::ALL
            .iter()
            .map(|kind| kind.build().name().to_owned())
            .collect();
        assert_eq!(names, vec!["admonitions", "links", "columns", "environments"]);
    }
}
