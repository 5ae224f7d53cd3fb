//! Markup sugar rewrite rules.
//!
//! Four rules turn lightweight authoring conventions into richer document
//! structure:
//!
//! | Rule           | Source                              | Result                                  |
//! |----------------|-------------------------------------|-----------------------------------------|
//! | admonitions    | `NOTE: text` paragraph              | classed div, or LaTeX environment       |
//! | links          | `[text]{#l .wiki}` span             | link built from a URL prefix table      |
//! | columns        | `.twocol` div split by `* * *`      | beamer `columns` of two `column` divs   |
//! | environments   | div whose class is in `div-env`     | LaTeX `\begin{env}` ... `\end{env}`     |
//!
//! Tables driving the rules are layered: built-in defaults, then project
//! configuration, then document metadata ([`Tables::overlay`]). The merged
//! tables are frozen in a [`RewriteContext`] for the whole run.
//!
//! # Example
//!
//! ```
//! use sugar_ast::{Attr, Node, NodeKind, TargetFormat};
//! use sugar_rules::{RewriteContext, Rewriter, RuleKind, Tables};
//!
//! let ctx = RewriteContext::new(TargetFormat::Html, Tables::builtin());
//! let mut rewriter = Rewriter::new(ctx).with_rules([RuleKind::Links]);
//!
//! let attr = Attr {
//!     identifier: "l".to_owned(),
//!     ..Attr::with_class("wiki")
//! };
//! let span = Node::span(attr, Node::text("Arabidopsis thaliana"));
//! let mut blocks = vec![Node::para(vec![span])];
//! rewriter.rewrite_blocks(&mut blocks);
//!
//! let NodeKind::Link { target, .. } = &blocks[0].children[0].kind else {
//!     panic!("expected a link");
//! };
//! assert_eq!(target, "https://en.wikipedia.org/wiki/Arabidopsis+thaliana");
//! ```

pub mod attrs;
pub mod config;
mod context;
mod error;
mod output;
mod rewriter;
mod rule;
pub mod rules;

pub use config::{TableOverrides, Tables, TargetSpec};
pub use context::RewriteContext;
pub use error::{AttributeError, ConfigError, UnknownRuleError};
pub use output::{RuleOutput, SkipReason};
pub use rewriter::{RewriteStats, Rewriter};
pub use rule::{Rule, RuleKind};
