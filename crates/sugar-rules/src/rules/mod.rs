//! Built-in rules.

mod admonition;
mod columns;
mod environment;
mod link;

pub use admonition::AdmonitionRule;
pub use columns::ColumnSplitRule;
pub use environment::EnvironmentWrapRule;
pub use link::{LINK_IDENTIFIER, LinkRule};
