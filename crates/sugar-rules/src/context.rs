//! Per-run rewrite context.

use sugar_ast::{Metadata, TargetFormat};

use crate::ConfigError;
use crate::config::{ClassTable, LinkTable, TableOverrides, Tables};

/// Everything a rule may read while rewriting.
///
/// Built once per document before traversal and never modified during it.
#[derive(Clone, Debug, Default)]
pub struct RewriteContext {
    format: TargetFormat,
    tables: Tables,
}

impl RewriteContext {
    /// Create a context from resolved tables.
    #[must_use]
    pub fn new(format: TargetFormat, tables: Tables) -> Self {
        Self { format, tables }
    }

    /// Overlay the document's metadata tables onto `base`.
    pub fn for_document(
        meta: &Metadata,
        format: TargetFormat,
        base: &Tables,
    ) -> Result<Self, ConfigError> {
        let overrides = TableOverrides::from_metadata(meta)?;
        Ok(Self::new(format, base.overlay(&overrides)))
    }

    /// Output format being produced.
    #[must_use]
    pub fn format(&self) -> &TargetFormat {
        &self.format
    }

    /// All effective tables.
    #[must_use]
    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    /// Effective admonition table.
    #[must_use]
    pub fn admonitions(&self) -> &ClassTable {
        &self.tables.admonitions
    }

    /// Effective link table.
    #[must_use]
    pub fn links(&self) -> &LinkTable {
        &self.tables.links
    }

    /// Effective environment table, if any layer supplied one.
    #[must_use]
    pub fn environments(&self) -> Option<&ClassTable> {
        self.tables.environments.as_ref()
    }
}
