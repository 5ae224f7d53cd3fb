//! CLI error types.

use sugar_ast::CodecError;
use sugar_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Tables(#[from] sugar_rules::ConfigError),

    #[error("{0}")]
    Codec(#[from] CodecError),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
