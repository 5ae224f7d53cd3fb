//! Configuration management for sugar.
//!
//! Parses `sugar.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [filter]
//! to = "beamer"
//! rules = ["admonitions", "links", "columns", "environments"]
//!
//! [admonitions]
//! HINT = "tip"
//!
//! [links]
//! crates = "https://crates.io/crates"
//!
//! [links.issue]
//! target = "https://github.com/acme/app/issues"
//! before = "#"
//!
//! [environments]
//! ubuntu = "ubuntu"
//! ```
//!
//! The table sections sit between the built-in defaults and document
//! metadata: a document can still override any entry set here.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use sugar_ast::TargetFormat;
use sugar_rules::{RuleKind, TableOverrides, Tables};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override output format.
    pub to: Option<String>,
    /// Override enabled rules.
    pub rules: Option<Vec<String>>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "sugar.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Filter configuration.
    pub filter: FilterConfig,
    /// Extra admonition words (`WORD = "class"`).
    admonitions: Option<Value>,
    /// Extra link types (`type = "url"` or `[links.type]` tables).
    links: Option<Value>,
    /// Div classes mapped to LaTeX environments (`class = "env"`).
    environments: Option<Value>,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Filter configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Output format used when none is given on the command line.
    pub to: Option<String>,
    /// Rules to run, in order. All rules when unset.
    pub rules: Option<Vec<String>>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Malformed rule table.
    #[error("Invalid rule table: {0}")]
    Table(#[from] sugar_rules::ConfigError),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `sugar.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(to) = &settings.to {
            self.filter.to = Some(to.clone());
        }
        if let Some(rules) = &settings.rules {
            self.filter.rules = Some(rules.clone());
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Output format, defaulting to HTML.
    #[must_use]
    pub fn format(&self) -> TargetFormat {
        self.filter
            .to
            .as_deref()
            .and_then(|to| to.parse().ok())
            .unwrap_or_default()
    }

    /// Rules to run, in order.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for unknown rule names.
    pub fn rules(&self) -> Result<Vec<RuleKind>, ConfigError> {
        let Some(names) = &self.filter.rules else {
            return Ok(RuleKind::ALL.to_vec());
        };

        names
            .iter()
            .map(|name| {
                name.parse::<RuleKind>()
                    .map_err(|e| ConfigError::Validation(format!("filter.rules: {e}")))
            })
            .collect()
    }

    /// Table entries set by this file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Table` if a section is malformed.
    pub fn table_overrides(&self) -> Result<TableOverrides, ConfigError> {
        Ok(TableOverrides::from_values(
            self.admonitions.as_ref(),
            self.links.as_ref(),
            self.environments.as_ref(),
        )?)
    }

    /// Built-in tables overlaid with the entries of this file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Table` if a section is malformed.
    pub fn tables(&self) -> Result<Tables, ConfigError> {
        Ok(Tables::builtin().overlay(&self.table_overrides()?))
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after applying CLI
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` or `ConfigError::Table` if any
    /// validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_filter()?;
        self.table_overrides()?;
        Ok(())
    }

    /// Validate filter configuration.
    fn validate_filter(&self) -> Result<(), ConfigError> {
        if let Some(to) = &self.filter.to
            && to.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "filter.to cannot be empty".to_owned(),
            ));
        }

        if self.rules()?.is_empty() {
            return Err(ConfigError::Validation(
                "filter.rules cannot be empty".to_owned(),
            ));
        }

        Ok(())
    }
}
