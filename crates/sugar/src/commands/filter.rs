//! Filter command: rewrite one pandoc JSON document.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use sugar_ast::{Document, Metadata};
use sugar_config::{CliSettings, Config};
use sugar_rules::Rewriter;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the filter command.
#[derive(Args)]
pub(crate) struct FilterArgs {
    /// Output format, as passed by pandoc (e.g. html, latex, beamer).
    /// Defaults to `filter.to` from the config, then html.
    #[arg(value_name = "FORMAT")]
    pub(crate) format: Option<String>,

    /// Read the document from this file instead of stdin.
    #[arg(short, long)]
    pub(crate) input: Option<PathBuf>,

    /// Write the document to this file instead of stdout.
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,

    /// Comma-separated rules to run, in order (overrides config).
    #[arg(short, long, value_delimiter = ',')]
    pub(crate) rules: Option<Vec<String>>,

    /// Path to configuration file (default: auto-discover sugar.toml).
    #[arg(short, long, env = "SUGAR_CONFIG")]
    pub(crate) config: Option<PathBuf>,

    /// YAML file whose keys override the document metadata.
    #[arg(long)]
    pub(crate) metadata_file: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl FilterArgs {
    /// Execute the filter command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, reading, rewriting or writing fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            to: self.format.clone(),
            rules: self.rules.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::debug!(path = %path.display(), "Loaded configuration");
        }

        let mut doc = read_document(self.input.as_deref())?;
        if let Some(path) = &self.metadata_file {
            let content = std::fs::read_to_string(path)?;
            doc.meta.overlay(Metadata::from_yaml(&content)?);
        }

        let rewriter = rewrite(&mut doc, &config)?;

        for warning in rewriter.warnings() {
            output.warning(&format!("Warning: {warning}"));
        }
        if self.verbose {
            for (rule, count) in rewriter.stats().iter() {
                output.info(&format!("{rule}: {count} rewritten"));
            }
        }

        write_document(&doc, self.output.as_deref())
    }
}

/// Apply the configured rules to `doc`.
fn rewrite(doc: &mut Document, config: &Config) -> Result<Rewriter, CliError> {
    let mut rewriter = Rewriter::for_document(&doc.meta, config.format(), &config.tables()?)?
        .with_rules(config.rules()?);
    rewriter.rewrite_document(doc);
    Ok(rewriter)
}

fn read_document(input: Option<&Path>) -> Result<Document, CliError> {
    let doc = match input {
        Some(path) => Document::from_reader(BufReader::new(File::open(path)?))?,
        None => Document::from_reader(io::stdin().lock())?,
    };
    Ok(doc)
}

fn write_document(doc: &Document, output: Option<&Path>) -> Result<(), CliError> {
    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    doc.to_writer(&mut writer)?;
    writer.flush()?;
    Ok(())
}
