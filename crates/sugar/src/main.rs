//! sugar CLI - markup sugar rewrite rules as a pandoc filter.
//!
//! Reads a pandoc JSON document from stdin, applies the rewrite rules and
//! writes the result to stdout:
//!
//! ```sh
//! pandoc slides.md -t beamer --filter sugar -o slides.pdf
//! pandoc notes.md -t json | sugar html --rules admonitions,links | pandoc -f json -o notes.html
//! ```

mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::FilterArgs;
use output::Output;

/// sugar - markup sugar rewrite rules for pandoc documents.
#[derive(Parser)]
#[command(name = "sugar", version, about)]
struct Cli {
    #[command(flatten)]
    filter: FilterArgs,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // Logs go to stderr: stdout carries the document.
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.filter.verbose))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.filter.execute() {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

/// `--verbose` enables INFO level, otherwise use `RUST_LOG` or default to WARN.
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_pandoc_invocation() {
        let cli = Cli::try_parse_from(["sugar", "beamer"]).unwrap();
        assert_eq!(cli.filter.format.as_deref(), Some("beamer"));
        assert!(cli.filter.rules.is_none());
        assert!(!cli.filter.verbose);
    }

    #[test]
    fn test_log_filter_levels() {
        assert_eq!(log_filter(true).to_string(), "info");
        if std::env::var_os("RUST_LOG").is_none() {
            assert_eq!(log_filter(false).to_string(), "warn");
        }
    }

    #[test]
    fn test_parse_without_format() {
        let cli = Cli::try_parse_from(["sugar"]).unwrap();
        assert!(cli.filter.format.is_none());
    }

    #[test]
    fn test_parse_options() {
        let cli = Cli::try_parse_from([
            "sugar",
            "latex",
            "--rules",
            "links,environments",
            "--input",
            "in.json",
            "--metadata-file",
            "meta.yaml",
            "-v",
        ])
        .unwrap();
        assert_eq!(
            cli.filter.rules,
            Some(vec!["links".to_owned(), "environments".to_owned()])
        );
        assert_eq!(cli.filter.input, Some(PathBuf::from("in.json")));
        assert_eq!(cli.filter.metadata_file, Some(PathBuf::from("meta.yaml")));
        assert!(cli.filter.verbose);
    }
}
