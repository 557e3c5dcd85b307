//! Command line argument parsing for the Examine CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::query::BooleanOperation;

/// Examine - fluent search criteria over typed documents
#[derive(Parser, Debug, Clone)]
#[command(name = "examine")]
#[command(about = "Run search criteria against documents loaded from JSON lines")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct ExamineArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl ExamineArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Load documents and run one criteria against them
    Search(SearchArgs),
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Documents to load, one JSON object per line
    #[arg(value_name = "DOCUMENTS")]
    pub documents: PathBuf,

    /// JSON configuration file with `index` and `searcher` sections
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Only search documents of this type (default: every type)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub doc_type: Option<String>,

    /// Type for lines that do not name one
    #[arg(long, value_name = "TYPE")]
    pub default_type: Option<String>,

    /// Field criteria as name=value, in order (repeatable)
    #[arg(long = "field", value_name = "NAME=VALUE", value_parser = parse_field_value)]
    pub fields: Vec<(String, String)>,

    /// Free text matched against every field, any word
    #[arg(long, conflicts_with = "fields")]
    pub text: Option<String>,

    /// How field criteria combine
    #[arg(long, default_value = "and")]
    pub op: OperationArg,

    /// Treat every value as a wildcard prefix
    #[arg(long)]
    pub wildcard: bool,

    /// Ascending sort keys, primary first
    #[arg(long, value_name = "FIELD")]
    pub order_by: Vec<String>,

    /// Descending sort keys, applied after the ascending ones
    #[arg(long, value_name = "FIELD")]
    pub order_by_desc: Vec<String>,

    /// Number of results to skip
    #[arg(long, default_value = "0")]
    pub skip: usize,

    /// Maximum number of results to show
    #[arg(long, default_value = "10")]
    pub take: usize,
}

/// Boolean operation accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationArg {
    And,
    Or,
}

impl From<OperationArg> for BooleanOperation {
    fn from(op: OperationArg) -> Self {
        match op {
            OperationArg::And => BooleanOperation::And,
            OperationArg::Or => BooleanOperation::Or,
        }
    }
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

/// Split `name=value` at the first `=`.
fn parse_field_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got {s:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_args() {
        let args = ExamineArgs::parse_from([
            "examine",
            "-vv",
            "--format",
            "json",
            "search",
            "docs.jsonl",
            "--type",
            "content",
            "--field",
            "name=home page",
            "--field",
            "bodyText=a=b",
            "--op",
            "or",
            "--order-by-desc",
            "updateDate",
        ]);

        assert_eq!(args.verbosity(), 2);
        assert_eq!(args.output_format, OutputFormat::Json);
        let Command::Search(search) = args.command;
        assert_eq!(search.doc_type.as_deref(), Some("content"));
        assert_eq!(
            search.fields,
            vec![
                ("name".to_string(), "home page".to_string()),
                ("bodyText".to_string(), "a=b".to_string())
            ]
        );
        assert_eq!(search.op, OperationArg::Or);
        assert_eq!(search.order_by_desc, vec!["updateDate"]);
        assert_eq!(search.take, 10);
    }

    #[test]
    fn test_field_requires_name() {
        assert!(parse_field_value("=x").is_err());
        assert!(parse_field_value("novalue").is_err());
        assert_eq!(
            parse_field_value("id=").unwrap(),
            ("id".to_string(), String::new())
        );
    }

    #[test]
    fn test_quiet_overrides_verbose() {
        let args = ExamineArgs::parse_from(["examine", "-q", "-vvv", "search", "d.jsonl"]);
        assert_eq!(args.verbosity(), 0);
    }
}
