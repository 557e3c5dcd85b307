//! Command implementations for the Examine CLI.

use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use log::info;
use serde::{Deserialize, Serialize};

use crate::cli::args::*;
use crate::cli::output::{SearchReport, write_report};
use crate::error::Result;
use crate::index::{IndexConfig, MemoryIndex};
use crate::query::value::wildcard;
use crate::query::{BooleanOperation, SearchValue, TypeFilter};
use crate::search::{ResultSet, Searcher, SearcherConfig};

/// Configuration file layout accepted by `--config`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub index: IndexConfig,
    pub searcher: SearcherConfig,
}

impl CliConfig {
    /// Load a JSON configuration file. Missing sections keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Execute a CLI command.
pub fn execute_command(args: ExamineArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &args.command {
        Command::Search(search_args) => {
            search(search_args, args.output_format, args.pretty, &mut out)
        }
    }
}

/// Load the documents, run the criteria and write one page of results.
pub fn search<W: Write>(
    args: &SearchArgs,
    format: OutputFormat,
    pretty: bool,
    out: &mut W,
) -> Result<()> {
    let config = match &args.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };

    let index = MemoryIndex::with_config(config.index);
    let reader = BufReader::new(File::open(&args.documents)?);
    let loaded = index.add_json_lines(reader, args.default_type.as_deref())?;
    info!("loaded {loaded} document(s) from {}", args.documents.display());

    let searcher = Searcher::with_config(Arc::new(index), config.searcher);
    let start = Instant::now();
    let results = run_criteria(&searcher, args)?;
    let report = SearchReport::new(
        &results,
        args.skip,
        args.take,
        start.elapsed().as_millis() as u64,
    );

    write_report(out, &report, format, pretty)
}

fn run_criteria(searcher: &Searcher, args: &SearchArgs) -> Result<ResultSet> {
    let type_filter = match &args.doc_type {
        Some(t) => TypeFilter::from(t.as_str()),
        None => TypeFilter::All,
    };

    if let Some(text) = &args.text {
        return searcher.search_text(type_filter, text, args.wildcard);
    }

    let mut criteria = searcher.create_criteria_with(type_filter, BooleanOperation::from(args.op));
    for (name, value) in &args.fields {
        let value = if args.wildcard {
            wildcard(value.as_str())
        } else {
            SearchValue::from(value)
        };
        criteria = criteria.field(name.as_str(), value)?;
    }
    for field in &args.order_by {
        criteria = criteria.order_by(field.as_str());
    }
    for field in &args.order_by_desc {
        criteria = criteria.order_by_descending(field.as_str());
    }

    searcher.search(&criteria.compile()?)
}
