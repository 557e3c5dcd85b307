//! Output formatting for CLI commands.

use std::io::Write;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::args::OutputFormat;
use crate::document::{Document, FieldValue};
use crate::error::Result;
use crate::search::{ResultSet, ScoredMatch};

/// One shown result.
#[derive(Debug, Serialize)]
pub struct Hit {
    pub position: usize,
    pub doc_id: u64,
    pub doc_type: String,
    pub score: f32,
    pub fields: Map<String, Value>,
}

/// Result structure for search operations.
#[derive(Debug, Serialize)]
pub struct SearchReport {
    pub query: String,
    pub total_hits: usize,
    pub max_score: Option<f32>,
    pub skip: usize,
    pub hits: Vec<Hit>,
    pub duration_ms: u64,
}

impl SearchReport {
    /// Summarize one page of `results`.
    pub fn new(results: &ResultSet, skip: usize, take: usize, duration_ms: u64) -> Self {
        let hits = results
            .page(skip, take)
            .iter()
            .enumerate()
            .map(|(i, m)| Hit::new(skip + i + 1, m))
            .collect();

        SearchReport {
            query: results.query().to_string(),
            total_hits: results.total_item_count(),
            max_score: results.max_score(),
            skip,
            hits,
            duration_ms,
        }
    }
}

impl Hit {
    fn new(position: usize, scored: &ScoredMatch) -> Self {
        Hit {
            position,
            doc_id: scored.doc_id,
            doc_type: scored.doc_type.clone(),
            score: scored.score,
            fields: document_json(&scored.document),
        }
    }
}

/// Fields of `document` as plain JSON values, sorted by name.
fn document_json(document: &Document) -> Map<String, Value> {
    let mut names: Vec<&str> = document.field_names();
    names.sort_unstable();
    names
        .into_iter()
        .filter_map(|name| {
            let value = match document.get_field(name)? {
                FieldValue::Text(s) => Value::from(s.as_str()),
                FieldValue::Integer(i) => Value::from(*i),
                FieldValue::Float(f) => Value::from(*f),
                FieldValue::Boolean(b) => Value::from(*b),
                FieldValue::DateTime(dt) => Value::from(dt.to_rfc3339()),
            };
            Some((name.to_string(), value))
        })
        .collect()
}

/// Write `report` in the requested format.
pub fn write_report<W: Write>(
    out: &mut W,
    report: &SearchReport,
    format: OutputFormat,
    pretty: bool,
) -> Result<()> {
    match format {
        OutputFormat::Human => write_human(out, report),
        OutputFormat::Json => {
            if pretty {
                serde_json::to_writer_pretty(&mut *out, report)?;
            } else {
                serde_json::to_writer(&mut *out, report)?;
            }
            writeln!(out)?;
            Ok(())
        }
    }
}

fn write_human<W: Write>(out: &mut W, report: &SearchReport) -> Result<()> {
    if !report.query.is_empty() {
        writeln!(out, "Query: {}", report.query)?;
    }
    match (report.hits.first(), report.hits.last()) {
        (Some(first), Some(last)) => writeln!(
            out,
            "Found {} result(s) in {}ms, showing {}-{}",
            report.total_hits, report.duration_ms, first.position, last.position
        )?,
        _ => writeln!(
            out,
            "Found {} result(s) in {}ms",
            report.total_hits, report.duration_ms
        )?,
    }

    for hit in &report.hits {
        writeln!(out)?;
        writeln!(
            out,
            "{}. [{} #{}] score {:.4}",
            hit.position, hit.doc_type, hit.doc_id, hit.score
        )?;
        for (name, value) in &hit.fields {
            writeln!(out, "   {name}: {}", format_value(value))?;
        }
    }
    Ok(())
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
