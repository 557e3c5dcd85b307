//! Criterion benchmarks for Examine.
//!
//! Covers the three hot paths:
//! - Text analysis
//! - Criteria compilation
//! - Query execution, serial and parallel

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use examine::analysis::{Analyzer, StandardAnalyzer};
use examine::prelude::*;
use examine::search::SearcherConfig;

/// Generate test documents for benchmarking.
fn generate_test_documents(count: usize) -> Vec<Document> {
    let words = [
        "umbraco", "content", "media", "image", "search", "index", "query", "document", "field",
        "term", "phrase", "boolean", "relevance", "score", "warren", "creative", "gallery",
        "contact", "about", "home", "news", "event", "codegarden", "conference",
    ];

    (0..count)
        .map(|i| {
            let body_length = 20 + (i % 40);
            let body: Vec<&str> = (0..body_length)
                .map(|j| words[(i * 7 + j * 13) % words.len()])
                .collect();
            Document::builder()
                .add_integer("id", i as i64)
                .add_text("name", format!("{} {}", words[i % words.len()], i))
                .add_text("type", format!("CWS_{}", words[(i * 3) % words.len()]))
                .add_text("bodyText", body.join(" "))
                .build()
        })
        .collect()
}

fn setup_searcher(count: usize, config: SearcherConfig) -> Searcher {
    let index = Arc::new(MemoryIndex::new());
    index
        .add_documents("content", generate_test_documents(count))
        .expect("documents load");
    Searcher::with_config(index, config)
}

fn sample_criteria(searcher: &Searcher) -> Result<CompiledQuery> {
    searcher
        .create_criteria_with("content", BooleanOperation::Or)
        .grouped_or(["type", "name"], [boost("CWS\\_home", 10.0), wildcard("ab")])?
        .or()?
        .field("bodyText", proximity("warren creative", 5))?
        .not()?
        .node_name("gallery")?
        .compile()
}

fn bench_text_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_analysis");

    let analyzer = StandardAnalyzer::new();
    let text = "Umbraco is the friendly CMS, and CWS_Home is its starter kit home page";

    group.bench_function("analyze_sentence", |b| {
        b.iter(|| black_box(analyzer.terms(black_box(text))))
    });

    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("criteria");
    let searcher = setup_searcher(10, SearcherConfig::default());

    group.bench_function("compile_mixed_criteria", |b| {
        b.iter(|| black_box(sample_criteria(&searcher)))
    });

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(20);

    for count in [1_000, 20_000] {
        for parallel in [false, true] {
            let config = SearcherConfig {
                parallel,
                parallel_threshold: 1,
                ..Default::default()
            };
            let searcher = setup_searcher(count, config);
            let query = sample_criteria(&searcher).expect("criteria compile");
            let label = if parallel { "parallel" } else { "serial" };

            group.throughput(Throughput::Elements(count as u64));
            group.bench_with_input(BenchmarkId::new(label, count), &query, |b, query| {
                b.iter(|| {
                    let results = searcher.search(query).expect("search runs");
                    black_box(results.total_item_count())
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_text_analysis, bench_compile, bench_search);
criterion_main!(benches);
