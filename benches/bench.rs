//! Criterion benchmarks for dcsearch.
//!
//! Covers the posting list algebra, text analysis, query evaluation and
//! index construction.

use std::fs;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use dcsearch::analysis::analyze_terms;
use dcsearch::analysis::analyzer::standard::StandardAnalyzer;
use dcsearch::config::SearcherConfig;
use dcsearch::index::{build_index, build_index_bounded};
use dcsearch::query::set_ops::{intersect, intersect_not, negate, union};
use dcsearch::search::Searcher;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

const WORDS: &[&str] = &[
    "search", "engine", "full", "text", "index", "query", "document", "term", "boolean",
    "posting", "skip", "pointer", "merge", "segment", "dictionary", "storage", "retrieval",
    "filter", "memory", "budget",
];

/// Sorted, distinct ids drawn from `0..max_id`.
fn posting_list(rng: &mut StdRng, len: usize, max_id: u64) -> Vec<u64> {
    let mut list: Vec<u64> = (0..len).map(|_| rng.random_range(0..max_id)).collect();
    list.sort_unstable();
    list.dedup();
    list
}

/// Generate test documents for benchmarking.
fn generate_test_documents(count: usize) -> Vec<String> {
    let mut documents = Vec::with_capacity(count);
    for i in 0..count {
        let doc_length = 20 + (i % 50);
        let doc_words: Vec<&str> = (0..doc_length)
            .map(|j| WORDS[(i * 7 + j * 13) % WORDS.len()])
            .collect();
        documents.push(doc_words.join(" "));
    }
    documents
}

fn write_collection(count: usize) -> TempDir {
    let docs = TempDir::new().unwrap();
    for (doc_id, body) in generate_test_documents(count).iter().enumerate() {
        fs::write(docs.path().join(doc_id.to_string()), body).unwrap();
    }
    docs
}

/// Benchmark the set operations on skewed and balanced inputs.
fn bench_set_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_operations");
    let mut rng = StdRng::seed_from_u64(17);

    let universe: Vec<u64> = (0..200_000).collect();
    let long = posting_list(&mut rng, 100_000, 200_000);
    for short_len in [100, 10_000, 100_000] {
        let short = posting_list(&mut rng, short_len, 200_000);

        group.bench_with_input(BenchmarkId::new("intersect", short_len), &short, |b, short| {
            b.iter(|| black_box(intersect(black_box(&long), black_box(short))))
        });
        group.bench_with_input(BenchmarkId::new("union", short_len), &short, |b, short| {
            b.iter(|| black_box(union(black_box(&long), black_box(short))))
        });
        group.bench_with_input(
            BenchmarkId::new("intersect_not", short_len),
            &short,
            |b, short| b.iter(|| black_box(intersect_not(black_box(&long), black_box(short)))),
        );
    }

    group.throughput(Throughput::Elements(universe.len() as u64));
    group.bench_function("negate", |b| {
        b.iter(|| black_box(negate(black_box(&long), black_box(&universe))))
    });

    group.finish();
}

/// Benchmark text analysis.
fn bench_text_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_analysis");

    let analyzer = StandardAnalyzer::new();
    let texts = generate_test_documents(100);

    group.throughput(Throughput::Elements(texts.len() as u64));
    group.bench_function("analyze_batch_documents", |b| {
        b.iter(|| {
            for text in &texts {
                let _ = black_box(analyze_terms(&analyzer, black_box(text)));
            }
        })
    });

    group.finish();
}

/// Benchmark query evaluation against a built index.
fn bench_query_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_evaluation");

    let docs = write_collection(2_000);
    let index = TempDir::new().unwrap();
    build_index(docs.path(), index.path()).unwrap();

    let sequential = Searcher::open(index.path(), SearcherConfig::default()).unwrap();
    let parallel =
        Searcher::open(index.path(), SearcherConfig::default().with_parallel(true)).unwrap();

    for query in ["search & engine", "skip | merge | budget", "!(query | term) & posting"] {
        group.bench_with_input(BenchmarkId::new("sequential", query), query, |b, query| {
            b.iter(|| black_box(sequential.search_text(query).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("parallel", query), query, |b, query| {
            b.iter(|| black_box(parallel.search_text(query).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark index construction with and without a memory budget.
fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");
    group.sample_size(10);

    let docs = write_collection(1_000);
    group.throughput(Throughput::Elements(1_000));

    group.bench_function("in_memory", |b| {
        b.iter_with_setup(
            || TempDir::new().unwrap(),
            |index| black_box(build_index(docs.path(), index.path()).unwrap()),
        )
    });
    group.bench_function("bounded_64k", |b| {
        b.iter_with_setup(
            || TempDir::new().unwrap(),
            |index| black_box(build_index_bounded(docs.path(), index.path(), 64 * 1024).unwrap()),
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_set_operations,
    bench_text_analysis,
    bench_query_evaluation
);

criterion_group!(slow_benches, bench_index_build);

criterion_main!(benches, slow_benches);
