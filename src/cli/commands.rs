//! Command implementations for the dcsearch CLI.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::EngineConfig;
use crate::index::{DocumentStore, Indexer, IndexReader};
use crate::query::{QueryNode, parse_query};
use crate::search::Searcher;

const SNIPPET_CHARS: usize = 80;

/// Execute a CLI command.
pub fn execute_command(args: DcSearchArgs) -> Result<()> {
    match &args.command {
        Command::Index(index_args) => build(index_args, &args),
        Command::Search(search_args) => search(search_args, &args),
        Command::Stats(stats_args) => show_stats(stats_args, &args),
        Command::ShowTree(tree_args) => show_tree(tree_args, &args),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

/// Build an index.
fn build(args: &IndexArgs, cli_args: &DcSearchArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?.indexer;
    if let Some(budget) = args.memory_budget {
        config.memory_budget = Some(budget);
    }
    if let Some(analyzer) = args.analyzer {
        config.analyzer = analyzer;
    }
    if args.no_atomic {
        config.publish_atomically = false;
    }

    let start = Instant::now();
    let summary = Indexer::new(config)
        .build(&args.doc_dir, &args.index_dir)
        .with_context(|| format!("failed to index {}", args.doc_dir.display()))?;

    let result = IndexBuildResult {
        doc_dir: args.doc_dir.display().to_string(),
        index_dir: args.index_dir.display().to_string(),
        doc_count: summary.doc_count,
        total_bytes: summary.total_bytes,
        term_count: summary.term_count,
        segment_count: summary.segment_count,
        duration_ms: start.elapsed().as_millis() as u64,
    };
    output_result(&result, cli_args)?;
    Ok(())
}

fn parse_tree(query: &str, json_tree: bool) -> Result<QueryNode> {
    if json_tree {
        serde_json::from_str(query).context("query is not a valid JSON query tree")
    } else {
        Ok(parse_query(query)?)
    }
}

/// Evaluate a query.
fn search(args: &SearchArgs, cli_args: &DcSearchArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?.searcher;
    if args.parallel {
        config.parallel = true;
    }
    if let Some(analyzer) = args.analyzer {
        config.analyzer = analyzer;
    }

    let tree = parse_tree(&args.query, args.json_tree)?;
    let searcher = Searcher::open(&args.index_dir, config)
        .with_context(|| format!("failed to open index {}", args.index_dir.display()))?;
    let documents = match &args.doc_dir {
        Some(doc_dir) => Some(DocumentStore::new(doc_dir)?),
        None => None,
    };

    let start = Instant::now();
    let doc_ids = searcher.search(&tree)?;
    let duration_ms = start.elapsed().as_millis() as u64;

    let limit = args.limit.unwrap_or(doc_ids.len());
    let mut hits = Vec::with_capacity(limit.min(doc_ids.len()));
    for &doc_id in doc_ids.iter().take(limit) {
        let (path, snippet_text) = match &documents {
            // ID_EQUALS may name a document that does not exist.
            Some(store) if !store.contains(doc_id) => (None, None),
            Some(store) => {
                let text = store
                    .fetch_text(doc_id)
                    .with_context(|| format!("failed to read document {doc_id}"))?;
                (
                    Some(store.path_for(doc_id).display().to_string()),
                    Some(snippet(&text, SNIPPET_CHARS)),
                )
            }
            None => (None, None),
        };
        hits.push(SearchHit {
            doc_id,
            path,
            snippet: snippet_text,
        });
    }

    let result = SearchResults {
        total_hits: doc_ids.len(),
        hits,
        duration_ms,
    };
    output_result(&result, cli_args)?;
    Ok(())
}

/// Show index statistics.
fn show_stats(args: &StatsArgs, cli_args: &DcSearchArgs) -> Result<()> {
    let reader = IndexReader::open(&args.index_dir)
        .with_context(|| format!("failed to open index {}", args.index_dir.display()))?;
    let stats = reader.stats();

    let result = IndexStatsResult {
        index_dir: args.index_dir.display().to_string(),
        num_of_docs: stats.num_of_docs,
        num_of_bytes: stats.num_of_bytes,
        bytes_per_doc: stats.bytes_per_doc(),
        term_count: reader.term_count(),
        postings_bytes: reader.postings().size(),
    };
    output_result(&result, cli_args)?;
    Ok(())
}

/// Print the tree a query parses into.
fn show_tree(args: &ShowTreeArgs, cli_args: &DcSearchArgs) -> Result<()> {
    let tree = parse_query(&args.query)?;
    tree.validate()?;

    let result = QueryTreeResult {
        leaf_count: tree.leaf_count(),
        depth: tree.depth(),
        tree,
    };
    output_result(&result, cli_args)?;
    Ok(())
}
