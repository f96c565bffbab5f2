//! Command line argument parsing for the dcsearch CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::AnalyzerKind;

/// dcsearch - boolean full-text search over a directory of documents
#[derive(Parser, Debug, Clone)]
#[command(name = "dcsearch")]
#[command(about = "Boolean full-text search over a directory of documents")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct DcSearchArgs {
    /// Verbosity level (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl DcSearchArgs {
    /// Effective verbosity: 0 quiet, 1 normal, 2 verbose, 3 debug.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build an index from a document directory
    Index(IndexArgs),

    /// Evaluate a query against an index
    Search(SearchArgs),

    /// Show index statistics
    Stats(StatsArgs),

    /// Parse a query and print its tree
    #[command(name = "show-tree")]
    ShowTree(ShowTreeArgs),
}

/// Arguments for building an index
#[derive(Parser, Debug, Clone)]
pub struct IndexArgs {
    /// Directory of documents, one file per document named by its id
    #[arg(value_name = "DOC_DIR")]
    pub doc_dir: PathBuf,

    /// Directory to write the index into
    #[arg(value_name = "INDEX_DIR")]
    pub index_dir: PathBuf,

    /// Index in segments of at most this many input bytes, then merge
    #[arg(short, long, value_name = "BYTES")]
    pub memory_budget: Option<usize>,

    /// Analyzer used to extract terms
    #[arg(short, long)]
    pub analyzer: Option<AnalyzerKind>,

    /// Engine configuration file (JSON)
    #[arg(short, long, value_name = "FILE", env = "DCSEARCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the final files in place instead of renaming staged copies
    #[arg(long)]
    pub no_atomic: bool,
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Path to the index directory
    #[arg(value_name = "INDEX_DIR")]
    pub index_dir: PathBuf,

    /// Query text such as "cat & !dog", or a JSON tree with --json-tree
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Treat QUERY as a JSON-encoded query tree
    #[arg(long)]
    pub json_tree: bool,

    /// Document directory, to show file paths and snippets for hits
    #[arg(short, long, value_name = "DOC_DIR")]
    pub doc_dir: Option<PathBuf>,

    /// Maximum number of hits to print
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Evaluate sibling subtrees in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Analyzer used to normalize query terms
    #[arg(short, long)]
    pub analyzer: Option<AnalyzerKind>,

    /// Engine configuration file (JSON)
    #[arg(short, long, value_name = "FILE", env = "DCSEARCH_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Arguments for showing statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Path to the index directory
    #[arg(value_name = "INDEX_DIR")]
    pub index_dir: PathBuf,
}

/// Arguments for printing a query tree
#[derive(Parser, Debug, Clone)]
pub struct ShowTreeArgs {
    /// Query text
    #[arg(value_name = "QUERY")]
    pub query: String,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
