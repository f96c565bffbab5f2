//! Engine configuration.
//!
//! Configuration is plain data with `serde` support, so a whole engine setup
//! can be kept in a JSON file:
//!
//! ```json
//! {
//!   "indexer": { "analyzer": "standard", "memory_budget": 1048576 },
//!   "searcher": { "analyzer": "standard", "parallel": true }
//! }
//! ```
//!
//! Missing fields fall back to their defaults.

use std::path::Path;
use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::simple::SimpleAnalyzer;
use crate::analysis::analyzer::standard::StandardAnalyzer;
use crate::analysis::analyzer::whitespace::WhitespaceAnalyzer;
use crate::error::{DcSearchError, Result};

/// Which analyzer turns text into terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerKind {
    /// Unicode words, lowercase, English stop words.
    #[default]
    Standard,
    /// Unicode words, lowercase.
    Simple,
    /// Whitespace-separated words, verbatim.
    Whitespace,
}

impl AnalyzerKind {
    /// Build the analyzer this kind names.
    pub fn build(self) -> Arc<dyn Analyzer> {
        match self {
            AnalyzerKind::Standard => Arc::new(StandardAnalyzer::new()),
            AnalyzerKind::Simple => Arc::new(SimpleAnalyzer::new()),
            AnalyzerKind::Whitespace => Arc::new(WhitespaceAnalyzer::new()),
        }
    }
}

/// Configuration for building an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Analyzer applied to every document.
    pub analyzer: AnalyzerKind,

    /// When set, documents are indexed in segments holding at most roughly
    /// this many bytes of input each, then merged.
    pub memory_budget: Option<usize>,

    /// Write the final files under temporary names and rename them into
    /// place once all of them are complete.
    pub publish_atomically: bool,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        IndexerConfig {
            analyzer: AnalyzerKind::Standard,
            memory_budget: None,
            publish_atomically: true,
        }
    }
}

impl IndexerConfig {
    /// Set the segment memory budget in bytes.
    pub fn with_memory_budget(mut self, budget: usize) -> Self {
        self.memory_budget = Some(budget);
        self
    }

    /// Set the analyzer kind.
    pub fn with_analyzer(mut self, analyzer: AnalyzerKind) -> Self {
        self.analyzer = analyzer;
        self
    }
}

/// Configuration for evaluating queries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearcherConfig {
    /// Analyzer applied to TEXT_MATCH operands. Must match the indexer's.
    pub analyzer: AnalyzerKind,

    /// Evaluate the children of AND/OR nodes concurrently.
    pub parallel: bool,
}

impl SearcherConfig {
    /// Enable or disable parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the analyzer kind.
    pub fn with_analyzer(mut self, analyzer: AnalyzerKind) -> Self {
        self.analyzer = analyzer;
        self
    }
}

/// Indexer and searcher settings together.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub indexer: IndexerConfig,
    pub searcher: SearcherConfig,
}

impl EngineConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DcSearchError::invalid_argument(format!(
                "cannot read config {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&content)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Serialize this configuration as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
