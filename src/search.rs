//! Searching a built index.
//!
//! ```no_run
//! use dcsearch::config::SearcherConfig;
//! use dcsearch::search::Searcher;
//!
//! let searcher = Searcher::open("/data/index", SearcherConfig::default()).unwrap();
//! let hits = searcher.search_text("cat & !dog").unwrap();
//! println!("{hits:?}");
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::analysis::analyzer::Analyzer;
use crate::config::SearcherConfig;
use crate::error::Result;
use crate::index::reader::IndexReader;
use crate::index::{CollectionStats, Dictionary, DocId};
use crate::query::evaluator::Evaluator;
use crate::query::node::QueryNode;
use crate::query::parser::parse_query;

/// Query entry point over one index directory.
pub struct Searcher {
    index_dir: PathBuf,
    reader: IndexReader,
    analyzer: Arc<dyn Analyzer>,
    config: SearcherConfig,
}

impl Searcher {
    /// Load the index in `index_dir`.
    pub fn open<P: AsRef<Path>>(index_dir: P, config: SearcherConfig) -> Result<Self> {
        let index_dir = index_dir.as_ref().to_path_buf();
        let reader = IndexReader::open(&index_dir)?;
        info!(
            index_dir = %index_dir.display(),
            docs = reader.stats().num_of_docs,
            terms = reader.term_count(),
            "index loaded"
        );

        Ok(Searcher {
            index_dir,
            reader,
            analyzer: config.analyzer.build(),
            config,
        })
    }

    /// Replace the query-time analyzer with a custom one.
    pub fn with_analyzer(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn index_dir(&self) -> &Path {
        &self.index_dir
    }

    pub fn stats(&self) -> &CollectionStats {
        self.reader.stats()
    }

    pub fn dictionary(&self) -> &Dictionary {
        self.reader.dictionary()
    }

    pub fn reader(&self) -> &IndexReader {
        &self.reader
    }

    /// Query-time analyzer, also the one predicate pushdown must split with.
    pub fn analyzer(&self) -> &dyn Analyzer {
        self.analyzer.as_ref()
    }

    /// Evaluate a query tree into ascending doc ids.
    pub fn search(&self, tree: &QueryNode) -> Result<Vec<DocId>> {
        let start = Instant::now();
        let hits = Evaluator::new(
            self.reader.dictionary(),
            self.reader.postings(),
            self.reader.universe(),
            self.analyzer.as_ref(),
        )
        .with_parallel(self.config.parallel)
        .evaluate(tree)?;

        debug!(
            leaves = tree.leaf_count(),
            hits = hits.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "query evaluated"
        );
        Ok(hits)
    }

    /// Parse a text query and evaluate it.
    pub fn search_text(&self, query: &str) -> Result<Vec<DocId>> {
        self.search(&parse_query(query)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DcSearchError;
    use crate::index::build_index;
    use tempfile::TempDir;

    #[test]
    fn test_search_built_index() {
        let docs = TempDir::new().unwrap();
        let index = TempDir::new().unwrap();
        std::fs::write(docs.path().join("1"), "red apple").unwrap();
        std::fs::write(docs.path().join("2"), "green apple").unwrap();
        build_index(docs.path(), index.path()).unwrap();

        let searcher = Searcher::open(index.path(), SearcherConfig::default()).unwrap();
        assert_eq!(searcher.stats().num_of_docs, 2);
        assert_eq!(searcher.search_text("apple").unwrap(), vec![1, 2]);
        assert_eq!(searcher.search_text("apple !red").unwrap(), vec![2]);
        assert!(matches!(
            searcher.search_text("(apple"),
            Err(DcSearchError::QueryParse(_))
        ));
    }
}
