//! Building an index from a directory of documents.
//!
//! Each regular file in the document directory is one document; its file
//! name is its decimal doc id. Two strategies are available:
//!
//! - [`build_index`] keeps the whole dictionary in memory.
//! - [`build_index_bounded`] flushes segments whenever a byte budget is
//!   exceeded and merges them at the end.
//!
//! Both produce the same `dict`, `post` and `stat` files for the same input.
//!
//! # Examples
//!
//! ```no_run
//! use dcsearch::index::build_index;
//!
//! let summary = build_index("/data/docs", "/data/index").unwrap();
//! println!("{} documents, {} bytes", summary.doc_count, summary.total_bytes);
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::analysis::analyze_terms;
use crate::analysis::analyzer::Analyzer;
use crate::config::IndexerConfig;
use crate::error::{DcSearchError, Result};
use crate::index::spimi::SpimiBuilder;
use crate::index::stats::CollectionStats;
use crate::index::writer::{InMemoryIndex, write_entries};
use crate::index::{DICT_FILE, DocId, POST_FILE, STAT_FILE};
use crate::storage::{FileStorage, Storage, StorageConfig};

/// Result of a completed index build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSummary {
    /// Documents indexed.
    pub doc_count: u64,
    /// Sum of the documents' byte sizes.
    pub total_bytes: u64,
    /// Distinct terms written, not counting the universe list.
    pub term_count: usize,
    /// Segments flushed; 0 for an in-memory build.
    pub segment_count: usize,
}

/// Build an index with the default configuration.
pub fn build_index<P: AsRef<Path>, Q: AsRef<Path>>(
    doc_dir: P,
    index_dir: Q,
) -> Result<IndexSummary> {
    Indexer::new(IndexerConfig::default()).build(doc_dir, index_dir)
}

/// Build an index in segments of roughly `memory_budget` input bytes.
pub fn build_index_bounded<P: AsRef<Path>, Q: AsRef<Path>>(
    doc_dir: P,
    index_dir: Q,
    memory_budget: usize,
) -> Result<IndexSummary> {
    Indexer::new(IndexerConfig::default().with_memory_budget(memory_budget))
        .build(doc_dir, index_dir)
}

/// Parse a document file name into its doc id.
///
/// Only the canonical decimal form is accepted (`"12"`, not `"012"` or
/// `"+12"`), so that the id always renders back to the same file name.
pub fn parse_doc_id(name: &str) -> Result<DocId> {
    let doc_id: DocId = name
        .parse()
        .map_err(|_| DcSearchError::invalid_document_id(name))?;
    if doc_id.to_string() != name {
        return Err(DcSearchError::invalid_document_id(name));
    }
    Ok(doc_id)
}

/// Output file names for one build.
#[derive(Debug, Clone)]
struct ArtifactNames {
    dict: String,
    post: String,
    stat: String,
    staged: bool,
}

impl ArtifactNames {
    fn new(staged: bool) -> Self {
        let name = |base: &str| {
            if staged {
                format!("{base}.tmp")
            } else {
                base.to_string()
            }
        };
        ArtifactNames {
            dict: name(DICT_FILE),
            post: name(POST_FILE),
            stat: name(STAT_FILE),
            staged,
        }
    }

    /// Rename staged files onto their final names. The stat file goes last.
    fn publish(&self, storage: &dyn Storage) -> Result<()> {
        if self.staged {
            storage.rename_file(&self.post, POST_FILE)?;
            storage.rename_file(&self.dict, DICT_FILE)?;
            storage.rename_file(&self.stat, STAT_FILE)?;
        }
        Ok(())
    }

    fn discard(&self, storage: &dyn Storage) {
        if !self.staged {
            return;
        }
        for name in [&self.dict, &self.post, &self.stat] {
            if let Err(e) = storage.delete_file(name) {
                warn!(file = %name, error = %e, "failed to remove staged file");
            }
        }
    }
}

/// Builds indexes according to an [`IndexerConfig`].
pub struct Indexer {
    config: IndexerConfig,
    analyzer: Arc<dyn Analyzer>,
}

impl Indexer {
    /// Create an indexer using the analyzer named in `config`.
    pub fn new(config: IndexerConfig) -> Self {
        let analyzer = config.analyzer.build();
        Indexer { config, analyzer }
    }

    /// Replace the analyzer with a custom one.
    pub fn with_analyzer(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Index every document in `doc_dir` into `index_dir`.
    pub fn build<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        doc_dir: P,
        index_dir: Q,
    ) -> Result<IndexSummary> {
        let start = Instant::now();
        let docs = FileStorage::open(doc_dir.as_ref(), StorageConfig::default())?;
        let output = FileStorage::create(index_dir.as_ref(), StorageConfig::default())?;
        let names = ArtifactNames::new(self.config.publish_atomically);

        let result = match self.config.memory_budget {
            None => self.build_in_memory(&docs, &output, &names),
            Some(budget) => self.build_in_segments(&docs, &output, &names, budget),
        }
        .and_then(|summary| {
            names.publish(&output)?;
            Ok(summary)
        });

        match &result {
            Ok(summary) => info!(
                docs = summary.doc_count,
                bytes = summary.total_bytes,
                terms = summary.term_count,
                segments = summary.segment_count,
                analyzer = self.analyzer.name(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                index_dir = %index_dir.as_ref().display(),
                "index built"
            ),
            Err(_) => names.discard(&output),
        }
        result
    }

    fn build_in_memory(
        &self,
        docs: &FileStorage,
        output: &FileStorage,
        names: &ArtifactNames,
    ) -> Result<IndexSummary> {
        let mut memory = InMemoryIndex::new();
        let stats = self.scan(docs, |doc_id, terms, _| {
            memory.add_document(doc_id, terms);
            Ok(())
        })?;

        let written = write_entries(output, &names.dict, &names.post, &memory.drain_sorted())?;
        stats.write(output, &names.stat)?;

        Ok(IndexSummary {
            doc_count: stats.num_of_docs,
            total_bytes: stats.num_of_bytes,
            term_count: written.saturating_sub(usize::from(stats.num_of_docs > 0)),
            segment_count: 0,
        })
    }

    fn build_in_segments(
        &self,
        docs: &FileStorage,
        output: &FileStorage,
        names: &ArtifactNames,
        budget: usize,
    ) -> Result<IndexSummary> {
        let mut builder = SpimiBuilder::new(output, budget)?;
        let stats = self.scan(docs, |doc_id, terms, byte_len| {
            builder.add_document(doc_id, terms, byte_len)
        })?;

        let written = builder.merge_into(&names.dict, &names.post)?;
        let segment_count = builder.segments().len();
        builder.cleanup()?;
        stats.write(output, &names.stat)?;

        Ok(IndexSummary {
            doc_count: stats.num_of_docs,
            total_bytes: stats.num_of_bytes,
            term_count: written.saturating_sub(usize::from(stats.num_of_docs > 0)),
            segment_count,
        })
    }

    /// Read, analyze and hand every document to `visit`.
    ///
    /// Any unreadable document aborts the scan.
    fn scan<F>(&self, docs: &FileStorage, mut visit: F) -> Result<CollectionStats>
    where
        F: FnMut(DocId, Vec<String>, usize) -> Result<()>,
    {
        let mut stats = CollectionStats::default();

        for name in docs.list_files()? {
            let doc_id = parse_doc_id(&name)?;
            let content = docs.read_all(&name)?;
            let terms = analyze_terms(self.analyzer.as_ref(), &String::from_utf8_lossy(&content))?;
            debug!(doc_id, bytes = content.len(), terms = terms.len(), "indexing document");

            visit(doc_id, terms, content.len())?;
            stats.num_of_docs += 1;
            stats.num_of_bytes += content.len() as u64;
        }

        Ok(stats)
    }
}
