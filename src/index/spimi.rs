//! Bounded-memory indexing: numbered segments plus a final merge.
//!
//! Documents accumulate in an [`InMemoryIndex`] until the bytes processed
//! since the last flush exceed the budget. The buffer is then written as
//! segment `N` (`<N>.dict` + `<N>.post`) and cleared. A vocabulary of every
//! term ever flushed is kept across segments so the merge visits each term
//! exactly once.

use ahash::AHashSet;
use tracing::{debug, info, warn};

use crate::error::{DcSearchError, Result};
use crate::index::DocId;
use crate::index::dictionary::Dictionary;
use crate::index::posting::{PostingsReader, normalize};
use crate::index::writer::{IndexFileWriter, InMemoryIndex, write_entries};
use crate::storage::Storage;

/// A flushed segment on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub id: usize,
    pub dict_name: String,
    pub post_name: String,
}

impl Segment {
    fn new(id: usize) -> Self {
        Segment {
            id,
            dict_name: format!("{id}.dict"),
            post_name: format!("{id}.post"),
        }
    }
}

/// Segment builder for one bounded index run.
///
/// Segment files are removed by [`SpimiBuilder::cleanup`] or, failing that,
/// when the builder is dropped.
#[derive(Debug)]
pub struct SpimiBuilder<'a> {
    storage: &'a dyn Storage,
    memory_budget: usize,
    buffer: InMemoryIndex,
    bytes_since_flush: usize,
    vocabulary: AHashSet<String>,
    segments: Vec<Segment>,
}

impl<'a> SpimiBuilder<'a> {
    /// Create a builder writing segments into `storage`.
    ///
    /// `memory_budget` must be at least 1 byte.
    pub fn new(storage: &'a dyn Storage, memory_budget: usize) -> Result<Self> {
        if memory_budget == 0 {
            return Err(DcSearchError::invalid_argument(
                "memory budget must be at least 1 byte",
            ));
        }
        Ok(SpimiBuilder {
            storage,
            memory_budget,
            buffer: InMemoryIndex::new(),
            bytes_since_flush: 0,
            vocabulary: AHashSet::new(),
            segments: Vec::new(),
        })
    }

    /// Buffer one document and flush if the budget is now exceeded.
    pub fn add_document<I>(&mut self, doc_id: DocId, terms: I, byte_len: usize) -> Result<()>
    where
        I: IntoIterator<Item = String>,
    {
        self.buffer.add_document(doc_id, terms);
        self.bytes_since_flush = self.bytes_since_flush.saturating_add(byte_len);

        if self.bytes_since_flush > self.memory_budget {
            self.flush_segment()?;
        }
        Ok(())
    }

    /// Write the buffered documents as the next segment.
    ///
    /// Does nothing when no document is buffered.
    pub fn flush_segment(&mut self) -> Result<()> {
        if self.buffer.doc_count() == 0 {
            return Ok(());
        }

        let segment = Segment::new(self.segments.len());
        let docs = self.buffer.doc_count();
        let entries = self.buffer.drain_sorted();
        for (term, _) in &entries {
            if !self.vocabulary.contains(term) {
                self.vocabulary.insert(term.clone());
            }
        }

        // Registered first so a failed write is still cleaned up.
        self.segments.push(segment.clone());
        let terms = write_entries(
            self.storage,
            &segment.dict_name,
            &segment.post_name,
            &entries,
        )?;

        debug!(
            segment = segment.id,
            docs,
            terms,
            bytes = self.bytes_since_flush,
            "flushed segment"
        );
        self.bytes_since_flush = 0;
        Ok(())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of distinct keys flushed so far, the universe key included.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Flush the remaining buffer and merge every segment into one
    /// dictionary/postings pair. Returns the number of keys written.
    pub fn merge_into(&mut self, dict_name: &str, post_name: &str) -> Result<usize> {
        self.flush_segment()?;

        let mut sources = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            let dictionary = Dictionary::load(self.storage, &segment.dict_name)?;
            let postings = PostingsReader::open(self.storage, &segment.post_name)?;
            sources.push((dictionary, postings));
        }

        let mut terms: Vec<&String> = self.vocabulary.iter().collect();
        terms.sort_unstable();

        let mut writer = IndexFileWriter::new(self.storage, dict_name, post_name)?;
        for term in terms {
            let mut merged = Vec::new();
            for (dictionary, postings) in &sources {
                if let Some(pointer) = dictionary.get(term) {
                    merged.extend(postings.read(pointer)?);
                }
            }
            normalize(&mut merged);
            writer.add_term(term, &merged)?;
        }

        let written = writer.finish()?;
        info!(
            segments = self.segments.len(),
            terms = written,
            "merged segments"
        );
        Ok(written)
    }

    /// Delete every segment file written by this builder.
    pub fn cleanup(&mut self) -> Result<()> {
        for segment in self.segments.drain(..) {
            self.storage.delete_file(&segment.dict_name)?;
            self.storage.delete_file(&segment.post_name)?;
        }
        Ok(())
    }
}

impl Drop for SpimiBuilder<'_> {
    fn drop(&mut self) {
        if !self.segments.is_empty() {
            if let Err(e) = self.cleanup() {
                warn!(error = %e, "failed to remove segment files");
            }
        }
    }
}
