//! In-memory term accumulation and dictionary/postings file output.
//!
//! [`InMemoryIndex`] collects term → doc id lists while documents are
//! scanned. [`IndexFileWriter`] turns sorted `(term, postings)` pairs into a
//! dictionary file and a postings file. Both the single-pass build and the
//! segment flush/merge path of the bounded build go through these two types.

use std::io::Write;

use ahash::AHashMap;
use tracing::{debug, warn};

use crate::error::{DcSearchError, Result};
use crate::index::dictionary::{PostingPointer, write_entry};
use crate::index::posting::{PostingsWriter, normalize};
use crate::index::{ALL_TERM, DocId};
use crate::storage::{Storage, StorageOutput};

/// Term → postings accumulator for the documents seen so far.
///
/// The universe list lives in the same map under [`ALL_TERM`].
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    postings: AHashMap<String, Vec<DocId>>,
    doc_count: usize,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the terms of one document.
    ///
    /// A doc id is appended to a term's list only if it is not already the
    /// last entry, so a term repeated inside one document is stored once.
    pub fn add_document<I>(&mut self, doc_id: DocId, terms: I)
    where
        I: IntoIterator<Item = String>,
    {
        for term in terms {
            if term == ALL_TERM {
                warn!(doc_id, term = %term, "dropping term equal to the reserved universe key");
                continue;
            }
            Self::append(self.postings.entry(term).or_default(), doc_id);
        }
        Self::append(
            self.postings.entry(ALL_TERM.to_string()).or_default(),
            doc_id,
        );
        self.doc_count += 1;
    }

    fn append(list: &mut Vec<DocId>, doc_id: DocId) {
        if list.last() != Some(&doc_id) {
            list.push(doc_id);
        }
    }

    /// Number of distinct keys, the universe key included.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Number of documents added since creation or the last drain.
    pub fn doc_count(&self) -> usize {
        self.doc_count
    }

    pub fn get(&self, term: &str) -> Option<&[DocId]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    /// Take every entry out, sorted by term, each list sorted and deduplicated.
    pub fn drain_sorted(&mut self) -> Vec<(String, Vec<DocId>)> {
        self.doc_count = 0;
        let mut entries: Vec<(String, Vec<DocId>)> = self
            .postings
            .drain()
            .map(|(term, mut list)| {
                normalize(&mut list);
                (term, list)
            })
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

/// Writes a dictionary file and its postings file side by side.
#[derive(Debug)]
pub struct IndexFileWriter {
    dict: Box<dyn StorageOutput>,
    dict_name: String,
    postings: PostingsWriter,
    term_count: usize,
}

impl IndexFileWriter {
    pub fn new(storage: &dyn Storage, dict_name: &str, post_name: &str) -> Result<Self> {
        Ok(IndexFileWriter {
            dict: storage.create_output(dict_name)?,
            dict_name: dict_name.to_string(),
            postings: PostingsWriter::new(storage, post_name)?,
            term_count: 0,
        })
    }

    /// Append `postings` to the postings file and record its pointer.
    ///
    /// Terms must be non-empty and free of whitespace to keep the
    /// dictionary parseable.
    pub fn add_term(&mut self, term: &str, postings: &[DocId]) -> Result<PostingPointer> {
        if term.is_empty() || term.chars().any(char::is_whitespace) {
            return Err(DcSearchError::index_write(format!(
                "term {term:?} cannot be stored in the dictionary"
            )));
        }

        let pointer = self.postings.append(postings)?;
        write_entry(&mut self.dict, term, &pointer)
            .map_err(|e| DcSearchError::index_write(format!("{}: {e}", self.dict_name)))?;
        self.term_count += 1;
        Ok(pointer)
    }

    /// Number of terms written so far.
    pub fn term_count(&self) -> usize {
        self.term_count
    }

    /// Flush and sync both files. Returns the number of terms written.
    pub fn finish(mut self) -> Result<usize> {
        self.dict.flush_and_sync()?;
        let postings_bytes = self.postings.position();
        self.postings.finish()?;
        debug!(
            dict = %self.dict_name,
            terms = self.term_count,
            postings_bytes,
            "wrote dictionary and postings"
        );
        Ok(self.term_count)
    }
}

/// Write sorted entries through a fresh [`IndexFileWriter`].
pub fn write_entries(
    storage: &dyn Storage,
    dict_name: &str,
    post_name: &str,
    entries: &[(String, Vec<DocId>)],
) -> Result<usize> {
    let mut writer = IndexFileWriter::new(storage, dict_name, post_name)?;
    for (term, postings) in entries {
        writer.add_term(term, postings)?;
    }
    writer.finish()
}
