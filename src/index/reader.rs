//! Loading a built index for querying.

use std::path::Path;

use crate::error::Result;
use crate::index::dictionary::Dictionary;
use crate::index::posting::PostingsReader;
use crate::index::stats::CollectionStats;
use crate::index::{ALL_TERM, DICT_FILE, DocId, POST_FILE, STAT_FILE};
use crate::storage::{FileStorage, StorageConfig};

fn open_index_dir(index_dir: &Path) -> Result<FileStorage> {
    FileStorage::open(index_dir, StorageConfig::default())
}

/// Load `<index_dir>/stat`.
pub fn load_stats<P: AsRef<Path>>(index_dir: P) -> Result<CollectionStats> {
    let storage = open_index_dir(index_dir.as_ref())?;
    CollectionStats::load(&storage, STAT_FILE)
}

/// Load `<index_dir>/dict`.
pub fn load_dictionary<P: AsRef<Path>>(index_dir: P) -> Result<Dictionary> {
    let storage = open_index_dir(index_dir.as_ref())?;
    Dictionary::load(&storage, DICT_FILE)
}

/// Open `<index_dir>/post`. The handle is closed when dropped.
pub fn open_postings<P: AsRef<Path>>(index_dir: P) -> Result<PostingsReader> {
    let storage = open_index_dir(index_dir.as_ref())?;
    PostingsReader::open(&storage, POST_FILE)
}

/// Read the universe list, empty if the index has none.
pub fn load_universe(dictionary: &Dictionary, postings: &PostingsReader) -> Result<Vec<DocId>> {
    match dictionary.get(ALL_TERM) {
        Some(pointer) => postings.read(pointer),
        None => Ok(Vec::new()),
    }
}

/// Everything needed to evaluate queries against one index directory.
#[derive(Debug)]
pub struct IndexReader {
    stats: CollectionStats,
    dictionary: Dictionary,
    postings: PostingsReader,
    universe: Vec<DocId>,
}

impl IndexReader {
    /// Load stats and dictionary, open the postings file and read the
    /// universe list.
    pub fn open<P: AsRef<Path>>(index_dir: P) -> Result<Self> {
        let storage = open_index_dir(index_dir.as_ref())?;
        let stats = CollectionStats::load(&storage, STAT_FILE)?;
        let dictionary = Dictionary::load(&storage, DICT_FILE)?;
        let postings = PostingsReader::open(&storage, POST_FILE)?;
        let universe = load_universe(&dictionary, &postings)?;

        Ok(IndexReader {
            stats,
            dictionary,
            postings,
            universe,
        })
    }

    pub fn stats(&self) -> &CollectionStats {
        &self.stats
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn postings(&self) -> &PostingsReader {
        &self.postings
    }

    /// Every indexed doc id, ascending.
    pub fn universe(&self) -> &[DocId] {
        &self.universe
    }

    /// Number of real terms, not counting the universe list.
    pub fn term_count(&self) -> usize {
        self.dictionary.len() - usize::from(self.dictionary.contains(ALL_TERM))
    }

    /// Postings of an exact dictionary term, empty if absent.
    pub fn postings_for(&self, term: &str) -> Result<Vec<DocId>> {
        match self.dictionary.get(term) {
            Some(pointer) => self.postings.read(pointer),
            None => Ok(Vec::new()),
        }
    }
}
