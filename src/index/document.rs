//! Fetching document contents by doc id.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::index::DocId;
use crate::storage::{FileStorage, Storage, StorageConfig};

/// Resolves doc ids back to files in the document directory.
///
/// A document's file name is the decimal rendering of its id.
#[derive(Debug)]
pub struct DocumentStore {
    storage: FileStorage,
}

impl DocumentStore {
    pub fn new<P: AsRef<Path>>(doc_dir: P) -> Result<Self> {
        Ok(DocumentStore {
            storage: FileStorage::open(doc_dir, StorageConfig::default())?,
        })
    }

    /// File name of a document.
    pub fn file_name(doc_id: DocId) -> String {
        doc_id.to_string()
    }

    /// Full path of a document.
    pub fn path_for(&self, doc_id: DocId) -> PathBuf {
        self.storage.file_path(&Self::file_name(doc_id))
    }

    pub fn contains(&self, doc_id: DocId) -> bool {
        self.storage.file_exists(&Self::file_name(doc_id))
    }

    /// Raw bytes of a document.
    pub fn fetch(&self, doc_id: DocId) -> Result<Vec<u8>> {
        self.storage.read_all(&Self::file_name(doc_id))
    }

    /// Document contents as text; invalid UTF-8 is replaced.
    pub fn fetch_text(&self, doc_id: DocId) -> Result<String> {
        Ok(String::from_utf8_lossy(&self.fetch(doc_id)?).into_owned())
    }
}
