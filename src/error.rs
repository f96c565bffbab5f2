//! Error types for dcsearch.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side
//! is the [`DcSearchError`] enum. Indexing and evaluation failures are fatal
//! to the operation in progress; nothing is retried or partially recovered.
//!
//! # Examples
//!
//! ```
//! use dcsearch::error::{DcSearchError, Result};
//!
//! fn check_arity(children: usize) -> Result<()> {
//!     if children != 1 {
//!         return Err(DcSearchError::malformed_query_tree("NOT takes one child"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_arity(2).is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for dcsearch operations.
#[derive(Error, Debug)]
pub enum DcSearchError {
    /// The document or index directory could not be opened.
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    /// A document filename is not a valid document id.
    #[error("Invalid document id: {0}")]
    InvalidDocumentId(String),

    /// An index output file could not be created or written.
    #[error("Index write error: {0}")]
    IndexWrite(String),

    /// The stats file does not match `NUM_OF_DOCS:<n>\nNUM_OF_BYTES:<n>`.
    #[error("Corrupt stats: {0}")]
    CorruptStats(String),

    /// The dictionary file has a malformed triple or a duplicated term.
    #[error("Corrupt dictionary: {0}")]
    CorruptDictionary(String),

    /// A postings pointer lies outside the postings file, or the blob is not
    /// a list of integers.
    #[error("Corrupt postings: {0}")]
    CorruptPostings(String),

    /// A query tree violates the operator or arity rules.
    #[error("Malformed query tree: {0}")]
    MalformedQueryTree(String),

    /// Analysis errors (tokenization, filtering)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// The textual query could not be parsed.
    #[error("Query parse error: {0}")]
    QueryParse(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with DcSearchError.
pub type Result<T> = std::result::Result<T, DcSearchError>;

impl DcSearchError {
    /// Create a new directory-not-found error.
    pub fn directory_not_found<S: Into<String>>(msg: S) -> Self {
        DcSearchError::DirectoryNotFound(msg.into())
    }

    /// Create a new invalid-document-id error.
    pub fn invalid_document_id<S: Into<String>>(msg: S) -> Self {
        DcSearchError::InvalidDocumentId(msg.into())
    }

    /// Create a new index write error.
    pub fn index_write<S: Into<String>>(msg: S) -> Self {
        DcSearchError::IndexWrite(msg.into())
    }

    /// Create a new corrupt stats error.
    pub fn corrupt_stats<S: Into<String>>(msg: S) -> Self {
        DcSearchError::CorruptStats(msg.into())
    }

    /// Create a new corrupt dictionary error.
    pub fn corrupt_dictionary<S: Into<String>>(msg: S) -> Self {
        DcSearchError::CorruptDictionary(msg.into())
    }

    /// Create a new corrupt postings error.
    pub fn corrupt_postings<S: Into<String>>(msg: S) -> Self {
        DcSearchError::CorruptPostings(msg.into())
    }

    /// Create a new malformed query tree error.
    pub fn malformed_query_tree<S: Into<String>>(msg: S) -> Self {
        DcSearchError::MalformedQueryTree(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        DcSearchError::Analysis(msg.into())
    }

    /// Create a new query parse error.
    pub fn query_parse<S: Into<String>>(msg: S) -> Self {
        DcSearchError::QueryParse(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        DcSearchError::Storage(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        DcSearchError::InvalidArgument(msg.into())
    }

    /// Whether this error reports a damaged on-disk artifact.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            DcSearchError::CorruptStats(_)
                | DcSearchError::CorruptDictionary(_)
                | DcSearchError::CorruptPostings(_)
        )
    }
}
