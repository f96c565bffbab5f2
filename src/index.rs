//! Inverted index: building, persisting and loading.
//!
//! An index directory holds three files:
//!
//! ```text
//! <indexdir>/dict   "<term> <offset> <length>\n" lines
//! <indexdir>/post   flat blob of space-terminated decimal doc ids
//! <indexdir>/stat   "NUM_OF_DOCS:<n>\nNUM_OF_BYTES:<n>"
//! ```
//!
//! The universe of indexed documents is stored as an ordinary postings list
//! under the reserved dictionary key [`ALL_TERM`].

pub mod dictionary;
pub mod document;
pub mod indexer;
pub mod posting;
pub mod reader;
pub mod spimi;
pub mod stats;
pub mod writer;

pub use dictionary::{Dictionary, PostingPointer};
pub use document::DocumentStore;
pub use indexer::{IndexSummary, Indexer, build_index, build_index_bounded};
pub use posting::PostingsReader;
pub use reader::{IndexReader, load_dictionary, load_stats};
pub use stats::CollectionStats;

/// A document identifier. It is also the document's file name.
pub type DocId = u64;

/// Dictionary file name.
pub const DICT_FILE: &str = "dict";

/// Postings file name.
pub const POST_FILE: &str = "post";

/// Stats file name.
pub const STAT_FILE: &str = "stat";

/// Dictionary key of the postings list holding every indexed document.
///
/// `#` never survives word tokenization, and a whitespace analyzer term
/// equal to this key is dropped at index time, so the key cannot collide
/// with a real term.
pub const ALL_TERM: &str = "#ALL";
