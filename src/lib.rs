//! # dcsearch
//!
//! An embedded boolean full-text search engine over a flat directory of
//! documents, where each file is one document named by its integer id.
//!
//! - [`index`] builds `dict` / `post` / `stat` index files, in memory or in
//!   bounded-memory segments that are merged at the end
//! - [`query`] evaluates AND / OR / NOT trees over sorted postings lists
//! - [`search`] ties both together behind [`search::Searcher`]
//!
//! ```no_run
//! use dcsearch::config::SearcherConfig;
//! use dcsearch::index::build_index;
//! use dcsearch::query::QueryNode;
//! use dcsearch::search::Searcher;
//!
//! build_index("docs", "index").unwrap();
//! let searcher = Searcher::open("index", SearcherConfig::default()).unwrap();
//! let tree = QueryNode::and(vec![QueryNode::text("cat"), QueryNode::text("dog")]);
//! let hits = searcher.search(&tree).unwrap();
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod index;
pub mod query;
pub mod search;
pub mod storage;

pub use error::{DcSearchError, Result};
