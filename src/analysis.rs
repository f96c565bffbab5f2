//! Text analysis: turning document and query text into index terms.
//!
//! The indexer and the query evaluator must agree on how text becomes terms,
//! so both sides go through the same [`Analyzer`](analyzer::Analyzer). An
//! analyzer is a tokenizer followed by a chain of token filters:
//!
//! ```text
//! Tokenizer → Lowercase → Stop Words → Terms
//! ```
//!
//! Every analyzer is deterministic, and every term it yields is non-empty and
//! free of whitespace, which the dictionary file format relies on.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

use crate::analysis::analyzer::Analyzer;
use crate::error::Result;

/// Run `text` through `analyzer` and collect the surviving term texts in order.
///
/// Stopped tokens are dropped.
///
/// # Examples
///
/// ```
/// use dcsearch::analysis::analyze_terms;
/// use dcsearch::analysis::analyzer::standard::StandardAnalyzer;
///
/// let analyzer = StandardAnalyzer::new();
/// let terms = analyze_terms(&analyzer, "The Cat and the Dog").unwrap();
/// assert_eq!(terms, vec!["cat", "dog"]);
/// ```
pub fn analyze_terms(analyzer: &dyn Analyzer, text: &str) -> Result<Vec<String>> {
    Ok(analyzer
        .analyze(text)?
        .filter(|token| !token.is_stopped() && !token.text.is_empty())
        .map(|token| token.text)
        .collect())
}
