//! Analyzers combine a tokenizer with token filters.
//!
//! - [`standard::StandardAnalyzer`] - Unicode words, lowercase, English stop words
//! - [`simple::SimpleAnalyzer`] - Unicode words, lowercase
//! - [`whitespace::WhitespaceAnalyzer`] - Whitespace split only
//! - [`pipeline::PipelineAnalyzer`] - Any tokenizer with any filter chain

use std::any::Any;

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// Index and query time must use the same analyzer, otherwise a query term
/// may not match the term stored for the same word.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer.
    fn name(&self) -> &str;

    /// Provide access to the concrete type for downcasting.
    fn as_any(&self) -> &dyn Any;
}

pub mod pipeline;
pub mod simple;
pub mod standard;
pub mod whitespace;
