//! Tokenizers split raw text into a stream of tokens.
//!
//! - [`unicode_word::UnicodeWordTokenizer`] - Unicode word boundaries (UAX #29)
//! - [`whitespace::WhitespaceTokenizer`] - Splits on whitespace characters

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// Implementations must be deterministic: the same text always yields the
/// same token sequence.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer.
    fn name(&self) -> &'static str;
}

pub mod unicode_word;
pub mod whitespace;
