//! Stop filter implementation.
//!
//! ```
//! use dcsearch::analysis::token::Token;
//! use dcsearch::analysis::token_filter::Filter;
//! use dcsearch::analysis::token_filter::stop::StopFilter;
//!
//! let tokens = vec![Token::new("the", 0), Token::new("quick", 1)];
//! let result: Vec<_> = StopFilter::new()
//!     .filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(result.len(), 1);
//! assert_eq!(result[0].text, "quick");
//! ```

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Default English stop words list.
const DEFAULT_ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// Default English stop words as a HashSet.
pub static DEFAULT_ENGLISH_STOP_WORDS_SET: LazyLock<Arc<HashSet<String>>> = LazyLock::new(|| {
    Arc::new(
        DEFAULT_ENGLISH_STOP_WORDS
            .iter()
            .map(|&s| s.to_string())
            .collect(),
    )
});

/// A filter that drops stop words, or marks them stopped when
/// `remove_stopped` is false.
///
/// Matching is exact, so this filter belongs after [`LowercaseFilter`]
/// in a pipeline.
///
/// [`LowercaseFilter`]: crate::analysis::token_filter::lowercase::LowercaseFilter
#[derive(Clone, Debug)]
pub struct StopFilter {
    stop_words: Arc<HashSet<String>>,
    remove_stopped: bool,
}

impl StopFilter {
    /// Create a stop filter with the default English list.
    pub fn new() -> Self {
        StopFilter {
            stop_words: DEFAULT_ENGLISH_STOP_WORDS_SET.clone(),
            remove_stopped: true,
        }
    }

    /// Create a stop filter from a custom word list.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopFilter {
            stop_words: Arc::new(words.into_iter().map(Into::into).collect()),
            remove_stopped: true,
        }
    }

    /// Keep stop words in the stream, marked as stopped.
    pub fn mark_only(mut self) -> Self {
        self.remove_stopped = false;
        self
    }

    /// Check whether `word` is a stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Number of stop words in the list.
    pub fn len(&self) -> usize {
        self.stop_words.len()
    }

    /// Check if the stop word list is empty.
    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty()
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let stop_words = Arc::clone(&self.stop_words);

        if self.remove_stopped {
            Ok(Box::new(tokens.filter(move |token| {
                !token.is_stopped() && !stop_words.contains(&token.text)
            })))
        } else {
            Ok(Box::new(tokens.map(move |token| {
                if stop_words.contains(&token.text) {
                    token.stop()
                } else {
                    token
                }
            })))
        }
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}
