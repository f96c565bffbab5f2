//! Standard analyzer: the default for indexing English prose.
//!
//! 1. UnicodeWordTokenizer
//! 2. LowercaseFilter
//! 3. StopFilter (33 common English stop words)

use std::any::Any;
use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
use crate::error::Result;

/// A standard analyzer with lowercase and stop word filtering.
///
/// ```
/// use dcsearch::analysis::analyzer::Analyzer;
/// use dcsearch::analysis::analyzer::standard::StandardAnalyzer;
///
/// let analyzer = StandardAnalyzer::new();
/// let tokens: Vec<_> = analyzer.analyze("Hello the world").unwrap().collect();
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens[0].text, "hello");
/// ```
#[derive(Clone, Debug)]
pub struct StandardAnalyzer {
    inner: PipelineAnalyzer,
}

impl StandardAnalyzer {
    /// Create a new standard analyzer with default settings.
    pub fn new() -> Self {
        let analyzer = PipelineAnalyzer::new(Arc::new(UnicodeWordTokenizer::new()))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(StopFilter::new()))
            .with_name("standard");

        StandardAnalyzer { inner: analyzer }
    }

    /// Create a new standard analyzer without stop word filtering.
    pub fn without_stop_words() -> Self {
        let analyzer = PipelineAnalyzer::new(Arc::new(UnicodeWordTokenizer::new()))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .with_name("standard_no_stop");

        StandardAnalyzer { inner: analyzer }
    }

    /// Get the inner pipeline analyzer.
    pub fn inner(&self) -> &PipelineAnalyzer {
        &self.inner
    }
}

impl Default for StandardAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for StandardAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_standard_analyzer() {
        let analyzer = StandardAnalyzer::new();
        let tokens: Vec<Token> = analyzer
            .analyze("The Quick, Brown fox is here!")
            .unwrap()
            .collect();

        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["quick", "brown", "fox", "here"]);
        assert_eq!(analyzer.name(), "standard");
    }

    #[test]
    fn test_without_stop_words() {
        let analyzer = StandardAnalyzer::without_stop_words();
        let tokens: Vec<Token> = analyzer.analyze("The cat").unwrap().collect();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "the");
    }

    #[test]
    fn test_deterministic() {
        let analyzer = StandardAnalyzer::new();
        let first: Vec<Token> = analyzer.analyze("Dog bird DOG").unwrap().collect();
        let second: Vec<Token> = analyzer.analyze("Dog bird DOG").unwrap().collect();
        assert_eq!(first, second);
    }
}
