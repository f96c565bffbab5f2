//! Whitespace analyzer: terms are exactly the whitespace-separated words.

use std::any::Any;
use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::error::Result;

/// No normalization at all: case and punctuation are kept.
#[derive(Clone, Debug)]
pub struct WhitespaceAnalyzer {
    inner: PipelineAnalyzer,
}

impl WhitespaceAnalyzer {
    /// Create a new whitespace analyzer.
    pub fn new() -> Self {
        let inner =
            PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new())).with_name("whitespace");
        WhitespaceAnalyzer { inner }
    }
}

impl Default for WhitespaceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for WhitespaceAnalyzer {
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
