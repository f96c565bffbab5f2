//! Query tree evaluation.
//!
//! Evaluation is a structural recursion over [`QueryNode`]: leaves fetch
//! postings lazily, inner nodes combine their children's lists with the
//! operators in [`set_ops`](crate::query::set_ops). AND and OR fold their
//! children left to right. The tree is validated once before the walk.

use rayon::prelude::*;
use tracing::debug;

use crate::analysis::analyze_terms;
use crate::analysis::analyzer::Analyzer;
use crate::error::Result;
use crate::index::dictionary::Dictionary;
use crate::index::posting::PostingsReader;
use crate::index::{ALL_TERM, DocId};
use crate::query::node::{BoolOp, Leaf, QueryNode};
use crate::query::set_ops::{intersect, negate, union};

/// Evaluate `tree` sequentially.
pub fn evaluate(
    tree: &QueryNode,
    dictionary: &Dictionary,
    postings: &PostingsReader,
    universe: &[DocId],
    analyzer: &dyn Analyzer,
) -> Result<Vec<DocId>> {
    Evaluator::new(dictionary, postings, universe, analyzer).evaluate(tree)
}

/// Borrowed view of a loaded index, ready to evaluate trees.
///
/// Holds no state between calls.
pub struct Evaluator<'a> {
    dictionary: &'a Dictionary,
    postings: &'a PostingsReader,
    universe: &'a [DocId],
    analyzer: &'a dyn Analyzer,
    parallel: bool,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        dictionary: &'a Dictionary,
        postings: &'a PostingsReader,
        universe: &'a [DocId],
        analyzer: &'a dyn Analyzer,
    ) -> Self {
        Evaluator {
            dictionary,
            postings,
            universe,
            analyzer,
            parallel: false,
        }
    }

    /// Evaluate the children of AND/OR nodes on the rayon pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validate `tree`, then evaluate it into a sorted doc id list.
    pub fn evaluate(&self, tree: &QueryNode) -> Result<Vec<DocId>> {
        tree.validate()?;
        self.eval(tree)
    }

    fn eval(&self, node: &QueryNode) -> Result<Vec<DocId>> {
        match node {
            QueryNode::Leaf(Leaf::IdEquals(doc_id)) => Ok(vec![*doc_id]),
            QueryNode::Leaf(Leaf::TextMatch(text)) => self.text_match(text),
            QueryNode::Bool { op, children } => match op {
                BoolOp::Not => {
                    let child = self.eval(&children[0])?;
                    Ok(negate(&child, self.universe))
                }
                BoolOp::And => self.fold(children, intersect),
                BoolOp::Or => self.fold(children, union),
            },
        }
    }

    fn fold(
        &self,
        children: &[QueryNode],
        combine: fn(&[DocId], &[DocId]) -> Vec<DocId>,
    ) -> Result<Vec<DocId>> {
        let lists: Vec<Vec<DocId>> = if self.parallel && children.len() > 1 {
            children
                .par_iter()
                .map(|child| self.eval(child))
                .collect::<Result<_>>()?
        } else {
            children
                .iter()
                .map(|child| self.eval(child))
                .collect::<Result<_>>()?
        };

        let mut lists = lists.into_iter();
        let first = lists.next().unwrap_or_default();
        Ok(lists.fold(first, |acc, list| combine(&acc, &list)))
    }

    /// Normalize `text` to its first term and read that term's postings.
    fn text_match(&self, text: &str) -> Result<Vec<DocId>> {
        let Some(term) = analyze_terms(self.analyzer, text)?.into_iter().next() else {
            debug!(text, "query text has no searchable term");
            return Ok(Vec::new());
        };
        if term == ALL_TERM {
            return Ok(Vec::new());
        }

        match self.dictionary.get(&term) {
            Some(pointer) => self.postings.read(pointer),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::standard::StandardAnalyzer;
    use crate::analysis::analyzer::whitespace::WhitespaceAnalyzer;
    use crate::error::DcSearchError;
    use crate::index::dictionary::PostingPointer;
    use crate::storage::{FileStorage, StorageConfig};
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        dictionary: Dictionary,
        postings: PostingsReader,
        universe: Vec<DocId>,
    }

    // cat: 1 3, dog: 1 2, bird: 2 3, universe: 1 2 3
    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("post"), "1 3 1 2 2 3 1 2 3 ").unwrap();
        let storage = FileStorage::open(dir.path(), StorageConfig::default()).unwrap();

        let mut dictionary = Dictionary::new();
        dictionary.insert("cat", PostingPointer::new(0, 4)).unwrap();
        dictionary.insert("dog", PostingPointer::new(4, 4)).unwrap();
        dictionary.insert("bird", PostingPointer::new(8, 4)).unwrap();
        dictionary.insert(ALL_TERM, PostingPointer::new(12, 6)).unwrap();

        let postings = PostingsReader::open(&storage, "post").unwrap();
        Fixture {
            _dir: dir,
            dictionary,
            postings,
            universe: vec![1, 2, 3],
        }
    }

    fn run(fixture: &Fixture, tree: &QueryNode, parallel: bool) -> Result<Vec<DocId>> {
        let analyzer = StandardAnalyzer::new();
        Evaluator::new(
            &fixture.dictionary,
            &fixture.postings,
            &fixture.universe,
            &analyzer,
        )
        .with_parallel(parallel)
        .evaluate(tree)
    }

    #[test]
    fn test_leaves() {
        let fixture = fixture();
        assert_eq!(run(&fixture, &QueryNode::text("cat"), false).unwrap(), vec![1, 3]);
        assert_eq!(run(&fixture, &QueryNode::text("CAT"), false).unwrap(), vec![1, 3]);
        assert!(run(&fixture, &QueryNode::text("fish"), false).unwrap().is_empty());
        assert!(run(&fixture, &QueryNode::text("the"), false).unwrap().is_empty());
        assert_eq!(run(&fixture, &QueryNode::id(2), false).unwrap(), vec![2]);
        assert_eq!(run(&fixture, &QueryNode::id(99), false).unwrap(), vec![99]);
    }

    #[test]
    fn test_multi_token_text_uses_first_term() {
        let fixture = fixture();
        assert_eq!(
            run(&fixture, &QueryNode::text("dog bird"), false).unwrap(),
            vec![1, 2]
        );
    }

    #[test]
    fn test_boolean_nodes() {
        let fixture = fixture();
        for parallel in [false, true] {
            let and = QueryNode::and(vec![QueryNode::text("cat"), QueryNode::text("dog")]);
            assert_eq!(run(&fixture, &and, parallel).unwrap(), vec![1]);

            let or = QueryNode::or(vec![QueryNode::text("cat"), QueryNode::text("bird")]);
            assert_eq!(run(&fixture, &or, parallel).unwrap(), vec![1, 2, 3]);

            let not = QueryNode::not(QueryNode::text("cat"));
            assert_eq!(run(&fixture, &not, parallel).unwrap(), vec![2]);

            let three = QueryNode::and(vec![
                QueryNode::text("cat"),
                QueryNode::text("dog"),
                QueryNode::text("bird"),
            ]);
            assert!(run(&fixture, &three, parallel).unwrap().is_empty());

            let single = QueryNode::or(vec![QueryNode::text("bird")]);
            assert_eq!(run(&fixture, &single, parallel).unwrap(), vec![2, 3]);
        }
    }

    #[test]
    fn test_malformed_tree_fails_before_evaluation() {
        let fixture = fixture();
        let tree = QueryNode::or(vec![
            QueryNode::text("cat"),
            QueryNode::Bool {
                op: BoolOp::Not,
                children: vec![QueryNode::text("a"), QueryNode::text("b")],
            },
        ]);
        assert!(matches!(
            run(&fixture, &tree, false),
            Err(DcSearchError::MalformedQueryTree(_))
        ));
    }

    #[test]
    fn test_reserved_key_never_matches() {
        let fixture = fixture();
        let analyzer = WhitespaceAnalyzer::new();
        let result = evaluate(
            &QueryNode::text(ALL_TERM),
            &fixture.dictionary,
            &fixture.postings,
            &fixture.universe,
            &analyzer,
        )
        .unwrap();
        assert!(result.is_empty());
    }
}
