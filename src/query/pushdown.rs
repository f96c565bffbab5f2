//! Translating host predicates into query trees.
//!
//! A host (for example a database scan over the document collection)
//! exposes two columns: an integer id column and a text column. Predicates
//! of the forms `text_column @@ 'query'` and `id_column = <int>` can be
//! answered by the index; anything else stays with the host.
//!
//! Translation is conservative. An AND may push down only its translatable
//! children, which yields a superset of the matching documents and is marked
//! inexact so the host rechecks. OR and NOT push down only when every part
//! translates exactly.
//!
//! Text operands are parsed with the query parser and then analyzed: a leaf
//! that normalizes to several terms, such as a quoted phrase, becomes an AND
//! of those terms, because evaluation looks up one term per leaf.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::analyze_terms;
use crate::analysis::analyzer::Analyzer;
use crate::error::Result;
use crate::index::DocId;
use crate::query::node::{Leaf, QueryNode};
use crate::query::parser::parse_query;

/// Names of the host columns backed by the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub id_column: String,
    pub text_column: String,
}

impl ColumnMapping {
    pub fn new<S: Into<String>, T: Into<String>>(id_column: S, text_column: T) -> Self {
        ColumnMapping {
            id_column: id_column.into(),
            text_column: text_column.into(),
        }
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        ColumnMapping::new("id", "content")
    }
}

/// Comparison operators a host predicate may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `<>`
    NotEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `@@`, full-text match
    TextMatch,
}

/// A literal operand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Int(i64),
    Text(String),
    Null,
}

/// A host predicate expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    Compare {
        column: String,
        op: CompareOp,
        value: Value,
    },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
    /// Any expression the index cannot interpret.
    Opaque(String),
}

/// A translated predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pushdown {
    pub tree: QueryNode,
    /// `true` when `tree` matches exactly the documents the predicate
    /// accepts; `false` when it may match more.
    pub exact: bool,
}

/// Translate one predicate. `Ok(None)` means nothing could be pushed down.
///
/// Fails when a text match operand does not parse or cannot be analyzed.
///
/// `analyzer` must be the one the searcher evaluates with.
pub fn extract(
    predicate: &Predicate,
    mapping: &ColumnMapping,
    analyzer: &dyn Analyzer,
) -> Result<Option<Pushdown>> {
    Translator { mapping, analyzer }.translate(predicate)
}

/// Translate a list of implicitly ANDed restrictions.
pub fn extract_conjuncts(
    predicates: &[Predicate],
    mapping: &ColumnMapping,
    analyzer: &dyn Analyzer,
) -> Result<Option<Pushdown>> {
    Translator { mapping, analyzer }.translate_and(predicates)
}

struct Translator<'a> {
    mapping: &'a ColumnMapping,
    analyzer: &'a dyn Analyzer,
}

impl Translator<'_> {
    fn translate(&self, predicate: &Predicate) -> Result<Option<Pushdown>> {
        match predicate {
            Predicate::Compare { column, op, value } => self.translate_compare(column, *op, value),
            Predicate::And(children) => self.translate_and(children),
            Predicate::Or(children) => {
                let mut trees = Vec::with_capacity(children.len());
                for child in children {
                    match self.translate(child)? {
                        Some(Pushdown { tree, exact: true }) => trees.push(tree),
                        _ => return Ok(None),
                    }
                }
                if trees.is_empty() {
                    return Ok(None);
                }
                Ok(Some(Pushdown {
                    tree: collapse(trees, QueryNode::or),
                    exact: true,
                }))
            }
            Predicate::Not(child) => match self.translate(child)? {
                Some(Pushdown { tree, exact: true }) => Ok(Some(Pushdown {
                    tree: QueryNode::not(tree),
                    exact: true,
                })),
                _ => Ok(None),
            },
            Predicate::Opaque(expr) => {
                debug!(expr = %expr, "predicate not pushable");
                Ok(None)
            }
        }
    }

    fn translate_and(&self, children: &[Predicate]) -> Result<Option<Pushdown>> {
        let mut trees = Vec::with_capacity(children.len());
        let mut exact = true;
        for child in children {
            match self.translate(child)? {
                Some(pushdown) => {
                    exact &= pushdown.exact;
                    trees.push(pushdown.tree);
                }
                None => exact = false,
            }
        }
        if trees.is_empty() {
            return Ok(None);
        }
        Ok(Some(Pushdown {
            tree: collapse(trees, QueryNode::and),
            exact,
        }))
    }

    fn translate_compare(
        &self,
        column: &str,
        op: CompareOp,
        value: &Value,
    ) -> Result<Option<Pushdown>> {
        let tree = match (op, value) {
            (CompareOp::Eq, Value::Int(id)) if column == self.mapping.id_column => {
                match DocId::try_from(*id) {
                    Ok(doc_id) => QueryNode::id(doc_id),
                    Err(_) => {
                        debug!(column, id, "negative id left to the host");
                        return Ok(None);
                    }
                }
            }
            (CompareOp::TextMatch, Value::Text(query)) if column == self.mapping.text_column => {
                self.split_leaves(parse_query(query)?)?
            }
            _ => {
                debug!(column, ?op, "comparison not pushable");
                return Ok(None);
            }
        };
        Ok(Some(Pushdown { tree, exact: true }))
    }

    /// Replace every text leaf that analyzes to more than one term with an
    /// AND of those terms.
    fn split_leaves(&self, node: QueryNode) -> Result<QueryNode> {
        match node {
            QueryNode::Leaf(Leaf::TextMatch(text)) => {
                let terms = analyze_terms(self.analyzer, &text)?;
                if terms.len() > 1 {
                    debug!(text = %text, terms = terms.len(), "text operand split into terms");
                    Ok(QueryNode::and(terms.into_iter().map(QueryNode::text).collect()))
                } else {
                    Ok(QueryNode::text(text))
                }
            }
            QueryNode::Leaf(leaf) => Ok(QueryNode::Leaf(leaf)),
            QueryNode::Bool { op, children } => Ok(QueryNode::Bool {
                op,
                children: children
                    .into_iter()
                    .map(|child| self.split_leaves(child))
                    .collect::<Result<_>>()?,
            }),
        }
    }
}

fn collapse(mut trees: Vec<QueryNode>, build: fn(Vec<QueryNode>) -> QueryNode) -> QueryNode {
    if trees.len() == 1 {
        trees.remove(0)
    } else {
        build(trees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::standard::StandardAnalyzer;
    use crate::analysis::analyzer::whitespace::WhitespaceAnalyzer;

    fn mapping() -> ColumnMapping {
        ColumnMapping::new("doc_id", "body")
    }

    fn text_match(column: &str, query: &str) -> Predicate {
        Predicate::Compare {
            column: column.to_string(),
            op: CompareOp::TextMatch,
            value: Value::Text(query.to_string()),
        }
    }

    fn extract_std(predicate: &Predicate, mapping: &ColumnMapping) -> Result<Option<Pushdown>> {
        extract(predicate, mapping, &StandardAnalyzer::new())
    }

    fn id_eq(column: &str, id: i64) -> Predicate {
        Predicate::Compare {
            column: column.to_string(),
            op: CompareOp::Eq,
            value: Value::Int(id),
        }
    }

    #[test]
    fn test_leaf_predicates() {
        let pushed = extract_std(&id_eq("doc_id", 5), &mapping()).unwrap().unwrap();
        assert_eq!(pushed.tree, QueryNode::id(5));
        assert!(pushed.exact);

        let pushed = extract_std(&text_match("body", "cat & dog"), &mapping())
            .unwrap()
            .unwrap();
        assert_eq!(
            pushed.tree,
            QueryNode::and(vec![QueryNode::text("cat"), QueryNode::text("dog")])
        );
    }

    #[test]
    fn test_wrong_column_or_operator_is_not_pushable() {
        let cases = [
            text_match("doc_id", "cat"),
            id_eq("body", 5),
            id_eq("other", 5),
            id_eq("doc_id", -1),
            Predicate::Compare {
                column: "doc_id".to_string(),
                op: CompareOp::Lt,
                value: Value::Int(5),
            },
            Predicate::Compare {
                column: "body".to_string(),
                op: CompareOp::TextMatch,
                value: Value::Null,
            },
            Predicate::Opaque("body IS NULL".to_string()),
        ];
        for predicate in cases {
            assert_eq!(extract_std(&predicate, &mapping()).unwrap(), None, "{predicate:?}");
        }
    }

    #[test]
    fn test_and_keeps_pushable_children() {
        let predicate = Predicate::And(vec![
            text_match("body", "cat"),
            Predicate::Opaque("length(body) > 10".to_string()),
            id_eq("doc_id", 3),
        ]);
        let pushed = extract_std(&predicate, &mapping()).unwrap().unwrap();

        assert_eq!(
            pushed.tree,
            QueryNode::and(vec![QueryNode::text("cat"), QueryNode::id(3)])
        );
        assert!(!pushed.exact);
    }

    #[test]
    fn test_or_and_not_need_exact_children() {
        let partial_and = Predicate::And(vec![
            text_match("body", "cat"),
            Predicate::Opaque("x".to_string()),
        ]);

        let or = Predicate::Or(vec![text_match("body", "cat"), partial_and.clone()]);
        assert_eq!(extract_std(&or, &mapping()).unwrap(), None);

        let not = Predicate::Not(Box::new(partial_and));
        assert_eq!(extract_std(&not, &mapping()).unwrap(), None);

        let exact_or = Predicate::Or(vec![text_match("body", "cat"), id_eq("doc_id", 2)]);
        let pushed = extract_std(&Predicate::Not(Box::new(exact_or)), &mapping())
            .unwrap()
            .unwrap();
        assert_eq!(
            pushed.tree,
            QueryNode::not(QueryNode::or(vec![QueryNode::text("cat"), QueryNode::id(2)]))
        );
        assert!(pushed.exact);
    }

    #[test]
    fn test_conjuncts() {
        let pushed = extract_conjuncts(
            &[text_match("body", "cat"), text_match("body", "dog")],
            &mapping(),
            &StandardAnalyzer::new(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            pushed.tree,
            QueryNode::and(vec![QueryNode::text("cat"), QueryNode::text("dog")])
        );
        assert!(extract_conjuncts(&[], &mapping(), &StandardAnalyzer::new()).unwrap().is_none());
    }

    #[test]
    fn test_bad_text_query_is_an_error() {
        assert!(extract_std(&text_match("body", "cat &"), &mapping()).is_err());
    }

    #[test]
    fn test_multi_term_operand_becomes_and() {
        let pushed = extract_std(&text_match("body", "'new york' | E-Mail"), &mapping())
            .unwrap()
            .unwrap();
        assert_eq!(
            pushed.tree,
            QueryNode::or(vec![
                QueryNode::and(vec![QueryNode::text("new"), QueryNode::text("york")]),
                QueryNode::and(vec![QueryNode::text("e"), QueryNode::text("mail")]),
            ])
        );
        assert!(pushed.exact);

        // Stop words drop out before the split.
        let pushed = extract_std(&text_match("body", "'the cat'"), &mapping())
            .unwrap()
            .unwrap();
        assert_eq!(pushed.tree, QueryNode::text("the cat"));
    }

    #[test]
    fn test_split_follows_the_analyzer() {
        let pushed = extract(
            &text_match("body", "e-mail"),
            &mapping(),
            &WhitespaceAnalyzer::new(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(pushed.tree, QueryNode::text("e-mail"));
    }
}
