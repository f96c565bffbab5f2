//! Query tree data model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DcSearchError, Result};
use crate::index::DocId;

/// A leaf predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Leaf {
    /// Documents containing the term.
    TextMatch(String),
    /// Exactly the named document.
    IdEquals(DocId),
}

/// Operator of an inner node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoolOp {
    And,
    Or,
    Not,
}

impl BoolOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoolOp::And => "AND",
            BoolOp::Or => "OR",
            BoolOp::Not => "NOT",
        }
    }
}

/// A node of a query tree.
///
/// NOT takes exactly one child; AND and OR take at least one. The
/// constructors do not enforce this, [`QueryNode::validate`] does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryNode {
    Leaf(Leaf),
    Bool { op: BoolOp, children: Vec<QueryNode> },
}

impl QueryNode {
    pub fn text<S: Into<String>>(term: S) -> Self {
        QueryNode::Leaf(Leaf::TextMatch(term.into()))
    }

    pub fn id(doc_id: DocId) -> Self {
        QueryNode::Leaf(Leaf::IdEquals(doc_id))
    }

    pub fn and(children: Vec<QueryNode>) -> Self {
        QueryNode::Bool {
            op: BoolOp::And,
            children,
        }
    }

    pub fn or(children: Vec<QueryNode>) -> Self {
        QueryNode::Bool {
            op: BoolOp::Or,
            children,
        }
    }

    pub fn not(child: QueryNode) -> Self {
        QueryNode::Bool {
            op: BoolOp::Not,
            children: vec![child],
        }
    }

    /// Check operator arity over the whole tree.
    pub fn validate(&self) -> Result<()> {
        self.validate_at("root")
    }

    fn validate_at(&self, path: &str) -> Result<()> {
        let QueryNode::Bool { op, children } = self else {
            return Ok(());
        };

        match op {
            BoolOp::Not if children.len() != 1 => {
                return Err(DcSearchError::malformed_query_tree(format!(
                    "NOT at {path} has {} children, expected 1",
                    children.len()
                )));
            }
            BoolOp::And | BoolOp::Or if children.is_empty() => {
                return Err(DcSearchError::malformed_query_tree(format!(
                    "{} at {path} has no children",
                    op.as_str()
                )));
            }
            _ => {}
        }

        for (idx, child) in children.iter().enumerate() {
            child.validate_at(&format!("{path}.{idx}"))?;
        }
        Ok(())
    }

    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            QueryNode::Leaf(_) => 1,
            QueryNode::Bool { children, .. } => children.iter().map(Self::leaf_count).sum(),
        }
    }

    /// Depth of the tree; a lone leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            QueryNode::Leaf(_) => 1,
            QueryNode::Bool { children, .. } => {
                1 + children.iter().map(Self::depth).max().unwrap_or(0)
            }
        }
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        let indent = "-".repeat(level);
        match self {
            QueryNode::Leaf(Leaf::TextMatch(term)) => writeln!(f, "{indent}TEXT_MATCH {term}"),
            QueryNode::Leaf(Leaf::IdEquals(doc_id)) => writeln!(f, "{indent}ID_EQUALS {doc_id}"),
            QueryNode::Bool { op, children } => {
                writeln!(f, "{indent}{}", op.as_str())?;
                for child in children {
                    child.write_tree(f, level + 1)?;
                }
                Ok(())
            }
        }
    }
}

/// One node per line, each level indented by one `-`.
///
/// ```
/// use dcsearch::query::QueryNode;
///
/// let tree = QueryNode::and(vec![QueryNode::text("cat"), QueryNode::not(QueryNode::id(2))]);
/// assert_eq!(tree.to_string(), "AND\n-TEXT_MATCH cat\n-NOT\n--ID_EQUALS 2\n");
/// ```
impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_well_formed() {
        let tree = QueryNode::or(vec![
            QueryNode::and(vec![QueryNode::text("cat")]),
            QueryNode::not(QueryNode::id(3)),
        ]);
        assert!(tree.validate().is_ok());
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn test_validate_rejects_bad_arity() {
        let two_child_not = QueryNode::Bool {
            op: BoolOp::Not,
            children: vec![QueryNode::text("a"), QueryNode::text("b")],
        };
        let nested = QueryNode::and(vec![QueryNode::text("a"), QueryNode::or(vec![])]);

        for tree in [two_child_not, nested] {
            assert!(matches!(
                tree.validate(),
                Err(DcSearchError::MalformedQueryTree(_))
            ));
        }
    }

    #[test]
    fn test_error_names_the_offending_node() {
        let tree = QueryNode::and(vec![
            QueryNode::text("a"),
            QueryNode::Bool {
                op: BoolOp::Not,
                children: vec![],
            },
        ]);
        let message = tree.validate().unwrap_err().to_string();
        assert!(message.contains("root.1"), "{message}");
    }

    #[test]
    fn test_json_shape() {
        let tree = QueryNode::not(QueryNode::text("cat"));
        let json = serde_json::to_string(&tree).unwrap();
        assert_eq!(
            json,
            r#"{"bool":{"op":"not","children":[{"leaf":{"text_match":"cat"}}]}}"#
        );
        assert_eq!(serde_json::from_str::<QueryNode>(&json).unwrap(), tree);
    }
}
