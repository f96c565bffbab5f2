//! Boolean query trees and their evaluation.
//!
//! A [`QueryNode`] tree has TEXT_MATCH / ID_EQUALS leaves and AND / OR / NOT
//! inner nodes. Trees come from the text query [`parser`], from predicate
//! [`pushdown`], or are built directly, and are evaluated by the
//! [`evaluator`] into a sorted list of doc ids using the skip-pointer set
//! algebra in [`set_ops`].

pub mod evaluator;
pub mod node;
pub mod parser;
pub mod pushdown;
pub mod set_ops;

pub use evaluator::{Evaluator, evaluate};
pub use node::{BoolOp, Leaf, QueryNode};
pub use parser::parse_query;
