//! Text query parser.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! or_expr  := and_expr ( '|' and_expr )*
//! and_expr := unary ( '&'? unary )*
//! unary    := '!' unary | primary
//! primary  := '(' or_expr ')' | word | 'quoted text'
//! ```
//!
//! Adjacent words are ANDed. A chain of the same operator becomes one
//! n-ary node, so `a & b & c` is a single AND with three children.
//!
//! ```
//! use dcsearch::query::{QueryNode, parse_query};
//!
//! let tree = parse_query("cat & !(dog | bird)").unwrap();
//! assert_eq!(
//!     tree,
//!     QueryNode::and(vec![
//!         QueryNode::text("cat"),
//!         QueryNode::not(QueryNode::or(vec![QueryNode::text("dog"), QueryNode::text("bird")])),
//!     ])
//! );
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::{DcSearchError, Result};
use crate::query::node::QueryNode;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    And,
    Or,
    Not,
    Open,
    Close,
    Word(String),
}

fn is_special(ch: char) -> bool {
    matches!(ch, '&' | '|' | '!' | '(' | ')' | '\'')
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>> {
    let mut tokens = Vec::new();
    let mut chars: Peekable<CharIndices<'_>> = input.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '&' => {
                chars.next();
                tokens.push((pos, Token::And));
            }
            '|' => {
                chars.next();
                tokens.push((pos, Token::Or));
            }
            '!' => {
                chars.next();
                tokens.push((pos, Token::Not));
            }
            '(' => {
                chars.next();
                tokens.push((pos, Token::Open));
            }
            ')' => {
                chars.next();
                tokens.push((pos, Token::Close));
            }
            '\'' => {
                chars.next();
                let mut word = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '\'' {
                        closed = true;
                        break;
                    }
                    word.push(c);
                }
                if !closed {
                    return Err(DcSearchError::query_parse(format!(
                        "unterminated quote at {pos}"
                    )));
                }
                tokens.push((pos, Token::Word(word)));
            }
            _ => {
                let mut word = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_whitespace() || is_special(c) {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                tokens.push((pos, Token::Word(word)));
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, token)| token)
    }

    fn offset(&self) -> String {
        match self.tokens.get(self.pos) {
            Some((offset, _)) => format!("offset {offset}"),
            None => "end of input".to_string(),
        }
    }

    fn parse_or(&mut self) -> Result<QueryNode> {
        let mut children = vec![self.parse_and()?];
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            children.push(self.parse_and()?);
        }
        Ok(Self::collapse(children, QueryNode::or))
    }

    fn parse_and(&mut self) -> Result<QueryNode> {
        let mut children = vec![self.parse_unary()?];
        loop {
            match self.peek() {
                Some(Token::And) => {
                    self.pos += 1;
                    children.push(self.parse_unary()?);
                }
                Some(Token::Not | Token::Open | Token::Word(_)) => {
                    children.push(self.parse_unary()?);
                }
                _ => break,
            }
        }
        Ok(Self::collapse(children, QueryNode::and))
    }

    fn parse_unary(&mut self) -> Result<QueryNode> {
        if self.peek() == Some(&Token::Not) {
            self.pos += 1;
            return Ok(QueryNode::not(self.parse_unary()?));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<QueryNode> {
        let offset = self.offset();
        match self.tokens.get(self.pos).map(|(_, token)| token.clone()) {
            Some(Token::Word(word)) => {
                self.pos += 1;
                Ok(QueryNode::text(word))
            }
            Some(Token::Open) => {
                self.pos += 1;
                let inner = self.parse_or()?;
                if self.peek() != Some(&Token::Close) {
                    return Err(DcSearchError::query_parse(format!(
                        "expected ')' at {}",
                        self.offset()
                    )));
                }
                self.pos += 1;
                Ok(inner)
            }
            Some(other) => Err(DcSearchError::query_parse(format!(
                "unexpected {other:?} at {offset}"
            ))),
            None => Err(DcSearchError::query_parse(format!(
                "expected a term at {offset}"
            ))),
        }
    }

    fn collapse(mut children: Vec<QueryNode>, build: fn(Vec<QueryNode>) -> QueryNode) -> QueryNode {
        if children.len() == 1 {
            children.remove(0)
        } else {
            build(children)
        }
    }
}

/// Parse a text query into a query tree.
pub fn parse_query(input: &str) -> Result<QueryNode> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(DcSearchError::query_parse("empty query"));
    }

    let mut parser = Parser { tokens, pos: 0 };
    let tree = parser.parse_or()?;
    if parser.pos != parser.tokens.len() {
        return Err(DcSearchError::query_parse(format!(
            "unexpected input at {}",
            parser.offset()
        )));
    }
    Ok(tree)
}
