//! Term dictionary: term → location of its postings in the `post` file.

use std::io::Write;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{DcSearchError, Result};
use crate::storage::Storage;

/// Byte range of one postings list inside the postings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostingPointer {
    pub offset: u64,
    pub length: u64,
}

impl PostingPointer {
    pub fn new(offset: u64, length: u64) -> Self {
        PostingPointer { offset, length }
    }

    /// One past the last byte of the range, `None` on overflow.
    pub fn end(&self) -> Option<u64> {
        self.offset.checked_add(self.length)
    }
}

/// In-memory exact-match term lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    entries: AHashMap<String, PostingPointer>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. A term may only be added once.
    pub fn insert<S: Into<String>>(&mut self, term: S, pointer: PostingPointer) -> Result<()> {
        let term = term.into();
        if self.entries.contains_key(&term) {
            return Err(DcSearchError::corrupt_dictionary(format!(
                "duplicate term: {term}"
            )));
        }
        self.entries.insert(term, pointer);
        Ok(())
    }

    pub fn get(&self, term: &str) -> Option<&PostingPointer> {
        self.entries.get(term)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.entries.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PostingPointer)> {
        self.entries.iter().map(|(term, pointer)| (term.as_str(), pointer))
    }

    /// All terms in ascending order.
    pub fn sorted_terms(&self) -> Vec<&str> {
        let mut terms: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        terms.sort_unstable();
        terms
    }

    /// Parse whitespace-delimited `<term> <offset> <length>` triples.
    pub fn parse(content: &str) -> Result<Self> {
        let mut dictionary = Dictionary::new();
        let mut fields = content.split_whitespace();

        while let Some(term) = fields.next() {
            let offset = Self::parse_number(term, "offset", fields.next())?;
            let length = Self::parse_number(term, "length", fields.next())?;
            dictionary.insert(term, PostingPointer::new(offset, length))?;
        }

        Ok(dictionary)
    }

    fn parse_number(term: &str, what: &str, field: Option<&str>) -> Result<u64> {
        let field = field.ok_or_else(|| {
            DcSearchError::corrupt_dictionary(format!("missing {what} for term {term}"))
        })?;
        field.parse::<u64>().map_err(|e| {
            DcSearchError::corrupt_dictionary(format!("bad {what} {field:?} for term {term}: {e}"))
        })
    }

    /// Load the dictionary stored as `name` in `storage`.
    pub fn load(storage: &dyn Storage, name: &str) -> Result<Self> {
        let bytes = storage.read_all(name)?;
        let content = std::str::from_utf8(&bytes)
            .map_err(|e| DcSearchError::corrupt_dictionary(format!("not UTF-8: {e}")))?;
        Self::parse(content)
    }
}

/// Write one dictionary line.
pub fn write_entry<W: Write + ?Sized>(
    out: &mut W,
    term: &str,
    pointer: &PostingPointer,
) -> std::io::Result<()> {
    writeln!(out, "{} {} {}", term, pointer.offset, pointer.length)
}
