//! Collection statistics and their `stat` file codec.

use std::io::Write;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DcSearchError, Result};
use crate::storage::{Storage, StorageOutput};

static STATS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\ANUM_OF_DOCS:([0-9]+)\nNUM_OF_BYTES:([0-9]+)\z")
        .expect("stats pattern should be a valid regex")
});

/// Aggregate figures for one indexed collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStats {
    /// Number of documents indexed.
    pub num_of_docs: u64,
    /// Sum of the documents' byte lengths.
    pub num_of_bytes: u64,
}

impl CollectionStats {
    pub fn new(num_of_docs: u64, num_of_bytes: u64) -> Self {
        CollectionStats {
            num_of_docs,
            num_of_bytes,
        }
    }

    /// Average document size in bytes, 0 for an empty collection.
    pub fn bytes_per_doc(&self) -> f64 {
        if self.num_of_docs == 0 {
            0.0
        } else {
            self.num_of_bytes as f64 / self.num_of_docs as f64
        }
    }

    /// Render the `stat` file body. There is no trailing newline.
    pub fn encode(&self) -> String {
        format!(
            "NUM_OF_DOCS:{}\nNUM_OF_BYTES:{}",
            self.num_of_docs, self.num_of_bytes
        )
    }

    /// Parse a `stat` file body. Nothing may follow the bytes figure.
    pub fn parse(content: &str) -> Result<Self> {
        let captures = STATS_PATTERN.captures(content).ok_or_else(|| {
            DcSearchError::corrupt_stats(format!("unexpected content: {content:?}"))
        })?;

        let field = |idx: usize| -> Result<u64> {
            captures[idx]
                .parse::<u64>()
                .map_err(|e| DcSearchError::corrupt_stats(format!("{}: {e}", &captures[idx])))
        };

        Ok(CollectionStats::new(field(1)?, field(2)?))
    }

    /// Load stats from `name` in `storage`.
    pub fn load(storage: &dyn Storage, name: &str) -> Result<Self> {
        let bytes = storage.read_all(name)?;
        let content = std::str::from_utf8(&bytes)
            .map_err(|e| DcSearchError::corrupt_stats(format!("not UTF-8: {e}")))?;
        Self::parse(content)
    }

    /// Write stats to `name` in `storage`.
    pub fn write(&self, storage: &dyn Storage, name: &str) -> Result<()> {
        let mut output = storage.create_output(name)?;
        output
            .write_all(self.encode().as_bytes())
            .map_err(|e| DcSearchError::index_write(format!("{name}: {e}")))?;
        output.flush_and_sync()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        let stats = CollectionStats::new(3, 24);
        assert_eq!(stats.encode(), "NUM_OF_DOCS:3\nNUM_OF_BYTES:24");
        assert_eq!(stats.bytes_per_doc(), 8.0);
    }

    #[test]
    fn test_empty_collection_average() {
        assert_eq!(CollectionStats::default().bytes_per_doc(), 0.0);
    }

    #[test]
    fn test_parse() {
        let stats = CollectionStats::parse("NUM_OF_DOCS:12\nNUM_OF_BYTES:3400").unwrap();
        assert_eq!(stats, CollectionStats::new(12, 3400));

        let stats = CollectionStats::parse("NUM_OF_DOCS:0\nNUM_OF_BYTES:0").unwrap();
        assert_eq!(stats, CollectionStats::default());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for content in [
            "",
            "NUM_OF_DOCS:1",
            "NUM_OF_DOCS:x\nNUM_OF_BYTES:2",
            "NUM_OF_BYTES:2\nNUM_OF_DOCS:1",
            "NUM_OF_DOCS:-1\nNUM_OF_BYTES:2",
            "NUM_OF_DOCS:1\nNUM_OF_BYTES:2\nEXTRA:3",
            "NUM_OF_DOCS:1\nNUM_OF_BYTES:2\n",
            "NUM_OF_DOCS:1\nNUM_OF_BYTES:2 ",
            "NUM_OF_DOCS:1\r\nNUM_OF_BYTES:2",
            "NUM_OF_DOCS:\u{0661}\nNUM_OF_BYTES:2",
            "NUM_OF_DOCS:99999999999999999999999\nNUM_OF_BYTES:2",
        ] {
            let result = CollectionStats::parse(content);
            assert!(
                matches!(result, Err(DcSearchError::CorruptStats(_))),
                "accepted {content:?}"
            );
        }
    }
}
