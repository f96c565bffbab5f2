//! Postings lists and the `post` file codec.
//!
//! A postings list is stored as decimal doc ids, each followed by one space:
//! `[1, 3, 12]` becomes `"1 3 12 "`.

use std::io::{Read, Seek, SeekFrom, Write};

use parking_lot::Mutex;

use crate::error::{DcSearchError, Result};
use crate::index::DocId;
use crate::index::dictionary::PostingPointer;
use crate::storage::{Storage, StorageInput, StorageOutput};

/// Serialize a postings list.
pub fn encode_postings(postings: &[DocId]) -> String {
    let mut encoded = String::with_capacity(postings.len() * 4);
    for doc_id in postings {
        encoded.push_str(&doc_id.to_string());
        encoded.push(' ');
    }
    encoded
}

/// Parse a serialized postings list.
pub fn decode_postings(bytes: &[u8]) -> Result<Vec<DocId>> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| DcSearchError::corrupt_postings(format!("not UTF-8: {e}")))?;

    text.split_ascii_whitespace()
        .map(|field| {
            field.parse::<DocId>().map_err(|e| {
                DcSearchError::corrupt_postings(format!("bad doc id {field:?}: {e}"))
            })
        })
        .collect()
}

/// Check that a list is strictly increasing.
pub fn is_strictly_increasing(postings: &[DocId]) -> bool {
    postings.windows(2).all(|pair| pair[0] < pair[1])
}

/// Sort a list ascending and drop duplicate ids.
pub fn normalize(postings: &mut Vec<DocId>) {
    postings.sort_unstable();
    postings.dedup();
}

/// Appends postings lists to an output and hands back their pointers.
#[derive(Debug)]
pub struct PostingsWriter {
    output: Box<dyn StorageOutput>,
    name: String,
}

impl PostingsWriter {
    pub fn new(storage: &dyn Storage, name: &str) -> Result<Self> {
        Ok(PostingsWriter {
            output: storage.create_output(name)?,
            name: name.to_string(),
        })
    }

    /// Append one list at the current end of the file.
    pub fn append(&mut self, postings: &[DocId]) -> Result<PostingPointer> {
        let offset = self.output.position();
        let encoded = encode_postings(postings);
        self.output
            .write_all(encoded.as_bytes())
            .map_err(|e| DcSearchError::index_write(format!("{}: {e}", self.name)))?;
        Ok(PostingPointer::new(offset, encoded.len() as u64))
    }

    /// Bytes written so far.
    pub fn position(&self) -> u64 {
        self.output.position()
    }

    pub fn finish(mut self) -> Result<()> {
        self.output.flush_and_sync()
    }
}

/// Random-access reader over a `post` file.
///
/// One handle may be shared between threads: the seek and the read that
/// follows it happen under a single lock.
#[derive(Debug)]
pub struct PostingsReader {
    input: Mutex<Box<dyn StorageInput>>,
    size: u64,
}

impl PostingsReader {
    /// Open `name` in `storage` for reading.
    pub fn open(storage: &dyn Storage, name: &str) -> Result<Self> {
        let input = storage.open_input(name)?;
        let size = input.size()?;
        Ok(PostingsReader {
            input: Mutex::new(input),
            size,
        })
    }

    /// Size of the postings file in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Read the raw bytes addressed by `pointer`.
    pub fn read_bytes(&self, pointer: &PostingPointer) -> Result<Vec<u8>> {
        match pointer.end() {
            Some(end) if end <= self.size => {}
            _ => {
                return Err(DcSearchError::corrupt_postings(format!(
                    "range {}+{} exceeds file size {}",
                    pointer.offset, pointer.length, self.size
                )));
            }
        }

        let mut buffer = vec![0u8; pointer.length as usize];
        let mut input = self.input.lock();
        input.seek(SeekFrom::Start(pointer.offset))?;
        input.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Read and decode the postings list addressed by `pointer`.
    pub fn read(&self, pointer: &PostingPointer) -> Result<Vec<DocId>> {
        let postings = decode_postings(&self.read_bytes(pointer)?)?;
        if !is_strictly_increasing(&postings) {
            return Err(DcSearchError::corrupt_postings(format!(
                "list at offset {} is not strictly increasing",
                pointer.offset
            )));
        }
        Ok(postings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, StorageConfig};
    use tempfile::TempDir;

    #[test]
    fn test_encode() {
        assert_eq!(encode_postings(&[1, 3, 12]), "1 3 12 ");
        assert_eq!(encode_postings(&[]), "");
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode_postings(b"1 3 12 ").unwrap(), vec![1, 3, 12]);
        assert_eq!(decode_postings(b"7").unwrap(), vec![7]);
        assert!(decode_postings(b"").unwrap().is_empty());
        assert!(matches!(
            decode_postings(b"1 x 3 "),
            Err(DcSearchError::CorruptPostings(_))
        ));
    }

    #[test]
    fn test_normalize() {
        let mut postings = vec![5, 1, 3, 1, 5];
        normalize(&mut postings);
        assert_eq!(postings, vec![1, 3, 5]);
        assert!(is_strictly_increasing(&postings));
        assert!(!is_strictly_increasing(&[1, 1]));
    }

    #[test]
    fn test_write_then_read_by_pointer() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::open(temp_dir.path(), StorageConfig::default()).unwrap();

        let mut writer = PostingsWriter::new(&storage, "post").unwrap();
        let first = writer.append(&[1, 3]).unwrap();
        let second = writer.append(&[2, 10, 11]).unwrap();
        writer.finish().unwrap();

        assert_eq!(first, PostingPointer::new(0, 4));
        assert_eq!(second, PostingPointer::new(4, 8));

        let reader = PostingsReader::open(&storage, "post").unwrap();
        assert_eq!(reader.size(), 12);
        assert_eq!(reader.read(&second).unwrap(), vec![2, 10, 11]);
        assert_eq!(reader.read(&first).unwrap(), vec![1, 3]);
    }

    #[test]
    fn test_out_of_range_pointer_fails() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::open(temp_dir.path(), StorageConfig::default()).unwrap();
        std::fs::write(temp_dir.path().join("post"), b"1 2 ").unwrap();

        let reader = PostingsReader::open(&storage, "post").unwrap();
        for pointer in [
            PostingPointer::new(2, 10),
            PostingPointer::new(5, 0),
            PostingPointer::new(u64::MAX, 2),
        ] {
            assert!(matches!(
                reader.read(&pointer),
                Err(DcSearchError::CorruptPostings(_))
            ));
        }
    }

    #[test]
    fn test_unsorted_blob_fails() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::open(temp_dir.path(), StorageConfig::default()).unwrap();
        std::fs::write(temp_dir.path().join("post"), b"3 1 ").unwrap();

        let reader = PostingsReader::open(&storage, "post").unwrap();
        assert!(matches!(
            reader.read(&PostingPointer::new(0, 4)),
            Err(DcSearchError::CorruptPostings(_))
        ));
    }
}
