//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{DcSearchArgs, OutputFormat};
use crate::error::Result;
use crate::query::QueryNode;

/// Types that know how to print themselves for a terminal.
pub trait HumanOutput {
    fn print_human(&self, verbosity: u8);
}

/// Result of an index build.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexBuildResult {
    pub doc_dir: String,
    pub index_dir: String,
    pub doc_count: u64,
    pub total_bytes: u64,
    pub term_count: usize,
    pub segment_count: usize,
    pub duration_ms: u64,
}

impl HumanOutput for IndexBuildResult {
    fn print_human(&self, verbosity: u8) {
        println!(
            "Indexed {} documents ({} bytes) from {} into {}",
            self.doc_count, self.total_bytes, self.doc_dir, self.index_dir
        );
        if verbosity > 1 {
            println!("Terms: {}", self.term_count);
            println!("Segments merged: {}", self.segment_count);
            println!("Build time: {}ms", self.duration_ms);
        }
    }
}

/// One search hit.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchHit {
    pub doc_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// Result of a search.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResults {
    pub total_hits: usize,
    pub hits: Vec<SearchHit>,
    pub duration_ms: u64,
}

impl HumanOutput for SearchResults {
    fn print_human(&self, verbosity: u8) {
        for hit in &self.hits {
            match (&hit.path, &hit.snippet) {
                (Some(path), Some(snippet)) => println!("{}\t{}\t{}", hit.doc_id, path, snippet),
                (Some(path), None) => println!("{}\t{}", hit.doc_id, path),
                _ => println!("{}", hit.doc_id),
            }
        }
        if verbosity > 0 {
            println!();
            if self.hits.len() < self.total_hits {
                println!("Showing {} of {} hits", self.hits.len(), self.total_hits);
            } else {
                println!("Total hits: {}", self.total_hits);
            }
        }
        if verbosity > 1 {
            println!("Search time: {}ms", self.duration_ms);
        }
    }
}

/// Index statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexStatsResult {
    pub index_dir: String,
    pub num_of_docs: u64,
    pub num_of_bytes: u64,
    pub bytes_per_doc: f64,
    pub term_count: usize,
    pub postings_bytes: u64,
}

impl HumanOutput for IndexStatsResult {
    fn print_human(&self, _verbosity: u8) {
        println!("Index: {}", self.index_dir);
        println!("Documents: {}", self.num_of_docs);
        println!("Bytes: {}", self.num_of_bytes);
        println!("Average bytes/doc: {:.1}", self.bytes_per_doc);
        println!("Terms: {}", self.term_count);
        println!("Postings size: {} bytes", self.postings_bytes);
    }
}

/// A parsed query tree.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryTreeResult {
    pub tree: QueryNode,
    pub leaf_count: usize,
    pub depth: usize,
}

impl HumanOutput for QueryTreeResult {
    fn print_human(&self, verbosity: u8) {
        print!("{}", self.tree);
        if verbosity > 1 {
            println!("leaves: {}, depth: {}", self.leaf_count, self.depth);
        }
    }
}

/// Print `result` in the format selected on the command line.
pub fn output_result<T: Serialize + HumanOutput>(result: &T, args: &DcSearchArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            result.print_human(args.verbosity());
            Ok(())
        }
        OutputFormat::Json => output_json(result, args.pretty),
    }
}

fn output_json<T: Serialize>(result: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

/// First `max_chars` characters of `text` on one line.
pub fn snippet(text: &str, max_chars: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet() {
        assert_eq!(snippet("cat\n  dog", 20), "cat dog");
        assert_eq!(snippet("abcdef", 3), "abc...");
        assert_eq!(snippet("", 3), "");
    }

    #[test]
    fn test_search_results_json_skips_missing_fields() {
        let results = SearchResults {
            total_hits: 1,
            hits: vec![SearchHit {
                doc_id: 3,
                path: None,
                snippet: None,
            }],
            duration_ms: 0,
        };
        let json = serde_json::to_string(&results).unwrap();
        assert_eq!(json, r#"{"total_hits":1,"hits":[{"doc_id":3}],"duration_ms":0}"#);
    }
}
