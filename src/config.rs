//! Command-line settings and their defaults.

use std::path::PathBuf;

use crate::index::DEFAULT_TABLE_SIZE;

/// Where the index is written when no path is given.
pub const DEFAULT_INDEX_PATH: &str = "index.dat";

/// Settings for building an index from a set of text files.
#[derive(Clone, Debug)]
pub struct BuildOptions {
    /// Files and directories to index. Directories contribute the regular
    /// files immediately inside them.
    pub documents: Vec<String>,
    /// Where to save the index.
    pub index_path: PathBuf,
    /// Bucket count for the new index.
    pub table_size: usize,
    /// Stem tokens before indexing them.
    pub stem: bool,
    /// Do all the work on the calling thread.
    pub single_threaded: bool,
    /// Report this many of the most frequent terms; 0 for none.
    pub top_terms: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            documents: vec![],
            index_path: PathBuf::from(DEFAULT_INDEX_PATH),
            table_size: DEFAULT_TABLE_SIZE,
            stem: true,
            single_threaded: false,
            top_terms: 0,
        }
    }
}

/// Settings for querying a saved index.
#[derive(Clone, Debug)]
pub struct SearchOptions {
    /// The index to load.
    pub index_path: PathBuf,
    /// Stem query operands. Should match how the index was built.
    pub stem: bool,
    /// The query text, e.g. `cats and dogs`.
    pub query: String,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            index_path: PathBuf::from(DEFAULT_INDEX_PATH),
            stem: true,
            query: String::new(),
        }
    }
}
