//! The in-memory boolean index: a fixed-size hash table of term entries.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log::{debug, warn};

use crate::error::{BooldexErrorKind, BooldexResult};
use crate::merge::{boolean_and, boolean_not, boolean_or};
use crate::query::Query;
use crate::read::IndexFileReader;
use crate::write::IndexFileWriter;

/// Identifies a document. Ids are assigned by the caller.
pub type DocId = u32;

/// Number of buckets used by [`BooleanIndex::new`].
pub const DEFAULT_TABLE_SIZE: usize = 100_000;

/// Everything the index knows about one term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TermEntry {
    pub(crate) term: String,
    pub(crate) collection_tf: u32,
    pub(crate) postings: Vec<DocId>,
}

impl TermEntry {
    fn new(term: &str, doc_id: DocId) -> TermEntry {
        TermEntry {
            term: term.to_string(),
            collection_tf: 1,
            postings: vec![doc_id],
        }
    }

    /// The term itself.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// How many times the term occurs across all documents, repeats included.
    pub fn collection_term_frequency(&self) -> u32 {
        self.collection_tf
    }

    /// The documents containing the term, ascending.
    pub fn postings(&self) -> &[DocId] {
        &self.postings
    }
}

/// A boolean inverted index.
///
/// Terms live in a fixed number of buckets chosen by a polynomial hash of the
/// term's bytes. Each bucket is a short vector that is scanned linearly, so a
/// term appears in exactly one entry of exactly one bucket.
///
/// Posting lists stay ascending and free of duplicates only as long as
/// documents are added in non-decreasing id order. [`add_document`] does not
/// enforce this; [`add_document_checked`] does.
///
/// [`add_document`]: BooleanIndex::add_document
/// [`add_document_checked`]: BooleanIndex::add_document_checked
#[derive(Clone, Debug)]
pub struct BooleanIndex {
    table: Vec<Vec<TermEntry>>,
    total_docs: u32,
}

impl Default for BooleanIndex {
    fn default() -> Self {
        BooleanIndex::new()
    }
}

impl BooleanIndex {
    /// An empty index with [`DEFAULT_TABLE_SIZE`] buckets.
    pub fn new() -> BooleanIndex {
        BooleanIndex::with_table_size(DEFAULT_TABLE_SIZE)
    }

    /// An empty index with `table_size` buckets (at least one).
    pub fn with_table_size(table_size: usize) -> BooleanIndex {
        BooleanIndex {
            table: vec![vec![]; table_size.max(1)],
            total_docs: 0,
        }
    }

    pub(crate) fn from_parts(table: Vec<Vec<TermEntry>>, total_docs: u32) -> BooleanIndex {
        BooleanIndex { table, total_docs }
    }

    pub(crate) fn buckets(&self) -> &[Vec<TermEntry>] {
        &self.table
    }

    /// The number of buckets. Fixed for the life of the index.
    pub fn table_size(&self) -> usize {
        self.table.len()
    }

    /// One past the highest document id ever added.
    pub fn total_docs(&self) -> u32 {
        self.total_docs
    }

    /// The number of distinct terms.
    pub fn term_count(&self) -> usize {
        self.table.iter().map(Vec::len).sum()
    }

    /// Every term entry, in bucket order.
    pub fn terms(&self) -> impl Iterator<Item = &TermEntry> + '_ {
        self.table.iter().flatten()
    }

    fn bucket_of(&self, term: &str) -> usize {
        let h = term
            .bytes()
            .fold(0u64, |h, b| h.wrapping_mul(31).wrapping_add(u64::from(b)));
        (h % self.table.len() as u64) as usize
    }

    fn find(&self, term: &str) -> Option<&TermEntry> {
        self.table[self.bucket_of(term)]
            .iter()
            .find(|entry| entry.term == term)
    }

    /// Record that document `doc_id` contains `tokens`.
    ///
    /// Every occurrence counts toward the term's collection frequency; the
    /// document is added to a term's postings once. Ids must not decrease from
    /// one call to the next. That is not checked here: a smaller id is logged
    /// and then stored anyway, leaving the postings out of order.
    pub fn add_document<S: AsRef<str>>(&mut self, doc_id: DocId, tokens: &[S]) {
        if doc_id.saturating_add(1) < self.total_docs {
            warn!(
                "document {} added after document {}; postings will be out of order",
                doc_id,
                self.total_docs - 1
            );
        }
        self.total_docs = self.total_docs.max(doc_id.saturating_add(1));

        for token in tokens {
            let token = token.as_ref();
            let idx = self.bucket_of(token);
            let bucket = &mut self.table[idx];
            match bucket.iter_mut().find(|entry| entry.term == token) {
                Some(entry) => {
                    entry.collection_tf += 1;
                    if entry.postings.last() != Some(&doc_id) {
                        entry.postings.push(doc_id);
                    }
                }
                None => bucket.push(TermEntry::new(token, doc_id)),
            }
        }
    }

    /// Like [`add_document`](BooleanIndex::add_document), but refuses a
    /// document id lower than one already added.
    pub fn add_document_checked<S: AsRef<str>>(
        &mut self,
        doc_id: DocId,
        tokens: &[S],
    ) -> BooldexResult<()> {
        if doc_id.saturating_add(1) < self.total_docs {
            return Err(BooldexErrorKind::OutOfOrderDocument {
                doc_id,
                last: self.total_docs - 1,
            }
            .into());
        }
        self.add_document(doc_id, tokens);
        Ok(())
    }

    /// The documents containing `term`, or `None` if the term was never added.
    ///
    /// The slice borrows the index, so it can't outlive the next mutation.
    pub fn get_postings(&self, term: &str) -> Option<&[DocId]> {
        self.find(term).map(|entry| entry.postings.as_slice())
    }

    /// How often `term` occurs in the whole collection; 0 if never added.
    pub fn get_collection_term_frequency(&self, term: &str) -> u32 {
        self.find(term).map_or(0, |entry| entry.collection_tf)
    }

    /// Parse `tokens` as a [`Query`] and evaluate it.
    ///
    /// Malformed queries and unknown operands both produce an empty result.
    pub fn evaluate_query<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<DocId> {
        self.evaluate(&Query::parse(tokens))
    }

    /// Evaluate an already parsed query.
    ///
    /// `NOT`, `AND` and `OR` yield nothing when an operand is not in the index.
    pub fn evaluate(&self, query: &Query<'_>) -> Vec<DocId> {
        match *query {
            Query::Term(term) => self.get_postings(term).map(<[DocId]>::to_vec).unwrap_or_default(),
            Query::Not(term) => self
                .get_postings(term)
                .map(|p| boolean_not(p, self.total_docs))
                .unwrap_or_default(),
            Query::And(left, right) => match (self.get_postings(left), self.get_postings(right)) {
                (Some(a), Some(b)) => boolean_and(a, b),
                _ => vec![],
            },
            Query::Or(left, right) => match (self.get_postings(left), self.get_postings(right)) {
                (Some(a), Some(b)) => boolean_or(a, b),
                _ => vec![],
            },
            Query::Invalid => vec![],
        }
    }

    /// Write the whole index to `path`, replacing whatever was there.
    ///
    /// A failure part-way leaves a truncated file behind.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> BooldexResult<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| BooldexErrorKind::OpenIndex {
            path: path.display().to_string(),
            source,
        })?;

        let mut writer = IndexFileWriter::new(BufWriter::new(file));
        writer.write_index(self)?;
        let nbytes = writer.finish()?;
        debug!(
            "wrote {}: {} bytes, {} terms in {} buckets",
            path.display(),
            nbytes,
            self.term_count(),
            self.table_size()
        );
        Ok(())
    }

    /// Replace the contents of this index with the index stored at `path`.
    ///
    /// If the file can't be opened or decoded, `self` is left as it was.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> BooldexResult<()> {
        *self = BooleanIndex::open(path)?;
        Ok(())
    }

    /// Read an index previously written by [`save`](BooleanIndex::save).
    pub fn open<P: AsRef<Path>>(path: P) -> BooldexResult<BooleanIndex> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| BooldexErrorKind::OpenIndex {
            path: path.display().to_string(),
            source,
        })?;
        let len = file.metadata()?.len();

        let index = IndexFileReader::new(BufReader::new(file), len).read_index()?;
        debug!(
            "opened {}: {} terms in {} buckets, {} documents",
            path.display(),
            index.term_count(),
            index.table_size(),
            index.total_docs()
        );
        Ok(index)
    }
}
