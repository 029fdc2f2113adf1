//! `booldex` builds a boolean inverted index over a set of text files and
//! answers `AND`/`OR`/`NOT` queries against it.
//!
//! The pieces, leaf first:
//!
//! *   [`tokenize`](tokenize::tokenize) splits raw bytes into lower-cased word
//!     tokens.
//! *   [`stem`](stem::stem) reduces an English token to its stem.
//! *   [`BooleanIndex`] maps terms to posting lists and evaluates
//!     [`Query`]s with the merges in [`merge`]. It saves and loads itself
//!     through the codec in [`write`] and [`read`].
//!
//! In this file we put the pieces together. `run_build` indexes files either
//! on one thread, in the most straightforward possible way, or as a
//! three-stage pipeline that reads and analyses documents on background
//! threads while the calling thread fills the index. `run_search` loads a
//! saved index and evaluates one query.

pub mod config;
pub mod error;
pub mod frequency;
pub mod index;
pub mod merge;
pub mod query;
pub mod read;
pub mod stem;
pub mod tokenize;
pub mod write;

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::thread::{spawn, JoinHandle};

use log::info;

pub use crate::config::{BuildOptions, SearchOptions};
pub use crate::error::{BooldexError, BooldexErrorKind, BooldexResult};
pub use crate::index::{BooleanIndex, DocId, TermEntry};
pub use crate::query::Query;

use crate::frequency::rank_by_frequency;
use crate::query::analyze_query;

/// Tokenize a document and, if asked, stem every token.
pub fn analyze(text: &[u8], stemming: bool) -> Vec<String> {
    let tokens = tokenize::tokenize(text);
    if stemming {
        tokens.iter().map(|t| stem::stem(t)).collect()
    } else {
        tokens
    }
}

/// The file listing which path each document id was built from.
pub fn manifest_path(index_path: &Path) -> PathBuf {
    let mut name = OsString::from(index_path.as_os_str());
    name.push(".docs");
    PathBuf::from(name)
}

fn doc_id_of(n: usize) -> BooldexResult<DocId> {
    DocId::try_from(n).map_err(|_| {
        BooldexErrorKind::FieldOverflow {
            field: "doc_id",
            value: n as u64,
        }
        .into()
    })
}

fn log_progress(doc_id: DocId, ntokens: usize) {
    if doc_id % 100 == 0 {
        info!("indexed document {}, {} tokens", doc_id, ntokens);
    }
}

/// Index `documents` in order, on the calling thread. Document `n` gets id `n`.
fn index_single_threaded(
    documents: &[PathBuf],
    options: &BuildOptions,
    corpus: &mut Vec<String>,
) -> BooldexResult<BooleanIndex> {
    let mut index = BooleanIndex::with_table_size(options.table_size);
    for (n, filename) in documents.iter().enumerate() {
        let doc_id = doc_id_of(n)?;
        let text = fs::read(filename)?;
        let tokens = analyze(&text, options.stem);
        index.add_document_checked(doc_id, &tokens)?;
        log_progress(doc_id, tokens.len());
        if options.top_terms > 0 {
            corpus.extend(tokens);
        }
    }
    Ok(index)
}

/// Start a thread that loads documents from the filesystem into memory.
///
/// This returns a receiver for the raw bytes of each document, in order, and
/// a `JoinHandle` that yields the first `io::Error`, if any.
fn start_file_reader_thread(
    documents: Vec<PathBuf>,
) -> (Receiver<Vec<u8>>, JoinHandle<io::Result<()>>) {
    let (sender, receiver) = channel();

    let handle = spawn(move || {
        for filename in documents {
            let text = fs::read(filename)?;
            if sender.send(text).is_err() {
                break;
            }
        }
        Ok(())
    });

    (receiver, handle)
}

/// Start a thread that turns each document's bytes into index terms.
///
/// This stage is infallible: it does no I/O.
fn start_analysis_thread(
    texts: Receiver<Vec<u8>>,
    stemming: bool,
) -> (Receiver<Vec<String>>, JoinHandle<()>) {
    let (sender, receiver) = channel();

    let handle = spawn(move || {
        for text in texts {
            if sender.send(analyze(&text, stemming)).is_err() {
                break;
            }
        }
    });

    (receiver, handle)
}

fn join<T>(handle: JoinHandle<T>, stage: &str) -> io::Result<T> {
    handle
        .join()
        .map_err(|_| io::Error::other(format!("{stage} thread panicked")))
}

/// Same result as `index_single_threaded`, but reading and analysis run on
/// their own threads. The index itself only ever has one writer: this thread.
fn index_pipeline(
    documents: Vec<PathBuf>,
    options: &BuildOptions,
    corpus: &mut Vec<String>,
) -> BooldexResult<BooleanIndex> {
    let (texts, h1) = start_file_reader_thread(documents);
    let (analyzed, h2) = start_analysis_thread(texts, options.stem);

    let mut index = BooleanIndex::with_table_size(options.table_size);
    let mut result = Ok(());
    for (n, tokens) in analyzed.into_iter().enumerate() {
        let added = doc_id_of(n).and_then(|doc_id| {
            index.add_document_checked(doc_id, &tokens)?;
            log_progress(doc_id, tokens.len());
            Ok(())
        });
        if let Err(err) = added {
            // Dropping the receiver stops the upstream threads.
            result = Err(err);
            break;
        }
        if options.top_terms > 0 {
            corpus.extend(tokens);
        }
    }

    // Wait for threads to finish, holding on to any errors that they encounter.
    let r1 = join(h1, "reader")?;
    join(h2, "analysis")?;

    result?;
    r1?;
    Ok(index)
}

/// Given some paths, generate the complete list of text files to index. For
/// directories, the regular files immediately inside are taken in name order.
///
/// It's an error if any of the `args` is not a valid path to an existing file
/// or directory.
pub fn expand_filename_arguments(args: &[String]) -> io::Result<Vec<PathBuf>> {
    let mut filenames = vec![];
    for arg in args {
        let path = PathBuf::from(arg);
        if path.metadata()?.is_dir() {
            let mut entries = vec![];
            for entry in path.read_dir()? {
                let entry = entry?;
                if entry.file_type()?.is_file() {
                    entries.push(entry.path());
                }
            }
            entries.sort();
            filenames.extend(entries);
        } else {
            filenames.push(path);
        }
    }
    Ok(filenames)
}

/// What a build produced.
#[derive(Debug)]
pub struct BuildSummary {
    /// How many documents were indexed.
    pub documents: usize,
    /// How many distinct terms the index holds.
    pub terms: usize,
    /// The most frequent terms, if any were asked for.
    pub top_terms: Vec<(String, usize)>,
}

/// The manifest line for `path`. The manifest holds one path per line, so a
/// path must be UTF-8 and free of newlines to be listed.
fn manifest_line(path: &Path) -> BooldexResult<&str> {
    match path.to_str() {
        Some(line) if !line.contains(['\n', '\r']) => Ok(line),
        _ => Err(BooldexErrorKind::UnlistablePath {
            path: path.display().to_string(),
        }
        .into()),
    }
}

/// Index every document named by `options`, then save the index and its
/// manifest next to each other.
pub fn run_build(options: &BuildOptions) -> BooldexResult<BuildSummary> {
    let documents = expand_filename_arguments(&options.documents)?;
    build_documents(documents, options)
}

/// Index `documents` in order, ignoring `options.documents`, then save the
/// index and its manifest. Document `n` gets id `n`.
///
/// Nothing is written unless every document was read and indexed.
pub fn build_documents(
    documents: Vec<PathBuf>,
    options: &BuildOptions,
) -> BooldexResult<BuildSummary> {
    if documents.is_empty() {
        return Err(BooldexErrorKind::NoDocuments.into());
    }

    let mut manifest = String::new();
    for path in &documents {
        manifest.push_str(manifest_line(path)?);
        manifest.push('\n');
    }
    let ndocs = documents.len();

    let mut corpus = vec![];
    let index = if options.single_threaded {
        index_single_threaded(&documents, options, &mut corpus)?
    } else {
        index_pipeline(documents, options, &mut corpus)?
    };

    index.save(&options.index_path)?;
    fs::write(manifest_path(&options.index_path), manifest)?;
    info!(
        "saved {} documents, {} terms to {}",
        ndocs,
        index.term_count(),
        options.index_path.display()
    );

    let mut top_terms = rank_by_frequency(&corpus);
    top_terms.truncate(options.top_terms);

    Ok(BuildSummary {
        documents: ndocs,
        terms: index.term_count(),
        top_terms,
    })
}

/// One matching document.
#[derive(Debug, PartialEq, Eq)]
pub struct SearchHit {
    /// The document's id.
    pub doc_id: DocId,
    /// The file the document came from, if the manifest says.
    pub path: Option<PathBuf>,
}

/// The result of [`run_search`].
#[derive(Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query text was not one of the accepted shapes.
    InvalidQuery,
    /// The matching documents, ascending by id. May be empty.
    Hits(Vec<SearchHit>),
}

/// Load the index named by `options` and evaluate its query.
pub fn run_search(options: &SearchOptions) -> BooldexResult<SearchOutcome> {
    let index = BooleanIndex::open(&options.index_path)?;

    let tokens = analyze_query(&options.query, options.stem);
    let query = Query::parse(&tokens);
    if !query.is_valid() {
        return Ok(SearchOutcome::InvalidQuery);
    }

    let paths: Vec<PathBuf> = match fs::read_to_string(manifest_path(&options.index_path)) {
        Ok(text) => text.lines().map(PathBuf::from).collect(),
        Err(err) if err.kind() == io::ErrorKind::NotFound => vec![],
        Err(err) => return Err(err.into()),
    };

    let hits = index
        .evaluate(&query)
        .into_iter()
        .map(|doc_id| SearchHit {
            doc_id,
            path: paths.get(doc_id as usize).cloned(),
        })
        .collect();
    Ok(SearchOutcome::Hits(hits))
}
