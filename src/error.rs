//! Error types shared by the whole crate.

use std::io;
use std::string::FromUtf8Error;

/// Result type that is being returned from methods that can fail and thus have [`BooldexError`]s.
pub type BooldexResult<T> = Result<T, BooldexError>;

/// Errors that can result from building, saving, loading or searching an index.
// [`Error`] is public, but opaque and easy to keep compatible.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct BooldexError(#[from] BooldexErrorKind);

// Accessors for anything we do want to expose publicly.
impl BooldexError {
    /// Expose the inner error kind.
    ///
    /// This is useful for matching on the error kind.
    pub fn into_inner(self) -> BooldexErrorKind {
        self.0
    }

    /// Borrow the inner error kind.
    pub fn kind(&self) -> &BooldexErrorKind {
        &self.0
    }

    /// True if the error came from bytes that are not a valid index file,
    /// as opposed to a failure to reach the file at all.
    pub fn is_corrupt_data(&self) -> bool {
        matches!(
            self.0,
            BooldexErrorKind::Truncated { .. }
                | BooldexErrorKind::NegativeField { .. }
                | BooldexErrorKind::InvalidTerm { .. }
                | BooldexErrorKind::EmptyTable
        )
    }
}

impl From<io::Error> for BooldexError {
    fn from(value: io::Error) -> Self {
        Self(BooldexErrorKind::Io(value))
    }
}

/// [`BooldexErrorKind`] describes the errors that can happen while executing a high-level command.
///
/// This is a non-exhaustive enum, so additional variants may be added in future. It is
/// recommended to match against the wildcard `_` instead of listing all possible variants,
/// to avoid problems when new variants are added.
#[non_exhaustive]
#[derive(thiserror::Error, Debug, displaydoc::Display)]
pub enum BooldexErrorKind {
    /// I/O error: {0}
    Io(#[from] io::Error),
    /// could not open index file `{path}`: {source}
    OpenIndex {
        /// The path that could not be opened.
        path: String,
        /// What the operating system said.
        source: io::Error,
    },
    /// index file truncated: `{field}` needs {needed} bytes but only {remaining} remain
    Truncated {
        /// Which field of the layout was being read.
        field: &'static str,
        /// Bytes the field asks for.
        needed: u64,
        /// Bytes left in the input.
        remaining: u64,
    },
    /// index file corrupt: `{field}` is negative ({value})
    NegativeField {
        /// Which field of the layout was being read.
        field: &'static str,
        /// The value found.
        value: i32,
    },
    /// index file corrupt: a term is not valid UTF-8
    InvalidTerm {
        /// The decoding failure.
        source: FromUtf8Error,
    },
    /// index file corrupt: the table has zero buckets
    EmptyTable,
    /// `{field}` value {value} does not fit in a 4-byte signed integer on disk
    FieldOverflow {
        /// Which field of the layout was being written.
        field: &'static str,
        /// The value that did not fit.
        value: u64,
    },
    /// document {doc_id} arrived after document {last}; ids must not decrease
    OutOfOrderDocument {
        /// The rejected document id.
        doc_id: u32,
        /// The highest document id already ingested.
        last: u32,
    },
    /// no documents were parsed
    NoDocuments,
    /// document path `{path}` is not UTF-8 or contains a newline, so it cannot be listed in the manifest
    UnlistablePath {
        /// The offending path, lossily converted.
        path: String,
    },
}
