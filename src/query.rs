//! The boolean query grammar.
//!
//! A query is one term, `not TERM`, `TERM and TERM`, or `TERM or TERM`.
//! Anything else parses to [`Query::Invalid`], which evaluates to no
//! documents, but callers that care can tell it apart from a valid query
//! that simply matched nothing.

use crate::stem::stem;
use crate::tokenize::tokenize;

/// Operator literals. They are matched exactly; [`analyze_query`] lower-cases
/// ASCII before [`Query::parse`] sees them.
pub const NOT: &str = "not";
/// See [`NOT`].
pub const AND: &str = "and";
/// See [`NOT`].
pub const OR: &str = "or";

/// A parsed boolean query borrowing its terms from the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Query<'a> {
    /// Documents containing the term.
    Term(&'a str),
    /// Documents not containing the term.
    Not(&'a str),
    /// Documents containing both terms.
    And(&'a str, &'a str),
    /// Documents containing either term.
    Or(&'a str, &'a str),
    /// A token sequence of any other shape.
    Invalid,
}

impl<'a> Query<'a> {
    /// Interpret a token sequence that has already been analysed.
    pub fn parse<S: AsRef<str>>(tokens: &'a [S]) -> Query<'a> {
        match tokens {
            [term] => Query::Term(term.as_ref()),
            [op, term] if op.as_ref() == NOT => Query::Not(term.as_ref()),
            [left, op, right] if op.as_ref() == AND => Query::And(left.as_ref(), right.as_ref()),
            [left, op, right] if op.as_ref() == OR => Query::Or(left.as_ref(), right.as_ref()),
            _ => Query::Invalid,
        }
    }

    /// True unless this is [`Query::Invalid`].
    pub fn is_valid(&self) -> bool {
        !matches!(self, Query::Invalid)
    }
}

/// Turn raw query text into the token sequence [`Query::parse`] expects.
///
/// The text goes through [`tokenize`], exactly like a document does, so
/// punctuation separates words and only ASCII letters are lower-cased.
/// Operands are stemmed when `stemming` is on, so they match an index built
/// from stemmed tokens; operator literals in operator position are kept as
/// they are.
pub fn analyze_query(text: &str, stemming: bool) -> Vec<String> {
    let words = tokenize(text);
    let is_operator = |i: usize, w: &str| match (words.len(), i) {
        (2, 0) => w == NOT,
        (3, 1) => w == AND || w == OR,
        _ => false,
    };

    words
        .iter()
        .enumerate()
        .map(|(i, w)| {
            if stemming && !is_operator(i, w.as_str()) {
                stem(w)
            } else {
                w.clone()
            }
        })
        .collect()
}
