//! Set operations over posting lists.
//!
//! Every input must be strictly ascending; every output is too. Each
//! operation is a single linear pass that walks both lists in step, the same
//! way a k-way merge of sorted index files does.

use crate::index::DocId;

/// Documents present in both `a` and `b`.
pub fn boolean_and(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            out.push(a[i]);
            i += 1;
            j += 1;
        } else if a[i] < b[j] {
            i += 1;
        } else {
            j += 1;
        }
    }
    out
}

/// Documents present in `a`, `b` or both, each reported once.
pub fn boolean_or(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            out.push(a[i]);
            i += 1;
        } else if b[j] < a[i] {
            out.push(b[j]);
            j += 1;
        } else {
            out.push(a[i]);
            i += 1;
            j += 1;
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

/// Documents in `0..total_docs` that are not in `a`.
pub fn boolean_not(a: &[DocId], total_docs: DocId) -> Vec<DocId> {
    let mut out = vec![];
    let mut j = 0;
    for doc in 0..total_docs {
        if j < a.len() && a[j] == doc {
            j += 1;
        } else {
            out.push(doc);
        }
    }
    out
}
