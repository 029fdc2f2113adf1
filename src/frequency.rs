//! Term frequency ranking, for looking at a corpus's Zipf curve.

use std::collections::HashMap;

/// Count each distinct token and sort by descending count.
///
/// Ties come out in no particular order.
pub fn rank_by_frequency<S: AsRef<str>>(tokens: &[S]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in tokens {
        *counts.entry(token.as_ref()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(token, count)| (token.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}
