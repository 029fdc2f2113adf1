//! A Porter-style suffix stripper for English tokens.
//!
//! Only plain ASCII words are touched; anything containing a non-ASCII byte
//! comes back unchanged. The rule cascade is plurals, then `-eed`/`-ed`/`-ing`,
//! then `y` to `i`, then the derivational suffix table, then a final `e`.
//!
//! Stemming is not idempotent: `stem(stem(w))` may differ from `stem(w)`.

/// Derivational suffixes and their replacements. The first suffix that
/// matches decides the rule, whether or not its measure condition holds.
const STEP2_RULES: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("abli", "able"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
];

/// Classify every position of `w` as consonant (`true`) or vowel.
///
/// `y` is a vowel when it follows a consonant and a consonant otherwise,
/// including at position 0. A single forward pass settles it.
fn consonants(w: &[u8]) -> Vec<bool> {
    let mut out: Vec<bool> = Vec::with_capacity(w.len());
    for (i, &c) in w.iter().enumerate() {
        let is_consonant = match c {
            b'a' | b'e' | b'i' | b'o' | b'u' => false,
            b'y' => i == 0 || !out[i - 1],
            _ => true,
        };
        out.push(is_consonant);
    }
    out
}

/// The number of vowel runs that are followed by a consonant run.
fn measure(w: &[u8]) -> usize {
    let mut m = 0;
    let mut in_vowel = false;
    for is_consonant in consonants(w) {
        if !is_consonant {
            in_vowel = true;
        } else if in_vowel {
            m += 1;
            in_vowel = false;
        }
    }
    m
}

fn contains_vowel(w: &[u8]) -> bool {
    consonants(w).iter().any(|&c| !c)
}

/// Ends in two identical consonants.
fn double_consonant(w: &[u8]) -> bool {
    let n = w.len();
    n >= 2 && w[n - 1] == w[n - 2] && consonants(w)[n - 1]
}

/// Ends consonant, vowel, consonant, where the last one is not `w`, `x` or `y`.
fn cvc(w: &[u8]) -> bool {
    let n = w.len();
    if n < 3 {
        return false;
    }
    let c = consonants(w);
    c[n - 1] && !c[n - 2] && c[n - 3] && !matches!(w[n - 1], b'w' | b'x' | b'y')
}

/// Reduce a single token to its stem.
pub fn stem(token: &str) -> String {
    if !token.is_ascii() || token.len() < 3 {
        return token.to_string();
    }

    let mut w = token.as_bytes().to_vec();
    step1_plurals(&mut w);
    step1_past_and_gerund(&mut w);
    step_y_to_i(&mut w);
    step2_derivational(&mut w);
    step_final_e(&mut w);

    // Only ASCII bytes were ever added or removed.
    String::from_utf8(w).unwrap_or_else(|_| token.to_string())
}

fn step1_plurals(w: &mut Vec<u8>) {
    if w.ends_with(b"sses") || w.ends_with(b"ies") {
        w.truncate(w.len() - 2);
    } else if w.ends_with(b"ss") {
        // keep
    } else if w.ends_with(b"s") {
        w.pop();
    }
}

fn step1_past_and_gerund(w: &mut Vec<u8>) {
    let n = w.len();
    if w.ends_with(b"eed") {
        if measure(&w[..n - 3]) > 0 {
            w.pop();
        }
        return;
    }

    let suffix_len = if w.ends_with(b"ed") && contains_vowel(&w[..n - 2]) {
        2
    } else if w.ends_with(b"ing") && contains_vowel(&w[..n - 3]) {
        3
    } else {
        return;
    };
    w.truncate(n - suffix_len);

    if w.ends_with(b"at") || w.ends_with(b"bl") || w.ends_with(b"iz") {
        w.push(b'e');
    } else if double_consonant(w) && !matches!(w.last(), Some(b'l' | b's' | b'z')) {
        w.pop();
    } else if measure(w) == 1 && cvc(w) {
        w.push(b'e');
    }
}

fn step_y_to_i(w: &mut [u8]) {
    let n = w.len();
    if w.ends_with(b"y") && contains_vowel(&w[..n - 1]) {
        w[n - 1] = b'i';
    }
}

fn step2_derivational(w: &mut Vec<u8>) {
    let Some(&(suffix, replacement)) = STEP2_RULES
        .iter()
        .find(|(suffix, _)| w.ends_with(suffix.as_bytes()))
    else {
        return;
    };

    let stem_len = w.len() - suffix.len();
    if measure(&w[..stem_len]) > 0 {
        w.truncate(stem_len);
        w.extend_from_slice(replacement.as_bytes());
    }
}

fn step_final_e(w: &mut Vec<u8>) {
    if !w.ends_with(b"e") {
        return;
    }
    let stem = &w[..w.len() - 1];
    let m = measure(stem);
    if m > 1 || (m == 1 && !cvc(stem)) {
        w.pop();
    }
}
