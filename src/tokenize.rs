//! Splitting raw text into tokens.
//!
//! The input is treated as UTF-8 but decoded by hand, one code point at a
//! time, so that malformed bytes are skipped instead of rejecting the whole
//! document. Only a fixed set of code points count as word characters: ASCII
//! letters and digits, `'`, `-`, `$`, the Latin-1 Supplement letters and the
//! Cyrillic block.

/// Decode the code point starting at `bytes[*pos]` and advance `*pos` past it.
///
/// The length of the sequence comes from the high bits of the leading byte.
/// Continuation bytes contribute their low six bits without further checks.
/// A leading byte that matches no pattern, or a sequence cut short by the end
/// of the input, consumes one byte and decodes to 0.
pub fn next_code_point(bytes: &[u8], pos: &mut usize) -> u32 {
    let lead = bytes[*pos];
    let (len, payload) = if lead < 0x80 {
        (1, u32::from(lead))
    } else if lead & 0xE0 == 0xC0 {
        (2, u32::from(lead & 0x1F))
    } else if lead & 0xF0 == 0xE0 {
        (3, u32::from(lead & 0x0F))
    } else if lead & 0xF8 == 0xF0 {
        (4, u32::from(lead & 0x07))
    } else {
        *pos += 1;
        return 0;
    };

    let Some(tail) = bytes.get(*pos + 1..*pos + len) else {
        *pos += 1;
        return 0;
    };

    *pos += len;
    tail.iter()
        .fold(payload, |cp, &b| (cp << 6) | u32::from(b & 0x3F))
}

/// True for the code points that may appear inside a token.
pub fn is_word_char(cp: u32) -> bool {
    match cp {
        0x30..=0x39 | 0x41..=0x5A | 0x61..=0x7A => true,
        0x24 | 0x27 | 0x2D => true, // $ ' -
        0x00C0..=0x00FF => true,    // Latin-1 Supplement
        0x0400..=0x04FF => true,    // Cyrillic
        _ => false,
    }
}

/// Break `text` into maximal runs of word characters.
///
/// ASCII letters are lower-cased; everything else is kept as it was. Tokens
/// are never empty.
pub fn tokenize<T: AsRef<[u8]>>(text: T) -> Vec<String> {
    let bytes = text.as_ref();
    let mut tokens = vec![];
    let mut token = String::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let mut cp = next_code_point(bytes, &mut pos);
        if cp < 0x80 {
            cp = u32::from((cp as u8).to_ascii_lowercase());
        }

        // Every word character is a valid scalar value, so `from_u32` only
        // fails for code points we'd have rejected anyway.
        match char::from_u32(cp).filter(|_| is_word_char(cp)) {
            Some(ch) => token.push(ch),
            None => {
                if !token.is_empty() {
                    tokens.push(std::mem::take(&mut token));
                }
            }
        }
    }

    if !token.is_empty() {
        tokens.push(token);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_words_are_lowercased_and_split() {
        assert_eq!(
            tokenize("The Cat's-Eye costs $5!"),
            vec!["the", "cat's-eye", "costs", "$5"]
        );
    }

    #[test]
    fn separators_never_leak_into_tokens() {
        assert_eq!(tokenize("a,b;;c  d\t\ne"), vec!["a", "b", "c", "d", "e"]);
        assert!(tokenize("  ...  !!! ").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn cyrillic_and_latin1_are_word_chars() {
        assert_eq!(tokenize("Привет, мир"), vec!["Привет", "мир"]);
        assert_eq!(tokenize("Año niño"), vec!["año", "niño"]);
    }

    #[test]
    fn other_scripts_separate_tokens() {
        // U+4E2D (CJK) and U+1F600 (emoji) are not word characters.
        assert_eq!(tokenize("ab中cd😀ef"), vec!["ab", "cd", "ef"]);
    }

    #[test]
    fn invalid_bytes_are_skipped() {
        assert_eq!(tokenize(b"ab\xFFcd"), vec!["ab", "cd"]);
        // A lone continuation byte is not a valid leading byte.
        assert_eq!(tokenize(b"x\x80y"), vec!["x", "y"]);
        // A sequence cut off by the end of input.
        assert_eq!(tokenize(b"word\xD0"), vec!["word"]);
    }

    #[test]
    fn decoder_handles_every_width() {
        let text = "a\u{e9}\u{4e2d}\u{1f600}".as_bytes();
        let mut pos = 0;
        let mut seen = vec![];
        while pos < text.len() {
            seen.push(next_code_point(text, &mut pos));
        }
        assert_eq!(seen, vec![0x61, 0xE9, 0x4E2D, 0x1F600]);
        assert_eq!(pos, text.len());
    }

    #[test]
    fn word_char_boundaries() {
        assert!(is_word_char(0xC0));
        assert!(is_word_char(0xFF));
        assert!(!is_word_char(0xBF));
        assert!(is_word_char(0x0400));
        assert!(is_word_char(0x04FF));
        assert!(!is_word_char(0x0500));
        assert!(!is_word_char(u32::from(b'_')));
    }
}
