//! Minimal, deterministic text normalization helpers.
//!
//! Everything the extractor emits (title, fragments, anchor text) goes through [`normalize`],
//! so the scorer only ever sees single-spaced text made of word characters and `. , ! ? -`.

/// Punctuation that survives normalization.
const KEPT_PUNCT: [char; 5] = ['.', ',', '!', '?', '-'];

fn is_kept(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || KEPT_PUNCT.contains(&ch)
}

/// Collapse whitespace, drop non-semantic characters, trim.
///
/// - any run of whitespace (spaces, tabs, newlines, NBSP, ...) becomes one ASCII space
/// - characters other than word characters, whitespace and `. , ! ? -` are removed
/// - leading/trailing whitespace is trimmed
///
/// Dropping a character can bring two whitespace runs together (`"a & b"`); they are merged
/// too, which keeps the function idempotent. Output is never longer than input (in chars).
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for ch in raw.chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if !is_kept(ch) {
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(ch);
    }
    out
}

/// Char length, which is what every bound in this crate counts.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// First `max_chars` chars of `s` (never splits a code point).
pub fn prefix_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte, _)) => &s[..byte],
        None => s,
    }
}
