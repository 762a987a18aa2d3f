//! Lexical sentence ranking used to answer questions about a stored page.
//!
//! No stemming, no stop-words. A query word counts when it appears as a case-insensitive
//! substring of the sentence.

use crate::textprep::prefix_chars;
use serde::Serialize;

/// Number of sentences joined into an excerpt.
pub const TOP_SENTENCES: usize = 3;

/// Length (chars) of the fallback excerpt when nothing matches.
pub const FALLBACK_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredSentence {
    /// Position among the non-empty segments of the content.
    pub index: usize,
    /// Number of query-word slots matched.
    pub score: u64,
    /// Trimmed sentence text.
    pub text: String,
}

fn split_sentences(content: &str) -> impl Iterator<Item = &str> {
    content
        .split(['.', '!', '?'])
        .filter(|s| !s.is_empty())
}

fn query_words(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Every sentence that matches at least one query word, best first.
///
/// Ties keep document order (`sort_by` is stable), so earlier sentences win.
pub fn rank_sentences(query: &str, content: &str) -> Vec<ScoredSentence> {
    let words = query_words(query);
    if words.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<ScoredSentence> = split_sentences(content)
        .enumerate()
        .filter_map(|(index, sentence)| {
            let lower = sentence.to_lowercase();
            let score = words.iter().filter(|w| lower.contains(w.as_str())).count() as u64;
            (score > 0).then(|| ScoredSentence {
                index,
                score,
                text: sentence.trim().to_string(),
            })
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// Best excerpt of `content` for `query`.
///
/// Up to [`TOP_SENTENCES`] matching sentences joined by spaces, in descending score order; or the
/// first [`FALLBACK_CHARS`] chars of `content` when no sentence matches (including an empty
/// query or empty content).
pub fn find_relevant(query: &str, content: &str) -> String {
    let ranked = rank_sentences(query, content);
    if ranked.is_empty() {
        return prefix_chars(content, FALLBACK_CHARS).to_string();
    }
    ranked
        .iter()
        .take(TOP_SENTENCES)
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
