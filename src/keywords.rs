//! Tokenization, keyword occurrence counting and keyword suggestions

use crate::types::{PaperEntry, WordCount};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

pub const DEFAULT_SUGGESTION_LIMIT: usize = 50;

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "itself", "just", "may", "me", "more", "most", "my", "myself", "no", "nor", "not", "now",
    "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over",
    "own", "same", "she", "should", "so", "some", "such", "than", "that", "the", "their",
    "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "us", "very", "was", "we", "were", "what",
    "when", "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you",
    "your", "yours", "yourself", "yourselves",
];

fn stopwords() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOPWORDS.iter().copied().collect())
}

pub fn is_stopword(word: &str) -> bool {
    stopwords().contains(word)
}

/// Significant tokens of `text`: whitespace split, lower-cased, stopwords dropped.
/// No stemming.
pub fn extract_keywords(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(|token| token.to_lowercase())
        .filter(|token| !token.is_empty() && !is_stopword(token))
}

pub fn keyword_set(text: &str) -> HashSet<String> {
    extract_keywords(text).collect()
}

/// Non-overlapping, case-insensitive substring occurrences of `keyword` in `haystack`
pub fn count_occurrences(haystack: &str, keyword: &str) -> usize {
    let needle = keyword.to_lowercase();
    if needle.is_empty() {
        return 0;
    }
    haystack.to_lowercase().matches(needle.as_str()).count()
}

/// Most frequent words across the seed papers' abstracts, declared keywords
/// and titles, flagged with whether they are already active keywords.
pub fn suggest_keywords(
    seed_papers: &[PaperEntry],
    selected: &[String],
    limit: usize,
) -> Vec<WordCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for entry in seed_papers {
        let words = entry
            .abstract_text
            .split(' ')
            .chain(entry.keywords.iter().map(String::as_str))
            .chain(entry.title.split(' '));
        for word in words {
            *counts.entry(word).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = counts
        .into_iter()
        .filter(|(word, _)| !word.is_empty() && !is_stopword(&word.to_lowercase()))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(word, count)| WordCount {
            word: word.to_string(),
            count,
            is_selected: selected.iter().any(|k| k == word),
        })
        .collect()
}
