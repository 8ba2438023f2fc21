//! Tokenization and keyword ranking utilities.
//!
//! Shared by the suggestion engine for duplicate detection (Jaccard over
//! token sets) and for extracting the user's dominant vocabulary from
//! accumulated insights.

use std::collections::{HashMap, HashSet};

use crate::domain::models::Insight;

/// Words too common to carry signal about the user's territory.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "being", "but", "by", "can", "could", "do",
    "doing", "for", "from", "get", "have", "how", "i", "in", "into", "is", "it", "its", "like",
    "love", "make", "may", "more", "my", "new", "not", "of", "on", "or", "out", "really",
    "some", "that", "the", "their", "them", "they", "this", "to", "up", "want", "was", "we",
    "what", "when", "will", "with", "work", "working", "would", "you", "your",
];

fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Splits text into lower-cased alphanumeric tokens, dropping stop words
/// and tokens shorter than three characters.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() >= 3 && !is_stop_word(token))
        .map(ToString::to_string)
        .collect()
}

/// Token set for similarity comparison.
pub fn token_set(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}

/// Jaccard similarity of two token sets. Empty-vs-empty is 0, not 1:
/// two cards with no comparable text are not "the same idea".
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Ranks the user's dominant keywords across all insight values:
/// frequency-ranked, ties broken by first appearance, top `limit` kept.
pub fn dominant_keywords(insights: &[Insight], limit: usize) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();

    for insight in insights {
        for token in tokenize(&insight.value) {
            if !counts.contains_key(&token) {
                first_seen.push(token.clone());
            }
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    let mut ranked = first_seen;
    ranked.sort_by(|a, b| counts[b].cmp(&counts[a]));
    ranked.truncate(limit);
    ranked
}

/// Number of tokens `text` shares with the keyword list.
pub fn keyword_overlap(text: &str, keywords: &[String]) -> usize {
    let tokens = token_set(text);
    keywords.iter().filter(|k| tokens.contains(*k)).count()
}
