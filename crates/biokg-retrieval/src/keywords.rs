//! Keyword extraction.
//!
//! The retrieval core only needs an ordered token list; how it is produced is
//! pluggable. [`StopwordExtractor`] is the default.

use std::collections::HashSet;
use std::sync::OnceLock;

/// Turns a free-text query into an ordered, deduplicated token list.
pub trait KeywordExtractor: Send + Sync {
    fn extract(&self, query: &str) -> Vec<String>;
}

impl<F> KeywordExtractor for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    fn extract(&self, query: &str) -> Vec<String> {
        self(query)
    }
}

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "may", "might", "must", "shall",
    "can", "need", "what", "when", "where", "which", "who", "whom", "whose", "why", "how",
    "this", "that", "these", "those", "i", "you", "he", "she", "it", "we", "they", "me", "him",
    "her", "us", "them", "my", "your", "his", "its", "our", "their", "and", "or", "but", "if",
    "then", "than", "so", "as", "for", "with", "about", "to", "from", "in", "on", "at", "by",
    "of", "up", "out", "into", "onto", "any", "all", "some", "there", "list", "show", "tell",
    "find", "give", "other", "also",
];

fn stopwords() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOPWORDS.iter().copied().collect())
}

/// Stopword-filtering extractor.
///
/// - splits on anything that is not alphanumeric or `-`
/// - drops stopwords (case-insensitive) and tokens under 3 characters,
///   keeping 2-character tokens with a digit (`"C3"`) or non-ASCII script
/// - preserves the original case, so symbol-shaped tokens survive
/// - appends bigrams of adjacent kept words ("breast cancer")
#[derive(Debug, Clone)]
pub struct StopwordExtractor {
    bigrams: bool,
}

impl Default for StopwordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl StopwordExtractor {
    pub fn new() -> Self {
        Self { bigrams: true }
    }

    pub fn bigrams(mut self, enabled: bool) -> Self {
        self.bigrams = enabled;
        self
    }

    fn keep(word: &str) -> bool {
        let len = word.chars().count();
        if stopwords().contains(word.to_lowercase().as_str()) {
            return false;
        }
        len >= 3
            || (len == 2
                && word
                    .chars()
                    .any(|c| c.is_ascii_digit() || !c.is_ascii()))
    }
}

impl KeywordExtractor for StopwordExtractor {
    fn extract(&self, query: &str) -> Vec<String> {
        let words: Vec<&str> = query
            .split(|c: char| !(c.is_alphanumeric() || c == '-'))
            .map(|w| w.trim_matches('-'))
            .collect();

        let mut seen = HashSet::new();
        let mut tokens = Vec::new();
        let mut push = |token: String, tokens: &mut Vec<String>| {
            if seen.insert(token.to_lowercase()) {
                tokens.push(token);
            }
        };

        for word in words.iter().filter(|w| Self::keep(w)) {
            push(word.to_string(), &mut tokens);
        }

        if self.bigrams {
            for pair in words.windows(2) {
                if Self::keep(pair[0]) && Self::keep(pair[1]) {
                    push(format!("{} {}", pair[0], pair[1]), &mut tokens);
                }
            }
        }

        tokens
    }
}
