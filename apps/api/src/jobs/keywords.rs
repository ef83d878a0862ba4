//! Keyword extractor: bag-of-words unigram/bigram frequency over a job posting.
//!
//! Pipeline: segment at punctuation → tokenize → drop stopwords → count
//! unigrams and adjacent bigrams → rank → top N.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::jobs::stopwords::is_stopword;

/// Bigrams appearing fewer times than this are dropped as noise.
const MIN_BIGRAM_FREQUENCY: u32 = 2;
const BIGRAM_WEIGHT: f32 = 1.5;

static SEGMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[,;:!?()\[\]|•·\n\r\t]+|\.\s+|\.$").expect("invalid segment regex")
});

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}][\p{L}\p{N}+#._\-]*").expect("invalid token regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordKind {
    Unigram,
    Bigram,
}

/// A single ranked term from a posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub term: String,
    pub frequency: u32,
    pub kind: KeywordKind,
    /// frequency × 1.5 for bigrams, frequency for unigrams
    pub weight: f32,
}

/// Extracts the `top_n` most frequent terms from `text`.
pub fn extract_keywords(text: &str, top_n: usize) -> Vec<Keyword> {
    if top_n == 0 {
        return Vec::new();
    }

    let lowered = text.to_lowercase();
    let mut unigrams: HashMap<String, u32> = HashMap::new();
    let mut bigrams: HashMap<String, u32> = HashMap::new();

    for segment in SEGMENT_RE.split(&lowered) {
        let mut previous: Option<String> = None;
        for token in tokenize(segment) {
            match token {
                Some(term) => {
                    *unigrams.entry(term.clone()).or_insert(0) += 1;
                    if let Some(prev) = previous.take() {
                        *bigrams.entry(format!("{prev} {term}")).or_insert(0) += 1;
                    }
                    previous = Some(term);
                }
                // A dropped token breaks adjacency.
                None => previous = None,
            }
        }
    }

    let mut ranked: Vec<Keyword> = unigrams
        .into_iter()
        .map(|(term, frequency)| Keyword {
            term,
            frequency,
            kind: KeywordKind::Unigram,
            weight: frequency as f32,
        })
        .chain(
            bigrams
                .into_iter()
                .filter(|(_, f)| *f >= MIN_BIGRAM_FREQUENCY)
                .map(|(term, frequency)| Keyword {
                    term,
                    frequency,
                    kind: KeywordKind::Bigram,
                    weight: frequency as f32 * BIGRAM_WEIGHT,
                }),
        )
        .collect();

    ranked.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| kind_rank(a.kind).cmp(&kind_rank(b.kind)))
            .then_with(|| a.term.cmp(&b.term))
    });
    ranked.truncate(top_n);
    ranked
}

fn kind_rank(kind: KeywordKind) -> u8 {
    match kind {
        KeywordKind::Bigram => 0,
        KeywordKind::Unigram => 1,
    }
}

/// Yields `Some(term)` for kept tokens and `None` for dropped ones, in order.
fn tokenize(segment: &str) -> impl Iterator<Item = Option<String>> + '_ {
    TOKEN_RE.find_iter(segment).map(|m| {
        let token = m.as_str().trim_end_matches(&['.', '-', '_'][..]);
        if keep_token(token) {
            Some(token.to_string())
        } else {
            None
        }
    })
}

fn keep_token(token: &str) -> bool {
    token.chars().count() >= 2
        && !token.chars().all(|c| c.is_numeric() || c == '.')
        && !is_stopword(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PT_POSTING: &str = "Vaga para Desenvolvedor Rust. Buscamos pessoa com experiência em Rust \
        e sistemas distribuídos. Requisitos: Rust, PostgreSQL, sistemas distribuídos, Docker. \
        Diferencial: Kubernetes e Docker.";

    fn term_of<'a>(keywords: &'a [Keyword], term: &str) -> Option<&'a Keyword> {
        keywords.iter().find(|k| k.term == term)
    }

    #[test]
    fn test_most_frequent_term_ranks_first() {
        let keywords = extract_keywords(PT_POSTING, 10);
        assert_eq!(keywords[0].term, "rust");
        assert_eq!(keywords[0].frequency, 3);
    }

    #[test]
    fn test_portuguese_stopwords_removed() {
        let keywords = extract_keywords(PT_POSTING, 50);
        for stop in ["para", "com", "em", "e", "vaga", "buscamos"] {
            assert!(term_of(&keywords, stop).is_none(), "{stop} leaked");
        }
    }

    #[test]
    fn test_repeated_bigram_is_kept() {
        let keywords = extract_keywords(PT_POSTING, 50);
        let bigram = term_of(&keywords, "sistemas distribuídos").expect("bigram missing");
        assert_eq!(bigram.kind, KeywordKind::Bigram);
        assert_eq!(bigram.frequency, 2);
        assert!((bigram.weight - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_single_bigram_is_dropped() {
        let keywords = extract_keywords("desenvolvedor backend sênior", 50);
        assert!(keywords.iter().all(|k| k.kind == KeywordKind::Unigram));
    }

    #[test]
    fn test_stopword_breaks_bigram_adjacency() {
        // "rust com go" twice: "rust go" must never be formed.
        let keywords = extract_keywords("rust com go. rust com go.", 50);
        assert!(term_of(&keywords, "rust go").is_none());
    }

    #[test]
    fn test_punctuation_breaks_bigram_adjacency() {
        let keywords = extract_keywords("rust, docker. rust, docker.", 50);
        assert!(term_of(&keywords, "rust docker").is_none());
    }

    #[test]
    fn test_tech_tokens_survive_tokenization() {
        let keywords = extract_keywords("C++ e C# com Node.js; node.js em produção", 50);
        assert!(term_of(&keywords, "c++").is_some());
        assert!(term_of(&keywords, "c#").is_some());
        assert_eq!(term_of(&keywords, "node.js").map(|k| k.frequency), Some(2));
    }

    #[test]
    fn test_numbers_and_short_tokens_dropped() {
        let keywords = extract_keywords("5 anos 2024 x rust", 50);
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].term, "rust");
    }

    #[test]
    fn test_ties_prefer_bigrams_then_alphabetical() {
        let keywords = extract_keywords("zeta alpha. zeta alpha.", 10);
        assert_eq!(keywords[0].term, "zeta alpha");
        assert_eq!(keywords[1].term, "alpha");
        assert_eq!(keywords[2].term, "zeta");
    }

    #[test]
    fn test_top_n_truncates() {
        assert_eq!(extract_keywords(PT_POSTING, 3).len(), 3);
        assert!(extract_keywords(PT_POSTING, 0).is_empty());
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert!(extract_keywords("   ", 10).is_empty());
    }
}
