//! Topical relevance of fetched page text.
//!
//! TF-IDF cosine similarity between a short reference text
//! (`"{name} {title} biography historical"`) and the cleaned page body,
//! plus a bonus for exact name mentions and a penalty for generic pages.

use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Page text beyond this many characters is ignored.
pub const MAX_CONTENT_CHARS: usize = 5000;

const NAME_MENTION_BONUS: f64 = 0.10;
const MAX_NAME_BONUS: f64 = 0.30;
const GENERIC_PAGE_PENALTY: f64 = 0.30;

lazy_static! {
    static ref STOPWORDS: HashSet<&'static str> = [
        "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be",
        "been", "before", "but", "by", "can", "could", "did", "do", "does", "for", "from",
        "had", "has", "have", "he", "her", "his", "how", "if", "in", "into", "is", "it",
        "its", "may", "more", "most", "no", "not", "of", "on", "one", "or", "other", "our",
        "out", "over", "she", "so", "some", "such", "than", "that", "the", "their", "them",
        "then", "there", "these", "they", "this", "those", "to", "up", "was", "we", "were",
        "what", "when", "where", "which", "who", "will", "with", "would", "you", "your",
    ]
    .into_iter()
    .collect();
}

const GENERIC_TITLE_MARKERS: &[&str] = &[
    "search results",
    "page not found",
    "404",
    "not found",
    "home page",
    "homepage",
    "index of /",
];

const GENERIC_BODY_MARKERS: &[&str] = &[
    "no results found",
    "your search did not match",
    "did not match any documents",
    "the page you requested",
    "page not found",
    "showing results for",
];

/// Relevance of one page with its components.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelevanceBreakdown {
    pub similarity: f64,
    pub name_mentions: usize,
    pub name_bonus: f64,
    pub generic_page: bool,
    /// Final score on [0, 1]
    pub score: f64,
}

/// Score how relevant `body` is to a biography of `name`.
pub fn score_relevance(name: &str, title: &str, body: &str) -> RelevanceBreakdown {
    let body: String = body.chars().take(MAX_CONTENT_CHARS).collect();
    let reference = format!("{} {} biography historical", name, title);

    let similarity = tfidf_cosine(&reference, &body);
    let name_mentions = count_mentions(&body, name);
    let name_bonus = (name_mentions as f64 * NAME_MENTION_BONUS).min(MAX_NAME_BONUS);
    let generic_page = looks_generic(title, &body);

    let mut score = similarity + name_bonus;
    if generic_page {
        score -= GENERIC_PAGE_PENALTY;
    }

    RelevanceBreakdown {
        similarity,
        name_mentions,
        name_bonus,
        generic_page,
        score: score.clamp(0.0, 1.0),
    }
}

/// Lowercase alphanumeric tokens, stopwords and single characters removed.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2 && !STOPWORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// Cosine similarity of TF-IDF vectors over the two-document corpus `[a, b]`.
///
/// Uses smoothed idf, `ln((1 + n) / (1 + df)) + 1`.
pub fn tfidf_cosine(a: &str, b: &str) -> f64 {
    let tf_a = term_frequencies(&tokenize(a));
    let tf_b = term_frequencies(&tokenize(b));
    if tf_a.is_empty() || tf_b.is_empty() {
        return 0.0;
    }

    let n = 2.0_f64;
    let idf = |term: &str| {
        let df = tf_a.contains_key(term) as u8 + tf_b.contains_key(term) as u8;
        ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0
    };

    let weigh = |tf: &HashMap<String, usize>| -> HashMap<String, f64> {
        tf.iter()
            .map(|(term, count)| (term.clone(), *count as f64 * idf(term)))
            .collect()
    };
    let va = weigh(&tf_a);
    let vb = weigh(&tf_b);

    let dot: f64 = va
        .iter()
        .filter_map(|(term, wa)| vb.get(term).map(|wb| wa * wb))
        .sum();
    let norm_a = va.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b = vb.values().map(|w| w * w).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Heuristic for search listings, home pages and error pages.
pub fn looks_generic(title: &str, body: &str) -> bool {
    let title = title.to_lowercase();
    let head: String = body.chars().take(1000).collect::<String>().to_lowercase();

    GENERIC_TITLE_MARKERS.iter().any(|m| title.contains(m))
        || GENERIC_BODY_MARKERS.iter().any(|m| head.contains(m))
}

fn count_mentions(body: &str, name: &str) -> usize {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return 0;
    }
    body.to_lowercase().matches(&name).count()
}

fn term_frequencies(tokens: &[String]) -> HashMap<String, usize> {
    let mut tf = HashMap::new();
    for token in tokens {
        *tf.entry(token.clone()).or_insert(0) += 1;
    }
    tf
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "Albert Einstein biography. Albert Einstein was a theoretical physicist \
        born in Ulm in 1879. Historical records of Albert Einstein describe his work on \
        relativity and the photoelectric effect. Albert Einstein biography historical archive.";

    #[test]
    fn test_tokenize_drops_stopwords_and_short() {
        assert_eq!(
            tokenize("The life of A. Einstein, 1879"),
            vec!["life".to_string(), "einstein".to_string(), "1879".to_string()]
        );
    }

    #[test]
    fn test_identical_texts_are_similar() {
        let score = tfidf_cosine("einstein relativity physics", "einstein relativity physics");
        assert!((score - 1.0).abs() < 1e-9);
        assert_eq!(tfidf_cosine("einstein", "mozart"), 0.0);
        assert_eq!(tfidf_cosine("", "mozart"), 0.0);
    }

    #[test]
    fn test_relevant_page_scores_high() {
        let breakdown = score_relevance("Albert Einstein", "Albert Einstein Papers", BODY);
        assert_eq!(breakdown.name_mentions, 4);
        assert_eq!(breakdown.name_bonus, MAX_NAME_BONUS);
        assert!(!breakdown.generic_page);
        assert!(breakdown.score >= 0.7, "score {}", breakdown.score);
    }

    #[test]
    fn test_unrelated_page_scores_low() {
        let breakdown = score_relevance(
            "Albert Einstein",
            "Baking bread",
            "Knead the dough and let it rise overnight before baking.",
        );
        assert!(breakdown.score < 0.1);
    }

    #[test]
    fn test_generic_page_penalized() {
        let plain = score_relevance("Albert Einstein", "Albert Einstein", BODY);
        let generic = score_relevance("Albert Einstein", "Search results: Albert Einstein", BODY);
        assert!(generic.generic_page);
        assert!(generic.score < plain.score);
    }

    #[test]
    fn test_score_is_clamped() {
        let breakdown = score_relevance("einstein", "einstein", "einstein einstein einstein einstein");
        assert!(breakdown.score <= 1.0);
    }
}
