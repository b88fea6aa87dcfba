//! Best-effort TF-IDF tagger.
//!
//! Each vocabulary topic with reference text is one document of the corpus;
//! the opportunity's title and description form one more. Documents are turned
//! into smoothed TF-IDF vectors over unigrams and bigrams, and every topic is
//! scored by cosine similarity against the opportunity. Any failure yields
//! [`StatisticalOutcome::Unavailable`] rather than an error, so tagging can
//! always fall back to keywords alone.

use super::{TagCandidate, Vocabulary};
use crate::config::StatisticalConfig;
use crate::errors::StatisticalTaggingUnavailable;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

/// Result of one statistical tagging pass
#[derive(Debug, Clone, PartialEq)]
pub enum StatisticalOutcome {
    /// Tagging was switched off; nothing was computed
    Disabled,
    /// Labels that cleared the relevance threshold, best first
    Tagged(Vec<TagCandidate>),
    /// The reference corpus could not be used
    Unavailable(StatisticalTaggingUnavailable),
}

impl StatisticalOutcome {
    /// Candidates for merging; empty unless tagging succeeded
    pub fn candidates(&self) -> &[TagCandidate] {
        match self {
            StatisticalOutcome::Tagged(candidates) => candidates,
            _ => &[],
        }
    }
}

static TOKEN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\w\w+").ok());

const STOP_WORDS: &[&str] = &[
    "about", "above", "across", "after", "again", "against", "all", "also", "am", "among", "an",
    "and", "any", "are", "as", "at", "be", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "either",
    "etc", "even", "ever", "every", "few", "for", "from", "further", "had", "has", "have",
    "having", "he", "her", "here", "hers", "him", "his", "how", "however", "if", "in", "into",
    "is", "it", "its", "itself", "just", "may", "me", "might", "more", "most", "much", "must",
    "my", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other", "our",
    "ours", "out", "over", "own", "per", "same", "she", "should", "so", "some", "such", "than",
    "that", "the", "their", "theirs", "them", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "upon", "us", "very", "via", "was", "we",
    "were", "what", "when", "where", "whether", "which", "while", "who", "whom", "why", "will",
    "with", "within", "without", "would", "yet", "you", "your", "yours",
];

/// Scores vocabulary topics against the opportunity text.
///
/// Returns immediately with [`StatisticalOutcome::Disabled`] when `enabled` is
/// false. Text shorter than `config.min_text_len` yields no tags.
pub fn tag_statistical(
    title: &str,
    description: &str,
    enabled: bool,
    vocabulary: &Vocabulary,
    config: &StatisticalConfig,
) -> StatisticalOutcome {
    if !enabled {
        return StatisticalOutcome::Disabled;
    }

    match score_topics(title, description, vocabulary, config) {
        Ok(candidates) => {
            ::log::debug!("Statistical tagger proposed {} labels", candidates.len());
            StatisticalOutcome::Tagged(candidates)
        }
        Err(unavailable) => StatisticalOutcome::Unavailable(unavailable),
    }
}

fn score_topics(
    title: &str,
    description: &str,
    vocabulary: &Vocabulary,
    config: &StatisticalConfig,
) -> Result<Vec<TagCandidate>, StatisticalTaggingUnavailable> {
    let text = format!("{title} {description}");
    if text.trim().chars().count() < config.min_text_len {
        return Ok(Vec::new());
    }

    let references: Vec<(usize, &str)> = vocabulary
        .topics()
        .iter()
        .enumerate()
        .filter_map(|(i, t)| t.reference.as_deref().map(|r| (i, r)))
        .collect();
    if references.is_empty() {
        return Err(StatisticalTaggingUnavailable::new(
            "vocabulary has no reference corpus",
        ));
    }

    let mut documents: Vec<BTreeMap<String, f64>> = Vec::with_capacity(references.len() + 1);
    for (_, reference) in &references {
        documents.push(term_counts(reference)?);
    }
    documents.push(term_counts(&text)?);

    let vectors = tfidf_vectors(&documents);
    let (query, topics) = vectors
        .split_last()
        .ok_or_else(|| StatisticalTaggingUnavailable::new("empty corpus"))?;

    if query.is_empty() {
        return Ok(Vec::new());
    }

    let mut scored = Vec::with_capacity(topics.len());
    for ((position, _), vector) in references.iter().zip(topics) {
        let score = cosine(query, vector);
        if !score.is_finite() {
            return Err(StatisticalTaggingUnavailable::new(format!(
                "non-finite similarity for '{}'",
                vocabulary.topics()[*position].label
            )));
        }
        if score >= config.threshold {
            scored.push((*position, score));
        }
    }

    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    scored.truncate(config.top_k);

    Ok(scored
        .into_iter()
        .map(|(position, score)| {
            TagCandidate::statistical(vocabulary.topics()[position].label.clone(), score)
        })
        .collect())
}

/// Lowercased word tokens of at least two characters, minus stop words
pub fn tokenize(text: &str) -> Vec<String> {
    let Some(token) = TOKEN.as_ref() else {
        return Vec::new();
    };
    let lower = text.to_lowercase();
    token
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|t| !STOP_WORDS.contains(t))
        .map(|t| t.to_string())
        .collect()
}

/// Unigram and bigram counts of a document
fn term_counts(text: &str) -> Result<BTreeMap<String, f64>, StatisticalTaggingUnavailable> {
    if TOKEN.is_none() {
        return Err(StatisticalTaggingUnavailable::new(
            "token pattern failed to compile",
        ));
    }

    let tokens = tokenize(text);
    let mut counts = BTreeMap::new();
    for token in &tokens {
        *counts.entry(token.clone()).or_insert(0.0) += 1.0;
    }
    for pair in tokens.windows(2) {
        *counts.entry(format!("{} {}", pair[0], pair[1])).or_insert(0.0) += 1.0;
    }
    Ok(counts)
}

/// L2-normalized TF-IDF vectors with smoothed idf: ln((1 + n) / (1 + df)) + 1
fn tfidf_vectors(documents: &[BTreeMap<String, f64>]) -> Vec<BTreeMap<String, f64>> {
    let n = documents.len() as f64;
    let mut document_frequency: BTreeMap<&str, f64> = BTreeMap::new();
    for doc in documents {
        let terms: BTreeSet<&str> = doc.keys().map(|k| k.as_str()).collect();
        for term in terms {
            *document_frequency.entry(term).or_insert(0.0) += 1.0;
        }
    }

    documents
        .iter()
        .map(|doc| {
            let mut vector: BTreeMap<String, f64> = doc
                .iter()
                .map(|(term, tf)| {
                    let df = document_frequency.get(term.as_str()).copied().unwrap_or(0.0);
                    let idf = ((1.0 + n) / (1.0 + df)).ln() + 1.0;
                    (term.clone(), tf * idf)
                })
                .collect();

            let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for weight in vector.values_mut() {
                    *weight /= norm;
                }
            }
            vector
        })
        .collect()
}

/// Dot product of two normalized vectors
fn cosine(a: &BTreeMap<String, f64>, b: &BTreeMap<String, f64>) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(term, w)| large.get(term).map(|v| w * v))
        .sum()
}
