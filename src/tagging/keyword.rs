use super::{TagCandidate, Vocabulary};

/// Emits one keyword candidate per topic whose triggers occur in the title or
/// description. Topics come out in canonical vocabulary order.
pub fn tag_keywords(title: &str, description: &str, vocabulary: &Vocabulary) -> Vec<TagCandidate> {
    let candidates: Vec<TagCandidate> = vocabulary
        .topics()
        .iter()
        .filter(|topic| topic.matches(title) || topic.matches(description))
        .map(|topic| TagCandidate::keyword(topic.label.clone()))
        .collect();

    ::log::debug!(
        "Keyword tagger matched {} of {} topics",
        candidates.len(),
        vocabulary.len()
    );
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagging::TagSource;

    fn labels(candidates: &[TagCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn test_title_and_description_both_count() {
        let vocabulary = Vocabulary::builtin().unwrap();
        let tags = tag_keywords(
            "AI in Health Research",
            "Supports new approaches to solar battery storage.",
            &vocabulary,
        );
        assert_eq!(labels(&tags), vec!["Artificial Intelligence", "Health", "Energy"]);
        assert!(tags.iter().all(|t| t.source == TagSource::Keyword && t.score == 1.0));
    }

    #[test]
    fn test_case_insensitive() {
        let vocabulary = Vocabulary::builtin().unwrap();
        let tags = tag_keywords("CYBERSECURITY FOR FARMING", "", &vocabulary);
        assert_eq!(labels(&tags), vec!["Agriculture", "Cybersecurity"]);
    }

    #[test]
    fn test_no_match_and_empty_input() {
        let vocabulary = Vocabulary::builtin().unwrap();
        assert!(tag_keywords("", "", &vocabulary).is_empty());
        assert!(tag_keywords("General operating support", "Unrestricted.", &vocabulary).is_empty());
    }

    #[test]
    fn test_no_match_across_title_and_description() {
        let vocabulary = Vocabulary::builtin().unwrap();
        let tags = tag_keywords("Advances in machine", "learning plans for staff", &vocabulary);
        assert!(tags.is_empty());
    }

    #[test]
    fn test_each_topic_emitted_once() {
        let vocabulary = Vocabulary::builtin().unwrap();
        let tags = tag_keywords(
            "Machine learning and deep learning",
            "Neural network methods for computer vision and robotics.",
            &vocabulary,
        );
        assert_eq!(labels(&tags), vec!["Artificial Intelligence"]);
    }
}
