use super::vocabulary::fold_label;
use super::{TagCandidate, TagSource, Vocabulary};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Default bound on the number of tags in a record
pub const DEFAULT_TAG_CAP: usize = 10;

#[derive(Debug)]
struct MergedTag {
    label: String,
    keyword: bool,
    score: f64,
    position: Option<usize>,
}

/// Unions keyword and statistical candidates into the record's tag list.
///
/// Labels are identified case-insensitively. Keyword-sourced labels come
/// first in canonical vocabulary order; statistical-only labels follow, best
/// score first with ties in canonical order. Labels the vocabulary does not
/// know sort after known ones, by name. Candidates with a non-finite score
/// are dropped. At most `cap` labels are returned.
pub fn merge(
    keyword: &[TagCandidate],
    statistical: &[TagCandidate],
    vocabulary: &Vocabulary,
    cap: usize,
) -> Vec<String> {
    let mut merged: BTreeMap<String, MergedTag> = BTreeMap::new();

    for candidate in keyword.iter().chain(statistical) {
        let label = candidate.label.trim();
        if label.is_empty() {
            continue;
        }
        if !candidate.score.is_finite() {
            ::log::debug!("Dropping tag candidate '{}' with score {}", label, candidate.score);
            continue;
        }
        let is_keyword = candidate.source == TagSource::Keyword;

        let entry = merged.entry(fold_label(label)).or_insert_with(|| MergedTag {
            label: vocabulary
                .canonical_label(label)
                .unwrap_or(label)
                .to_string(),
            keyword: false,
            score: f64::NEG_INFINITY,
            position: vocabulary.position(label),
        });
        entry.keyword |= is_keyword;
        if candidate.score > entry.score {
            entry.score = candidate.score;
        }
    }

    let mut tags: Vec<MergedTag> = merged.into_values().collect();
    tags.sort_by(|a, b| {
        b.keyword
            .cmp(&a.keyword)
            .then_with(|| {
                if a.keyword {
                    Ordering::Equal
                } else {
                    b.score.total_cmp(&a.score)
                }
            })
            .then_with(|| canonical_order(a, b))
    });

    tags.into_iter().take(cap).map(|t| t.label).collect()
}

fn canonical_order(a: &MergedTag, b: &MergedTag) -> Ordering {
    match (a.position, b.position) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => fold_label(&a.label).cmp(&fold_label(&b.label)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary() -> Vocabulary {
        Vocabulary::builtin().unwrap()
    }

    #[test]
    fn test_keyword_tags_precede_statistical() {
        let keyword = vec![
            TagCandidate::keyword("Health"),
            TagCandidate::keyword("Artificial Intelligence"),
        ];
        let statistical = vec![
            TagCandidate::statistical("Education", 0.9),
            TagCandidate::statistical("Health", 0.5),
            TagCandidate::statistical("Energy", 0.2),
        ];
        let tags = merge(&keyword, &statistical, &vocabulary(), DEFAULT_TAG_CAP);
        assert_eq!(
            tags,
            vec!["Artificial Intelligence", "Health", "Education", "Energy"]
        );
    }

    #[test]
    fn test_case_insensitive_dedup_uses_vocabulary_spelling() {
        let keyword = vec![TagCandidate::keyword("health")];
        let statistical = vec![TagCandidate::statistical("HEALTH", 0.7)];
        let tags = merge(&keyword, &statistical, &vocabulary(), DEFAULT_TAG_CAP);
        assert_eq!(tags, vec!["Health"]);
    }

    #[test]
    fn test_statistical_ties_use_canonical_order() {
        let statistical = vec![
            TagCandidate::statistical("Energy", 0.3),
            TagCandidate::statistical("Agriculture", 0.3),
            TagCandidate::statistical("Space", 0.4),
        ];
        let tags = merge(&[], &statistical, &vocabulary(), DEFAULT_TAG_CAP);
        assert_eq!(tags, vec!["Space", "Agriculture", "Energy"]);
    }

    #[test]
    fn test_unknown_labels_sort_last() {
        let keyword = vec![
            TagCandidate::keyword("Zoology"),
            TagCandidate::keyword("Astrobiology"),
            TagCandidate::keyword("Energy"),
        ];
        let tags = merge(&keyword, &[], &vocabulary(), DEFAULT_TAG_CAP);
        assert_eq!(tags, vec!["Energy", "Astrobiology", "Zoology"]);
    }

    #[test]
    fn test_cap() {
        let vocabulary = vocabulary();
        let keyword: Vec<TagCandidate> = vocabulary
            .topics()
            .iter()
            .map(|t| TagCandidate::keyword(t.label.clone()))
            .collect();
        let statistical = vec![TagCandidate::statistical("Oceans", 0.9)];

        let tags = merge(&keyword, &statistical, &vocabulary, DEFAULT_TAG_CAP);
        assert_eq!(tags.len(), DEFAULT_TAG_CAP);
        assert_eq!(tags[0], "Artificial Intelligence");
        assert!(!tags.contains(&"Oceans".to_string()));

        assert!(merge(&keyword, &statistical, &vocabulary, 0).is_empty());
        assert_eq!(merge(&keyword, &statistical, &vocabulary, 3).len(), 3);
    }

    #[test]
    fn test_non_finite_scores_are_dropped() {
        let statistical = vec![
            TagCandidate::statistical("Energy", f64::NAN),
            TagCandidate::statistical("Space", 0.4),
            TagCandidate::statistical("Health", f64::INFINITY),
            TagCandidate::statistical("Agriculture", 0.6),
        ];
        let tags = merge(&[], &statistical, &vocabulary(), DEFAULT_TAG_CAP);
        assert_eq!(tags, vec!["Agriculture", "Space"]);
    }

    #[test]
    fn test_non_ascii_labels_keep_canonical_order() {
        let vocabulary = Vocabulary::from_json(
            r#"{"version": "x", "topics": [{"label": "Océans"}, {"label": "Énergie"}]}"#,
        )
        .unwrap();
        let keyword = vec![
            TagCandidate::keyword("ÉNERGIE"),
            TagCandidate::keyword("OCÉANS"),
        ];
        let tags = merge(&keyword, &[], &vocabulary, DEFAULT_TAG_CAP);
        assert_eq!(tags, vec!["Océans", "Énergie"]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(merge(&[], &[], &vocabulary(), DEFAULT_TAG_CAP).is_empty());
    }
}
