pub mod keyword;
pub mod merge;
pub mod statistical;
pub mod vocabulary;

pub use keyword::tag_keywords;
pub use merge::merge;
pub use statistical::{StatisticalOutcome, tag_statistical};
pub use vocabulary::Vocabulary;

/// Which tagger produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSource {
    Keyword,
    Statistical,
}

/// A topic label proposed by one of the taggers
#[derive(Debug, Clone, PartialEq)]
pub struct TagCandidate {
    pub label: String,
    pub source: TagSource,
    /// Relevance score; always 1.0 for keyword matches
    pub score: f64,
}

impl TagCandidate {
    pub fn keyword(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            source: TagSource::Keyword,
            score: 1.0,
        }
    }

    pub fn statistical(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            source: TagSource::Statistical,
            score,
        }
    }
}
