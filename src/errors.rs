use std::io;

use thiserror::Error;

use crate::router::SourceFamily;

/// Fatal extraction failures. No record is produced when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("unrecognized source: no page family matches {url}")]
    UnrecognizedSource { url: String },
    #[error("insufficient content: {family} page has no FOA id, title or description")]
    InsufficientContent { family: SourceFamily },
}

/// Recoverable failure of the statistical tagger. The pipeline logs it and
/// continues with keyword tags only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("statistical tagging unavailable: {reason}")]
pub struct StatisticalTaggingUnavailable {
    pub reason: String,
}

impl StatisticalTaggingUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Failures while loading or validating a vocabulary definition.
#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("vocabulary json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("vocabulary topic has an empty label")]
    EmptyLabel,
    #[error("duplicate vocabulary label '{0}'")]
    DuplicateLabel(String),
    #[error("invalid keyword pattern for '{label}': {source}")]
    Pattern {
        label: String,
        #[source]
        source: regex::Error,
    },
}

/// Failures while loading a run configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("config json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of the page fetcher.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("webdriver error: {0}")]
    WebDriver(String),
    #[error("failed to fetch {url} after {attempts} attempts: {last_error}")]
    Exhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },
    #[error("no markup retrieved for {url}: static fetch failed ({reason}) and rendering was unavailable")]
    NoContent { url: String, reason: String },
}

/// Failures while writing exported records.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("export json error: {0}")]
    Json(#[from] serde_json::Error),
}
