use crate::errors::ConfigError;
use crate::tagging::merge::DEFAULT_TAG_CAP;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for the extraction pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Whether the statistical tagger runs
    #[serde(default = "default_statistical_enabled")]
    pub statistical_enabled: bool,

    /// Maximum number of tags on a record
    #[serde(default = "default_tag_cap")]
    pub tag_cap: usize,

    /// Statistical tagger tuning
    #[serde(default)]
    pub statistical: StatisticalConfig,

    /// Vocabulary definition to load instead of the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary_path: Option<PathBuf>,

    /// Page fetcher settings
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// Tuning for the TF-IDF tagger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticalConfig {
    /// Maximum number of labels proposed
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Minimum cosine similarity for a label to be proposed
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Texts shorter than this many characters are not scored
    #[serde(default = "default_min_text_len")]
    pub min_text_len: usize,
}

/// Configuration for retrieving pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Whether to render pages through WebDriver
    #[serde(default = "default_render")]
    pub render: bool,

    /// Seconds to wait for rendered content to appear
    #[serde(default = "default_render_wait_secs")]
    pub render_wait_secs: u64,

    /// Timeout for static requests, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Attempts for static requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base of the exponential backoff between attempts, in seconds
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,

    /// User-Agent header sent with static requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ExtractorConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            statistical_enabled: default_statistical_enabled(),
            tag_cap: default_tag_cap(),
            statistical: StatisticalConfig::default(),
            vocabulary_path: None,
            fetch: FetchConfig::default(),
        }
    }
}

impl Default for StatisticalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            threshold: default_threshold(),
            min_text_len: default_min_text_len(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            render: default_render(),
            render_wait_secs: default_render_wait_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            backoff_factor: default_backoff_factor(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_statistical_enabled() -> bool {
    true
}

fn default_tag_cap() -> usize {
    DEFAULT_TAG_CAP
}

fn default_top_k() -> usize {
    5
}

fn default_threshold() -> f64 {
    0.08
}

fn default_min_text_len() -> usize {
    10
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_render() -> bool {
    true
}

fn default_render_wait_secs() -> u64 {
    15
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_factor() -> f64 {
    1.5
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}
