use crate::config::{ExtractorConfig, StatisticalConfig};
use crate::errors::ExtractError;
use crate::normalize::normalize;
use crate::results::{FoaRecord, RawPage};
use crate::router::route;
use crate::tagging::{StatisticalOutcome, Vocabulary, merge, tag_keywords, tag_statistical};

/// Turns one retrieved page into one tagged record
pub struct Extractor {
    vocabulary: Vocabulary,
    statistical_enabled: bool,
    statistical: StatisticalConfig,
    tag_cap: usize,
}

impl Extractor {
    /// Create an extractor with default settings over the given vocabulary
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self::with_config(vocabulary, &ExtractorConfig::default())
    }

    /// Create an extractor from a run configuration
    pub fn with_config(vocabulary: Vocabulary, config: &ExtractorConfig) -> Self {
        Self {
            vocabulary,
            statistical_enabled: config.statistical_enabled,
            statistical: config.statistical.clone(),
            tag_cap: config.tag_cap,
        }
    }

    /// Switch the statistical tagger on or off
    pub fn with_statistical(mut self, enabled: bool) -> Self {
        self.statistical_enabled = enabled;
        self
    }

    /// Set the maximum number of tags per record
    pub fn with_tag_cap(mut self, cap: usize) -> Self {
        self.tag_cap = cap;
        self
    }

    /// Runs route, adapter, normalizer, taggers and merger over a page.
    ///
    /// Only an unrecognized page family or a page without any of id, title
    /// and description abort the run; everything else degrades the record.
    pub fn extract(&self, page: &RawPage) -> Result<FoaRecord, ExtractError> {
        let family = route(page)?;
        ::log::info!("Using {} adapter for {}", family, page.url);

        let raw = family.extract(page)?;
        let fields = normalize(&raw, &page.url);

        let keyword = tag_keywords(&fields.title, &fields.description, &self.vocabulary);
        let statistical = tag_statistical(
            &fields.title,
            &fields.description,
            self.statistical_enabled,
            &self.vocabulary,
            &self.statistical,
        );
        match &statistical {
            StatisticalOutcome::Disabled => ::log::debug!("Statistical tagging disabled"),
            StatisticalOutcome::Unavailable(reason) => {
                ::log::warn!("{}; continuing with keyword tags only", reason)
            }
            StatisticalOutcome::Tagged(_) => {}
        }

        let tags = merge(
            &keyword,
            statistical.candidates(),
            &self.vocabulary,
            self.tag_cap,
        );
        ::log::debug!("Merged tags for {}: {:?}", fields.foa_id, tags);

        Ok(fields.into_record(tags))
    }
}
