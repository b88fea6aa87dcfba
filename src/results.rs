use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Page content as retrieved by the fetcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPage {
    /// URL the page was retrieved from
    pub url: String,

    /// Static markup as served
    pub html: String,

    /// Markup after JavaScript execution, when rendering was performed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendered_html: Option<String>,
}

impl RawPage {
    /// Create a page from static markup only
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            rendered_html: None,
        }
    }

    /// Attach a rendered DOM snapshot
    pub fn with_rendered(mut self, rendered_html: impl Into<String>) -> Self {
        self.rendered_html = Some(rendered_html.into());
        self
    }
}

/// The fields every adapter tries to locate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FoaId,
    Title,
    Agency,
    OpenDate,
    CloseDate,
    Description,
    AwardCeiling,
    AwardFloor,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::FoaId,
        Field::Title,
        Field::Agency,
        Field::OpenDate,
        Field::CloseDate,
        Field::Description,
        Field::AwardCeiling,
        Field::AwardFloor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::FoaId => "foa_id",
            Field::Title => "title",
            Field::Agency => "agency",
            Field::OpenDate => "open_date",
            Field::CloseDate => "close_date",
            Field::Description => "description",
            Field::AwardCeiling => "award_ceiling",
            Field::AwardFloor => "award_floor",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a field value was recovered from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupSource {
    /// The rendered DOM snapshot
    Rendered,
    /// The static markup
    Static,
    /// A constant implied by the page family itself
    SourceFamily,
}

/// A single extracted field. `value` is `None` when the field was not found.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldValue {
    pub value: Option<String>,
    pub origin: Option<MarkupSource>,
}

impl FieldValue {
    pub fn found(value: String, origin: MarkupSource) -> Self {
        Self {
            value: Some(value),
            origin: Some(origin),
        }
    }

    pub fn missing() -> Self {
        Self::default()
    }

    pub fn is_found(&self) -> bool {
        self.value.is_some()
    }
}

/// Raw per-field output of a source adapter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldExtractionResult {
    fields: BTreeMap<Field, FieldValue>,
}

impl FieldExtractionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: Field, value: FieldValue) {
        self.fields.insert(field, value);
    }

    pub fn value(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).and_then(|v| v.value.as_deref())
    }

    pub fn is_found(&self, field: Field) -> bool {
        self.value(field).is_some()
    }

    pub fn origin(&self, field: Field) -> Option<MarkupSource> {
        self.fields.get(&field).and_then(|v| v.origin)
    }

    /// Count of fields that carry a value
    pub fn found_count(&self) -> usize {
        Field::ALL.iter().filter(|f| self.is_found(**f)).count()
    }
}

/// The normalized, final record for one opportunity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoaRecord {
    pub foa_id: String,
    pub title: String,
    pub agency: String,
    pub open_date: Option<NaiveDate>,
    pub close_date: Option<NaiveDate>,
    pub description: String,
    pub tags: Vec<String>,
    pub source_url: String,
    pub award_ceiling: Option<f64>,
    pub award_floor: Option<f64>,
}
