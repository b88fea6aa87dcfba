//! Field extraction for Grants.gov opportunity pages.
//!
//! Grants.gov serves a JavaScript application; the synopsis table only exists
//! in the rendered DOM, so the rendered snapshot is consulted before the
//! static markup for every field.

use super::markup::{Documents, LabelSet, container_text, find_labeled, first_tag_text};
use crate::results::{Field, FieldExtractionResult, RawPage};

const LABEL_TAGS: &[&str] = &["th", "dt", "label", "strong", "b", "span"];

/// Page titles that name the site rather than the opportunity
const GENERIC_TITLES: &[&str] = &["grants.gov", "search results", "view grant", "lock"];

const FIELD_LABELS: &[(Field, &[&str])] = &[
    (
        Field::FoaId,
        &["Funding Opportunity Number", "Opportunity Number"],
    ),
    (
        Field::Title,
        &["Funding Opportunity Title", "Opportunity Title", "Title"],
    ),
    (Field::Agency, &["Agency Name", "Agency", "Department"]),
    (Field::OpenDate, &["Posted Date", "Open Date", "Post Date"]),
    (
        Field::CloseDate,
        &[
            "Current Closing Date for Applications",
            "Close Date",
            "Closing Date",
            "Original Closing Date for Applications",
            "Application Deadline",
        ],
    ),
    (
        Field::Description,
        &["Description", "Synopsis", "Opportunity Description"],
    ),
    (
        Field::AwardCeiling,
        &["Award Ceiling", "Estimated Total Program Funding"],
    ),
    (Field::AwardFloor, &["Award Floor"]),
];

pub fn extract(page: &RawPage) -> FieldExtractionResult {
    let docs = Documents::from_page(page);
    let label_set = LabelSet::new(
        LABEL_TAGS,
        FIELD_LABELS.iter().flat_map(|(_, labels)| labels.iter().copied()).collect(),
    );
    let mut result = FieldExtractionResult::new();

    for (field, labels) in FIELD_LABELS {
        let value = docs.locate(|doc| {
            find_labeled(doc, &label_set, labels).or_else(|| match field {
                Field::Title => first_tag_text(doc, "title", GENERIC_TITLES)
                    .or_else(|| first_tag_text(doc, "h1", &["view grant"])),
                Field::Description => {
                    container_text(doc, "div", &["description"], false, &label_set)
                        .or_else(|| container_text(doc, "div", &["synopsis"], false, &label_set))
                }
                _ => None,
            })
        });
        if !value.is_found() {
            ::log::debug!("grants.gov: {} not found in {}", field, page.url);
        }
        result.set(*field, value);
    }

    result
}
