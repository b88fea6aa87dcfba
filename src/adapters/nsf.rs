use super::markup::{Documents, LabelSet, container_text, find_labeled, first_tag_text};
use crate::results::{Field, FieldExtractionResult, FieldValue, MarkupSource, RawPage};

/// NSF pages also lay labels out as plain `div` blocks
const LABEL_TAGS: &[&str] = &["th", "dt", "label", "strong", "b", "span", "div"];

const AGENCY: &str = "National Science Foundation";

/// Container id/class keywords for the description fallback, most specific first
const DESCRIPTION_CONTAINERS: &[&str] = &["abstract", "synopsis", "description"];

const GENERIC_TITLES: &[&str] = &[
    "nsf - national science foundation",
    "award search",
    "page not found",
];

const FIELD_LABELS: &[(Field, &[&str])] = &[
    (
        Field::FoaId,
        &[
            "Award Number",
            "Award ID",
            "NSF Award Number",
            "Solicitation Number",
            "Program Solicitation Number",
        ],
    ),
    (Field::Title, &["Title", "Award Title"]),
    (Field::Agency, &["Agency", "Funding Agency"]),
    (
        Field::OpenDate,
        &["Start Date", "Effective Date", "Award Effective Date"],
    ),
    (
        Field::CloseDate,
        &["End Date", "Expiration Date", "Award Expiration Date"],
    ),
    (
        Field::Description,
        &["Abstract", "Synopsis", "Program Synopsis"],
    ),
    (
        Field::AwardCeiling,
        &["Award Amount", "Awarded Amount", "Estimated Total"],
    ),
    (Field::AwardFloor, &["Award Floor", "Minimum Award"]),
];

/// Extracts the common fields from an NSF award or solicitation page.
///
/// Labels are looked up in the rendered snapshot first. Titles fall back to
/// the first heading, descriptions to an abstract/synopsis container, and the
/// agency to the foundation itself.
pub fn extract(page: &RawPage) -> FieldExtractionResult {
    let docs = Documents::from_page(page);
    let label_set = LabelSet::new(
        LABEL_TAGS,
        FIELD_LABELS.iter().flat_map(|(_, labels)| labels.iter().copied()).collect(),
    );
    let mut result = FieldExtractionResult::new();

    for (field, labels) in FIELD_LABELS {
        let mut value = docs.locate(|doc| {
            find_labeled(doc, &label_set, labels).or_else(|| match field {
                Field::Title => first_tag_text(doc, "h1", GENERIC_TITLES)
                    .or_else(|| first_tag_text(doc, "title", GENERIC_TITLES)),
                Field::Description => DESCRIPTION_CONTAINERS
                    .iter()
                    .find_map(|keyword| container_text(doc, "div", &[*keyword], true, &label_set)),
                _ => None,
            })
        });

        if *field == Field::Agency && !value.is_found() {
            value = FieldValue::found(AGENCY.to_string(), MarkupSource::SourceFamily);
        }
        if !value.is_found() {
            ::log::debug!("nsf.gov: {} not found in {}", field, page.url);
        }
        result.set(*field, value);
    }

    result
}
