use super::{GRANTS_AI_HEALTH, GRANTS_RENDERED, GRANTS_SHELL};
use crate::adapters::grants;
use crate::errors::ExtractError;
use crate::results::{Field, MarkupSource, RawPage};
use crate::router::SourceFamily;

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://www.grants.gov/search-results-detail/353584";

    #[test]
    fn test_synopsis_table_fields() {
        let page = RawPage::new(URL, GRANTS_AI_HEALTH);
        let result = grants::extract(&page);

        assert_eq!(result.value(Field::Title), Some("AI in Health Research"));
        assert_eq!(
            result.value(Field::Agency),
            Some("National Institutes of Health")
        );
        assert_eq!(result.value(Field::OpenDate), Some("Jan 15, 2025"));
        assert_eq!(result.value(Field::CloseDate), Some("Apr 30, 2025"));
        assert_eq!(result.value(Field::AwardFloor), Some("$100,000"));
        assert_eq!(
            result.value(Field::Description),
            Some(
                "This funding opportunity supports machine learning methods for \
                 clinical decision support and improved patient outcomes."
            )
        );
        assert_eq!(result.origin(Field::Title), Some(MarkupSource::Static));
    }

    #[test]
    fn test_absent_fields_are_missing() {
        let page = RawPage::new(URL, GRANTS_AI_HEALTH);
        let result = grants::extract(&page);

        assert!(!result.is_found(Field::FoaId));
        assert!(!result.is_found(Field::AwardCeiling));
        assert_eq!(result.found_count(), Field::ALL.len() - 2);
    }

    #[test]
    fn test_site_meta_description_is_ignored() {
        let page = RawPage::new(URL, GRANTS_SHELL);
        let result = grants::extract(&page);

        assert!(!result.is_found(Field::Description));
        assert_eq!(result.value(Field::Title), Some("Placeholder Opportunity"));
    }

    #[test]
    fn test_rendered_markup_takes_precedence() {
        let page = RawPage::new(URL, GRANTS_SHELL).with_rendered(GRANTS_RENDERED);
        let result = grants::extract(&page);

        assert_eq!(
            result.value(Field::Title),
            Some("Urban Air Quality Sensor Networks")
        );
        assert_eq!(result.origin(Field::Title), Some(MarkupSource::Rendered));
        assert_eq!(result.value(Field::FoaId), Some("EPA-R-ORD-2025-01"));
        assert_eq!(
            result.value(Field::Description),
            Some(
                "Supports low-cost sensor networks that measure pollution and \
                 emissions in urban neighborhoods."
            )
        );
        assert_eq!(
            result.origin(Field::Description),
            Some(MarkupSource::Rendered)
        );
        assert_eq!(result.value(Field::AwardFloor), Some("N/A"));
    }

    #[test]
    fn test_static_used_when_render_lacks_field() {
        let rendered = "<html><body><table>\
                        <tr><th>Agency Name:</th><td>Department of Energy</td></tr>\
                        </table></body></html>";
        let page = RawPage::new(URL, GRANTS_AI_HEALTH).with_rendered(rendered);
        let result = grants::extract(&page);

        assert_eq!(result.value(Field::Agency), Some("Department of Energy"));
        assert_eq!(result.origin(Field::Agency), Some(MarkupSource::Rendered));
        assert_eq!(result.value(Field::Title), Some("AI in Health Research"));
        assert_eq!(result.origin(Field::Title), Some(MarkupSource::Static));
    }

    #[test]
    fn test_page_title_fallback_skips_generic_titles() {
        let html = "<html><head><title>Grants.gov</title></head>\
                    <body><h1>Rural Broadband Deployment Grants</h1></body></html>";
        let result = grants::extract(&RawPage::new(URL, html));
        assert_eq!(
            result.value(Field::Title),
            Some("Rural Broadband Deployment Grants")
        );

        let html = "<html><head><title>Grants.gov</title></head>\
                    <body><h1>View Grant Opportunity</h1></body></html>";
        let result = grants::extract(&RawPage::new(URL, html));
        assert!(!result.is_found(Field::Title));
    }

    #[test]
    fn test_inline_bold_labels() {
        let html = "<html><body>\
                    <p><b>Funding Opportunity Title:</b> Ocean Sensors</p>\
                    <p><b>Posted Date:</b> Jan 15, 2025</p>\
                    <p><b>Close Date:</b> Apr 30, 2025</p>\
                    <p><b>Award Ceiling:</b> $500,000</p>\
                    <p><b>Award Floor:</b> N/A</p>\
                    </body></html>";
        let result = grants::extract(&RawPage::new(URL, html));

        assert_eq!(result.value(Field::Title), Some("Ocean Sensors"));
        assert_eq!(result.value(Field::OpenDate), Some("Jan 15, 2025"));
        assert_eq!(result.value(Field::CloseDate), Some("Apr 30, 2025"));
        assert_eq!(result.value(Field::AwardCeiling), Some("$500,000"));
        assert_eq!(result.value(Field::AwardFloor), Some("N/A"));
        assert!(!result.is_found(Field::Agency));
        assert!(!result.is_found(Field::Description));
    }

    #[test]
    fn test_details_table_is_not_a_description() {
        let html = r#"<html><body><div id="synopsisDetails"><table>
            <tr><td>Funding Opportunity Title:</td><td>Rural Broadband</td></tr>
            <tr><td>Agency Name:</td><td>Department of Agriculture</td></tr>
            </table></div></body></html>"#;
        let result = grants::extract(&RawPage::new(URL, html));

        assert_eq!(result.value(Field::Title), Some("Rural Broadband"));
        assert!(!result.is_found(Field::Description));
    }

    #[test]
    fn test_empty_shell_is_insufficient() {
        let page = RawPage::new(URL, "<html><head><title>Grants.gov</title></head><body></body></html>");
        assert_eq!(
            SourceFamily::GrantsGov.extract(&page),
            Err(ExtractError::InsufficientContent {
                family: SourceFamily::GrantsGov
            })
        );
    }
}
