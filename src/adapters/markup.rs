use crate::normalize::collapse_whitespace;
use crate::results::{FieldValue, MarkupSource, RawPage};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Elements that may carry a value following a label
const VALUE_TAGS: &[&str] = &["td", "dd", "span", "div", "p"];

/// Site-wide meta tags that never describe a specific opportunity
const GENERIC_META: &[&str] = &["description", "keywords", "viewport", "robots"];

static META_SELECTOR: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse("meta[name]").ok());

/// Parsed markup of a page in lookup precedence order: rendered first, then static
pub(crate) struct Documents {
    docs: Vec<(MarkupSource, Html)>,
}

impl Documents {
    pub(crate) fn from_page(page: &RawPage) -> Self {
        let mut docs = Vec::with_capacity(2);
        if let Some(rendered) = &page.rendered_html {
            docs.push((MarkupSource::Rendered, Html::parse_document(rendered)));
        }
        docs.push((MarkupSource::Static, Html::parse_document(&page.html)));
        Self { docs }
    }

    /// Runs `find` against each document in precedence order and keeps the first hit
    pub(crate) fn locate<F>(&self, find: F) -> FieldValue
    where
        F: Fn(&Html) -> Option<String>,
    {
        for (source, doc) in &self.docs {
            if let Some(value) = find(doc) {
                return FieldValue::found(value, *source);
            }
        }
        FieldValue::missing()
    }
}

/// Whitespace-collapsed text content of an element
pub(crate) fn element_text(element: &ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn label_matches(text: &str, label: &str) -> bool {
    text.trim_end_matches(':').trim_end().eq_ignore_ascii_case(label)
}

/// The label element names of a family together with every label it knows
pub(crate) struct LabelSet<'a> {
    tags: &'a [&'a str],
    known: Vec<&'a str>,
}

impl<'a> LabelSet<'a> {
    pub(crate) fn new(tags: &'a [&'a str], known: Vec<&'a str>) -> Self {
        Self { tags, known }
    }

    fn is_label_tag(&self, element: &ElementRef) -> bool {
        self.tags.contains(&element.value().name())
    }

    /// A label element or table cell whose text is one of the known labels
    fn is_known_label(&self, element: &ElementRef) -> bool {
        if !self.is_label_tag(element) && element.value().name() != "td" {
            return false;
        }
        let text = element_text(element);
        self.known.iter().any(|label| label_matches(&text, label))
    }

    /// Whether `element` is, or contains, another field's label
    fn holds_known_label(&self, element: &ElementRef) -> bool {
        element
            .descendants()
            .filter_map(ElementRef::wrap)
            .any(|e| self.is_known_label(&e))
    }
}

/// Looks up a field by its label text, trying each label in order.
///
/// Three layouts are recognized, in this order for every label:
/// a label element followed by a value (inline text after the label, else
/// the next value element in document order), a `td` label with the value in
/// a sibling `td`, and a `meta` tag whose name contains the label.
pub(crate) fn find_labeled(doc: &Html, label_set: &LabelSet, labels: &[&str]) -> Option<String> {
    let elements: Vec<ElementRef> = doc
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .collect();

    labels.iter().find_map(|label| {
        following_value(&elements, label_set, label)
            .or_else(|| sibling_cell(&elements, label))
            .or_else(|| meta_content(doc, label))
    })
}

fn following_value(elements: &[ElementRef], label_set: &LabelSet, label: &str) -> Option<String> {
    for (index, element) in elements.iter().enumerate() {
        if !label_set.is_label_tag(element) {
            continue;
        }
        if !label_matches(&element_text(element), label) {
            continue;
        }

        if let Some(text) = inline_value(element, label_set) {
            return Some(text);
        }

        let candidate = elements[index + 1..].iter().find(|next| {
            VALUE_TAGS.contains(&next.value().name())
                && !next.ancestors().any(|a| a.id() == element.id())
        });

        if let Some(candidate) = candidate {
            if label_set.holds_known_label(candidate) {
                continue;
            }
            let text = element_text(candidate);
            if !text.is_empty() && !text.eq_ignore_ascii_case(label) {
                return Some(text);
            }
        }
    }
    None
}

/// Text that follows the label inside the same parent, as in
/// `<p><b>Posted Date:</b> Jan 15, 2025</p>`. Stops at the next label or
/// value element.
fn inline_value(label: &ElementRef, label_set: &LabelSet) -> Option<String> {
    let mut text = String::new();
    for node in label.next_siblings() {
        if let Some(fragment) = node.value().as_text() {
            text.push_str(fragment);
            continue;
        }
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        if label_set.is_label_tag(&element) || VALUE_TAGS.contains(&element.value().name()) {
            break;
        }
        text.push(' ');
        text.push_str(&element_text(&element));
    }

    let text = collapse_whitespace(text.trim_start().trim_start_matches(':'));
    (!text.is_empty()).then_some(text)
}

fn sibling_cell(elements: &[ElementRef], label: &str) -> Option<String> {
    elements
        .iter()
        .filter(|e| e.value().name() == "td" && label_matches(&element_text(e), label))
        .find_map(|td| {
            let next = td
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .find(|e| e.value().name() == "td")?;
            let text = element_text(&next);
            (!text.is_empty()).then_some(text)
        })
}

fn meta_content(doc: &Html, label: &str) -> Option<String> {
    let selector = META_SELECTOR.as_ref()?;
    let needle = label.to_lowercase();
    doc.select(selector).find_map(|meta| {
        let name = meta.value().attr("name")?.to_lowercase();
        if !name.contains(&needle) || GENERIC_META.contains(&name.as_str()) {
            return None;
        }
        let content = collapse_whitespace(meta.value().attr("content")?);
        (!content.is_empty()).then_some(content)
    })
}

/// Text of the first element named `tag`, if non-empty and not generic
pub(crate) fn first_tag_text(doc: &Html, tag: &str, skip: &[&str]) -> Option<String> {
    let selector = Selector::parse(tag).ok()?;
    let element = doc.select(&selector).next()?;
    let text = element_text(&element);
    let lower = text.to_lowercase();
    if text.is_empty() || skip.iter().any(|s| lower.contains(s)) {
        return None;
    }
    Some(text)
}

/// Text of the first element named `tag` whose id (and optionally class)
/// mentions one of `keywords`. Containers holding labeled fields, such as a
/// details table, are skipped.
pub(crate) fn container_text(
    doc: &Html,
    tag: &str,
    keywords: &[&str],
    include_class: bool,
    label_set: &LabelSet,
) -> Option<String> {
    let selector = Selector::parse(tag).ok()?;
    doc.select(&selector).find_map(|element| {
        let mut haystack = element.value().id().unwrap_or_default().to_lowercase();
        if include_class {
            for class in element.value().classes() {
                haystack.push(' ');
                haystack.push_str(&class.to_lowercase());
            }
        }
        if !keywords.iter().any(|k| haystack.contains(k)) {
            return None;
        }
        if label_set.holds_known_label(&element) {
            return None;
        }
        let text = element_text(&element);
        (!text.is_empty()).then_some(text)
    })
}
