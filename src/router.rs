use crate::errors::ExtractError;
use crate::results::RawPage;
use scraper::{Html, Selector};
use std::fmt;
use std::sync::LazyLock;
use url::Url;

/// The page families the extractor knows how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFamily {
    /// Grants.gov opportunity pages
    GrantsGov,
    /// NSF award and solicitation pages (nsf.gov, research.gov)
    Nsf,
}

impl SourceFamily {
    pub const ALL: [SourceFamily; 2] = [SourceFamily::GrantsGov, SourceFamily::Nsf];

    pub fn name(&self) -> &'static str {
        match self {
            SourceFamily::GrantsGov => "grants.gov",
            SourceFamily::Nsf => "nsf.gov",
        }
    }

    /// Registered domains served by this family
    fn domains(&self) -> &'static [&'static str] {
        match self {
            SourceFamily::GrantsGov => &["grants.gov"],
            SourceFamily::Nsf => &["nsf.gov", "research.gov"],
        }
    }

    /// Classifies a host name, matching whole domain labels only
    pub fn from_host(host: &str) -> Option<Self> {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        Self::ALL.into_iter().find(|family| {
            family
                .domains()
                .iter()
                .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
        })
    }

    fn markers(&self) -> &'static [Selector] {
        match self {
            SourceFamily::GrantsGov => &GRANTS_MARKERS,
            SourceFamily::Nsf => &NSF_MARKERS,
        }
    }
}

impl fmt::Display for SourceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static GRANTS_MARKERS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    compile_markers(&[
        r#"[id^="synopsisDetails"]"#,
        r#"[id^="forecastDetails"]"#,
        r#"link[rel="canonical"][href*="grants.gov"]"#,
        r#"meta[property="og:url"][content*="grants.gov"]"#,
    ])
});

static NSF_MARKERS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    compile_markers(&[
        "#awardAbstract",
        ".award-abstract",
        r#"[id^="nsfSolicitation"]"#,
        r#"link[rel="canonical"][href*="nsf.gov"]"#,
        r#"meta[property="og:url"][content*="nsf.gov"]"#,
        r#"link[rel="canonical"][href*="research.gov"]"#,
    ])
});

fn compile_markers(patterns: &[&str]) -> Vec<Selector> {
    patterns
        .iter()
        .filter_map(|p| match Selector::parse(p) {
            Ok(selector) => Some(selector),
            Err(e) => {
                ::log::error!("Invalid marker selector {}: {}", p, e);
                None
            }
        })
        .collect()
}

/// Selects the page family for a page.
///
/// The URL host is checked first. When it is inconclusive the markup is
/// searched for container identifiers known to each family; exactly one family
/// must match, otherwise the page is reported as unrecognized.
pub fn route(page: &RawPage) -> Result<SourceFamily, ExtractError> {
    if let Some(family) = route_by_url(&page.url) {
        ::log::debug!("Routed {} to {} by host", page.url, family);
        return Ok(family);
    }

    let mut documents = vec![Html::parse_document(&page.html)];
    if let Some(rendered) = &page.rendered_html {
        documents.push(Html::parse_document(rendered));
    }

    let matched: Vec<SourceFamily> = SourceFamily::ALL
        .into_iter()
        .filter(|family| documents.iter().any(|doc| has_markers(doc, *family)))
        .collect();

    match matched.as_slice() {
        [family] => {
            ::log::debug!("Routed {} to {} by markup", page.url, family);
            Ok(*family)
        }
        [] => {
            ::log::debug!("No family markers found for {}", page.url);
            Err(ExtractError::UnrecognizedSource {
                url: page.url.clone(),
            })
        }
        _ => {
            ::log::warn!("Markup of {} matches several families: {:?}", page.url, matched);
            Err(ExtractError::UnrecognizedSource {
                url: page.url.clone(),
            })
        }
    }
}

/// Classifies a URL by its host, if it parses and belongs to a known family
pub fn route_by_url(url: &str) -> Option<SourceFamily> {
    let parsed = Url::parse(url).ok()?;
    SourceFamily::from_host(parsed.host_str()?)
}

fn has_markers(doc: &Html, family: SourceFamily) -> bool {
    family
        .markers()
        .iter()
        .any(|selector| doc.select(selector).next().is_some())
}
