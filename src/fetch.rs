//! Page retrieval: a static HTTP fetch with retries and an optional
//! WebDriver-rendered snapshot of the same URL.

use crate::config::FetchConfig;
use crate::errors::FetchError;
use crate::results::RawPage;
use fantoccini::{Client, ClientBuilder, Locator};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use serde_json::{Map, Value, json};
use std::time::Duration;

/// Element that signals the opportunity tables have been rendered
const RENDERED_MARKER: &str = "table tr td";

const FALLBACK_WEBDRIVER_URLS: &[&str] = &[
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444",
];

const CHROME_ARGS: &[&str] = &[
    "--headless",
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--window-size=1920,1080",
    "--log-level=3",
];

pub struct Fetcher {
    config: FetchConfig,
    http: reqwest::Client,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Retrieves the static markup and, when enabled, a rendered snapshot.
    ///
    /// A failed render only drops the snapshot. A failed static fetch is
    /// tolerated when a snapshot exists, leaving `html` empty.
    pub async fn fetch(&self, url: &str) -> Result<RawPage, FetchError> {
        let rendered = if self.config.render {
            match self.render(url).await {
                Ok(source) => Some(source),
                Err(e) => {
                    ::log::warn!("Rendering failed for {}: {}; using static markup only", url, e);
                    None
                }
            }
        } else {
            None
        };

        combine(url, self.fetch_static(url).await, rendered, self.config.render)
    }

    /// GET with `max_retries` attempts and exponential backoff between them
    pub async fn fetch_static(&self, url: &str) -> Result<String, FetchError> {
        let attempts = self.config.max_retries.max(1);
        let mut last_error = String::new();

        for attempt in 0..attempts {
            match self.get_once(url).await {
                Ok(body) => {
                    ::log::debug!("Fetched {} bytes from {}", body.len(), url);
                    return Ok(body);
                }
                Err(e) => {
                    let wait = backoff_delay(self.config.backoff_factor, attempt);
                    ::log::warn!(
                        "Request attempt {}/{} failed for {}: {}",
                        attempt + 1,
                        attempts,
                        url,
                        e
                    );
                    last_error = e.to_string();
                    if attempt + 1 < attempts {
                        tokio::time::sleep(wait).await;
                    }
                }
            }
        }

        Err(FetchError::Exhausted {
            url: url.to_string(),
            attempts,
            last_error,
        })
    }

    async fn get_once(&self, url: &str) -> Result<String, reqwest::Error> {
        self.http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }

    /// Loads the page in headless Chrome and returns the rendered DOM
    pub async fn render(&self, url: &str) -> Result<String, FetchError> {
        let client = connect_to_webdriver(&self.config.webdriver_url).await?;
        let result = self.render_with(&client, url).await;

        if let Err(e) = client.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }
        result
    }

    async fn render_with(&self, client: &Client, url: &str) -> Result<String, FetchError> {
        ::log::info!("Rendering {} via WebDriver", url);
        client
            .goto(url)
            .await
            .map_err(|e| FetchError::WebDriver(e.to_string()))?;

        let wait = Duration::from_secs(self.config.render_wait_secs);
        if let Err(e) = client
            .wait()
            .at_most(wait)
            .for_element(Locator::Css(RENDERED_MARKER))
            .await
        {
            ::log::debug!("Rendered tables did not appear on {}: {}; waiting {:?}", url, e, wait);
            tokio::time::sleep(wait).await;
        }

        client
            .source()
            .await
            .map_err(|e| FetchError::WebDriver(e.to_string()))
    }
}

/// Builds the page from the two retrievals.
///
/// Rendered markup alone is enough; the static result alone is enough. With
/// neither, the static error is returned as is when rendering was off.
fn combine(
    url: &str,
    static_result: Result<String, FetchError>,
    rendered: Option<String>,
    render_enabled: bool,
) -> Result<RawPage, FetchError> {
    match (static_result, rendered) {
        (Ok(html), Some(rendered)) => Ok(RawPage::new(url, html).with_rendered(rendered)),
        (Ok(html), None) => Ok(RawPage::new(url, html)),
        (Err(e), Some(rendered)) => {
            ::log::warn!("Static fetch failed for {}: {}; using rendered markup only", url, e);
            Ok(RawPage::new(url, "").with_rendered(rendered))
        }
        (Err(e), None) if !render_enabled => Err(e),
        (Err(e), None) => Err(FetchError::NoContent {
            url: url.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Seconds to wait after a failed attempt (`factor^attempt`, attempt counted from 0)
fn backoff_delay(factor: f64, attempt: u32) -> Duration {
    let secs = factor.powi(attempt as i32);
    if secs.is_finite() && secs >= 0.0 {
        Duration::from_secs_f64(secs)
    } else {
        Duration::ZERO
    }
}

fn chrome_capabilities() -> Map<String, Value> {
    let mut caps = Map::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": CHROME_ARGS }));
    caps
}

/// Connects to the configured WebDriver, falling back to the common local ports
async fn connect_to_webdriver(webdriver_url: &str) -> Result<Client, FetchError> {
    let mut last_error = match connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::warn!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            e
        }
    };

    for url in FALLBACK_WEBDRIVER_URLS {
        if *url == webdriver_url {
            continue;
        }
        ::log::debug!("Trying fallback WebDriver URL: {}", url);
        match connect(url).await {
            Ok(client) => {
                ::log::info!("Connected to fallback WebDriver at {}", url);
                return Ok(client);
            }
            Err(e) => last_error = e,
        }
    }

    Err(FetchError::WebDriver(format!(
        "no WebDriver server reachable (set WEBDRIVER_URL or --webdriver-url): {}",
        last_error
    )))
}

async fn connect(url: &str) -> Result<Client, fantoccini::error::NewSessionError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(chrome_capabilities());
    builder.connect(url).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_from_one_second() {
        assert_eq!(backoff_delay(1.5, 0), Duration::from_secs(1));
        assert_eq!(backoff_delay(1.5, 1), Duration::from_secs_f64(1.5));
        assert_eq!(backoff_delay(1.5, 2), Duration::from_secs_f64(2.25));
        assert_eq!(backoff_delay(f64::NAN, 1), Duration::ZERO);
    }

    #[test]
    fn test_headless_capabilities() {
        let caps = chrome_capabilities();
        assert_eq!(caps["browserName"], "chrome");
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.iter().any(|a| a == "--headless"));
    }

    const URL: &str = "https://www.grants.gov/search-results-detail/353584";

    fn exhausted() -> FetchError {
        FetchError::Exhausted {
            url: URL.to_string(),
            attempts: 3,
            last_error: "connection refused".to_string(),
        }
    }

    #[test]
    fn test_combine_keeps_both_markups() {
        let page = combine(
            URL,
            Ok("<html>static</html>".to_string()),
            Some("<html>dom</html>".to_string()),
            true,
        )
        .unwrap();
        assert_eq!(page.html, "<html>static</html>");
        assert_eq!(page.rendered_html.as_deref(), Some("<html>dom</html>"));
    }

    #[test]
    fn test_combine_render_failure_drops_snapshot_only() {
        let page = combine(URL, Ok("<html>static</html>".to_string()), None, true).unwrap();
        assert_eq!(page.url, URL);
        assert_eq!(page.html, "<html>static</html>");
        assert!(page.rendered_html.is_none());
    }

    #[test]
    fn test_combine_static_failure_with_render_leaves_html_empty() {
        let page =
            combine(URL, Err(exhausted()), Some("<html>dom</html>".to_string()), true).unwrap();
        assert_eq!(page.html, "");
        assert_eq!(page.rendered_html.as_deref(), Some("<html>dom</html>"));
    }

    #[test]
    fn test_combine_both_failing_is_no_content() {
        match combine(URL, Err(exhausted()), None, true) {
            Err(FetchError::NoContent { url, reason }) => {
                assert_eq!(url, URL);
                assert!(reason.contains("connection refused"));
            }
            other => panic!("expected no content, got {:?}", other.map(|p| p.url)),
        }
    }

    #[test]
    fn test_combine_static_failure_without_render_keeps_error() {
        match combine(URL, Err(exhausted()), None, false) {
            Err(FetchError::Exhausted { attempts, .. }) => assert_eq!(attempts, 3),
            other => panic!("expected exhausted retries, got {:?}", other.map(|p| p.url)),
        }
    }

    #[tokio::test]
    async fn test_static_failure_without_render_is_exhausted() {
        let config = FetchConfig {
            render: false,
            max_retries: 2,
            backoff_factor: 0.0,
            request_timeout_secs: 1,
            ..FetchConfig::default()
        };
        let fetcher = Fetcher::new(config).unwrap();
        let result = fetcher.fetch("http://127.0.0.1:9/unreachable").await;
        match result {
            Err(FetchError::Exhausted { attempts, .. }) => assert_eq!(attempts, 2),
            other => panic!("expected exhausted retries, got {:?}", other.map(|p| p.url)),
        }
    }
}
