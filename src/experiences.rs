//! "Experiences" page scraper.
//!
//! Fetches the bar's events page over HTTP and pulls the text of every
//! element matching a CSS selector into one whitespace-normalised summary
//! that can be dropped into the system prompt.

use std::time::Duration;

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::OnceLock;

use crate::{
    config::{NO_EXPERIENCES_ON_PAGE_TEXT, NO_EXPERIENCES_TEXT},
    error::SommelierError,
};

/// Desktop browser User-Agent; some site builders serve an empty shell to bots.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Elements rendered on their own line; text around them is not run together.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

/// Extract the experiences summary from an HTML document.
///
/// # Errors
/// Returns [`SommelierError::Scrape`] when `selector` is not valid CSS.
pub fn extract_experiences(html: &str, selector: &str) -> Result<String, SommelierError> {
    let selector = Selector::parse(selector)
        .map_err(|e| SommelierError::Scrape(format!("invalid selector {selector:?}: {e}")))?;

    let document = Html::parse_document(html);
    let elements: Vec<_> = document.select(&selector).collect();
    if elements.is_empty() {
        return Ok(NO_EXPERIENCES_TEXT.to_string());
    }

    let texts: Vec<String> = elements
        .iter()
        .map(|el| inner_text(*el))
        .filter(|t| !t.is_empty())
        .collect();

    let summary = whitespace_re()
        .replace_all(&texts.join("\n"), " ")
        .trim()
        .to_string();

    if summary.is_empty() {
        return Ok(NO_EXPERIENCES_ON_PAGE_TEXT.to_string());
    }
    Ok(summary)
}

/// `true` when `text` is real scraped content rather than empty or a fallback string.
pub fn has_experiences(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && text != NO_EXPERIENCES_TEXT && text != NO_EXPERIENCES_ON_PAGE_TEXT
}

/// Text of `el` as a browser lays it out: inline runs are concatenated
/// (`<b>Mal</b>bec` stays one word) and block elements start a new line.
fn inner_text(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in el.descendants() {
        let after_block = node.prev_sibling().is_some_and(|s| is_block(s.value()));
        if after_block || is_block(node.value()) {
            out.push('\n');
        }
        if let Node::Text(text) = node.value() {
            out.push_str(text);
        }
    }
    out.trim().to_string()
}

fn is_block(node: &Node) -> bool {
    node.as_element()
        .is_some_and(|e| BLOCK_TAGS.contains(&e.name()))
}

/// HTTP fetcher for the experiences page.
#[derive(Clone)]
pub struct ExperienceScraper {
    client: reqwest::Client,
}

impl ExperienceScraper {
    /// Build a scraper with a browser User-Agent and a 60 s timeout.
    pub fn new() -> Result<Self, SommelierError> {
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch `url` and extract the text of elements matching `selector`.
    pub async fn scrape(&self, url: &str, selector: &str) -> Result<String, SommelierError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SommelierError::Scrape(format!(
                "GET {url} returned HTTP {}",
                status.as_u16()
            )));
        }
        let html = response.text().await?;
        extract_experiences(&html, selector)
    }

    /// Like [`scrape`](Self::scrape) but degrades to [`NO_EXPERIENCES_TEXT`] on failure.
    pub async fn scrape_or_fallback(&self, url: &str, selector: &str) -> String {
        match self.scrape(url, selector).await {
            Ok(text) => {
                tracing::info!(url, chars = text.len(), "experiences scraped");
                text
            }
            Err(e) => {
                tracing::warn!(url, "Experiences scrape failed (using fallback): {}", e);
                NO_EXPERIENCES_TEXT.to_string()
            }
        }
    }
}
