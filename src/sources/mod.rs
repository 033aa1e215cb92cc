//! Per-site extractors plus the plumbing they share: HTTP fetch with
//! rotating headers, block detection, selector-chain helpers, and the
//! [`SourceService`] seam the aggregator fans out through.

pub mod amazon;
pub mod fallback;
pub mod flipkart;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use rand::RngExt;
use reqwest::StatusCode;
use scraper::{ElementRef, Selector};

use crate::core::types::{RawCandidate, Source};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("blocked: {reason}")]
    Blocked { reason: String },
    #[error("transient: {0}")]
    Transient(String),
    #[error("fatal: {0}")]
    Fatal(String),
}

/// Extraction seam between the aggregator and the live site scrapers.
/// Tests substitute a double so aggregation behavior is checked offline.
#[async_trait]
pub trait SourceService: Send + Sync {
    async fn search(
        &self,
        client: &reqwest::Client,
        source: Source,
        term: &str,
        max_results: usize,
    ) -> Result<Vec<RawCandidate>, SourceError>;
}

pub struct LiveSourceService;

#[async_trait]
impl SourceService for LiveSourceService {
    async fn search(
        &self,
        client: &reqwest::Client,
        source: Source,
        term: &str,
        max_results: usize,
    ) -> Result<Vec<RawCandidate>, SourceError> {
        match source {
            Source::Amazon => amazon::search(client, term, max_results).await,
            Source::Flipkart => flipkart::search(client, term, max_results).await,
        }
    }
}

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
];

fn random_user_agent() -> &'static str {
    let mut rng = rand::rng();
    USER_AGENTS[rng.random_range(0..USER_AGENTS.len())]
}

/// Marketplaces serve block pages with a 200 status often enough that the
/// body has to be inspected too.
pub fn detect_block_reason(status: StatusCode, body: &str) -> Option<String> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Some("http_429".to_string());
    }
    if status == StatusCode::FORBIDDEN {
        return Some("http_403".to_string());
    }
    if status == StatusCode::SERVICE_UNAVAILABLE {
        return Some("http_503".to_string());
    }

    let lower = body.to_lowercase();
    let needles = [
        ("captcha", "captcha"),
        ("robot check", "robot_check"),
        ("automated access", "automated_access"),
        ("verify you are human", "captcha"),
        ("access denied", "access_denied"),
        ("api-services-support@amazon.com", "robot_check"),
    ];
    for (needle, label) in needles {
        if lower.contains(needle) {
            return Some(label.to_string());
        }
    }

    None
}

/// Fetch a search-results page with browser-like headers. Network failures
/// map to `Transient`; callers decide what a bad status means.
pub async fn fetch_html(
    client: &reqwest::Client,
    url: url::Url,
) -> Result<(StatusCode, String), SourceError> {
    let resp = client
        .get(url)
        .header("User-Agent", random_user_agent())
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .header("Accept-Language", "en-US,en;q=0.9")
        .header("Upgrade-Insecure-Requests", "1")
        .send()
        .await
        .map_err(|e| SourceError::Transient(e.to_string()))?;

    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Ok((status, body))
}

/// Validate a fetched results page or turn it into the right error.
pub fn check_results_page(
    source: Source,
    status: StatusCode,
    body: &str,
) -> Result<(), SourceError> {
    if let Some(reason) = detect_block_reason(status, body) {
        tracing::warn!("source '{}' blocked: {}", source, reason);
        return Err(SourceError::Blocked { reason });
    }
    if !status.is_success() {
        return Err(SourceError::Transient(format!("http_{}", status.as_u16())));
    }
    Ok(())
}

/// Strip characters that confuse site search boxes, then percent-encode.
pub fn encode_search_term(term: &str) -> String {
    let cleaned: String = term
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();
    utf8_percent_encode(cleaned.trim(), NON_ALPHANUMERIC).to_string()
}

/// Randomized 1-3s pause after a full site fetch. Non-blocking to sibling
/// branches; skipped entirely when disabled via config.
pub async fn courtesy_delay() {
    if !crate::core::config::courtesy_delay_enabled() {
        return;
    }
    let millis = {
        let mut rng = rand::rng();
        rng.random_range(1_000..3_000)
    };
    tokio::time::sleep(std::time::Duration::from_millis(millis)).await;
}

// ---------------------------------------------------------------------------
// Selector-chain helpers. Site markup changes often, so every field is
// extracted by trying an ordered list of selectors; the first one yielding
// non-empty content wins.
// ---------------------------------------------------------------------------

pub(crate) fn collapse_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First non-empty text content across a selector chain.
pub(crate) fn first_text(scope: &ElementRef<'_>, chain: &[&str]) -> Option<String> {
    for css in chain {
        let Ok(sel) = Selector::parse(css) else {
            continue;
        };
        if let Some(node) = scope.select(&sel).next() {
            let txt = collapse_ws(&node.text().collect::<Vec<_>>().join(" "));
            if !txt.is_empty() {
                return Some(txt);
            }
        }
    }
    None
}

/// First non-empty attribute value across a selector chain, trying each of
/// `attrs` on every matched element.
pub(crate) fn first_attr(
    scope: &ElementRef<'_>,
    chain: &[&str],
    attrs: &[&str],
) -> Option<String> {
    for css in chain {
        let Ok(sel) = Selector::parse(css) else {
            continue;
        };
        for node in scope.select(&sel) {
            for attr in attrs {
                if let Some(v) = node.value().attr(attr) {
                    let v = v.trim();
                    if !v.is_empty() {
                        return Some(v.to_string());
                    }
                }
            }
        }
    }
    None
}

/// Drop query parameters for a cleaner, stable product link.
pub(crate) fn strip_query(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => base.to_string(),
        None => url.to_string(),
    }
}
