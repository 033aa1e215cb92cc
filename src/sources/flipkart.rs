//! Flipkart search-results extractor. Flipkart's obfuscated class names
//! rotate on redesigns, so every field carries a fallback chain.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use super::{
    check_results_page, courtesy_delay, encode_search_term, fetch_html, first_attr, first_text,
    strip_query, SourceError,
};
use crate::core::types::{RawCandidate, Source};
use crate::normalize::{parse_price, Currency};

const CONTAINER_SELECTORS: &[&str] = &[
    "div._1AtVbE",
    "div._13oc-S",
    "div._2kHMtA",
    "div._3pLy-c",
    "div[data-id]",
];

const NAME_SELECTORS: &[&str] = &["._4rR01T", ".s1Q9rs", "._2WkVRV", "a[href*='/p/']"];

const CANONICAL_URL_SELECTORS: &[&str] = &["a[href*='/p/']", "a[href*='/dp/']"];
const FALLBACK_URL_SELECTORS: &[&str] = &["a[title]", "a._1fQZEK"];

const PRICE_SELECTORS: &[&str] = &["._30jeq3", "._1_WHN1", "._3tbKJL", "._25b18c"];

const IMAGE_SELECTORS: &[&str] = &[
    "img[src*='rukminim']",
    "img[data-src*='rukminim']",
    "img[src*='flipkart']",
    "img._396cs4",
];

const SPEC_SELECTORS: &[&str] = &["._1xgFaf li", "._1xgFaf", "._3Djpdu", "._2_R_DZ"];

fn absolutize(href: &str) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        Some(href.to_string())
    } else if href.starts_with('/') {
        Some(format!("https://www.flipkart.com{}", href))
    } else {
        None
    }
}

/// Product name: prefer the title attribute (full name, untruncated), then
/// the known title classes, then any product-link text. Very short strings
/// are markup noise, not names.
fn extract_name(container: &ElementRef<'_>) -> Option<String> {
    if let Some(title) = first_attr(container, &["a[title]"], &["title"]) {
        if title.len() > 5 {
            return Some(super::collapse_ws(&title));
        }
    }
    first_text(container, NAME_SELECTORS).filter(|n| n.len() > 5)
}

/// Same tiered policy as the other extractors: canonical /p/ link first,
/// then a URL constructed from the container's data-id, then any usable
/// non-placeholder link.
fn extract_product_url(container: &ElementRef<'_>) -> Option<String> {
    for css in CANONICAL_URL_SELECTORS {
        let Ok(sel) = Selector::parse(css) else {
            continue;
        };
        for a in container.select(&sel) {
            let href = a.value().attr("href").unwrap_or("").trim();
            if !href.is_empty() && href != "#" {
                if let Some(url) = absolutize(href) {
                    return Some(strip_query(&url));
                }
            }
        }
    }

    if let Some(pid) = container.value().attr("data-id").filter(|v| !v.is_empty()) {
        return Some(format!("https://www.flipkart.com/product/p/itm?pid={}", pid));
    }

    for css in FALLBACK_URL_SELECTORS {
        let Ok(sel) = Selector::parse(css) else {
            continue;
        };
        for a in container.select(&sel) {
            let href = a.value().attr("href").unwrap_or("").trim();
            if !href.is_empty() && href != "#" {
                if let Some(url) = absolutize(href) {
                    return Some(strip_query(&url));
                }
            }
        }
    }

    None
}

fn extract_image_url(container: &ElementRef<'_>) -> Option<String> {
    let src = first_attr(container, IMAGE_SELECTORS, &["src", "data-src"])?;
    if src.starts_with("//") {
        Some(format!("https:{}", src))
    } else if src.contains("http") {
        Some(src)
    } else {
        None
    }
}

fn extract_candidate(container: &ElementRef<'_>) -> Option<RawCandidate> {
    let name = extract_name(container)?;

    let price_text = first_text(container, PRICE_SELECTORS)?;
    let (price_display, price_numeric) = match parse_price(&price_text) {
        Some(numeric) => (Currency::Inr.format_display(numeric), Some(numeric)),
        None => (format!("₹{}", price_text), None),
    };

    let product_url = extract_product_url(container);
    let image_url = extract_image_url(container);

    let mut specifications = Vec::new();
    for css in SPEC_SELECTORS {
        let Ok(sel) = Selector::parse(css) else {
            continue;
        };
        for node in container.select(&sel).take(3) {
            let txt = super::collapse_ws(&node.text().collect::<Vec<_>>().join(" "));
            if !txt.is_empty() && txt.len() < 100 {
                specifications.push(txt);
            }
        }
        if !specifications.is_empty() {
            break;
        }
    }

    let mut summary_parts = vec![format!(
        "Product: {}",
        name.chars().take(100).collect::<String>()
    )];
    summary_parts.push(format!("Price: {}", price_display));
    if !specifications.is_empty() {
        summary_parts.push(format!(
            "Features: {}",
            specifications
                .iter()
                .take(2)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    Some(RawCandidate {
        source: Some(Source::Flipkart),
        name,
        price_display: Some(price_display),
        price_numeric,
        image_url,
        product_url,
        brand: None,
        specifications,
        summary: Some(summary_parts.join(". ")),
        rating: None,
    })
}

pub fn parse_results(html: &str, max_results: usize) -> Vec<RawCandidate> {
    let doc = Html::parse_document(html);

    let mut out = Vec::new();
    for css in CONTAINER_SELECTORS {
        let Ok(container_sel) = Selector::parse(css) else {
            continue;
        };

        let containers: Vec<_> = doc.select(&container_sel).collect();
        if containers.is_empty() {
            continue;
        }
        debug!("flipkart: {} containers via '{}'", containers.len(), css);

        for container in containers {
            if out.len() >= max_results {
                break;
            }
            if let Some(candidate) = extract_candidate(&container) {
                out.push(candidate);
            }
        }
        break;
    }

    out
}

pub async fn search(
    client: &reqwest::Client,
    term: &str,
    max_results: usize,
) -> Result<Vec<RawCandidate>, SourceError> {
    let encoded = encode_search_term(term);
    let url = url::Url::parse(&format!("https://www.flipkart.com/search?q={}", encoded))
        .map_err(|e| SourceError::Fatal(e.to_string()))?;

    info!("searching flipkart for: {}", term);
    let (status, body) = fetch_html(client, url).await?;
    check_results_page(Source::Flipkart, status, &body)?;

    let results = parse_results(&body, max_results);
    info!("flipkart returned {} candidates for '{}'", results.len(), term);

    courtesy_delay().await;
    Ok(results)
}
