//! Amazon search-results extractor. Domain-configurable (amazon.in by
//! default), with selector fallback chains per field and a three-tier
//! product-URL policy.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use super::{
    check_results_page, courtesy_delay, encode_search_term, fetch_html, first_attr, first_text,
    strip_query, SourceError,
};
use crate::core::types::{RawCandidate, Source};
use crate::normalize::{parse_price, Currency};

/// Tried in order; the first selector yielding at least one container wins.
const CONTAINER_SELECTORS: &[&str] = &[
    "div[data-component-type='s-search-result']",
    "div.s-result-item",
    "div[data-asin]",
];

const NAME_SELECTORS: &[&str] = &[
    "h2 a span",
    "h2 span",
    "[data-cy='title-recipe-title']",
    "h2.a-size-mini a span",
];

/// Canonical product links carry the /dp/ (or /gp/product/) path marker.
const CANONICAL_URL_SELECTORS: &[&str] = &["a[href*='/dp/']", "a[href*='/gp/product/']"];

/// Last-resort link candidates, only consulted when no canonical URL and no
/// ASIN were found. Sponsored redirects are still excluded.
const FALLBACK_URL_SELECTORS: &[&str] = &[
    "h2 a",
    "a.s-link-style",
    "a[data-cy='title-recipe-title']",
    "a.a-link-normal",
];

const PRICE_SELECTORS: &[&str] = &[
    ".a-price .a-offscreen",
    "[data-cy='price-recipe-price']",
    ".a-price-range .a-price .a-offscreen",
];

const IMAGE_SELECTORS: &[&str] = &[
    "img.s-image",
    "img[data-image-latency]",
    "img.a-dynamic-image",
    "img[src*='images-amazon']",
];

const BRAND_SELECTORS: &[&str] = &[".a-size-base-plus", "[data-cy='brand-recipe-brand']"];

fn absolutize(domain: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("https://www.{}{}", domain, href)
    } else {
        format!("https://www.{}/{}", domain, href)
    }
}

fn is_usable_href(href: &str) -> bool {
    !href.is_empty() && href != "#" && !href.contains("/sspa/click")
}

/// Product URL policy, in strict priority order:
/// 1. a link carrying the canonical /dp/ (or /gp/product/) marker;
/// 2. a URL constructed from the container's data-asin attribute;
/// 3. any other non-placeholder, non-sponsored link.
fn extract_product_url(container: &ElementRef<'_>, domain: &str) -> Option<String> {
    for css in CANONICAL_URL_SELECTORS {
        let Ok(sel) = Selector::parse(css) else {
            continue;
        };
        for a in container.select(&sel) {
            let href = a.value().attr("href").unwrap_or("");
            if is_usable_href(href) {
                return Some(strip_query(&absolutize(domain, href)));
            }
        }
    }

    if let Some(asin) = container.value().attr("data-asin").filter(|a| !a.is_empty()) {
        return Some(format!("https://www.{}/dp/{}", domain, asin));
    }

    for css in FALLBACK_URL_SELECTORS {
        let Ok(sel) = Selector::parse(css) else {
            continue;
        };
        for a in container.select(&sel) {
            let href = a.value().attr("href").unwrap_or("");
            if is_usable_href(href) {
                return Some(strip_query(&absolutize(domain, href)));
            }
        }
    }

    None
}

/// Price text, preferring the split whole/fraction elements that regular
/// listings use, falling back to the offscreen price chain.
fn extract_price_text(container: &ElementRef<'_>) -> Option<String> {
    let whole = first_text(container, &[".a-price-whole"]);
    let fraction = first_text(container, &[".a-price-fraction"]);
    if let (Some(w), Some(f)) = (whole, fraction) {
        return Some(format!("{}.{}", w, f));
    }
    first_text(container, PRICE_SELECTORS)
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

fn extract_candidate(
    container: &ElementRef<'_>,
    domain: &str,
    currency: Currency,
) -> Option<RawCandidate> {
    let name = first_text(container, NAME_SELECTORS)?;

    let price_text = extract_price_text(container)?;
    let (price_display, price_numeric) = match parse_price(&price_text) {
        Some(numeric) => (currency.format_display(numeric), Some(numeric)),
        // Keep the raw text with the site's currency prefix applied.
        None => (format!("{}{}", currency.symbol(), price_text), None),
    };

    let product_url = extract_product_url(container, domain);
    let image_url = extract_image_url(container);

    let brand = first_text(container, BRAND_SELECTORS).filter(|b| b.len() < 50);

    let mut specifications = Vec::new();
    if let Ok(sel) = Selector::parse(".a-size-base-plus") {
        for node in container.select(&sel).take(3) {
            let txt = super::collapse_ws(&node.text().collect::<Vec<_>>().join(" "));
            if !txt.is_empty() && txt.len() < 100 {
                specifications.push(txt);
            }
        }
    }

    let mut summary_parts = Vec::new();
    if let Some(b) = &brand {
        summary_parts.push(format!("Brand: {}", b));
    }
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
        source: Some(Source::Amazon),
        name,
        price_display: Some(price_display),
        price_numeric,
        image_url,
        product_url,
        brand,
        specifications,
        summary: Some(summary_parts.join(". ")),
        rating: None,
    })
}

/// Parse a rendered search-results page. Containers are walked in page
/// order; a container lacking a name or a price is skipped, never emitted.
pub fn parse_results(html: &str, max_results: usize, domain: &str) -> Vec<RawCandidate> {
    let doc = Html::parse_document(html);
    let currency = if domain == "amazon.in" {
        Currency::Inr
    } else {
        Currency::Usd
    };

    let mut out = Vec::new();
    for css in CONTAINER_SELECTORS {
        let Ok(container_sel) = Selector::parse(css) else {
            continue;
        };

        let containers: Vec<_> = doc.select(&container_sel).collect();
        if containers.is_empty() {
            continue;
        }
        debug!("amazon: {} containers via '{}'", containers.len(), css);

        for container in containers {
            if out.len() >= max_results {
                break;
            }
            if let Some(candidate) = extract_candidate(&container, domain, currency) {
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
    let domain = crate::core::config::amazon_domain();
    let encoded = encode_search_term(term);
    let url = url::Url::parse(&format!(
        "https://www.{}/s?k={}&ref=sr_pg_1",
        domain, encoded
    ))
    .map_err(|e| SourceError::Fatal(e.to_string()))?;

    info!("searching amazon ({}) for: {}", domain, term);
    let (status, body) = fetch_html(client, url).await?;
    check_results_page(Source::Amazon, status, &body)?;

    let results = parse_results(&body, max_results, &domain);
    info!("amazon returned {} candidates for '{}'", results.len(), term);

    courtesy_delay().await;
    Ok(results)
}
