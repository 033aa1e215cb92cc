//! Concurrent aggregation across search terms and sources: fan-out with
//! per-branch timeouts, a TTL result cache, confidence/relevance scoring,
//! near-duplicate collapsing, and the combined ranking of the pool.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use futures::future::join_all;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::core::config;
use crate::core::types::{EnrichedCandidate, RawCandidate, Source};
use crate::core::AppState;
use crate::sources::fallback;

/// Time-bounded cache of enriched results, keyed by (term, source). Entries
/// are shared immutably; a hit skips the network entirely.
#[derive(Clone)]
pub struct ResultCache {
    inner: moka::future::Cache<String, Arc<Vec<EnrichedCandidate>>>,
}

impl ResultCache {
    pub fn new(ttl: Duration, capacity: u64) -> Self {
        Self {
            inner: moka::future::Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    fn key(term: &str, source: Source) -> String {
        format!("{}:{}", source, term.trim().to_lowercase())
    }

    pub async fn get(&self, term: &str, source: Source) -> Option<Arc<Vec<EnrichedCandidate>>> {
        self.inner.get(&Self::key(term, source)).await
    }

    pub async fn put(&self, term: &str, source: Source, results: Arc<Vec<EnrichedCandidate>>) {
        self.inner.insert(Self::key(term, source), results).await;
    }
}

/// How complete the extracted record looks. Starts at 0.5 for passing
/// validation, with credit for an image, a real numeric price, and a
/// product link. Capped at 1.0.
pub fn confidence_score(candidate: &RawCandidate) -> f64 {
    let mut score: f64 = 0.5;
    if candidate.has_image() {
        score += 0.2;
    }
    if candidate.price_numeric.map(|p| p > 0.0).unwrap_or(false) {
        score += 0.2;
    }
    if candidate.has_product_url() {
        score += 0.1;
    }
    score.min(1.0)
}

/// Textual match between the driving search term and the product name.
/// A full substring hit is a perfect score; otherwise the fraction of the
/// term's words that appear as whole words in the name.
pub fn search_relevance(term: &str, name: &str) -> f64 {
    let term_lower = term.trim().to_lowercase();
    let name_lower = name.to_lowercase();
    if term_lower.is_empty() {
        return 0.0;
    }
    if name_lower.contains(&term_lower) {
        return 1.0;
    }

    let name_words: std::collections::HashSet<&str> = name_lower.split_whitespace().collect();
    let term_words: Vec<&str> = term_lower.split_whitespace().collect();
    if term_words.is_empty() {
        return 0.0;
    }
    let matched = term_words
        .iter()
        .filter(|w| name_words.contains(**w))
        .count();
    matched as f64 / term_words.len() as f64
}

/// Canonical key for near-duplicate detection: lowercase, punctuation
/// stripped, whitespace collapsed.
pub fn normalize_name_key(name: &str) -> String {
    let stripped: String = name
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapse near-duplicate names across sources, keeping the first
/// occurrence in pool order. Keys shorter than four characters carry too
/// little signal to treat as duplicates, so those entries always survive.
/// Idempotent: running it twice changes nothing.
pub fn dedup_candidates(pool: Vec<EnrichedCandidate>) -> Vec<EnrichedCandidate> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::with_capacity(pool.len());
    for candidate in pool {
        let key = normalize_name_key(&candidate.candidate.name);
        if key.len() < 4 || seen.insert(key) {
            out.push(candidate);
        }
    }
    out
}

fn spec_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?i)\b(\d+\s?GB\s?(?:DDR\d\s?)?RAM)\b",
            r"(?i)\b(\d+\s?[GT]B\s?(?:NVMe\s?)?SSD)\b",
            r"(?i)\b(\d+\s?TB\s?HDD)\b",
            r"(?i)\b((?:Intel\s)?Core\s?i[3579][\w-]*)\b",
            r"(?i)\b((?:AMD\s)?Ryzen\s?[3579]\s?\w*)\b",
            r"(?i)\b(\d+(?:\.\d+)?\s?(?:inch|\u{201d})\s?(?:FHD|HD|QHD|OLED)?)\b",
            r"(?i)\b((?:RTX|GTX)\s?\d{3,4}\w*)\b",
            r"(?i)\b(\d+\s?MP\s?camera)\b",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("static spec pattern"))
        .collect()
    })
}

/// Mine hardware specs out of a product name for candidates whose extractor
/// found no explicit feature list. Best-effort; order follows the name.
pub fn extract_specs_from_name(name: &str) -> Vec<String> {
    let mut specs = Vec::new();
    for re in spec_patterns() {
        if let Some(cap) = re.captures(name).and_then(|c| c.get(1)) {
            let spec = cap.as_str().trim().to_string();
            if !specs.contains(&spec) {
                specs.push(spec);
            }
        }
    }
    specs
}

/// Attach aggregation-time scores to a raw candidate.
pub fn enrich(mut candidate: RawCandidate, term: &str, category: &str) -> EnrichedCandidate {
    if candidate.specifications.is_empty() {
        candidate.specifications = extract_specs_from_name(&candidate.name);
    }
    let confidence = confidence_score(&candidate);
    let relevance = search_relevance(term, &candidate.name);
    EnrichedCandidate {
        candidate,
        confidence_score: confidence,
        search_relevance: relevance,
        category: category.to_string(),
    }
}

/// One (term, source) branch: cache, else a time-bounded live fetch, else
/// the fallback catalog. A branch never fails the overall aggregation.
async fn run_branch(
    state: &AppState,
    term: &str,
    source: Source,
    category: &str,
    max_results: usize,
) -> Arc<Vec<EnrichedCandidate>> {
    if let Some(hit) = state.result_cache.get(term, source).await {
        debug!("cache hit for '{}' on {}", term, source);
        return hit;
    }

    let fetched = {
        // Permit scopes the fetch only; scoring and caching run unthrottled.
        // The semaphore is never closed, so acquire cannot fail.
        let _permit = state.outbound_limit.acquire().await.ok();
        tokio::time::timeout(
            config::source_timeout(),
            state
                .source_service
                .search(&state.http_client, source, term, max_results),
        )
        .await
    };

    let raw = match fetched {
        Ok(Ok(results)) if !results.is_empty() => results,
        Ok(Ok(_)) => {
            debug!("{} returned nothing for '{}', using fallback", source, term);
            fallback::products_for(term, source, max_results)
        }
        Ok(Err(err)) => {
            warn!("{} failed for '{}': {}, using fallback", source, term, err);
            fallback::products_for(term, source, max_results)
        }
        Err(_) => {
            warn!("{} timed out for '{}', using fallback", source, term);
            fallback::products_for(term, source, max_results)
        }
    };

    let enriched: Vec<EnrichedCandidate> = raw
        .into_iter()
        .filter(RawCandidate::is_valid)
        .map(|c| enrich(c, term, category))
        .collect();

    let shared = Arc::new(enriched);
    state
        .result_cache
        .put(term, source, Arc::clone(&shared))
        .await;
    shared
}

/// Combined ranking weight: completeness dominates, textual match refines.
fn combined_score(candidate: &EnrichedCandidate) -> f64 {
    0.6 * candidate.confidence_score + 0.4 * candidate.search_relevance
}

/// Fan out every search term to every source concurrently, pool the
/// branches, collapse near-duplicates, and return the top slice ranked by
/// combined score. The pool is capped at twice `max_results` so downstream
/// filtering still has slack to discard weak matches.
pub async fn aggregate(
    state: &AppState,
    terms: &[String],
    category: &str,
    max_results: usize,
) -> Vec<EnrichedCandidate> {
    let per_source = config::max_results_per_source();

    let branches = terms.iter().flat_map(|term| {
        Source::ALL
            .iter()
            .map(move |&source| run_branch(state, term, source, category, per_source))
    });
    let pooled: Vec<EnrichedCandidate> = join_all(branches)
        .await
        .into_iter()
        .flat_map(|shared| shared.iter().cloned().collect::<Vec<_>>())
        .collect();

    info!(
        "pooled {} candidates from {} terms x {} sources",
        pooled.len(),
        terms.len(),
        Source::ALL.len()
    );

    let mut unique = dedup_candidates(pooled);
    unique.sort_by(|a, b| combined_score(b).total_cmp(&combined_score(a)));
    unique.truncate(max_results.saturating_mul(2));
    unique
}
