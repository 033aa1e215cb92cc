use std::time::Duration;

// ---------------------------------------------------------------------------
// Env-driven knobs for the search pipeline. Every value has a usable default
// so the crate runs with zero configuration.
// ---------------------------------------------------------------------------

pub const ENV_AMAZON_DOMAIN: &str = "SHOPLENS_AMAZON_DOMAIN";
pub const ENV_SOURCE_TIMEOUT_MS: &str = "SHOPLENS_SOURCE_TIMEOUT_MS";
pub const ENV_MAX_RESULTS_PER_SOURCE: &str = "SHOPLENS_MAX_RESULTS_PER_SOURCE";
pub const ENV_CACHE_TTL_SECS: &str = "SHOPLENS_CACHE_TTL_SECS";
pub const ENV_OUTBOUND_LIMIT: &str = "SHOPLENS_OUTBOUND_LIMIT";
pub const ENV_COURTESY_DELAY: &str = "SHOPLENS_COURTESY_DELAY";

/// Marketplace domain for the Amazon extractor. `amazon.in` by default, which
/// also selects rupee price formatting.
pub fn amazon_domain() -> String {
    std::env::var(ENV_AMAZON_DOMAIN)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "amazon.in".to_string())
}

/// Per-branch timeout for one (term, source) fetch. A stuck connection in a
/// single branch must not stall the whole aggregation, so this is applied
/// around every extractor call. Default: 12s.
pub fn source_timeout() -> Duration {
    let ms = std::env::var(ENV_SOURCE_TIMEOUT_MS)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(12_000);
    Duration::from_millis(ms.max(250))
}

/// Result cap requested from each extractor per term.
pub fn max_results_per_source() -> usize {
    std::env::var(ENV_MAX_RESULTS_PER_SOURCE)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(10)
}

/// TTL for cached (term, source) result lists. Default: 30 minutes.
pub fn cache_ttl() -> Duration {
    let secs = std::env::var(ENV_CACHE_TTL_SECS)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60 * 30);
    Duration::from_secs(secs.max(1))
}

/// Cap on concurrent outbound fetches across all branches.
pub fn outbound_limit() -> usize {
    std::env::var(ENV_OUTBOUND_LIMIT)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(32)
}

/// Randomized 1-3s pause after each full site fetch to reduce rate limiting.
/// Default: enabled. Set `SHOPLENS_COURTESY_DELAY=0` to disable (tests do).
pub fn courtesy_delay_enabled() -> bool {
    let Ok(v) = std::env::var(ENV_COURTESY_DELAY) else {
        return true;
    };
    let v = v.trim().to_ascii_lowercase();
    if v.is_empty() {
        return true;
    }
    !matches!(v.as_str(), "0" | "false" | "no" | "off" | "disabled")
}
