//! End-to-end search orchestration: classify, expand, aggregate, normalize,
//! score, rank.

use tracing::{debug, info};

use crate::core::types::{NormalizedProduct, SearchFilters, SearchOutcome};
use crate::core::AppState;
use crate::{aggregate, catalog, normalize, query, ranking};

/// Run one product search end to end.
///
/// The query is classified into a category, expanded into search terms, and
/// fanned out across all sources concurrently. The pooled candidates are
/// deduplicated, normalized, and (when structured filters were supplied)
/// re-ranked by match score. The returned list holds at most `max_results`
/// products.
pub async fn search_products(
    state: &AppState,
    query_text: &str,
    max_results: usize,
    filters: Option<&SearchFilters>,
) -> SearchOutcome {
    let (category_name, category) = catalog::categorize(query_text);
    info!("query '{}' classified as '{}'", query_text, category_name);

    if let Some(budget) = catalog::extract_budget_from_prompt(query_text) {
        // Surfaced for logging only; free text never becomes a price filter.
        debug!("prompt mentions a budget around {}", budget);
    }

    let empty = SearchFilters::default();
    let active_filters = filters.unwrap_or(&empty);
    let enhanced_query = query::expand_filters(query_text, active_filters);
    let keywords = query::search_keywords(query_text, category);
    debug!("driving extraction with {} keywords", keywords.len());

    let enriched = aggregate::aggregate(state, &keywords, category_name, max_results).await;

    let mut products: Vec<NormalizedProduct> =
        enriched.iter().map(normalize::normalize).collect();
    ranking::apply_scores(&mut products, active_filters, &enhanced_query);
    products.truncate(max_results);

    let strategy = query::search_strategy(active_filters);
    info!(
        "search '{}' produced {} products ({})",
        query_text,
        products.len(),
        strategy
    );

    SearchOutcome {
        products,
        strategy,
        enhanced_query,
    }
}
