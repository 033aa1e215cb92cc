//! Filter/match scoring: grades each normalized product against the
//! caller's structured filters and yields a 0..1 score normalized over the
//! dimensions that were actually active.

use tracing::debug;

use crate::core::types::{EnhancedQuery, NormalizedProduct, SearchFilters};
use crate::query::use_case_terms;

const CATEGORY_POINTS: f64 = 25.0;
const CATEGORY_PARTIAL_POINTS: f64 = 20.0;
const BRAND_POINTS: f64 = 20.0;
const PRICE_POINTS: f64 = 20.0;
const USE_CASE_POINTS: f64 = 15.0;
const RATING_POINTS: f64 = 10.0;
const FEATURE_POINTS: f64 = 10.0;

fn category_component(
    product: &NormalizedProduct,
    category: &str,
    enhanced: &EnhancedQuery,
) -> f64 {
    let wanted = category.to_lowercase();
    let name = product.name.to_lowercase();
    if name.contains(&wanted) || product.category.to_lowercase().contains(&wanted) {
        return CATEGORY_POINTS;
    }
    // Related terms in the name still count, at a discount.
    if enhanced
        .category_specific_terms
        .iter()
        .any(|t| name.contains(&t.to_lowercase()))
    {
        return CATEGORY_PARTIAL_POINTS;
    }
    0.0
}

fn brand_component(product: &NormalizedProduct, brands: &[String]) -> f64 {
    let name = product.name.to_lowercase();
    let brand = product.brand.as_deref().unwrap_or("").to_lowercase();
    let hit = brands.iter().any(|b| {
        let b = b.to_lowercase();
        name.contains(&b) || brand.contains(&b)
    });
    if hit {
        BRAND_POINTS
    } else {
        0.0
    }
}

/// In-range prices earn full points. Out-of-range prices earn partial
/// credit proportional to how close they are to the violated bound, capped
/// at half the available points.
fn price_component(price: Option<f64>, min: Option<f64>, max: Option<f64>) -> f64 {
    let Some(price) = price.filter(|p| *p > 0.0) else {
        return 0.0;
    };
    let above_min = min.map(|m| price >= m).unwrap_or(true);
    let below_max = max.map(|m| price <= m).unwrap_or(true);
    if above_min && below_max {
        return PRICE_POINTS;
    }

    let closeness = if !below_max {
        max.map(|m| m / price).unwrap_or(0.0)
    } else {
        min.map(|m| price / m).unwrap_or(0.0)
    };
    closeness.clamp(0.0, 1.0) * (PRICE_POINTS / 2.0)
}

fn use_case_component(product: &NormalizedProduct, use_case: &str) -> f64 {
    let lower = use_case.to_lowercase();
    let mut keywords: Vec<String> = vec![lower.clone()];
    keywords.extend(use_case_terms(&lower).iter().map(|t| t.to_string()));

    let name = product.name.to_lowercase();
    let features_text = product.features.join(" ").to_lowercase();
    let hit = keywords
        .iter()
        .any(|k| name.contains(k) || features_text.contains(k));
    if hit {
        USE_CASE_POINTS
    } else {
        0.0
    }
}

fn rating_component(rating: Option<f64>) -> f64 {
    match rating {
        Some(r) if r >= 4.0 => RATING_POINTS,
        Some(r) if r >= 3.5 => 7.0,
        Some(r) if r >= 3.0 => 5.0,
        _ => 0.0,
    }
}

fn feature_component(product: &NormalizedProduct, wanted: &[String]) -> f64 {
    if wanted.is_empty() {
        return 0.0;
    }
    let haystack = product.features.join(" ").to_lowercase();
    let matched = wanted
        .iter()
        .filter(|f| haystack.contains(&f.to_lowercase()))
        .count();
    (matched as f64 / wanted.len() as f64) * FEATURE_POINTS
}

/// Score one product against the supplied filters. Each active filter
/// dimension contributes to a running max-possible, so the result is always
/// normalized to 0..1 regardless of which dimensions were set. Returns
/// `None` when no dimension was active at all, so an unscored product can
/// never be confused with a poor match.
pub fn match_score(
    product: &NormalizedProduct,
    filters: &SearchFilters,
    enhanced: &EnhancedQuery,
) -> Option<f64> {
    if filters.is_empty() {
        return None;
    }

    let mut score = 0.0;
    let mut max_possible = 0.0;

    if let Some(category) = filters.category.as_deref() {
        max_possible += CATEGORY_POINTS;
        score += category_component(product, category, enhanced);
    }

    if let Some(brands) = filters.brands.as_deref().filter(|b| !b.is_empty()) {
        max_possible += BRAND_POINTS;
        score += brand_component(product, brands);
    }

    if filters.has_price_bounds() {
        max_possible += PRICE_POINTS;
        score += price_component(product.price_numeric, filters.min_price, filters.max_price);
    }

    if let Some(use_case) = filters.use_case.as_deref() {
        max_possible += USE_CASE_POINTS;
        score += use_case_component(product, use_case);
    }

    if let Some(features) = filters.features.as_deref().filter(|f| !f.is_empty()) {
        max_possible += FEATURE_POINTS;
        score += feature_component(product, features);
    }

    // Rating quality rides along whenever anything else is being graded;
    // there is no standalone rating filter.
    max_possible += RATING_POINTS;
    score += rating_component(product.rating_numeric);

    let normalized = (score / max_possible).clamp(0.0, 1.0);
    debug!(
        "match score {:.2} ({:.0}/{:.0}) for '{}'",
        normalized, score, max_possible, product.name
    );
    Some(normalized)
}

/// Attach scores and re-sort descending. Products keep their aggregation
/// order when no filters were active.
pub fn apply_scores(
    products: &mut Vec<NormalizedProduct>,
    filters: &SearchFilters,
    enhanced: &EnhancedQuery,
) {
    if filters.is_empty() {
        return;
    }
    for product in products.iter_mut() {
        product.match_score = match_score(product, filters, enhanced);
    }
    products.sort_by(|a, b| {
        b.match_score
            .unwrap_or(0.0)
            .total_cmp(&a.match_score.unwrap_or(0.0))
    });
}
