//! Query expansion: turns the caller's free-text query plus structured
//! filters into an [`EnhancedQuery`], and produces the small ordered list of
//! search keywords that drives scraping.

use chrono::Datelike;
use std::collections::HashSet;

use crate::catalog::ProductCategory;
use crate::core::types::{EnhancedQuery, SearchFilters};
use crate::normalize::group_thousands;

/// Filter-category names mapped to related search terms.
fn category_filter_terms(category: &str) -> &'static [&'static str] {
    match category {
        "laptop" => &["notebook", "ultrabook", "gaming laptop", "business laptop", "macbook"],
        "smartphone" => &["phone", "mobile", "android", "iphone", "cell phone"],
        "headphones" => &["earphones", "earbuds", "headset", "audio", "wireless headphones"],
        "keyboard" => &["mechanical keyboard", "gaming keyboard", "wireless keyboard", "ergonomic"],
        "monitor" => &["display", "screen", "gaming monitor", "4K monitor", "ultrawide"],
        "mouse" => &["gaming mouse", "wireless mouse", "ergonomic mouse", "optical mouse"],
        "speaker" => &["bluetooth speaker", "bookshelf speakers", "soundbar", "portable speaker"],
        "tablet" => &["ipad", "android tablet", "drawing tablet", "e-reader"],
        _ => &[],
    }
}

pub(crate) fn use_case_terms(use_case: &str) -> &'static [&'static str] {
    match use_case {
        "gaming" => &["gaming", "esports", "high performance", "rgb", "mechanical"],
        "work" => &["business", "professional", "productivity", "office", "enterprise"],
        "student" => &["budget", "portable", "lightweight", "affordable", "basic"],
        "creative" => &["design", "color accurate", "high resolution", "professional"],
        "programming" => &["coding", "development", "multiple monitors", "mechanical"],
        "music" => &["audio quality", "studio", "professional audio", "hi-fi"],
        "travel" => &["portable", "lightweight", "compact", "wireless", "battery life"],
        "exercise" => &["sports", "sweat resistant", "wireless", "secure fit"],
        _ => &[],
    }
}

/// A handful of brand names aliased to their product-line terms.
fn brand_aliases(brand: &str) -> &'static [&'static str] {
    match brand {
        "apple" => &["mac", "macbook", "iphone", "ipad"],
        "microsoft" => &["surface", "xbox"],
        "google" => &["pixel", "chromebook"],
        "samsung" => &["galaxy"],
        "sony" => &["playstation", "xperia"],
        _ => &[],
    }
}

fn format_dollars(value: f64) -> String {
    format!("${}", group_thousands(value.round() as i64))
}

/// Build an [`EnhancedQuery`] from the original query and structured filters.
///
/// The enhanced string concatenates phrases in a fixed order: category,
/// use case, brands (first two), price range. When no filter produced a
/// phrase it falls back to the original query verbatim. Pure transform,
/// never fails.
pub fn expand_filters(query: &str, filters: &SearchFilters) -> EnhancedQuery {
    let mut enhanced_parts: Vec<String> = Vec::new();
    let mut search_terms: Vec<String> = vec![query.to_lowercase()];
    let mut category_terms: Vec<String> = Vec::new();
    let mut brand_filters: Vec<String> = Vec::new();
    let mut price_context = None;
    let mut use_case_context = None;

    if let Some(category) = filters.category.as_deref() {
        let terms = category_filter_terms(&category.to_lowercase());
        if terms.is_empty() {
            category_terms.push(category.to_lowercase());
        } else {
            category_terms.extend(terms.iter().map(|t| t.to_string()));
        }
        enhanced_parts.push(format!("best {}", category));
        search_terms.extend(category_terms.iter().cloned());
    }

    if let Some(use_case) = filters.use_case.as_deref() {
        let lower = use_case.to_lowercase();
        let terms = use_case_terms(&lower);
        enhanced_parts.push(format!("for {}", lower));
        if terms.is_empty() {
            search_terms.push(lower.clone());
        } else {
            search_terms.extend(terms.iter().map(|t| t.to_string()));
        }
        use_case_context = Some(use_case.to_string());
    }

    if let Some(brands) = filters.brands.as_deref().filter(|b| !b.is_empty()) {
        brand_filters = brands.to_vec();
        if brands.len() == 1 {
            enhanced_parts.push(format!("from {}", brands[0]));
        } else {
            // More than two named brands still phrases only the first two.
            enhanced_parts.push(format!("from {} or {}", brands[0], brands[1]));
        }
        for brand in brands {
            for alias in brand_aliases(&brand.to_lowercase()) {
                search_terms.push(alias.to_string());
            }
        }
    }

    if filters.has_price_bounds() {
        match (filters.min_price, filters.max_price) {
            (Some(min), Some(max)) => {
                if max >= 10_000.0 {
                    // A ceiling this high is treated as open-ended premium;
                    // the phrasing drops the max on purpose. Scoring still
                    // honors both bounds.
                    price_context = Some(format!("premium range over {}", format_dollars(min)));
                    enhanced_parts.push(format!("under {}", format_dollars(min)));
                } else {
                    price_context = Some(format!(
                        "{} to {} range",
                        format_dollars(min),
                        format_dollars(max)
                    ));
                    enhanced_parts.push(format!(
                        "between {} and {}",
                        format_dollars(min),
                        format_dollars(max)
                    ));
                }
            }
            (None, Some(max)) => {
                price_context = Some(format!("budget under {}", format_dollars(max)));
                enhanced_parts.push(format!("under {}", format_dollars(max)));
            }
            (Some(min), None) => {
                price_context = Some(format!("premium over {}", format_dollars(min)));
                enhanced_parts.push(format!("over {}", format_dollars(min)));
            }
            (None, None) => {}
        }
    }

    let enhanced_query = if enhanced_parts.is_empty() {
        query.to_string()
    } else {
        enhanced_parts.join(" ")
    };

    EnhancedQuery {
        original_query: query.to_string(),
        enhanced_query,
        search_terms: dedup_preserving_order(search_terms),
        category_specific_terms: category_terms,
        brand_filters,
        price_context,
        use_case_context,
    }
}

fn dedup_preserving_order(terms: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    terms
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Category-aware keyword expansion used upstream of scraping: the prompt
/// itself, up to 2 pattern-specific boosts, then 3 generic boosts, capped at
/// 5 keywords total.
pub fn search_keywords(prompt: &str, category: &ProductCategory) -> Vec<String> {
    let prompt_lower = prompt.to_lowercase();
    let mut keywords = vec![prompt.to_string()];

    match category.name {
        "laptop" => {
            if prompt_lower.contains("gaming") {
                keywords.push("gaming laptop RTX".to_string());
                keywords.push("high performance laptop".to_string());
            }
            if prompt_lower.contains("work") || prompt_lower.contains("office") {
                keywords.push("business laptop".to_string());
                keywords.push("productivity laptop".to_string());
            }
        }
        "smartphone" => {
            if prompt_lower.contains("camera") {
                keywords.push("camera phone".to_string());
                keywords.push("photography smartphone".to_string());
            }
            if prompt_lower.contains("gaming") {
                keywords.push("gaming phone".to_string());
                keywords.push("high refresh rate phone".to_string());
            }
        }
        _ => {}
    }
    keywords.truncate(3);

    let year = chrono::Utc::now().year();
    keywords.push(format!("best {} {}", category.name, year));
    keywords.push(format!("top rated {}", category.name));
    keywords.push(format!("{} reviews", category.name));

    keywords.truncate(5);
    keywords
}

/// Human-readable summary of which filters shaped the search, for
/// display/audit alongside the final result list.
pub fn search_strategy(filters: &SearchFilters) -> String {
    let mut strategies: Vec<String> = Vec::new();

    if let Some(category) = filters.category.as_deref() {
        strategies.push(format!("Focusing on {} products", category));
    }

    if let Some(brands) = filters.brands.as_deref().filter(|b| !b.is_empty()) {
        if brands.len() == 1 {
            strategies.push(format!("Filtering by {} brand", brands[0]));
        } else {
            strategies.push(format!("Considering {} preferred brands", brands.len()));
        }
    }

    if filters.has_price_bounds() {
        strategies.push("Applying price range filters".to_string());
    }

    if let Some(use_case) = filters.use_case.as_deref() {
        strategies.push(format!("Optimizing for {} use case", use_case));
    }

    if strategies.is_empty() {
        strategies.push("Using broad search across all products".to_string());
    }

    strategies.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn phrases_follow_category_use_case_brand_price_order() {
        let filters = SearchFilters {
            category: Some("laptop".to_string()),
            min_price: Some(500.0),
            max_price: Some(1500.0),
            brands: Some(vec!["HP".to_string(), "Dell".to_string(), "ASUS".to_string()]),
            use_case: Some("gaming".to_string()),
            features: None,
        };
        let enhanced = expand_filters("need a machine", &filters);
        assert_eq!(
            enhanced.enhanced_query,
            "best laptop for gaming from HP or Dell between $500 and $1,500"
        );
        assert_eq!(enhanced.brand_filters.len(), 3);
        assert_eq!(enhanced.price_context.as_deref(), Some("$500 to $1,500 range"));
    }

    #[test]
    fn high_ceiling_collapses_to_single_sided_phrase() {
        let filters = SearchFilters {
            min_price: Some(2000.0),
            max_price: Some(12_000.0),
            ..Default::default()
        };
        let enhanced = expand_filters("workstation", &filters);
        assert_eq!(enhanced.enhanced_query, "under $2,000");
        assert_eq!(
            enhanced.price_context.as_deref(),
            Some("premium range over $2,000")
        );
    }

    #[test]
    fn no_filter_phrases_fall_back_to_original() {
        let enhanced = expand_filters("gaming laptop under 50000", &SearchFilters::default());
        assert_eq!(enhanced.enhanced_query, "gaming laptop under 50000");
        assert_eq!(enhanced.search_terms, vec!["gaming laptop under 50000"]);
    }

    #[test]
    fn brand_aliases_join_search_terms_once() {
        let filters = SearchFilters {
            brands: Some(vec!["Apple".to_string()]),
            ..Default::default()
        };
        let enhanced = expand_filters("macbook", &filters);
        assert!(enhanced.search_terms.contains(&"macbook".to_string()));
        assert!(enhanced.search_terms.contains(&"ipad".to_string()));
        // The query itself already said "macbook"; the alias must not repeat it.
        let macbooks = enhanced
            .search_terms
            .iter()
            .filter(|t| *t == "macbook")
            .count();
        assert_eq!(macbooks, 1);
    }

    #[test]
    fn keywords_cap_at_five_with_generic_boosts() {
        let (_, category) = catalog::categorize("gaming laptop for work");
        let keywords = search_keywords("gaming laptop for work", category);
        assert_eq!(keywords.len(), 5);
        assert_eq!(keywords[0], "gaming laptop for work");
        assert_eq!(keywords[1], "gaming laptop RTX");
        assert!(keywords.iter().any(|k| k.starts_with("best laptop")));
    }

    #[test]
    fn strategy_mentions_every_active_filter() {
        let filters = SearchFilters {
            category: Some("laptop".to_string()),
            max_price: Some(1000.0),
            brands: Some(vec!["HP".to_string()]),
            use_case: Some("work".to_string()),
            ..Default::default()
        };
        let strategy = search_strategy(&filters);
        assert!(strategy.contains("Focusing on laptop products"));
        assert!(strategy.contains("Filtering by HP brand"));
        assert!(strategy.contains("Applying price range filters"));
        assert!(strategy.contains("Optimizing for work use case"));

        assert_eq!(
            search_strategy(&SearchFilters::default()),
            "Using broad search across all products"
        );
    }
}
