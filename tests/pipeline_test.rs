//! End-to-end pipeline runs through an injected source double: category
//! resolution, query expansion, normalization, and filter-aware ranking.

use std::sync::Arc;

use async_trait::async_trait;
use shoplens::core::AppState;
use shoplens::sources::{SourceError, SourceService};
use shoplens::{search_products, RawCandidate, SearchFilters, Source};

fn init_logger() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_test_writer()
        .try_init();
}

struct FixedCatalog;

#[async_trait]
impl SourceService for FixedCatalog {
    async fn search(
        &self,
        _client: &reqwest::Client,
        source: Source,
        _term: &str,
        _max_results: usize,
    ) -> Result<Vec<RawCandidate>, SourceError> {
        let mk = |name: &str, price: f64, brand: &str, rating: &str| RawCandidate {
            source: Some(source),
            name: name.to_string(),
            price_display: None,
            price_numeric: Some(price),
            image_url: Some("https://example.com/img.jpg".to_string()),
            product_url: Some("https://example.com/p".to_string()),
            brand: Some(brand.to_string()),
            specifications: vec!["8GB RAM".to_string(), "512GB SSD".to_string()],
            summary: None,
            rating: Some(rating.to_string()),
        };
        Ok(vec![
            mk("HP Gaming Laptop 15s RTX 3050", 48990.0, "HP", "4.3/5"),
            mk("Dell Inspiron 3520 Laptop", 42990.0, "Dell", "4.1/5"),
            mk("ASUS VivoBook 15 Laptop", 32990.0, "ASUS", "3.9/5"),
        ])
    }
}

#[tokio::test]
async fn free_text_query_without_filters_stays_unscored() {
    init_logger();
    let state = AppState::default().with_source_service(Arc::new(FixedCatalog));

    let outcome = search_products(&state, "gaming laptop under 50000", 10, None).await;

    // Free-text budget talk is never parsed into filters; the enhanced
    // query falls back to the original text.
    assert_eq!(outcome.enhanced_query.enhanced_query, "gaming laptop under 50000");
    assert_eq!(outcome.strategy, "Using broad search across all products");
    assert!(!outcome.products.is_empty());
    for p in &outcome.products {
        assert_eq!(p.match_score, None);
        assert_eq!(p.category, "laptop");
        assert!(!p.price_display.is_empty());
    }
}

#[tokio::test]
async fn filters_drive_scoring_and_reranking() {
    init_logger();
    let state = AppState::default().with_source_service(Arc::new(FixedCatalog));

    let filters = SearchFilters {
        category: Some("laptop".to_string()),
        min_price: Some(40_000.0),
        max_price: Some(50_000.0),
        brands: Some(vec!["HP".to_string()]),
        use_case: Some("gaming".to_string()),
        features: Some(vec!["SSD".to_string()]),
    };
    let outcome = search_products(&state, "gaming laptop", 10, Some(&filters)).await;

    assert!(!outcome.products.is_empty());
    let top = &outcome.products[0];
    assert!(top.name.starts_with("HP"));

    let mut last = f64::MAX;
    for p in &outcome.products {
        let score = p.match_score.expect("filters were active");
        assert!((0.0..=1.0).contains(&score));
        assert!(score <= last);
        last = score;
    }

    assert!(outcome.strategy.contains("Focusing on laptop products"));
    assert!(outcome.strategy.contains("Filtering by HP brand"));
    assert!(outcome.strategy.contains("price range"));
    assert!(outcome.strategy.contains("gaming use case"));
}

#[tokio::test]
async fn result_list_honors_max_results() {
    init_logger();
    let state = AppState::default().with_source_service(Arc::new(FixedCatalog));

    let outcome = search_products(&state, "laptop", 2, None).await;
    assert!(outcome.products.len() <= 2);
}

#[tokio::test]
async fn normalized_records_carry_defaults_and_ratings() {
    init_logger();
    let state = AppState::default().with_source_service(Arc::new(FixedCatalog));

    let outcome = search_products(&state, "laptop", 10, None).await;
    let hp = outcome
        .products
        .iter()
        .find(|p| p.name.starts_with("HP"))
        .expect("HP candidate survives aggregation");

    assert_eq!(hp.price_display, "₹48,990");
    assert_eq!(hp.rating_numeric, Some(4.3));
    assert_eq!(hp.availability, "In Stock");
    assert!(hp.features.iter().any(|f| f.contains("SSD")));
}
