//! Aggregator behavior through the service seam: fallback on total source
//! failure, caching, duplicate collapsing, and pool capping.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use shoplens::aggregate;
use shoplens::core::AppState;
use shoplens::sources::{SourceError, SourceService};
use shoplens::{RawCandidate, Source};

fn init_logger() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn candidate(name: &str, price: f64) -> RawCandidate {
    RawCandidate {
        source: Some(Source::Amazon),
        name: name.to_string(),
        price_display: None,
        price_numeric: Some(price),
        image_url: Some("https://example.com/img.jpg".to_string()),
        product_url: Some("https://example.com/p/1".to_string()),
        brand: None,
        specifications: vec![],
        summary: None,
        rating: None,
    }
}

/// Always errors, as if both sites were blocking us.
struct AlwaysFailing;

#[async_trait]
impl SourceService for AlwaysFailing {
    async fn search(
        &self,
        _client: &reqwest::Client,
        _source: Source,
        _term: &str,
        _max_results: usize,
    ) -> Result<Vec<RawCandidate>, SourceError> {
        Err(SourceError::Blocked {
            reason: "captcha".to_string(),
        })
    }
}

/// Serves a fixed list and counts how many times it was asked.
struct Counting {
    calls: Arc<AtomicUsize>,
    results: Vec<RawCandidate>,
}

#[async_trait]
impl SourceService for Counting {
    async fn search(
        &self,
        _client: &reqwest::Client,
        _source: Source,
        _term: &str,
        _max_results: usize,
    ) -> Result<Vec<RawCandidate>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.results.clone())
    }
}

#[tokio::test]
async fn total_source_failure_falls_back_to_static_catalog() {
    init_logger();
    let state = AppState::default().with_source_service(Arc::new(AlwaysFailing));

    let terms = vec!["gaming laptop".to_string()];
    let pool = aggregate::aggregate(&state, &terms, "laptop", 5).await;

    assert!(!pool.is_empty());
    assert!(pool.len() <= 10);
    for c in &pool {
        assert!(c.candidate.is_valid());
        assert!(c
            .candidate
            .summary
            .as_deref()
            .unwrap_or("")
            .contains("gaming laptop"));
        assert!((0.0..=1.0).contains(&c.confidence_score));
        assert!((0.0..=1.0).contains(&c.search_relevance));
    }
}

#[tokio::test]
async fn second_aggregation_is_served_from_cache() {
    init_logger();
    let calls = Arc::new(AtomicUsize::new(0));
    let service = Counting {
        calls: Arc::clone(&calls),
        results: vec![candidate("HP Laptop 15s", 45990.0)],
    };
    let state = AppState::default().with_source_service(Arc::new(service));

    let terms = vec!["laptop".to_string()];
    aggregate::aggregate(&state, &terms, "laptop", 5).await;
    let after_first = calls.load(Ordering::SeqCst);
    assert_eq!(after_first, Source::ALL.len());

    aggregate::aggregate(&state, &terms, "laptop", 5).await;
    assert_eq!(calls.load(Ordering::SeqCst), after_first);
}

#[tokio::test]
async fn near_duplicate_names_collapse_across_branches() {
    init_logger();
    let service = Counting {
        calls: Arc::new(AtomicUsize::new(0)),
        results: vec![
            candidate("HP Laptop 15s, i5, 8GB RAM", 45990.0),
            candidate("HP Laptop 15s i5 8GB RAM", 45990.0),
            candidate("Dell Inspiron 3520", 42990.0),
        ],
    };
    let state = AppState::default().with_source_service(Arc::new(service));

    let terms = vec!["laptop".to_string()];
    let pool = aggregate::aggregate(&state, &terms, "laptop", 5).await;

    let hp_count = pool
        .iter()
        .filter(|c| c.candidate.name.starts_with("HP Laptop 15s"))
        .count();
    assert_eq!(hp_count, 1);
}

#[tokio::test]
async fn pool_is_capped_at_twice_max_results() {
    init_logger();
    let many: Vec<RawCandidate> = (0..20)
        .map(|i| candidate(&format!("Unique Laptop Model {i}"), 30000.0 + i as f64))
        .collect();
    let service = Counting {
        calls: Arc::new(AtomicUsize::new(0)),
        results: many,
    };
    let state = AppState::default().with_source_service(Arc::new(service));

    let terms = vec!["laptop".to_string()];
    let pool = aggregate::aggregate(&state, &terms, "laptop", 4).await;
    assert!(pool.len() <= 8);
}

#[tokio::test]
async fn pool_is_sorted_by_combined_score() {
    init_logger();
    let mut weak = candidate("Generic Device", 1000.0);
    weak.image_url = None;
    weak.product_url = None;
    let strong = candidate("Premium Laptop Pro", 50000.0);

    let service = Counting {
        calls: Arc::new(AtomicUsize::new(0)),
        results: vec![weak, strong],
    };
    let state = AppState::default().with_source_service(Arc::new(service));

    let terms = vec!["laptop".to_string()];
    let pool = aggregate::aggregate(&state, &terms, "laptop", 5).await;

    assert!(pool.len() >= 2);
    assert_eq!(pool[0].candidate.name, "Premium Laptop Pro");
}
