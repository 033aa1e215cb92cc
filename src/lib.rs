//! Product search engine for retail sites: category classification, query
//! expansion, concurrent scraping with fallback, and filter-aware ranking.
//!
//! The typical entry point is [`search_products`] driven by an [`AppState`]:
//!
//! ```no_run
//! use shoplens::{search_products, AppState, SearchFilters};
//!
//! # async fn run() {
//! let state = AppState::default();
//! let filters = SearchFilters {
//!     category: Some("laptop".to_string()),
//!     max_price: Some(50_000.0),
//!     ..Default::default()
//! };
//! let outcome = search_products(&state, "gaming laptop", 10, Some(&filters)).await;
//! for product in &outcome.products {
//!     println!("{} {}", product.price_display, product.name);
//! }
//! # }
//! ```

pub mod aggregate;
pub mod catalog;
pub mod core;
pub mod normalize;
pub mod pipeline;
pub mod query;
pub mod ranking;
pub mod sources;

pub use crate::core::types::{
    EnhancedQuery, EnrichedCandidate, NormalizedProduct, RawCandidate, SearchFilters,
    SearchOutcome, SearchRequest, Source,
};
pub use crate::core::AppState;
pub use crate::pipeline::search_products;
