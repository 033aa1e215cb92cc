use serde::{Deserialize, Serialize};

/// One external retail site being scraped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Amazon,
    Flipkart,
}

impl Source {
    pub const ALL: [Source; 2] = [Source::Amazon, Source::Flipkart];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Amazon => "amazon",
            Source::Flipkart => "flipkart",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unprocessed product record produced by a source extractor or the fallback
/// provider. A candidate is only usable when it has a name and some price
/// value; everything else is best-effort.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCandidate {
    #[serde(default)]
    pub source: Option<Source>,
    pub name: String,
    #[serde(default)]
    pub price_display: Option<String>,
    #[serde(default)]
    pub price_numeric: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub product_url: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub specifications: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
    /// Rating string as upstream provides it, e.g. "4.2/5" or "4.2".
    #[serde(default)]
    pub rating: Option<String>,
}

impl RawCandidate {
    /// Name plus a price value (display or numeric) are required; anything
    /// less is dropped before aggregation.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
            && (self.price_numeric.is_some()
                || self
                    .price_display
                    .as_deref()
                    .map(|p| !p.trim().is_empty())
                    .unwrap_or(false))
    }

    /// Treats the "N/A" sentinel some upstreams emit as absent.
    pub fn has_image(&self) -> bool {
        matches!(self.image_url.as_deref(), Some(u) if !u.trim().is_empty() && u != "N/A")
    }

    pub fn has_product_url(&self) -> bool {
        matches!(self.product_url.as_deref(), Some(u) if !u.trim().is_empty() && u != "N/A")
    }
}

/// A raw candidate plus the scores computed at aggregation time. Built once
/// by the aggregator's enrichment step, never constructed field-by-field
/// elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedCandidate {
    #[serde(flatten)]
    pub candidate: RawCandidate,
    /// 0..1 heuristic for how complete the extracted record looks.
    pub confidence_score: f64,
    /// 0..1 textual match between the driving search term and the name.
    pub search_relevance: f64,
    pub category: String,
}

/// Expanded form of one search request, created once and immutable after.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnhancedQuery {
    pub original_query: String,
    pub enhanced_query: String,
    pub search_terms: Vec<String>,
    pub category_specific_terms: Vec<String>,
    pub brand_filters: Vec<String>,
    #[serde(default)]
    pub price_context: Option<String>,
    #[serde(default)]
    pub use_case_context: Option<String>,
}

/// Structured filters supplied by the caller. Read-only input to scoring.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub brands: Option<Vec<String>>,
    #[serde(default)]
    pub use_case: Option<String>,
    #[serde(default)]
    pub features: Option<Vec<String>>,
}

impl SearchFilters {
    pub fn has_price_bounds(&self) -> bool {
        self.min_price.is_some() || self.max_price.is_some()
    }

    /// True when no filter dimension is set at all.
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && !self.has_price_bounds()
            && self.brands.as_deref().map_or(true, |b| b.is_empty())
            && self.use_case.is_none()
            && self.features.as_deref().map_or(true, |f| f.is_empty())
    }
}

/// Canonical output record handed to the caller. Created by the field
/// normalizer; the match scorer may attach `match_score` once when filters
/// were supplied, after which the record is never mutated again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedProduct {
    pub name: String,
    /// Currency-formatted display string, always present.
    pub price_display: String,
    #[serde(default)]
    pub price_numeric: Option<f64>,
    #[serde(default)]
    pub rating_display: Option<String>,
    #[serde(default)]
    pub rating_numeric: Option<f64>,
    pub source_url: String,
    pub image_url: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub availability: String,
    /// Present only when structured filters were supplied and at least one
    /// filter dimension was active. Absent means "unscored", not "bad match".
    #[serde(default)]
    pub match_score: Option<f64>,
    #[serde(default)]
    pub source: Option<Source>,
    pub category: String,
}

/// Caller-facing request shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default)]
    pub filters: Option<SearchFilters>,
}

fn default_max_results() -> usize {
    10
}

/// Final ranked result set plus the audit string describing which filters
/// drove the ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub products: Vec<NormalizedProduct>,
    pub strategy: String,
    pub enhanced_query: EnhancedQuery,
}

impl SearchOutcome {
    /// JSON form for handing the result set to a tool caller.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
