//! Field normalization: maps inconsistent source fields into the canonical
//! [`NormalizedProduct`] shape, including currency display/parse round-trips
//! and rating parsing.

use std::sync::OnceLock;

use crate::core::types::{EnrichedCandidate, NormalizedProduct, Source};

/// Currency convention for one marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Inr,
    Usd,
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Inr => "₹",
            Currency::Usd => "$",
        }
    }

    /// Format a numeric price into the site's display convention.
    /// INR drops fractions ("₹45,990"); USD keeps cents ("$299.99").
    pub fn format_display(&self, value: f64) -> String {
        match self {
            Currency::Inr => format!("₹{}", group_thousands(value.round() as i64)),
            Currency::Usd => {
                let cents = (value * 100.0).round() as i64;
                format!("${}.{:02}", group_thousands(cents / 100), (cents % 100).abs())
            }
        }
    }

    /// Convention for a candidate's source site. Amazon follows the
    /// configured marketplace domain; Flipkart is always rupees.
    pub fn for_source(source: Option<Source>) -> Currency {
        match source {
            Some(Source::Flipkart) => Currency::Inr,
            _ => {
                if crate::core::config::amazon_domain() == "amazon.in" {
                    Currency::Inr
                } else {
                    Currency::Usd
                }
            }
        }
    }
}

/// Western thousands grouping for a non-negative magnitude.
pub fn group_thousands(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Parse a numeric value out of a price display string like "₹17,499" or
/// "$299.99" by stripping everything except digits and the decimal point
/// (after removing thousands separators). Unparsable input yields `None`.
pub fn parse_price(display: &str) -> Option<f64> {
    let cleaned: String = display
        .replace(',', "")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Parse the leading decimal number out of a rating string like "4.2/5" or
/// "4.2". Unparsable ratings yield `None`, never an error.
pub fn parse_rating(display: &str) -> Option<f64> {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    let re = RE.get_or_init(|| regex::Regex::new(r"(\d+\.?\d*)").expect("static rating pattern"));
    re.captures(display)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Map an enriched candidate into the canonical output shape. Every record
/// ends up with a non-empty name and price display; missing fields get the
/// documented defaults rather than failing.
pub fn normalize(enriched: &EnrichedCandidate) -> NormalizedProduct {
    let raw = &enriched.candidate;
    let currency = Currency::for_source(raw.source);

    let name = if raw.name.trim().is_empty() {
        "Unknown Product".to_string()
    } else {
        raw.name.trim().to_string()
    };

    let (price_display, price_numeric) = match (raw.price_numeric, raw.price_display.as_deref()) {
        // Numeric wins: format it and keep the value.
        (Some(numeric), _) => (currency.format_display(numeric), Some(numeric)),
        // Display only: keep the string as-is, recover the numeric value.
        (None, Some(display)) if !display.trim().is_empty() => {
            (display.trim().to_string(), parse_price(display))
        }
        _ => (currency.format_display(0.0), Some(0.0)),
    };

    let rating_display = raw.rating.clone().filter(|r| !r.trim().is_empty());
    let rating_numeric = rating_display.as_deref().and_then(parse_rating);

    NormalizedProduct {
        name,
        price_display,
        price_numeric,
        rating_display,
        rating_numeric,
        source_url: raw.product_url.clone().unwrap_or_else(|| "N/A".to_string()),
        image_url: raw.image_url.clone().unwrap_or_else(|| "N/A".to_string()),
        brand: raw.brand.clone().filter(|b| !b.trim().is_empty()),
        features: raw.specifications.clone(),
        availability: "In Stock".to_string(),
        match_score: None,
        source: raw.source,
        category: enriched.category.clone(),
    }
}
