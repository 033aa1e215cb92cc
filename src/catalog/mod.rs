//! Static product-category registry and the keyword-count classifier that
//! maps a free-text prompt to its best category.

use std::sync::OnceLock;

/// Immutable category metadata. The table is process-wide and read-only, so
/// entries hand out `&'static` borrows freely.
#[derive(Debug)]
pub struct ProductCategory {
    pub name: &'static str,
    /// Matched case-insensitively by substring count. Overlapping keywords
    /// ("laptop" inside "gaming laptop") both count.
    pub keywords: &'static [&'static str],
    pub specs_to_extract: &'static [&'static str],
    /// Typical (min, max) price prior. Descriptive hint only, never a filter.
    pub price_range: (f64, f64),
    pub search_sources: &'static [&'static str],
    /// Attribute ranking weights. Descriptive; not required to sum to 1.
    pub comparison_weights: &'static [(&'static str, f64)],
}

pub static CATEGORIES: &[ProductCategory] = &[
    ProductCategory {
        name: "laptop",
        keywords: &[
            "laptop",
            "notebook",
            "ultrabook",
            "gaming laptop",
            "macbook",
            "chromebook",
            "workstation",
        ],
        specs_to_extract: &[
            "processor",
            "ram",
            "storage",
            "display_size",
            "graphics",
            "battery_life",
            "weight",
        ],
        price_range: (300.0, 3000.0),
        search_sources: &["amazon", "flipkart"],
        comparison_weights: &[
            ("processor", 0.25),
            ("ram", 0.20),
            ("price", 0.20),
            ("storage", 0.15),
            ("brand", 0.10),
            ("reviews", 0.10),
        ],
    },
    ProductCategory {
        name: "smartphone",
        keywords: &[
            "smartphone",
            "phone",
            "mobile",
            "iphone",
            "android",
            "samsung galaxy",
            "pixel",
            "oneplus",
        ],
        specs_to_extract: &[
            "display_size",
            "camera",
            "battery",
            "storage",
            "processor",
            "ram",
            "5g",
        ],
        price_range: (100.0, 1500.0),
        search_sources: &["amazon", "flipkart"],
        comparison_weights: &[
            ("camera", 0.25),
            ("battery", 0.20),
            ("price", 0.20),
            ("processor", 0.15),
            ("display", 0.10),
            ("brand", 0.10),
        ],
    },
    ProductCategory {
        name: "headphones",
        keywords: &[
            "headphones",
            "earphones",
            "earbuds",
            "airpods",
            "wireless headphones",
            "noise cancelling",
            "bluetooth headphones",
        ],
        specs_to_extract: &[
            "driver_size",
            "frequency_response",
            "wireless",
            "noise_cancellation",
            "battery_life",
        ],
        price_range: (20.0, 500.0),
        search_sources: &["amazon", "flipkart"],
        comparison_weights: &[
            ("sound_quality", 0.30),
            ("price", 0.25),
            ("comfort", 0.20),
            ("features", 0.15),
            ("brand", 0.10),
        ],
    },
    ProductCategory {
        name: "keyboard",
        keywords: &[
            "keyboard",
            "mechanical keyboard",
            "gaming keyboard",
            "wireless keyboard",
            "bluetooth keyboard",
        ],
        specs_to_extract: &["switch_type", "layout", "wireless", "rgb", "build_material"],
        price_range: (25.0, 300.0),
        search_sources: &["amazon", "flipkart"],
        comparison_weights: &[
            ("switch_type", 0.25),
            ("build_quality", 0.25),
            ("price", 0.20),
            ("features", 0.15),
            ("brand", 0.15),
        ],
    },
    ProductCategory {
        name: "tablet",
        keywords: &["tablet", "ipad", "android tablet", "surface", "kindle", "e-reader"],
        specs_to_extract: &[
            "display_size",
            "storage",
            "ram",
            "processor",
            "battery_life",
            "camera",
        ],
        price_range: (100.0, 1000.0),
        search_sources: &["amazon", "flipkart"],
        comparison_weights: &[
            ("display", 0.25),
            ("performance", 0.20),
            ("price", 0.20),
            ("battery", 0.15),
            ("storage", 0.10),
            ("brand", 0.10),
        ],
    },
    ProductCategory {
        name: "smartwatch",
        keywords: &[
            "smartwatch",
            "apple watch",
            "fitness tracker",
            "smart band",
            "wearable",
        ],
        specs_to_extract: &[
            "display_size",
            "battery_life",
            "fitness_features",
            "connectivity",
            "water_resistance",
        ],
        price_range: (50.0, 800.0),
        search_sources: &["amazon", "flipkart"],
        comparison_weights: &[
            ("features", 0.30),
            ("battery", 0.25),
            ("price", 0.20),
            ("design", 0.15),
            ("brand", 0.10),
        ],
    },
    ProductCategory {
        name: "camera",
        keywords: &[
            "camera",
            "dslr",
            "mirrorless",
            "digital camera",
            "canon",
            "nikon",
            "sony camera",
        ],
        specs_to_extract: &[
            "megapixels",
            "lens_mount",
            "video_quality",
            "iso_range",
            "autofocus",
        ],
        price_range: (200.0, 3000.0),
        search_sources: &["amazon", "flipkart"],
        comparison_weights: &[
            ("image_quality", 0.30),
            ("features", 0.25),
            ("price", 0.20),
            ("brand", 0.15),
            ("lens_compatibility", 0.10),
        ],
    },
    ProductCategory {
        name: "refrigerator",
        keywords: &[
            "refrigerator",
            "fridge",
            "double door",
            "single door",
            "side by side",
            "french door",
        ],
        specs_to_extract: &[
            "capacity",
            "energy_rating",
            "door_type",
            "cooling_technology",
            "warranty",
        ],
        price_range: (200.0, 2000.0),
        search_sources: &["amazon", "flipkart"],
        comparison_weights: &[
            ("capacity", 0.25),
            ("energy_efficiency", 0.25),
            ("price", 0.20),
            ("features", 0.15),
            ("brand", 0.15),
        ],
    },
    ProductCategory {
        name: "washing_machine",
        keywords: &[
            "washing machine",
            "washer",
            "front load",
            "top load",
            "semi automatic",
        ],
        specs_to_extract: &["capacity", "load_type", "energy_rating", "wash_programs", "rpm"],
        price_range: (200.0, 1500.0),
        search_sources: &["amazon", "flipkart"],
        comparison_weights: &[
            ("capacity", 0.25),
            ("efficiency", 0.25),
            ("price", 0.20),
            ("features", 0.15),
            ("brand", 0.15),
        ],
    },
    ProductCategory {
        name: "shoes",
        keywords: &[
            "shoes",
            "sneakers",
            "boots",
            "sandals",
            "formal shoes",
            "running shoes",
        ],
        specs_to_extract: &["size", "material", "brand", "type", "color", "closure"],
        price_range: (20.0, 300.0),
        search_sources: &["amazon", "flipkart"],
        comparison_weights: &[
            ("comfort", 0.30),
            ("durability", 0.25),
            ("price", 0.20),
            ("style", 0.15),
            ("brand", 0.10),
        ],
    },
    ProductCategory {
        name: "books",
        keywords: &[
            "book",
            "novel",
            "textbook",
            "ebook",
            "kindle book",
            "paperback",
            "hardcover",
        ],
        specs_to_extract: &["author", "genre", "pages", "publisher", "language", "format"],
        price_range: (5.0, 50.0),
        search_sources: &["amazon", "flipkart"],
        comparison_weights: &[
            ("content", 0.40),
            ("price", 0.25),
            ("reviews", 0.20),
            ("author", 0.10),
            ("format", 0.05),
        ],
    },
    ProductCategory {
        name: "general",
        keywords: &["product", "item", "buy", "shopping", "purchase"],
        specs_to_extract: &["brand", "price", "rating", "features", "warranty"],
        price_range: (1.0, 5000.0),
        search_sources: &["amazon", "flipkart"],
        comparison_weights: &[
            ("price", 0.30),
            ("reviews", 0.25),
            ("brand", 0.20),
            ("features", 0.15),
            ("availability", 0.10),
        ],
    },
];

/// The catch-all category. Always present in the table.
pub fn general() -> &'static ProductCategory {
    static GENERAL: OnceLock<&'static ProductCategory> = OnceLock::new();
    GENERAL.get_or_init(|| {
        CATEGORIES
            .iter()
            .find(|c| c.name == "general")
            .expect("general category is defined in the static table")
    })
}

pub fn lookup(name: &str) -> Option<&'static ProductCategory> {
    CATEGORIES.iter().find(|c| c.name == name)
}

/// Score a prompt against one category: an exact whole-prompt keyword match
/// is worth 10, every other keyword counts 2 per substring occurrence.
fn keyword_score(prompt_lower: &str, category: &ProductCategory) -> u32 {
    let trimmed = prompt_lower.trim();
    let mut score = 0;
    for keyword in category.keywords {
        if *keyword == trimmed {
            score += 10;
        } else {
            score += 2 * substring_count(prompt_lower, keyword) as u32;
        }
    }
    score
}

fn substring_count(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// Map a free-text prompt to its best-matching category. Pure substring
/// counting, no tokenization. Falls back to `general` when nothing scores.
pub fn categorize(prompt: &str) -> (&'static str, &'static ProductCategory) {
    let prompt_lower = prompt.to_lowercase();

    let mut best: Option<(&'static ProductCategory, u32)> = None;
    for category in CATEGORIES {
        let score = keyword_score(&prompt_lower, category);
        match best {
            Some((_, top)) if score <= top => {}
            _ if score > 0 => best = Some((category, score)),
            _ => {}
        }
    }

    match best {
        Some((category, _)) => (category.name, category),
        None => ("general", general()),
    }
}

/// Pull a budget figure out of natural language ("under $500", "budget of
/// 1000", "max $250"). Exposed for callers that want to pre-fill filters;
/// the core pipeline itself never parses free text into price bounds.
pub fn extract_budget_from_prompt(prompt: &str) -> Option<f64> {
    static PATTERNS: OnceLock<Vec<regex::Regex>> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        [
            r"under\s*\$?(\d+)",
            r"below\s*\$?(\d+)",
            r"less than\s*\$?(\d+)",
            r"budget.*?\$?(\d+)",
            r"max.*?\$?(\d+)",
            r"maximum.*?\$?(\d+)",
            r"\$(\d+)\s*budget",
            r"\$(\d+)\s*max",
        ]
        .iter()
        .filter_map(|p| regex::Regex::new(p).ok())
        .collect()
    });

    let lower = prompt.to_lowercase();
    for re in patterns {
        if let Some(cap) = re.captures(&lower) {
            if let Some(value) = cap.get(1).and_then(|m| m.as_str().parse::<f64>().ok()) {
                return Some(value);
            }
        }
    }
    None
}
