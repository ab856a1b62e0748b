use serde::Serialize;
use serde_json::{Map, Value};

use crate::args::{arg_limit, arg_str};
use crate::datasets::{PRODUCTS, ProductRecord};
use crate::tool::{Tool, ToolError, ToolOutput, ToolProperty};
use crate::weather::MOCK_SOURCE;

pub const DEFAULT_MAX_RESULTS: i64 = 3;
pub const MAX_RESULTS_CAP: i64 = 5;

static PROPERTIES: [ToolProperty; 2] = [
    ToolProperty::string("query", "Search term to find matching products."),
    ToolProperty::string(
        "max_results",
        "Maximum number of results to return (default 3, max 5).",
    ),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSearch {
    pub query: String,
    pub total_matches: usize,
    pub returned: usize,
    pub products: Vec<ProductRecord>,
    pub source: &'static str,
}

/// Substring search over product name and category.
///
/// When nothing matches, the first `limit` catalog entries stand in for the
/// match list, and `total_matches` counts that stand-in list.
pub fn search_products(query: &str, max_results: i64) -> ProductSearch {
    let query = query.trim().to_lowercase();
    let limit = usize::try_from(max_results.clamp(0, MAX_RESULTS_CAP)).unwrap_or(0);

    let mut matches: Vec<&ProductRecord> = PRODUCTS
        .iter()
        .filter(|product| {
            product.name.to_lowercase().contains(&query)
                || product.category.to_lowercase().contains(&query)
        })
        .collect();
    if matches.is_empty() {
        matches = PRODUCTS.iter().take(limit).collect();
    }

    let total_matches = matches.len();
    ProductSearch {
        query,
        total_matches,
        returned: total_matches.min(limit),
        products: matches.into_iter().take(limit).copied().collect(),
        source: MOCK_SOURCE,
    }
}

pub struct SearchProducts;

impl Tool for SearchProducts {
    fn name(&self) -> &'static str {
        "search_products"
    }

    fn description(&self) -> &'static str {
        "Search a product catalog and return matching items. Uses mock data."
    }

    fn properties(&self) -> &'static [ToolProperty] {
        &PROPERTIES
    }

    fn invoke(&self, args: &Map<String, Value>) -> Result<ToolOutput, ToolError> {
        tracing::info!("search_products triggered");
        let query = arg_str(args, "query")?;
        let max_results = arg_limit(args, "max_results", DEFAULT_MAX_RESULTS);
        ToolOutput::json(&search_products(query, max_results))
    }
}
