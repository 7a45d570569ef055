//! Parsing configuration for listing extraction
//!
//! Centralized CSS selectors and the price disambiguation window. Each
//! selector field is a fallback list: the first selector that matches wins.

use serde::{Deserialize, Serialize};

use crate::infrastructure::config::{defaults, marketplace};

/// Main parsing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Origin used to resolve relative listing links
    pub site_origin: String,

    /// Characters examined after a format label when looking for its price
    pub price_window_chars: usize,

    /// Search result page selectors
    pub search_selectors: SearchPageSelectors,

    /// Product detail page selectors
    pub product_selectors: ProductPageSelectors,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            site_origin: marketplace::ORIGIN.to_string(),
            price_window_chars: defaults::PRICE_WINDOW_CHARS,
            search_selectors: SearchPageSelectors::default(),
            product_selectors: ProductPageSelectors::default(),
        }
    }
}

/// CSS selectors for search result pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchPageSelectors {
    /// Primary result link; the first match anchors the listing
    pub result_link: Vec<String>,

    /// Enclosing result container, matched while ascending from the link
    pub result_container: Vec<String>,

    /// Heading label inside the container
    pub title: Vec<String>,

    /// Candidate blocks for the format/price text
    pub price_block: Vec<String>,

    /// Marker for every search-result item on the page (diagnostic count)
    pub result_marker: Vec<String>,
}

impl Default for SearchPageSelectors {
    fn default() -> Self {
        Self {
            result_link: vec![
                "div[data-component-type='s-search-result'] h2 a".to_string(),
                "div[data-component-type='s-search-result'] a.a-link-normal[href*='/dp/']".to_string(),
                "a.a-link-normal.s-underline-text".to_string(),
                "a[href*='/dp/']".to_string(),
            ],
            result_container: vec![
                "div[data-component-type='s-search-result']".to_string(),
                "div.s-result-item[data-asin]".to_string(),
                "div[data-asin]".to_string(),
            ],
            title: vec![
                "h2 a span".to_string(),
                "h2 span.a-text-normal".to_string(),
                "h2 span".to_string(),
                "h2".to_string(),
            ],
            price_block: vec![
                "div.puis-price-instructions-style".to_string(),
                "div.a-section".to_string(),
                "div".to_string(),
            ],
            result_marker: vec!["[data-component-type='s-search-result']".to_string()],
        }
    }
}

/// CSS selectors for product detail pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductPageSelectors {
    /// Fixed swatch container holding every format offer
    pub swatch_container: Vec<String>,

    /// Individual swatch entries inside the container
    pub swatch_item: Vec<String>,

    /// Product title
    pub title: Vec<String>,

    /// Hidden identifier input, used when the page URL lacks a product segment
    pub identifier_input: Vec<String>,
}

impl Default for ProductPageSelectors {
    fn default() -> Self {
        Self {
            swatch_container: vec![
                "div#tmmSwatches".to_string(),
                "#tmm-grid-swatch-container".to_string(),
            ],
            swatch_item: vec!["div[role='listitem']".to_string(), "li.swatchElement".to_string()],
            title: vec![
                "span#productTitle".to_string(),
                "#title span".to_string(),
                "h1".to_string(),
            ],
            identifier_input: vec!["input[name='ASIN']".to_string(), "input#ASIN".to_string()],
        }
    }
}
