//! Listing extraction infrastructure
//!
//! raw page → [`ListingLocator`] → price block text → [`FormatPriceExtractor`]
//! → [`PriceMapping`](crate::domain::PriceMapping).
//!
//! Every stage models "not found" as `None`; nothing in here returns an
//! error once it has been constructed.

pub mod config;
pub mod context;
pub mod error;
pub mod format_price_extractor;
pub mod listing_locator;
pub mod price_block_parser;

pub use self::config::{ParsingConfig, ProductPageSelectors, SearchPageSelectors};
pub use context::ParseContext;
pub use error::{ParsingError, ParsingResult};
pub use format_price_extractor::{FormatPriceExtractor, extract_all_prices};
pub use listing_locator::{ProductSwatchLocator, SearchResultLocator};
pub use price_block_parser::{FormatMention, PriceBlockParser, extract_price_for_format};

use scraper::Html;

use crate::domain::ListingDescriptor;

/// Finds the one listing a page is about.
pub trait ListingLocator {
    /// `None` when the page has no anchor element for a listing.
    fn locate_listing(&self, html: &Html, context: &ParseContext) -> Option<ListingDescriptor>;
}

/// Locators and extractor built once from configuration.
pub struct ListingParsers {
    pub search: SearchResultLocator,
    pub product: ProductSwatchLocator,
    pub extractor: FormatPriceExtractor,
}

impl ListingParsers {
    pub fn from_config(config: &ParsingConfig) -> ParsingResult<Self> {
        Ok(Self {
            search: SearchResultLocator::with_config(&config.search_selectors)?,
            product: ProductSwatchLocator::with_config(&config.product_selectors)?,
            extractor: FormatPriceExtractor::new(PriceBlockParser::new(config.price_window_chars)?),
        })
    }
}
