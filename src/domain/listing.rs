//! Listing value objects shared by the parsers and the reconciler.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

use super::format::BookFormat;

/// Canonical product-path segment: `/dp/<identifier>`.
static PRODUCT_PATH_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/dp/([A-Za-z0-9]+)").expect("product path pattern"));

/// Opaque alphanumeric token naming one product across search and detail pages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Accepts only non-empty ASCII alphanumeric tokens.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    /// Parse the identifier out of a product URL's `/dp/` segment.
    pub fn from_product_url(url: &str) -> Option<Self> {
        PRODUCT_PATH_SEGMENT
            .captures(url)
            .and_then(|caps| caps.get(1))
            .and_then(|m| Self::new(m.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Monetary amount in its boundary form, e.g. `"$12.34"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Price(String);

impl Price {
    /// Build from the digits captured after the currency symbol.
    pub fn from_captured_digits(digits: &str) -> Self {
        Self(format!("${}", digits.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Format → price. A missing key means the format was not offered or not parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceMapping {
    prices: BTreeMap<BookFormat, Price>,
}

impl PriceMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, format: BookFormat) -> Option<&Price> {
        self.prices.get(&format)
    }

    pub fn set(&mut self, format: BookFormat, price: Option<Price>) {
        match price {
            Some(price) => {
                self.prices.insert(format, price);
            }
            None => {
                self.prices.remove(&format);
            }
        }
    }

    /// Every format in column order, absent ones included.
    pub fn entries(&self) -> impl Iterator<Item = (BookFormat, Option<&Price>)> + '_ {
        BookFormat::ALL.into_iter().map(|format| (format, self.get(format)))
    }

    pub fn resolved_count(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Which kind of page an observation was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSource {
    SearchPage,
    ProductPage,
}

impl fmt::Display for PageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SearchPage => f.write_str("search"),
            Self::ProductPage => f.write_str("product"),
        }
    }
}

/// Raw fields located on a page, before price extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingDescriptor {
    pub title: Option<String>,
    pub url: Option<String>,
    pub identifier: Option<Identifier>,
    pub price_block_text: Option<String>,
    /// Per-swatch texts on product pages; empty on search pages.
    pub price_segments: Vec<String>,
    pub listing_count: Option<u32>,
}

/// One page visit's view of a product. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub source: PageSource,
    pub title: Option<String>,
    pub url: Option<String>,
    pub identifier: Option<Identifier>,
    pub prices: PriceMapping,
    pub listing_count: Option<u32>,
}

impl Observation {
    pub fn from_descriptor(
        source: PageSource,
        descriptor: ListingDescriptor,
        prices: PriceMapping,
    ) -> Self {
        Self {
            source,
            title: descriptor.title,
            url: descriptor.url,
            identifier: descriptor.identifier,
            prices,
            listing_count: descriptor.listing_count,
        }
    }
}
