//! Listing locators for search result pages and product detail pages
//!
//! A locator only fails as a whole when its anchor element is missing; every
//! other field degrades to `None` on its own.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::config::{ProductPageSelectors, SearchPageSelectors};
use super::{ListingLocator, ParseContext, ParsingError, ParsingResult};
use crate::domain::{BookFormat, Identifier, ListingDescriptor};

/// Finds the first organic result on a search page.
pub struct SearchResultLocator {
    result_link: Vec<Selector>,
    result_container: Vec<Selector>,
    title: Vec<Selector>,
    price_block: Vec<Selector>,
    result_marker: Vec<Selector>,
}

impl SearchResultLocator {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&SearchPageSelectors::default())
    }

    pub fn with_config(selectors: &SearchPageSelectors) -> ParsingResult<Self> {
        Ok(Self {
            result_link: compile_selectors("result_link", &selectors.result_link)?,
            result_container: compile_selectors("result_container", &selectors.result_container)?,
            title: compile_selectors("title", &selectors.title)?,
            price_block: compile_selectors("price_block", &selectors.price_block)?,
            result_marker: compile_selectors("result_marker", &selectors.result_marker)?,
        })
    }

    /// Nearest ancestor of `anchor` matching a container selector.
    fn enclosing_container<'a>(&self, anchor: ElementRef<'a>) -> Option<ElementRef<'a>> {
        anchor
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| self.result_container.iter().any(|s| s.matches(el)))
    }

    /// First descendant block whose text mentions any format label.
    fn price_block_text(&self, container: ElementRef<'_>) -> Option<String> {
        self.price_block.iter().find_map(|selector| {
            container
                .select(selector)
                .map(|el| inner_text(&el))
                .find(|text| BookFormat::ALL.iter().any(|f| f.is_mentioned_in(text)))
        })
    }

    fn count_results(&self, html: &Html) -> Option<u32> {
        let count = self
            .result_marker
            .iter()
            .map(|s| html.select(s).count())
            .find(|&n| n > 0)
            .unwrap_or(0);
        u32::try_from(count).ok()
    }
}

impl ListingLocator for SearchResultLocator {
    fn locate_listing(&self, html: &Html, context: &ParseContext) -> Option<ListingDescriptor> {
        let Some(anchor) = first_match(html.root_element(), &self.result_link) else {
            debug!("No result link found on search page");
            return None;
        };

        let Some(container) = self.enclosing_container(anchor) else {
            debug!("Result link has no enclosing result container");
            return None;
        };

        let url = anchor.value().attr("href").and_then(|href| context.resolve(href));
        let identifier = url.as_deref().and_then(Identifier::from_product_url);
        if identifier.is_none() {
            debug!("Result URL carries no product identifier: {:?}", url);
        }

        Some(ListingDescriptor {
            title: first_text(container, &self.title),
            url,
            identifier,
            price_block_text: self.price_block_text(container),
            price_segments: Vec::new(),
            listing_count: self.count_results(html),
        })
    }
}

/// Reads the fixed format-swatch container of a product page.
pub struct ProductSwatchLocator {
    swatch_container: Vec<Selector>,
    swatch_item: Vec<Selector>,
    title: Vec<Selector>,
    identifier_input: Vec<Selector>,
}

impl ProductSwatchLocator {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ProductPageSelectors::default())
    }

    pub fn with_config(selectors: &ProductPageSelectors) -> ParsingResult<Self> {
        Ok(Self {
            swatch_container: compile_selectors("swatch_container", &selectors.swatch_container)?,
            swatch_item: compile_selectors("swatch_item", &selectors.swatch_item)?,
            title: compile_selectors("title", &selectors.title)?,
            identifier_input: compile_selectors("identifier_input", &selectors.identifier_input)?,
        })
    }

    fn swatch_segments(&self, container: ElementRef<'_>) -> Vec<String> {
        self.swatch_item
            .iter()
            .map(|selector| {
                container
                    .select(selector)
                    .map(|el| inner_text(&el))
                    .filter(|text| !text.is_empty())
                    .collect::<Vec<_>>()
            })
            .find(|segments| !segments.is_empty())
            .unwrap_or_default()
    }

    fn identifier_from_input(&self, html: &Html) -> Option<Identifier> {
        self.identifier_input.iter().find_map(|selector| {
            html.select(selector)
                .filter_map(|el| el.value().attr("value"))
                .find_map(Identifier::new)
        })
    }
}

impl ListingLocator for ProductSwatchLocator {
    fn locate_listing(&self, html: &Html, context: &ParseContext) -> Option<ListingDescriptor> {
        let root = html.root_element();
        let Some(container) = first_match(root, &self.swatch_container) else {
            debug!("No format swatch container on product page {:?}", context.page_url);
            return None;
        };

        let url = context.page_url.clone();
        let identifier = url
            .as_deref()
            .and_then(Identifier::from_product_url)
            .or_else(|| self.identifier_from_input(html));

        let block = inner_text(&container);
        Some(ListingDescriptor {
            title: first_text(root, &self.title),
            url,
            identifier,
            price_block_text: Some(block).filter(|t| !t.is_empty()),
            price_segments: self.swatch_segments(container),
            listing_count: None,
        })
    }
}

/// Compile a fallback list, skipping (and logging) entries that do not parse.
fn compile_selectors(field: &str, selector_strings: &[String]) -> ParsingResult<Vec<Selector>> {
    let mut selectors = Vec::new();
    let mut errors = Vec::new();

    for selector_str in selector_strings {
        match Selector::parse(selector_str) {
            Ok(selector) => selectors.push(selector),
            Err(e) => {
                warn!("Failed to compile {} selector '{}': {}", field, selector_str, e);
                errors.push(
                    ParsingError::invalid_selector(selector_str, &e.to_string()).to_string(),
                );
            }
        }
    }

    if selectors.is_empty() {
        return Err(ParsingError::no_valid_selectors(field, &errors));
    }
    Ok(selectors)
}

fn first_match<'a>(scope: ElementRef<'a>, selectors: &[Selector]) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|s| scope.select(s).next())
}

fn first_text(scope: ElementRef<'_>, selectors: &[Selector]) -> Option<String> {
    selectors.iter().find_map(|selector| {
        scope
            .select(selector)
            .map(|el| inner_text(&el))
            .find(|text| !text.is_empty())
    })
}

/// Rendered-ish text: text nodes trimmed and joined by single spaces.
fn inner_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    const SEARCH_PAGE: &str = r##"
        <html><body>
          <div data-component-type="s-search-result" data-asin="B000123456">
            <div class="a-section">
              <h2><a class="a-link-normal" href="/Some-Book/dp/B000123456/ref=sr_1_1"><span>Some Book</span></a></h2>
              <div class="a-section a-spacing-none">
                <div class="a-row"><a href="#">Paperback</a></div>
                <div class="a-row"><span class="a-offscreen">$12.50</span></div>
                <div class="a-row"><a href="#">Kindle</a> <span>$9.99</span></div>
              </div>
            </div>
          </div>
          <div data-component-type="s-search-result" data-asin="B000999999">
            <h2><a href="/Other/dp/B000999999"><span>Other</span></a></h2>
          </div>
        </body></html>
    "##;

    fn context() -> ParseContext {
        ParseContext::new(Url::parse("https://www.amazon.com").unwrap())
    }

    #[test]
    fn test_search_locator_extracts_first_result() {
        let locator = SearchResultLocator::new().unwrap();
        let html = Html::parse_document(SEARCH_PAGE);

        let listing = locator.locate_listing(&html, &context()).expect("listing");
        assert_eq!(listing.title.as_deref(), Some("Some Book"));
        assert_eq!(
            listing.url.as_deref(),
            Some("https://www.amazon.com/Some-Book/dp/B000123456/ref=sr_1_1")
        );
        assert_eq!(listing.identifier.as_ref().map(Identifier::as_str), Some("B000123456"));
        assert_eq!(listing.listing_count, Some(2));

        let block = listing.price_block_text.expect("price block");
        assert!(block.contains("Paperback"));
        assert!(block.contains("$9.99"));
    }

    #[test]
    fn test_search_locator_without_results() {
        let locator = SearchResultLocator::new().unwrap();
        let html = Html::parse_document("<html><body><p>No results</p></body></html>");
        assert!(locator.locate_listing(&html, &context()).is_none());
    }

    #[test]
    fn test_search_locator_link_outside_container() {
        let locator = SearchResultLocator::new().unwrap();
        let html = Html::parse_document(r#"<p><a href="/x/dp/B1">orphan</a></p>"#);
        assert!(locator.locate_listing(&html, &context()).is_none());
    }

    #[test]
    fn test_search_locator_degrades_missing_fields() {
        let locator = SearchResultLocator::new().unwrap();
        let html = Html::parse_document(
            r#"<div data-asin="X">
                <a class="a-link-normal s-underline-text" href="/help/page">Help</a>
            </div>"#,
        );
        let listing = locator.locate_listing(&html, &context()).expect("listing");
        assert_eq!(listing.title, None);
        assert_eq!(listing.identifier, None);
        assert_eq!(listing.price_block_text, None);
        assert_eq!(listing.listing_count, Some(0));
    }

    #[test]
    fn test_product_locator_reads_swatches() {
        let locator = ProductSwatchLocator::new().unwrap();
        let html = Html::parse_document(
            r#"<html><body>
                <span id="productTitle"> Some Book </span>
                <div id="tmmSwatches">
                  <div role="listitem"><span>Kindle</span><span>$9.99</span></div>
                  <div role="listitem"><span>Hardcover</span><span>$24.00</span></div>
                </div>
            </body></html>"#,
        );
        let ctx = context().with_page_url("https://www.amazon.com/dp/B000123456");

        let listing = locator.locate_listing(&html, &ctx).expect("listing");
        assert_eq!(listing.title.as_deref(), Some("Some Book"));
        assert_eq!(listing.identifier.as_ref().map(Identifier::as_str), Some("B000123456"));
        assert_eq!(listing.price_segments, vec!["Kindle $9.99", "Hardcover $24.00"]);
        assert_eq!(listing.price_block_text.as_deref(), Some("Kindle $9.99 Hardcover $24.00"));
        assert_eq!(listing.listing_count, None);
    }

    #[test]
    fn test_product_locator_identifier_from_hidden_input() {
        let locator = ProductSwatchLocator::new().unwrap();
        let html = Html::parse_document(
            r#"<input type="hidden" name="ASIN" value="B0ABCDEF12">
            <div id="tmmSwatches">Paperback $5.00</div>"#,
        );
        let ctx = context().with_page_url("https://www.amazon.com/gp/product-redirect");
        let listing = locator.locate_listing(&html, &ctx).expect("listing");
        assert_eq!(listing.identifier.as_ref().map(Identifier::as_str), Some("B0ABCDEF12"));
        assert!(listing.price_segments.is_empty());
    }

    #[test]
    fn test_product_locator_without_swatches() {
        let locator = ProductSwatchLocator::new().unwrap();
        let html = Html::parse_document(r#"<span id="productTitle">Book</span>"#);
        assert!(locator.locate_listing(&html, &context()).is_none());
    }

    #[test]
    fn test_invalid_selectors_are_rejected() {
        let selectors = SearchPageSelectors {
            result_link: vec!["[[[".to_string()],
            ..SearchPageSelectors::default()
        };
        assert!(matches!(
            SearchResultLocator::with_config(&selectors),
            Err(ParsingError::NoValidSelectors { .. })
        ));
    }
}
