//! Turns fetched pages into observations
//!
//! Each call parses the document, locates the listing and extracts the
//! per-format prices. The parsed document never outlives the call, so none
//! of this is held across an await point.

use scraper::Html;
use tracing::debug;
use url::Url;

use crate::domain::{ListingDescriptor, Observation, PageSource};
use crate::infrastructure::page_provider::FetchedPage;
use crate::infrastructure::parsing::{
    ListingLocator, ListingParsers, ParseContext, ParsingConfig, ParsingResult,
};

pub struct ObservationService {
    parsers: ListingParsers,
    origin: Url,
}

impl ObservationService {
    pub fn new(parsers: ListingParsers, origin: Url) -> Self {
        Self { parsers, origin }
    }

    pub fn from_config(config: &ParsingConfig, origin: Url) -> ParsingResult<Self> {
        Ok(Self::new(ListingParsers::from_config(config)?, origin))
    }

    /// `None` when the search page has no result anchor.
    pub fn observe_search_page(&self, page: &FetchedPage) -> Option<Observation> {
        let descriptor = self.locate(&self.parsers.search, page)?;
        let prices = self
            .parsers
            .extractor
            .extract_all_prices(descriptor.price_block_text.as_deref());

        debug!(
            "Search observation: title={:?}, identifier={:?}, {} price(s)",
            descriptor.title,
            descriptor.identifier,
            prices.resolved_count()
        );
        Some(Observation::from_descriptor(PageSource::SearchPage, descriptor, prices))
    }

    /// `None` when the product page has no format swatch container.
    pub fn observe_product_page(&self, page: &FetchedPage) -> Option<Observation> {
        let descriptor = self.locate(&self.parsers.product, page)?;
        let prices = self.parsers.extractor.extract_from_segments(
            &descriptor.price_segments,
            descriptor.price_block_text.as_deref(),
        );

        debug!(
            "Product observation: identifier={:?}, {} price(s)",
            descriptor.identifier,
            prices.resolved_count()
        );
        Some(Observation::from_descriptor(PageSource::ProductPage, descriptor, prices))
    }

    fn locate(
        &self,
        locator: &dyn ListingLocator,
        page: &FetchedPage,
    ) -> Option<ListingDescriptor> {
        let html = Html::parse_document(&page.body);
        let context = ParseContext::new(self.origin.clone()).with_page_url(page.final_url.as_str());
        locator.locate_listing(&html, &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookFormat, Identifier, Price};

    fn service() -> ObservationService {
        let origin = Url::parse("https://www.amazon.com").unwrap();
        ObservationService::from_config(&ParsingConfig::default(), origin).unwrap()
    }

    fn page(url: &str, body: &str) -> FetchedPage {
        FetchedPage {
            final_url: url.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_search_page_observation() {
        let body = r#"<html><body>
            <div data-component-type="s-search-result" data-asin="B0TEST0001">
              <h2><a href="/Some-Book/dp/B0TEST0001/ref=sr_1_1"><span>Some Book</span></a></h2>
              <div class="puis-price-instructions-style">
                Kindle <span>$9.99</span> Paperback <span>$14.50</span>
              </div>
            </div>
        </body></html>"#;

        let observation = service()
            .observe_search_page(&page("https://www.amazon.com/s?k=some+book", body))
            .expect("listing");

        assert_eq!(observation.source, PageSource::SearchPage);
        assert_eq!(observation.title.as_deref(), Some("Some Book"));
        assert_eq!(observation.identifier, Identifier::new("B0TEST0001"));
        assert_eq!(observation.prices.get(BookFormat::Kindle).map(Price::as_str), Some("$9.99"));
        assert_eq!(
            observation.prices.get(BookFormat::Paperback).map(Price::as_str),
            Some("$14.50")
        );
        assert!(observation.prices.get(BookFormat::Hardcover).is_none());
    }

    #[test]
    fn test_search_page_without_results() {
        let body = "<html><body><p>No results for your search.</p></body></html>";
        assert!(
            service()
                .observe_search_page(&page("https://www.amazon.com/s?k=nothing", body))
                .is_none()
        );
    }

    #[test]
    fn test_product_page_observation() {
        let body = r#"<html><body>
            <span id="productTitle"> Some Book </span>
            <div id="tmmSwatches">
              <div role="listitem"><span>Kindle</span><span>$7.99</span></div>
              <div role="listitem"><span>Hardcover</span><span>$24.00</span></div>
            </div>
        </body></html>"#;

        let observation = service()
            .observe_product_page(&page("https://www.amazon.com/dp/B0TEST0001", body))
            .expect("swatches");

        assert_eq!(observation.source, PageSource::ProductPage);
        assert_eq!(observation.identifier, Identifier::new("B0TEST0001"));
        assert_eq!(observation.prices.get(BookFormat::Kindle).map(Price::as_str), Some("$7.99"));
        assert_eq!(
            observation.prices.get(BookFormat::Hardcover).map(Price::as_str),
            Some("$24.00")
        );
        assert_eq!(observation.listing_count, None);
    }
}
