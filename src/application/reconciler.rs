//! Reconciler
//!
//! Places the search-page and product-page observations side by side with
//! the input row they came from. Prices are never combined; the two views are
//! reported as observed.

use tracing::debug;

use super::errors::ReconcileError;
use crate::domain::{InputRow, Observation, OutputRecord};

/// Merge one item's observations into its output record.
///
/// A product observation without an identifier did not resolve the product
/// and is dropped, leaving the product namespace absent. A product identifier
/// that disagrees with the search identifier is an error.
pub fn reconcile(
    search: Observation,
    product: Option<Observation>,
    input: InputRow,
) -> Result<OutputRecord, ReconcileError> {
    let search_id = search
        .identifier
        .clone()
        .ok_or(ReconcileError::MissingSearchIdentifier)?;

    let product = match product {
        Some(observation) => match &observation.identifier {
            Some(product_id) if *product_id == search_id => Some(observation),
            Some(product_id) => {
                return Err(ReconcileError::IdentifierMismatch {
                    search: search_id,
                    product: product_id.clone(),
                });
            }
            None => {
                debug!("Product observation for {} has no identifier; omitting it", search_id);
                None
            }
        },
        None => None,
    };

    Ok(OutputRecord { input, search, product })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookFormat, Identifier, PageSource, Price, PriceMapping};

    fn observation(source: PageSource, id: Option<&str>, kindle: Option<&str>) -> Observation {
        let mut prices = PriceMapping::new();
        prices.set(BookFormat::Kindle, kindle.map(Price::from_captured_digits));
        Observation {
            source,
            title: Some("Some Book".to_string()),
            url: id.map(|id| format!("https://www.amazon.com/dp/{id}")),
            identifier: id.and_then(Identifier::new),
            prices,
            listing_count: None,
        }
    }

    #[test]
    fn test_side_by_side_prices_are_not_combined() {
        let search = observation(PageSource::SearchPage, Some("B000123456"), Some("9.99"));
        let product = observation(PageSource::ProductPage, Some("B000123456"), Some("7.99"));

        let record = reconcile(search, Some(product), InputRow::default()).unwrap();
        assert_eq!(record.search.prices.get(BookFormat::Kindle).map(Price::as_str), Some("$9.99"));
        let product = record.product.expect("product namespace");
        assert_eq!(product.prices.get(BookFormat::Kindle).map(Price::as_str), Some("$7.99"));
    }

    #[test]
    fn test_product_without_identifier_leaves_namespace_absent() {
        let search = observation(PageSource::SearchPage, Some("B000123456"), Some("9.99"));
        let product = observation(PageSource::ProductPage, None, None);
        let input = InputRow::from_pairs([("TITLE", "Some Book")]);

        let record = reconcile(search.clone(), Some(product), input.clone()).unwrap();
        assert_eq!(record.search, search);
        assert_eq!(record.input, input);
        assert!(record.product.is_none());
    }

    #[test]
    fn test_missing_search_identifier_is_rejected() {
        let search = observation(PageSource::SearchPage, None, None);
        assert_eq!(
            reconcile(search, None, InputRow::default()),
            Err(ReconcileError::MissingSearchIdentifier)
        );
    }

    #[test]
    fn test_identifier_mismatch_is_rejected() {
        let search = observation(PageSource::SearchPage, Some("B000123456"), None);
        let product = observation(PageSource::ProductPage, Some("B000999999"), None);
        assert!(matches!(
            reconcile(search, Some(product), InputRow::default()),
            Err(ReconcileError::IdentifierMismatch { .. })
        ));
    }
}
