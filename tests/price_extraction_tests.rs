//! Price extraction over realistic and generated text blocks
use listing_scout::domain::{BookFormat, Identifier, Price, PriceMapping};
use listing_scout::infrastructure::parsing::{
    PriceBlockParser, extract_all_prices, extract_price_for_format,
};
use proptest::prelude::*;
use rstest::rstest;

fn price_of(mapping: &PriceMapping, format: BookFormat) -> Option<&str> {
    mapping.get(format).map(Price::as_str)
}

#[rstest]
#[case("Paperback $12.50 Hardcover $20.00 Kindle $9.99", "paperback", Some("$12.50"))]
#[case("Paperback $12.50 Hardcover $20.00 Kindle $9.99", "hardcover", Some("$20.00"))]
#[case("Paperback $12.50 Hardcover $20.00 Kindle $9.99", "kindle", Some("$9.99"))]
#[case("Paperback $12.50 Hardcover $20.00 Kindle $9.99", "audiobook", None)]
#[case("paperback format B price coming, hardcover $19.99", "paperback", None)]
#[case("paperback format B price coming, hardcover $19.99", "hardcover", Some("$19.99"))]
#[case("kindle edition unavailable", "kindle", None)]
#[case("KINDLE Edition $ 4.99", "Kindle", Some("$4.99"))]
#[case("Hardcover $1,249.00 list price", "hardcover", Some("$1,249.00"))]
#[case("Audiobook $0.00 Free with Audible trial", "audiobook", Some("$0.00"))]
#[case("Kindle $9.99 and again Kindle $1.99", "kindle", Some("$9.99"))]
#[case("Paperback $12", "paperback", None)]
fn extracts_price_for_requested_format(
    #[case] text: &str,
    #[case] format: &str,
    #[case] expected: Option<&str>,
) {
    let price = extract_price_for_format(text, format);
    assert_eq!(price.as_ref().map(Price::as_str), expected);
}

#[test]
fn end_to_end_block_yields_full_mapping() {
    let mapping = extract_all_prices(Some("Paperback $12.50 Hardcover $20.00 Kindle $9.99"));
    assert_eq!(price_of(&mapping, BookFormat::Paperback), Some("$12.50"));
    assert_eq!(price_of(&mapping, BookFormat::Hardcover), Some("$20.00"));
    assert_eq!(price_of(&mapping, BookFormat::Kindle), Some("$9.99"));
    assert_eq!(price_of(&mapping, BookFormat::Audiobook), None);
}

#[rstest]
#[case(None)]
#[case(Some(""))]
#[case(Some("   "))]
fn degenerate_text_yields_empty_mapping(#[case] text: Option<&str>) {
    let mapping = extract_all_prices(text);
    assert!(mapping.is_empty());
    assert_eq!(mapping.entries().count(), BookFormat::ALL.len());
}

#[test]
fn price_beyond_window_is_ignored() {
    let parser = PriceBlockParser::new(20).unwrap();
    let text = format!("Kindle {} $3.99", "-".repeat(40));
    assert_eq!(parser.extract_price_for_format(&text, "kindle"), None);

    let wide = PriceBlockParser::new(100).unwrap();
    assert_eq!(
        wide.extract_price_for_format(&text, "kindle").as_ref().map(Price::as_str),
        Some("$3.99")
    );
}

#[test]
fn scan_reports_mentions_in_text_order() {
    let mentions = PriceBlockParser::default().scan("Kindle $9.99 Paperback $12.50");
    let formats: Vec<_> = mentions.iter().map(|m| m.format).collect();
    assert_eq!(formats, vec![BookFormat::Kindle, BookFormat::Paperback]);
    assert!(mentions.iter().all(|m| m.price.is_some()));
}

#[rstest]
#[case("https://site.example/dp/B000123456/ref=xyz", Some("B000123456"))]
#[case("https://www.amazon.com/Some-Title/dp/0143127748", Some("0143127748"))]
#[case("https://site.example/gp/product/B000123456", None)]
#[case("not a url", None)]
fn identifier_from_url(#[case] url: &str, #[case] expected: Option<&str>) {
    assert_eq!(Identifier::from_product_url(url).as_ref().map(Identifier::as_str), expected);
}

fn block_text() -> impl Strategy<Value = String> {
    let token = prop_oneof![
        Just("Paperback".to_string()),
        Just("hardcover".to_string()),
        Just("KINDLE".to_string()),
        Just("Audiobook".to_string()),
        Just("edition".to_string()),
        Just("from".to_string()),
        "\\$[0-9]{1,3}\\.[0-9]{2}",
        "[a-z]{1,8}",
    ];
    prop::collection::vec(token, 0..16).prop_map(|tokens| tokens.join(" "))
}

proptest! {
    #[test]
    fn price_only_when_label_occurs(text in block_text()) {
        let lowered = text.to_lowercase();
        for format in BookFormat::ALL {
            if extract_price_for_format(&text, format.label()).is_some() {
                prop_assert!(lowered.contains(format.label()));
            }
        }
    }

    #[test]
    fn extraction_is_idempotent(text in block_text()) {
        prop_assert_eq!(extract_all_prices(Some(&text)), extract_all_prices(Some(&text)));
    }

    #[test]
    fn extracted_prices_are_normalized(text in block_text()) {
        let mapping = extract_all_prices(Some(&text));
        for (_, price) in mapping.entries() {
            if let Some(price) = price {
                prop_assert!(price.as_str().starts_with('$'));
                prop_assert!(!price.as_str().contains(' '));
            }
        }
    }
}
