//! Format-price extractor
//!
//! Runs the price-block parser once per format and collects the results.

use tracing::debug;

use super::price_block_parser::PriceBlockParser;
use crate::domain::{BookFormat, PriceMapping};

#[derive(Debug, Clone, Copy, Default)]
pub struct FormatPriceExtractor {
    parser: PriceBlockParser,
}

impl FormatPriceExtractor {
    pub fn new(parser: PriceBlockParser) -> Self {
        Self { parser }
    }

    /// Full format → price mapping for one text block.
    ///
    /// Empty or absent text yields an all-absent mapping.
    pub fn extract_all_prices(&self, text: Option<&str>) -> PriceMapping {
        let mut mapping = PriceMapping::new();
        let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
            return mapping;
        };

        for format in BookFormat::ALL {
            mapping.set(format, self.parser.extract_price_for_format(text, format.label()));
        }

        debug!(
            "Resolved {}/{} format prices from {} chars",
            mapping.resolved_count(),
            BookFormat::ALL.len(),
            text.chars().count()
        );
        mapping
    }

    /// Product-page variant: each format is resolved against the first
    /// segment that mentions it, falling back to `whole_text` for formats no
    /// segment mentions.
    pub fn extract_from_segments(
        &self,
        segments: &[String],
        whole_text: Option<&str>,
    ) -> PriceMapping {
        if segments.is_empty() {
            return self.extract_all_prices(whole_text);
        }

        let fallback = self.extract_all_prices(whole_text);
        let mut mapping = PriceMapping::new();
        for format in BookFormat::ALL {
            let price = match segments.iter().find(|s| format.is_mentioned_in(s)) {
                Some(segment) => self.parser.extract_price_for_format(segment, format.label()),
                None => fallback.get(format).cloned(),
            };
            mapping.set(format, price);
        }
        mapping
    }
}

/// [`FormatPriceExtractor::extract_all_prices`] with the default window.
pub fn extract_all_prices(text: Option<&str>) -> PriceMapping {
    FormatPriceExtractor::default().extract_all_prices(text)
}
