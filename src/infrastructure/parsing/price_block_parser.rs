//! Price-block parser
//!
//! Resolves the price belonging to one format label inside a block of free
//! text that interleaves several "format → price" mentions.
//!
//! The text is scanned, not parsed: after the first occurrence of the
//! requested label a bounded window is examined for the first monetary
//! amount and the first *other* format label. When that sibling label comes
//! first, the amount belongs to the sibling and the requested format has no
//! price.

use once_cell::sync::Lazy;
use regex::{Match, Regex};
use tracing::trace;

use super::{ParsingError, ParsingResult};
use crate::domain::{BookFormat, Price};
use crate::infrastructure::config::defaults;

/// Smallest window that can still hold one label gap plus one amount.
pub const MIN_PRICE_WINDOW_CHARS: usize = 16;

/// Currency symbol, optional whitespace, integer part, mandatory point, two or more decimals.
static PRICE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\s*(\d[\d,]*\.\d{2,})").expect("price pattern"));

/// Whole-word format labels, matched against lowercased text.
static FORMAT_LABEL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(paperback|hardcover|kindle|audiobook)\b").expect("format label pattern")
});

/// One format label found in a text block, with its resolved price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatMention {
    pub format: BookFormat,
    /// Byte offset of the first occurrence in the lowercased text
    pub offset: usize,
    pub price: Option<Price>,
}

/// Stateless window scanner; the window length is its only setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBlockParser {
    window_chars: usize,
}

impl Default for PriceBlockParser {
    fn default() -> Self {
        Self {
            window_chars: defaults::PRICE_WINDOW_CHARS,
        }
    }
}

impl PriceBlockParser {
    pub fn new(window_chars: usize) -> ParsingResult<Self> {
        if window_chars < MIN_PRICE_WINDOW_CHARS {
            return Err(ParsingError::WindowTooSmall {
                minimum: MIN_PRICE_WINDOW_CHARS,
                actual: window_chars,
            });
        }
        Ok(Self { window_chars })
    }

    pub fn window_chars(&self) -> usize {
        self.window_chars
    }

    /// Price for `format` in `text`, or `None` when the label is missing, no
    /// amount follows it inside the window, or a sibling label intervenes.
    pub fn extract_price_for_format(&self, text: &str, format: &str) -> Option<Price> {
        let needle = format.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        let haystack = text.to_lowercase();
        let label_start = haystack.find(&needle)?;
        let window = self.window_after(&haystack, label_start + needle.len());

        let captures = PRICE_PATTERN.captures(window)?;
        let amount = captures.get(0)?;
        let digits = captures.get(1)?;

        if let Some(sibling) = first_sibling_label(window, &needle) {
            if sibling.start() < amount.start() {
                trace!(
                    "'{}' price {} belongs to sibling '{}'",
                    needle,
                    amount.as_str(),
                    sibling.as_str()
                );
                return None;
            }
        }

        Some(Price::from_captured_digits(digits.as_str()))
    }

    /// Every format mentioned in `text`, ordered by first occurrence.
    pub fn scan(&self, text: &str) -> Vec<FormatMention> {
        let haystack = text.to_lowercase();
        let mut mentions: Vec<FormatMention> = BookFormat::ALL
            .into_iter()
            .filter_map(|format| {
                let offset = haystack.find(format.label())?;
                Some(FormatMention {
                    format,
                    offset,
                    price: self.extract_price_for_format(text, format.label()),
                })
            })
            .collect();
        mentions.sort_by_key(|m| m.offset);
        mentions
    }

    /// Up to `window_chars` characters of `haystack` starting at byte `start`.
    fn window_after<'a>(&self, haystack: &'a str, start: usize) -> &'a str {
        let rest = &haystack[start..];
        let end = rest
            .char_indices()
            .nth(self.window_chars)
            .map_or(rest.len(), |(idx, _)| idx);
        &rest[..end]
    }
}

/// First label in `window` that names a different format than `needle`.
fn first_sibling_label<'a>(window: &'a str, needle: &str) -> Option<Match<'a>> {
    FORMAT_LABEL_PATTERN
        .find_iter(window)
        .find(|m| !(m.as_str().contains(needle) || needle.contains(m.as_str())))
}

/// [`PriceBlockParser::extract_price_for_format`] with the default window.
pub fn extract_price_for_format(text: &str, format: &str) -> Option<Price> {
    PriceBlockParser::default().extract_price_for_format(text, format)
}
