//! Parsing context for listing extraction
//!
//! Carries what a locator needs to know about the page beyond its markup.

use url::Url;

/// Context information for locating a listing on one page
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// Site origin for resolving relative links
    pub origin: Url,

    /// URL the page was finally served from, after redirects
    pub page_url: Option<String>,
}

impl ParseContext {
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            page_url: None,
        }
    }

    pub fn with_page_url(mut self, page_url: impl Into<String>) -> Self {
        self.page_url = Some(page_url.into());
        self
    }

    /// Resolve `href` against the origin; `None` when it cannot form a valid URL.
    pub fn resolve(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        self.origin.join(href).ok().map(String::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ParseContext {
        ParseContext::new(Url::parse("https://example.com").unwrap())
    }

    #[test]
    fn test_url_resolution() {
        let ctx = context();
        assert_eq!(ctx.resolve("/dp/B123").as_deref(), Some("https://example.com/dp/B123"));
        assert_eq!(
            ctx.resolve("https://other.com/test").as_deref(),
            Some("https://other.com/test")
        );
        assert_eq!(
            ctx.resolve("relative/path").as_deref(),
            Some("https://example.com/relative/path")
        );
        assert_eq!(ctx.resolve("   "), None);
    }

    #[test]
    fn test_with_page_url() {
        let ctx = context().with_page_url("https://example.com/dp/B1");
        assert_eq!(ctx.page_url.as_deref(), Some("https://example.com/dp/B1"));
    }
}
