//! Page-content provider
//!
//! The item processor only needs "give me the ready markup behind this URL".
//! [`HttpPageProvider`] does that over plain HTTP with a rotating user
//! agent, a request-rate ceiling and a fixed settle delay.

use anyhow::{Context, Result};
use async_trait::async_trait;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, direct::NotKeyed},
};
use reqwest::{
    Client,
    header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT},
};
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::infrastructure::config::ScrapingConfig;

/// Markers of the marketplace's robot-check interstitial.
const BLOCKED_PAGE_MARKERS: &[&str] =
    &["validatecaptcha", "robot check", "/errors/validatecaptcha"];

/// Markup behind one navigation, with the URL it was finally served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub final_url: String,
    pub body: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Navigation to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("Navigation to {url} failed with status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Request to {url} was answered with a robot check")]
    Blocked { url: String },

    #[error("Page {url} never became ready ({length} bytes received)")]
    NotReady { url: String, length: usize },

    #[error("Navigation to {url} failed: {message}")]
    Transport { url: String, message: String },
}

/// Supplies ready-to-query page markup for a navigation target.
#[async_trait]
pub trait PageContentProvider: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// HTTP implementation of [`PageContentProvider`]
pub struct HttpPageProvider {
    client: Client,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    timeout_ms: u64,
    settle_delay: Duration,
    min_content_length: usize,
}

impl HttpPageProvider {
    pub fn new(config: &ScrapingConfig) -> Result<Self> {
        let user_agent = pick_user_agent(&config.user_agents).context("No user agent configured")?;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent).context("Invalid user agent")?,
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.locale).context("Invalid locale")?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );

        let client = Client::builder()
            .timeout(Duration::from_millis(config.navigation_timeout_ms))
            .default_headers(headers)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .build()
            .context("Failed to create HTTP client")?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.max_requests_per_second)
                .context("Rate limit must be greater than 0")?,
        );

        info!("HTTP page provider ready (user agent: {})", user_agent);
        Ok(Self {
            client,
            rate_limiter: RateLimiter::direct(quota),
            timeout_ms: config.navigation_timeout_ms,
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            min_content_length: config.min_content_length,
        })
    }

    fn transport_error(&self, url: &str, error: &reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                timeout_ms: self.timeout_ms,
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl PageContentProvider for HttpPageProvider {
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.rate_limiter.until_ready().await;
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let body = response.text().await.map_err(|e| self.transport_error(url, &e))?;
        check_page_ready(url, &body, self.min_content_length)?;

        tokio::time::sleep(self.settle_delay).await;
        debug!("Fetched {} ({} bytes, final URL {})", url, body.len(), final_url);

        Ok(FetchedPage { final_url, body })
    }
}

fn pick_user_agent(pool: &[String]) -> Option<&str> {
    let candidates: Vec<&str> =
        pool.iter().map(|ua| ua.trim()).filter(|ua| !ua.is_empty()).collect();
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[fastrand::usize(..candidates.len())])
}

/// Content-ready signal: a real document body of at least `min_length` bytes
/// that is not the robot-check interstitial.
pub fn check_page_ready(url: &str, body: &str, min_length: usize) -> Result<(), FetchError> {
    let lowered = body.to_lowercase();
    if BLOCKED_PAGE_MARKERS.iter().any(|m| lowered.contains(m)) {
        return Err(FetchError::Blocked { url: url.to_string() });
    }
    if body.len() < min_length || !lowered.contains("<body") {
        return Err(FetchError::NotReady {
            url: url.to_string(),
            length: body.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_page_passes() {
        let body = format!("<html><body>{}</body></html>", "x".repeat(600));
        assert!(check_page_ready("https://x", &body, 512).is_ok());
    }

    #[test]
    fn test_short_or_bodyless_page_is_not_ready() {
        assert!(matches!(
            check_page_ready("https://x", "<html><body></body></html>", 512),
            Err(FetchError::NotReady { .. })
        ));
        let no_body = "x".repeat(1024);
        assert!(matches!(
            check_page_ready("https://x", &no_body, 512),
            Err(FetchError::NotReady { length: 1024, .. })
        ));
    }

    #[test]
    fn test_robot_check_is_blocked() {
        let body = r#"<html><body><form action="/errors/validateCaptcha"></form></body></html>"#;
        assert_eq!(
            check_page_ready("https://x", body, 0),
            Err(FetchError::Blocked { url: "https://x".to_string() })
        );
    }

    #[test]
    fn test_pick_user_agent_skips_blank_entries() {
        let pool = vec!["  ".to_string(), "Agent/1.0".to_string()];
        assert_eq!(pick_user_agent(&pool), Some("Agent/1.0"));
        assert_eq!(pick_user_agent(&[]), None);
    }

    #[test]
    fn test_provider_builds_from_defaults() {
        assert!(HttpPageProvider::new(&ScrapingConfig::default()).is_ok());
    }
}
