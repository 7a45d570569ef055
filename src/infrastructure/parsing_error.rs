//! Parsing error types
//!
//! Locating fields on a page never fails: a missing element degrades to an
//! absent value. These errors only surface while building a parser or
//! locator from configuration.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("No valid selectors compiled for '{field}'. Errors: {errors}")]
    NoValidSelectors { field: String, errors: String },

    #[error("Invalid site origin: {origin} - {reason}")]
    InvalidOrigin { origin: String, reason: String },

    #[error("Price window must be at least {minimum} characters, got {actual}")]
    WindowTooSmall { minimum: usize, actual: usize },
}

impl ParsingError {
    pub fn invalid_selector(selector: &str, reason: &str) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn no_valid_selectors(field: &str, errors: &[String]) -> Self {
        Self::NoValidSelectors {
            field: field.to_string(),
            errors: errors.join(", "),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
