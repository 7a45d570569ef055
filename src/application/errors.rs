//! Per-item outcomes
//!
//! Parsing-level absence never shows up here; these are the reasons a whole
//! item produces no record. None of them stops the run.

use thiserror::Error;

use crate::domain::Identifier;
use crate::infrastructure::FetchError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("Search observation has no identifier")]
    MissingSearchIdentifier,

    #[error("Product page identifier {product} does not match search identifier {search}")]
    IdentifierMismatch { search: Identifier, product: Identifier },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("Row has no value in navigation column '{column}'")]
    MissingNavigationTarget { column: String },

    #[error("Search page fetch failed: {0}")]
    SearchFetchFailed(#[source] FetchError),

    #[error("No listing found on search page {url}")]
    ListingNotFound { url: String },

    #[error("Listing has no product identifier (url: {url:?})")]
    MissingIdentifier { url: Option<String> },

    #[error("No format swatches on product page for {identifier}")]
    ProductListingNotFound { identifier: Identifier },

    #[error("Product page fetch failed for {identifier}: {source}")]
    ProductFetchFailed {
        identifier: Identifier,
        #[source]
        source: FetchError,
    },

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

impl SkipReason {
    /// Fetch-level failures, as opposed to "nothing to extract".
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::SearchFetchFailed(_) | Self::ProductFetchFailed { .. })
    }

    /// Identifier involved, when one had been discovered.
    pub fn identifier(&self) -> Option<&Identifier> {
        match self {
            Self::ProductFetchFailed { identifier, .. }
            | Self::ProductListingNotFound { identifier } => Some(identifier),
            Self::Reconcile(ReconcileError::IdentifierMismatch { search, .. }) => Some(search),
            _ => None,
        }
    }
}
