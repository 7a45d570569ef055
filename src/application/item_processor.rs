//! Per-item pipeline
//!
//! navigation target → search page → search observation → (pause) →
//! product page → product observation → reconciled record.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::errors::SkipReason;
use super::observation_service::ObservationService;
use super::pacing::Pacer;
use super::reconciler::reconcile;
use crate::domain::{InputRow, OutputRecord};
use crate::infrastructure::config::{AppConfig, ConfigError, ScrapingConfig};
use crate::infrastructure::page_provider::PageContentProvider;

pub struct ItemProcessor {
    provider: Arc<dyn PageContentProvider>,
    pacer: Arc<dyn Pacer>,
    observations: ObservationService,
    scraping: ScrapingConfig,
    navigation_column: String,
}

impl ItemProcessor {
    pub fn new(
        config: &AppConfig,
        provider: Arc<dyn PageContentProvider>,
        pacer: Arc<dyn Pacer>,
    ) -> Result<Self, ConfigError> {
        let observations = ObservationService::from_config(&config.parsing, config.site_origin()?)?;
        Ok(Self {
            provider,
            pacer,
            observations,
            scraping: config.scraping.clone(),
            navigation_column: config.io.navigation_column.clone(),
        })
    }

    pub fn navigation_column(&self) -> &str {
        &self.navigation_column
    }

    /// Run one input row through both pages.
    ///
    /// Every failure is reported as a [`SkipReason`]; the caller decides
    /// whether to continue.
    pub async fn process_item(&self, row: &InputRow) -> Result<OutputRecord, SkipReason> {
        let target = row
            .non_empty(&self.navigation_column)
            .ok_or_else(|| SkipReason::MissingNavigationTarget {
                column: self.navigation_column.clone(),
            })?;

        debug!("Fetching search page: {}", target);
        let search_page = self
            .provider
            .fetch_page(target)
            .await
            .map_err(SkipReason::SearchFetchFailed)?;

        let search = self
            .observations
            .observe_search_page(&search_page)
            .ok_or_else(|| SkipReason::ListingNotFound {
                url: search_page.final_url.clone(),
            })?;

        let Some(identifier) = search.identifier.clone() else {
            return Err(SkipReason::MissingIdentifier { url: search.url.clone() });
        };
        info!(
            "Found listing {} ({}), {} search price(s)",
            identifier,
            search.title.as_deref().unwrap_or("untitled"),
            search.prices.resolved_count()
        );

        if self.scraping.pause_before_product_page {
            self.pacer.pause().await;
        }

        let product_url = self.scraping.product_url(identifier.as_str());
        let product = match self.provider.fetch_page(&product_url).await {
            Ok(page) => match self.observations.observe_product_page(&page) {
                Some(product) => {
                    info!(
                        "{} page for {}: {} price(s)",
                        product.source,
                        identifier,
                        product.prices.resolved_count()
                    );
                    Some(product)
                }
                None if self.scraping.emit_search_only_on_product_failure => {
                    warn!("No format swatches for {}, keeping search data only", identifier);
                    None
                }
                None => return Err(SkipReason::ProductListingNotFound { identifier }),
            },
            Err(e) if self.scraping.emit_search_only_on_product_failure => {
                warn!("Product page for {} failed, keeping search data only: {}", identifier, e);
                None
            }
            Err(source) => return Err(SkipReason::ProductFetchFailed { identifier, source }),
        };

        Ok(reconcile(search, product, row.clone())?)
    }
}
