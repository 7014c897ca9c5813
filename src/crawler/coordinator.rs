//! Crawler coordinator - main crawl orchestration logic
//!
//! This module runs the pipeline stages in order:
//! - Category discovery on the catalog root
//! - Category-tree traversal and product link collection
//! - Product link deduplication
//! - Per-product field extraction
//! - Spreadsheet export

use crate::config::Config;
use crate::crawler::categories::collect_categories;
use crate::crawler::extractor::extract_products;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::links::collect_product_links;
use crate::crawler::parser::PageSelectors;
use crate::notify::{Notifier, TracingNotifier};
use crate::output::{export_records, CrawlStatistics};
use crate::ScraperError;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Main crawler coordinator structure
///
/// Owns the HTTP client for the whole run; every stage fetches through it one
/// URL at a time.
pub struct Coordinator {
    config: Config,
    fetcher: Fetcher,
    selectors: PageSelectors,
    origin: Url,
    notifier: Arc<dyn Notifier>,
}

impl Coordinator {
    /// Creates a coordinator that reports through the tracing log
    pub fn new(config: Config) -> Result<Self, ScraperError> {
        Self::with_notifier(config, Arc::new(TracingNotifier::new("hozmaster-scraper")))
    }

    /// Creates a coordinator with an injected notifier
    pub fn with_notifier(config: Config, notifier: Arc<dyn Notifier>) -> Result<Self, ScraperError> {
        let fetcher = Fetcher::from_config(&config.fetch)?;
        let selectors = PageSelectors::compile(&config.selectors)?;
        let origin = Url::parse(&config.site.base_url)?;

        Ok(Self {
            config,
            fetcher,
            selectors,
            origin,
            notifier,
        })
    }

    /// Runs the full pipeline and writes the export file
    pub async fn run(&self) -> Result<CrawlStatistics, ScraperError> {
        self.notifier.send("Parsing started");

        match self.run_pipeline().await {
            Ok(stats) => {
                self.notifier.send(&format!(
                    "Parsing finished: {} products exported in {:.0} s",
                    stats.records,
                    stats.elapsed.as_secs_f64()
                ));
                Ok(stats)
            }
            Err(e) => {
                self.notifier.send(&format!("Parsing failed: {}", e));
                Err(e)
            }
        }
    }

    async fn run_pipeline(&self) -> Result<CrawlStatistics, ScraperError> {
        let start_time = Instant::now();
        let mut stats = CrawlStatistics::default();

        let catalog_url = self.config.site.catalog_url();
        tracing::info!("Collecting categories from {}", catalog_url);
        let categories =
            collect_categories(&self.fetcher, &catalog_url, &self.origin, &self.selectors).await;
        stats.root_categories = categories.len();

        tracing::info!("Traversing {} categories", categories.len());
        let traversal = collect_product_links(
            &self.fetcher,
            categories,
            &self.origin,
            &self.selectors,
            self.config.crawl.revisit_categories,
        )
        .await;
        stats.category_pages = traversal.pages_fetched;
        stats.fetch_failures += traversal.fetch_failures;
        stats.product_links = traversal.product_links.len();

        let product_urls = dedup_preserving_order(traversal.product_links);
        stats.unique_products = product_urls.len();
        tracing::info!(
            "Extracting {} unique products ({} links found)",
            stats.unique_products,
            stats.product_links
        );

        let extraction = extract_products(
            &self.fetcher,
            &product_urls,
            &self.selectors,
            self.config.crawl.strict_extraction,
        )
        .await?;
        stats.fetch_failures += extraction.fetch_failures;
        stats.incomplete_records = extraction
            .records
            .iter()
            .filter(|r| !r.missing_fields().is_empty())
            .count();

        stats.records = export_records(&extraction.records, &self.config.export)?;
        stats.elapsed = start_time.elapsed();

        tracing::info!(
            "Crawl completed: {} records in {:?}",
            stats.records,
            stats.elapsed
        );
        Ok(stats)
    }
}

/// Removes repeated URLs, keeping the first occurrence of each
pub fn dedup_preserving_order(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(urls.len());
    urls.into_iter().filter(|url| seen.insert(url.clone())).collect()
}
