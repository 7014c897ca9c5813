//! HTML parsing helpers shared by the crawl stages
//!
//! This module handles:
//! - Compiling the configured CSS selectors once per run
//! - Extracting and resolving `href` values from matched anchors
//! - Collecting the text of matched elements

use crate::config::SelectorConfig;
use crate::ScraperError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Compiled selectors and markers describing the site layout
#[derive(Debug, Clone)]
pub struct PageSelectors {
    pub category_level2: Selector,
    pub category_level1: Selector,
    pub listing_link: Selector,
    pub price: Selector,
    pub product_code: Selector,
    pub product_name: Selector,
    pub level2_marker: String,
    pub listing_marker: String,
}

impl PageSelectors {
    /// Compiles every selector in the configuration
    pub fn compile(config: &SelectorConfig) -> Result<Self, ScraperError> {
        Ok(Self {
            category_level2: compile_selector(&config.category_level2)?,
            category_level1: compile_selector(&config.category_level1)?,
            listing_link: compile_selector(&config.listing_link)?,
            price: compile_selector(&config.price)?,
            product_code: compile_selector(&config.product_code)?,
            product_name: compile_selector(&config.product_name)?,
            level2_marker: config.level2_marker.clone(),
            listing_marker: config.listing_marker.clone(),
        })
    }
}

/// Parses a single CSS selector
pub fn compile_selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::Selector {
        selector: css.to_string(),
        message: format!("{:?}", e),
    })
}

/// Collects the resolved `href` of every element matching `selector`
///
/// Elements without an `href`, or whose `href` cannot be resolved against
/// `base_url`, are skipped. Document order is preserved.
pub fn select_links(document: &Html, selector: &Selector, base_url: &Url) -> Vec<String> {
    document
        .select(selector)
        .filter_map(|element| {
            let href = element.value().attr("href");
            if href.is_none() {
                tracing::debug!("Skipping anchor without href");
            }
            href.and_then(|href| resolve_link(href, base_url))
        })
        .collect()
}

/// Returns the full text content of the first element matching `selector`
pub fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document.select(selector).next().map(element_text)
}

/// Returns the full text content of every element matching `selector`
pub fn all_texts(document: &Html, selector: &Selector) -> Vec<String> {
    document.select(selector).map(element_text).collect()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be excluded:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel: schemes
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:") || href.starts_with("mailto:") || href.starts_with("tel:") {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
