//! Category-tree traversal and product link collection
//!
//! Category pages are visited in FIFO order from a single worklist. Pages that
//! carry nested sub-categories push those onto the back of the same worklist.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{select_links, PageSelectors};
use scraper::Html;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// What a single category page contributed to the traversal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPage {
    /// Nested category URLs to visit later
    pub subcategories: Vec<String>,
    /// Product page URLs found in listing rows
    pub products: Vec<String>,
}

/// Totals gathered while walking the category tree
#[derive(Debug, Clone, Default)]
pub struct TraversalOutcome {
    /// Product URLs in discovery order, not deduplicated
    pub product_links: Vec<String>,
    /// Category pages fetched successfully
    pub pages_fetched: usize,
    /// Category pages skipped after a failed fetch
    pub fetch_failures: usize,
}

/// Classifies a category page and extracts its links
///
/// A page carrying the second-level marker yields its nested categories, and
/// yields products only if the listing marker is also present. A page that
/// has sub-category markers but no listing therefore contributes no products.
/// Pages without the second-level marker are treated as plain listings.
pub fn parse_category_page(html: &str, origin: &Url, selectors: &PageSelectors) -> CategoryPage {
    let document = Html::parse_document(html);

    if html.contains(&selectors.level2_marker) {
        let subcategories = select_links(&document, &selectors.category_level2, origin);
        let products = if html.contains(&selectors.listing_marker) {
            select_links(&document, &selectors.listing_link, origin)
        } else {
            Vec::new()
        };
        CategoryPage {
            subcategories,
            products,
        }
    } else {
        CategoryPage {
            subcategories: Vec::new(),
            products: select_links(&document, &selectors.listing_link, origin),
        }
    }
}

/// Walks the category tree starting from `seeds`
///
/// With `revisit` set, a category URL is fetched every time it is queued;
/// otherwise each URL is fetched at most once per run.
pub async fn collect_product_links(
    fetcher: &Fetcher,
    seeds: Vec<String>,
    origin: &Url,
    selectors: &PageSelectors,
    revisit: bool,
) -> TraversalOutcome {
    let mut worklist: VecDeque<String> = seeds.into();
    let mut visited: HashSet<String> = HashSet::new();
    let mut outcome = TraversalOutcome::default();

    while let Some(url) = worklist.pop_front() {
        if !revisit && !visited.insert(url.clone()) {
            tracing::debug!("Category {} already visited", url);
            continue;
        }

        tracing::debug!("Fetching category {}", url);
        let Some(body) = fetcher.fetch(&url).await.into_body() else {
            outcome.fetch_failures += 1;
            continue;
        };
        outcome.pages_fetched += 1;

        let page = parse_category_page(&body, origin, selectors);
        if !page.subcategories.is_empty() {
            tracing::debug!("{} queued {} sub-categories", url, page.subcategories.len());
        }
        worklist.extend(page.subcategories);
        outcome.product_links.extend(page.products);

        if outcome.pages_fetched % 50 == 0 {
            tracing::info!(
                "Progress: {} category pages, {} queued, {} product links",
                outcome.pages_fetched,
                worklist.len(),
                outcome.product_links.len()
            );
        }
    }

    tracing::info!(
        "Category traversal finished: {} pages, {} product links",
        outcome.pages_fetched,
        outcome.product_links.len()
    );
    outcome
}
