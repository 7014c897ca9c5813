//! Category discovery from the catalog root page

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{select_links, PageSelectors};
use scraper::Html;
use url::Url;

/// Fetches the catalog root and returns every category URL on it
///
/// Second-level categories come first, then first-level ones. Duplicates are
/// kept. A failed root fetch yields an empty list.
pub async fn collect_categories(
    fetcher: &Fetcher,
    catalog_url: &str,
    origin: &Url,
    selectors: &PageSelectors,
) -> Vec<String> {
    let Some(body) = fetcher.fetch(catalog_url).await.into_body() else {
        tracing::warn!("Catalog root {} could not be fetched", catalog_url);
        return Vec::new();
    };

    let categories = extract_categories(&body, origin, selectors);
    tracing::info!("Found {} categories on {}", categories.len(), catalog_url);
    categories
}

/// Extracts second-level then first-level category links from root markup
pub fn extract_categories(html: &str, origin: &Url, selectors: &PageSelectors) -> Vec<String> {
    let document = Html::parse_document(html);

    let mut links = select_links(&document, &selectors.category_level2, origin);
    links.extend(select_links(&document, &selectors.category_level1, origin));
    links
}
