//! Crawler module for catalog traversal and product extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Category discovery on the catalog root
//! - Category-tree traversal and product link collection
//! - Product field extraction
//! - Overall pipeline coordination

mod categories;
mod coordinator;
mod extractor;
mod fetcher;
mod links;
mod parser;

pub use categories::{collect_categories, extract_categories};
pub use coordinator::{dedup_preserving_order, Coordinator};
pub use extractor::{
    extract_products, parse_article, parse_price, parse_product_page, ExtractionOutcome,
    ProductRecord,
};
pub use fetcher::{
    build_http_client, classify_error, retry_with_policy, AttemptError, FetchResult, FetchedPage,
    Fetcher, RetryPolicy,
};
pub use links::{collect_product_links, parse_category_page, CategoryPage, TraversalOutcome};
pub use parser::{compile_selector, resolve_link, PageSelectors};
