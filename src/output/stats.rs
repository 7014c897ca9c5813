//! Run statistics
//!
//! Counters gathered while the pipeline runs, printed when the job finishes.

use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Category URLs found on the catalog root page
    pub root_categories: usize,

    /// Category pages fetched during traversal
    pub category_pages: usize,

    /// Product links found, before deduplication
    pub product_links: usize,

    /// Unique product URLs after deduplication
    pub unique_products: usize,

    /// Product records extracted
    pub records: usize,

    /// Records with at least one missing field
    pub incomplete_records: usize,

    /// URLs skipped because every fetch attempt failed
    pub fetch_failures: usize,

    /// Wall-clock time of the whole run
    pub elapsed: Duration,
}

impl CrawlStatistics {
    /// Share of unique product URLs that produced a record
    pub fn success_rate(&self) -> f64 {
        if self.unique_products == 0 {
            0.0
        } else {
            (self.records as f64 / self.unique_products as f64) * 100.0
        }
    }
}

/// Prints statistics to stdout in a human-readable format
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Root categories: {}", stats.root_categories);
    println!("Category pages fetched: {}", stats.category_pages);
    println!(
        "Product links: {} ({} unique)",
        stats.product_links, stats.unique_products
    );
    println!("Records exported: {}", stats.records);
    if stats.incomplete_records > 0 {
        println!("Incomplete records: {}", stats.incomplete_records);
    }
    println!("Fetch failures: {}", stats.fetch_failures);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} products extracted)",
        stats.success_rate(),
        stats.records,
        stats.unique_products
    );
    println!("Elapsed: {:.2}s", stats.elapsed.as_secs_f64());
}
