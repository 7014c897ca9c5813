use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for the scraper
///
/// Every section falls back to the hozmaster.ru defaults, so an empty file
/// (or no file at all) describes a complete crawl.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub fetch: FetchConfig,
    pub selectors: SelectorConfig,
    pub crawl: CrawlConfig,
    pub export: ExportConfig,
}

/// Target site location
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Origin every relative link is resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the catalog root page, relative to the origin
    #[serde(rename = "catalog-path")]
    pub catalog_path: String,
}

impl SiteConfig {
    /// Full URL of the catalog root page
    pub fn catalog_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.catalog_path)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.hozmaster.ru".to_string(),
            catalog_path: "/products/".to_string(),
        }
    }
}

/// HTTP fetch and retry policy
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-attempt request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Total number of attempts per URL
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Pause between failed attempts (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 50,
            max_attempts: 3,
            retry_delay_ms: 2000,
            user_agent: format!("hozmaster-scraper/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// CSS selectors and raw-markup markers describing the site layout
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Second-level category anchors
    #[serde(rename = "category-level2")]
    pub category_level2: String,

    /// First-level category anchors
    #[serde(rename = "category-level1")]
    pub category_level1: String,

    /// Substring whose presence marks a page with nested sub-categories
    #[serde(rename = "level2-marker")]
    pub level2_marker: String,

    /// Substring whose presence marks a page with a product listing
    #[serde(rename = "listing-marker")]
    pub listing_marker: String,

    /// Product anchors inside listing rows
    #[serde(rename = "listing-link")]
    pub listing_link: String,

    /// Product price block
    pub price: String,

    /// Product code (article) block
    #[serde(rename = "product-code")]
    pub product_code: String,

    /// Product name headings
    #[serde(rename = "product-name")]
    pub product_name: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            category_level2: "div a.cat2level".to_string(),
            category_level1: "div.cat1level a".to_string(),
            level2_marker: "cat2level".to_string(),
            listing_marker: "listnu".to_string(),
            listing_link: "td a.listnu".to_string(),
            price: "div.productprice".to_string(),
            product_code: "div.productcode".to_string(),
            product_name: "div.production td h2".to_string(),
        }
    }
}

/// Traversal and extraction behavior
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Fetch a category URL again every time it is referenced
    #[serde(rename = "revisit-categories")]
    pub revisit_categories: bool,

    /// Abort the run when a product page lacks an expected field
    #[serde(rename = "strict-extraction")]
    pub strict_extraction: bool,
}

/// Spreadsheet output and the constant columns written on every row
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output file; the extension (.xlsx or .csv) selects the format
    pub path: String,

    #[serde(rename = "sheet-name")]
    pub sheet_name: String,

    #[serde(rename = "competitor-code")]
    pub competitor_code: String,

    #[serde(rename = "competitor-name")]
    pub competitor_name: String,

    #[serde(rename = "price-type")]
    pub price_type: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            path: "Выгрузка цен.xlsx".to_string(),
            sheet_name: "Лист 1".to_string(),
            competitor_code: "01-01046949".to_string(),
            competitor_name: "Хозмастер".to_string(),
            price_type: "Цена Хозмастер Барнаул".to_string(),
        }
    }
}
