//! Configuration module for the scraper
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Missing sections and keys fall back to the hozmaster.ru defaults.
//!
//! # Example
//!
//! ```no_run
//! use hozmaster_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("hozmaster.toml")).unwrap();
//! println!("Catalog root: {}", config.site.catalog_url());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, ExportConfig, FetchConfig, SelectorConfig, SiteConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
