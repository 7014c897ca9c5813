use crate::config::types::{Config, ExportConfig, FetchConfig, SelectorConfig, SiteConfig};
use crate::ConfigError;
use scraper::Selector;
use std::path::Path;
use url::Url;

/// Maximum sheet name length accepted by spreadsheet applications
const MAX_SHEET_NAME_LEN: usize = 31;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_fetch_config(&config.fetch)?;
    validate_selector_config(&config.selectors)?;
    validate_export_config(&config.export)?;
    Ok(())
}

fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            config.base_url
        )));
    }

    if !config.catalog_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "catalog-path must start with '/', got '{}'",
            config.catalog_path
        )));
    }

    Ok(())
}

fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be > 0".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    for (key, css) in [
        ("category-level2", &config.category_level2),
        ("category-level1", &config.category_level1),
        ("listing-link", &config.listing_link),
        ("price", &config.price),
        ("product-code", &config.product_code),
        ("product-name", &config.product_name),
    ] {
        Selector::parse(css).map_err(|e| {
            ConfigError::InvalidSelector(format!("{} = '{}': {:?}", key, css, e))
        })?;
    }

    if config.level2_marker.is_empty() || config.listing_marker.is_empty() {
        return Err(ConfigError::Validation(
            "level2-marker and listing-marker cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_export_config(config: &ExportConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation("export path cannot be empty".to_string()));
    }

    let extension = Path::new(&config.path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    if !matches!(extension.as_deref(), Some("xlsx") | Some("csv")) {
        return Err(ConfigError::Validation(format!(
            "export path must end in .xlsx or .csv, got '{}'",
            config.path
        )));
    }

    let sheet_len = config.sheet_name.chars().count();
    if sheet_len == 0 || sheet_len > MAX_SHEET_NAME_LEN {
        return Err(ConfigError::Validation(format!(
            "sheet-name must be 1-{} characters, got '{}'",
            MAX_SHEET_NAME_LEN, config.sheet_name
        )));
    }

    Ok(())
}
