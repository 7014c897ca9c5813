//! Hozmaster scraper entry point
//!
//! Runs the full catalog crawl and writes the price export. With no arguments
//! the built-in hozmaster.ru configuration is used.

use anyhow::Context;
use clap::Parser;
use hozmaster_scraper::config::{load_config_with_hash, validate, Config};
use hozmaster_scraper::crawler::Coordinator;
use hozmaster_scraper::notify::TracingNotifier;
use hozmaster_scraper::output::print_statistics;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Hozmaster price scraper
///
/// Crawls the hozmaster.ru catalog, extracts article codes, names and prices
/// of every product and exports them to a spreadsheet.
#[derive(Parser, Debug)]
#[command(name = "hozmaster-scraper")]
#[command(version)]
#[command(about = "Hozmaster catalog price scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print the effective configuration without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let start = Instant::now();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            let config = Config::default();
            validate(&config).context("built-in configuration is invalid")?;
            config
        }
    };

    if cli.dry_run {
        print_config(&config);
        return Ok(());
    }

    let notifier = Arc::new(TracingNotifier::new("Парсинг_Хозмастер"));
    let coordinator = Coordinator::with_notifier(config, notifier)?;

    match coordinator.run().await {
        Ok(stats) => {
            println!("Parsing finished");
            print_statistics(&stats);
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            println!("Elapsed: {:.2}s", start.elapsed().as_secs_f64());
            return Err(e.into());
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hozmaster_scraper=info,warn"),
            1 => EnvFilter::new("hozmaster_scraper=debug,info"),
            2 => EnvFilter::new("hozmaster_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --dry-run: shows what would be crawled and where it would be written
fn print_config(config: &Config) {
    println!("=== Hozmaster Scraper Dry Run ===\n");

    println!("Site:");
    println!("  Catalog root: {}", config.site.catalog_url());

    println!("\nFetching:");
    println!("  Timeout: {}s", config.fetch.timeout_secs);
    println!("  Attempts per URL: {}", config.fetch.max_attempts);
    println!("  Retry delay: {}ms", config.fetch.retry_delay_ms);
    println!("  User agent: {}", config.fetch.user_agent);

    println!("\nSelectors:");
    println!("  Second-level categories: {}", config.selectors.category_level2);
    println!("  First-level categories: {}", config.selectors.category_level1);
    println!("  Listing links: {}", config.selectors.listing_link);
    println!("  Price: {}", config.selectors.price);
    println!("  Product code: {}", config.selectors.product_code);
    println!("  Product name: {}", config.selectors.product_name);

    println!("\nCrawl:");
    println!("  Revisit categories: {}", config.crawl.revisit_categories);
    println!("  Strict extraction: {}", config.crawl.strict_extraction);

    println!("\nExport:");
    println!("  Path: {}", config.export.path);
    println!("  Sheet: {}", config.export.sheet_name);
    println!(
        "  Constants: {} / {} / {}",
        config.export.competitor_code, config.export.competitor_name, config.export.price_type
    );

    println!("\n✓ Configuration is valid");
}
