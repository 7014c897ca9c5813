//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a miniature catalog and run the full
//! pipeline end-to-end, reading the written spreadsheet back.

use calamine::{open_workbook, Reader, Xlsx};
use hozmaster_scraper::config::{Config, FetchConfig, SiteConfig};
use hozmaster_scraper::crawler::{Coordinator, FetchResult, Fetcher};
use hozmaster_scraper::notify::NullNotifier;
use hozmaster_scraper::output::HEADERS;
use hozmaster_scraper::ScraperError;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, export_path: &Path) -> Config {
    let mut config = Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            catalog_path: "/products/".to_string(),
        },
        fetch: FetchConfig {
            timeout_secs: 5,
            max_attempts: 3,
            retry_delay_ms: 10, // Very short for testing
            user_agent: "TestBot/1.0".to_string(),
        },
        ..Default::default()
    };
    config.export.path = export_path.to_string_lossy().into_owned();
    config
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

fn product_page(name: &str, code: &str, price: &str) -> String {
    format!(
        r#"<html><body>
        <div class="production"><table><tr><td><h2>{}</h2></td></tr></table></div>
        <div class="productcode">Код: {}	шт</div>
        <div class="productprice">{}	руб</div>
        </body></html>"#,
        name, code, price
    )
}

fn read_sheet(path: &Path) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("Failed to open workbook");
    let range = workbook
        .worksheet_range("Лист 1")
        .expect("Sheet 'Лист 1' missing");
    range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

async fn run(config: Config) -> Result<hozmaster_scraper::CrawlStatistics, ScraperError> {
    Coordinator::with_notifier(config, Arc::new(NullNotifier))
        .expect("Failed to create coordinator")
        .run()
        .await
}

#[tokio::test]
async fn test_full_crawl_exports_products() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let export_path = dir.path().join("prices.xlsx");

    // Root: one second-level and one first-level category
    mount_page(
        &server,
        "/products/",
        r#"<html><body>
        <div><a class="cat2level" href="/products/tools/">Tools</a></div>
        <div class="cat1level"><a href="/products/garden/">Garden</a></div>
        </body></html>"#,
    )
    .await;

    // Category with nested sub-categories but no listing: contributes no products
    mount_page(
        &server,
        "/products/tools/",
        r#"<html><body>
        <div><a class="cat2level" href="/products/tools/hammers/">Hammers</a></div>
        <table><tr><td><a href="/item/ignored">not a listing row</a></td></tr></table>
        </body></html>"#,
    )
    .await;

    mount_page(
        &server,
        "/products/garden/",
        r#"<table><tr><td><a class="listnu" href="/item/shovel">Shovel</a></td></tr></table>"#,
    )
    .await;

    mount_page(
        &server,
        "/products/tools/hammers/",
        r#"<table>
        <tr><td><a class="listnu" href="/item/hammer">Hammer</a></td></tr>
        <tr><td><a class="listnu" href="/item/shovel">Shovel again</a></td></tr>
        </table>"#,
    )
    .await;

    mount_page(&server, "/item/shovel", &product_page("Лопата", "555", "1 234.50")).await;
    mount_page(&server, "/item/hammer", &product_page("Молоток", "777", "349.00")).await;

    let config = create_test_config(&server.uri(), &export_path);
    let stats = run(config).await.expect("Crawl failed");

    assert_eq!(stats.root_categories, 2);
    assert_eq!(stats.category_pages, 3);
    assert_eq!(stats.product_links, 3);
    assert_eq!(stats.unique_products, 2);
    assert_eq!(stats.records, 2);
    assert_eq!(stats.fetch_failures, 0);

    let rows = read_sheet(&export_path);
    assert_eq!(rows.len(), 3, "header plus two data rows");
    assert_eq!(rows[0], HEADERS.iter().map(|h| h.to_string()).collect::<Vec<_>>());

    // The garden listing is visited before the nested hammers category
    let base = server.uri();
    assert_eq!(
        rows[1],
        vec![
            "01-01046949".to_string(),
            "Хозмастер".to_string(),
            "555".to_string(),
            "Лопата".to_string(),
            "Цена Хозмастер Барнаул".to_string(),
            "1 234,50".to_string(),
            format!("{}/item/shovel", base),
        ]
    );
    assert_eq!(rows[2][2], "777");
    assert_eq!(rows[2][5], "349,00");
    assert_eq!(rows[2][6], format!("{}/item/hammer", base));

    // Constant columns are identical on every data row
    for col in [0, 1, 4] {
        assert_eq!(rows[1][col], rows[2][col]);
    }
}

#[tokio::test]
async fn test_root_failure_exports_empty_sheet() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let export_path = dir.path().join("prices.xlsx");

    Mock::given(method("GET"))
        .and(path("/products/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), &export_path);
    let stats = run(config).await.expect("Root failure must not abort the run");

    assert_eq!(stats.root_categories, 0);
    assert_eq!(stats.records, 0);

    let rows = read_sheet(&export_path);
    assert_eq!(rows.len(), 1, "header only");
    assert_eq!(rows[0][0], "Код конкурента");
}

#[tokio::test]
async fn test_failed_product_page_is_skipped() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let export_path = dir.path().join("prices.csv");

    mount_page(
        &server,
        "/products/",
        r#"<div class="cat1level"><a href="/products/paint/">Paint</a></div>"#,
    )
    .await;
    mount_page(
        &server,
        "/products/paint/",
        r#"<table>
        <tr><td><a class="listnu" href="/item/gone">Gone</a></td></tr>
        <tr><td><a class="listnu" href="/item/brush">Brush</a></td></tr>
        </table>"#,
    )
    .await;
    mount_page(&server, "/item/brush", &product_page("Кисть", "101", "59.90")).await;

    Mock::given(method("GET"))
        .and(path("/item/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), &export_path);
    let stats = run(config).await.expect("Crawl failed");

    assert_eq!(stats.unique_products, 2);
    assert_eq!(stats.records, 1);
    assert_eq!(stats.fetch_failures, 1);

    let mut reader = csv::Reader::from_path(&export_path).unwrap();
    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(&records[0][2], "101");
    assert_eq!(&records[0][3], "Кисть");
    assert_eq!(&records[0][5], "59,90");
}

#[tokio::test]
async fn test_cyclic_categories_terminate() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let export_path = dir.path().join("prices.xlsx");

    mount_page(
        &server,
        "/products/",
        r#"<div><a class="cat2level" href="/products/a/">A</a></div>"#,
    )
    .await;

    // A and B reference each other
    Mock::given(method("GET"))
        .and(path("/products/a/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div><a class="cat2level" href="/products/b/">B</a></div>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/b/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div><a class="cat2level" href="/products/a/">A</a></div>
            <table><tr><td><a class="listnu" href="/item/1">One</a></td></tr></table>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/item/1", &product_page("Ведро", "1", "100.00")).await;

    let config = create_test_config(&server.uri(), &export_path);
    let stats = run(config).await.expect("Crawl failed");

    assert_eq!(stats.category_pages, 2);
    assert_eq!(stats.records, 1);
}

/// Serves a root that lists the same category twice and expects that
/// category page to be fetched `category_fetches` times
async fn mount_repeated_category(server: &MockServer, category_fetches: u64) {
    mount_page(
        server,
        "/products/",
        r#"<div><a class="cat2level" href="/products/paint/">Paint</a></div>
        <div class="cat1level"><a href="/products/paint/">Paint</a></div>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/products/paint/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<table><tr><td><a class="listnu" href="/item/paint">Paint</a></td></tr></table>"#,
        ))
        .expect(category_fetches)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/item/paint"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(product_page("Краска", "42", "510.00")),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_repeated_category_fetched_once_by_default() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let export_path = dir.path().join("prices.xlsx");
    mount_repeated_category(&server, 1).await;

    let config = create_test_config(&server.uri(), &export_path);
    let stats = run(config).await.expect("Crawl failed");

    assert_eq!(stats.root_categories, 2);
    assert_eq!(stats.category_pages, 1);
    assert_eq!(stats.product_links, 1);
    assert_eq!(stats.records, 1);
}

#[tokio::test]
async fn test_revisit_categories_refetches_repeated_category() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let export_path = dir.path().join("prices.xlsx");
    mount_repeated_category(&server, 2).await;

    let mut config = create_test_config(&server.uri(), &export_path);
    config.crawl.revisit_categories = true;
    let stats = run(config).await.expect("Crawl failed");

    assert_eq!(stats.category_pages, 2);
    // Both visits yield the link; product URLs are still fetched once
    assert_eq!(stats.product_links, 2);
    assert_eq!(stats.unique_products, 1);
    assert_eq!(stats.records, 1);

    let rows = read_sheet(&export_path);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][5], "510,00");
}

#[tokio::test]
async fn test_strict_extraction_aborts_on_missing_field() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let export_path = dir.path().join("prices.xlsx");

    mount_page(
        &server,
        "/products/",
        r#"<div class="cat1level"><a href="/products/misc/">Misc</a></div>"#,
    )
    .await;
    mount_page(
        &server,
        "/products/misc/",
        r#"<table><tr><td><a class="listnu" href="/item/odd">Odd</a></td></tr></table>"#,
    )
    .await;
    mount_page(&server, "/item/odd", "<html><body><p>layout changed</p></body></html>").await;

    let mut config = create_test_config(&server.uri(), &export_path);
    config.crawl.strict_extraction = true;

    let result = run(config).await;

    assert!(matches!(result, Err(ScraperError::Extraction { .. })));
    assert!(!export_path.exists());
}

#[tokio::test]
async fn test_unreachable_export_directory_is_fatal() {
    let server = MockServer::start().await;
    mount_page(&server, "/products/", "<html></html>").await;

    let config = create_test_config(
        &server.uri(),
        Path::new("/nonexistent-share/Выгрузки/prices.xlsx"),
    );

    let result = run(config).await;
    assert!(matches!(result, Err(ScraperError::Export(_))));
}

#[tokio::test]
async fn test_fetcher_retries_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let config = FetchConfig {
        retry_delay_ms: 10,
        ..Default::default()
    };
    let fetcher = Fetcher::from_config(&config).unwrap();

    let result = fetcher.fetch(&format!("{}/flaky", server.uri())).await;

    assert!(matches!(result, FetchResult::Failed { attempts: 3, .. }));
}

#[tokio::test]
async fn test_fetcher_does_not_retry_invalid_url() {
    let fetcher = Fetcher::from_config(&FetchConfig::default()).unwrap();

    let result = fetcher.fetch("not a url").await;

    assert!(matches!(result, FetchResult::Failed { attempts: 1, .. }));
}
