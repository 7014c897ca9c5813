//! Product page field extraction
//!
//! Each product page becomes one [`ProductRecord`] keyed by its URL. Fields
//! the page does not provide stay `None` instead of shifting other rows.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{all_texts, first_text, PageSelectors};
use crate::ScraperError;
use scraper::Html;

/// Fields extracted from one product page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductRecord {
    /// Product page URL
    pub url: String,

    /// Competitor article (SKU) code
    pub article: Option<String>,

    /// Display name
    pub name: Option<String>,

    /// Price with a decimal comma, e.g. `1 234,50`
    pub price: Option<String>,
}

impl ProductRecord {
    /// Names of the fields this record is missing
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.price.is_none() {
            missing.push("price");
        }
        if self.article.is_none() {
            missing.push("article");
        }
        if self.name.is_none() {
            missing.push("name");
        }
        missing
    }
}

/// Records produced by the extraction stage
#[derive(Debug, Clone, Default)]
pub struct ExtractionOutcome {
    pub records: Vec<ProductRecord>,
    /// Product pages skipped after a failed fetch
    pub fetch_failures: usize,
}

/// Fetches every product page and extracts its fields
///
/// Pages that fail to fetch are skipped. In strict mode a page missing any
/// field aborts the run.
pub async fn extract_products(
    fetcher: &Fetcher,
    product_urls: &[String],
    selectors: &PageSelectors,
    strict: bool,
) -> Result<ExtractionOutcome, ScraperError> {
    let mut outcome = ExtractionOutcome::default();

    for (index, url) in product_urls.iter().enumerate() {
        tracing::debug!("Product {}/{}: {}", index + 1, product_urls.len(), url);

        let Some(body) = fetcher.fetch(url).await.into_body() else {
            outcome.fetch_failures += 1;
            continue;
        };

        let record = parse_product_page(&body, url, selectors);
        let missing = record.missing_fields();
        if !missing.is_empty() {
            if strict {
                return Err(ScraperError::Extraction {
                    url: url.clone(),
                    message: format!("missing {}", missing.join(", ")),
                });
            }
            tracing::warn!("{} is missing {}", url, missing.join(", "));
        }
        outcome.records.push(record);

        if (index + 1) % 100 == 0 {
            tracing::info!("Progress: {} of {} products", index + 1, product_urls.len());
        }
    }

    Ok(outcome)
}

/// Extracts price, article and name from product page markup
pub fn parse_product_page(html: &str, url: &str, selectors: &PageSelectors) -> ProductRecord {
    let document = Html::parse_document(html);

    let price = first_text(&document, &selectors.price).and_then(|text| parse_price(&text));
    let article = first_text(&document, &selectors.product_code).and_then(|text| parse_article(&text));

    let headings = all_texts(&document, &selectors.product_name);
    if headings.len() > 1 {
        tracing::warn!(
            "{} has {} name headings, using the first",
            url,
            headings.len()
        );
    }
    let name = headings
        .into_iter()
        .next()
        .map(|heading| heading.trim().to_string())
        .filter(|heading| !heading.is_empty());

    ProductRecord {
        url: url.to_string(),
        article,
        name,
        price,
    }
}

/// Extracts the amount from a price block and switches to a decimal comma
///
/// The block is split on tabs and the first tab-separated token that starts
/// with a digit (after leading whitespace) holds the price, so labels such as
/// `Цена:` before a tab are skipped. Within that token the amount runs over
/// digits, single spaces (or no-break spaces) between digit groups and at most
/// one decimal separator; the currency after it is dropped.
///
/// ```
/// use hozmaster_scraper::crawler::parse_price;
///
/// assert_eq!(parse_price("1 234.50\tруб").as_deref(), Some("1 234,50"));
/// assert_eq!(parse_price("\t\t\t349.00 руб.").as_deref(), Some("349,00"));
/// assert_eq!(parse_price("Цена:\t1234.50 руб.").as_deref(), Some("1234,50"));
/// ```
pub fn parse_price(text: &str) -> Option<String> {
    let token = text
        .split('\t')
        .map(str::trim_start)
        .find(|token| token.starts_with(|c: char| c.is_ascii_digit()))?;

    Some(leading_amount(token))
}

/// Collects the numeric run at the start of `token`, using a decimal comma
fn leading_amount(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let mut amount = String::new();
    let mut seen_separator = false;

    for (i, &c) in chars.iter().enumerate() {
        let next_is_digit = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
        let prev_is_digit = amount.chars().last().is_some_and(|p| p.is_ascii_digit());

        if c.is_ascii_digit() {
            amount.push(c);
        } else if (c == ' ' || c == '\u{a0}') && prev_is_digit && next_is_digit && !seen_separator {
            amount.push(c);
        } else if (c == '.' || c == ',') && prev_is_digit && next_is_digit && !seen_separator {
            seen_separator = true;
            amount.push(',');
        } else {
            break;
        }
    }

    amount
}

/// Extracts the article code from a product code block
///
/// The code is the second space-separated token, cut at the first tab:
/// `"Код: 12345\tшт"` gives `12345`.
pub fn parse_article(text: &str) -> Option<String> {
    text.split(' ')
        .nth(1)
        .and_then(|token| token.split('\t').next())
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
}
