//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client shared by every stage of a run
//! - GET requests to fetch page content
//! - Fixed-count retry with a fixed delay for transient failures
//! - Error classification

use crate::config::FetchConfig;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

/// Result of a fetch operation
///
/// A failed fetch is a value, not an error: callers skip the URL and move on.
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Page body content
        body: String,
    },

    /// Every attempt failed, or a non-retryable error stopped the loop
    Failed {
        /// Description of the last error
        error: String,
        /// Number of attempts made
        attempts: u32,
    },
}

impl FetchResult {
    /// Returns the page body, or `None` if the fetch failed
    pub fn into_body(self) -> Option<String> {
        match self {
            FetchResult::Success { body } => Some(body),
            FetchResult::Failed { .. } => None,
        }
    }
}

/// Classification of a single failed attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
    /// Timeout, connection, status or transport failure; worth another try
    Retryable(String),
    /// Anything else; retrying would not help
    Fatal(String),
}

/// Page returned by one successful attempt
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    pub status_code: u16,
    pub body: String,
}

/// Retry budget applied to every URL
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Pause between consecutive failed attempts
    pub delay: Duration,
}

impl From<&FetchConfig> for RetryPolicy {
    fn from(config: &FetchConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            delay: config.retry_delay(),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// The client is created once per run and reused for every request.
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches URLs one at a time through a shared client
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Builds the client from configuration
    pub fn from_config(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?, RetryPolicy::from(config)))
    }

    /// Fetches a URL, retrying transient failures
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | Timeout | Retry after fixed delay |
    /// | Connection error | Retry after fixed delay |
    /// | HTTP 4xx/5xx | Retry after fixed delay |
    /// | Redirect / body read error | Retry after fixed delay |
    /// | Request build error (bad URL) | Stop immediately |
    /// | Body decode error | Stop immediately |
    pub async fn fetch(&self, url: &str) -> FetchResult {
        let client = &self.client;
        retry_with_policy(&self.policy, url, || fetch_once(client, url)).await
    }
}

/// Runs `attempt` until it succeeds, fails fatally, or the budget is spent
///
/// The delay is slept only between attempts, so a URL that fails every time
/// sleeps `max_attempts - 1` times.
pub async fn retry_with_policy<F, Fut>(policy: &RetryPolicy, url: &str, mut attempt: F) -> FetchResult
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<FetchedPage, AttemptError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut last_error = String::new();

    for attempt_no in 1..=max_attempts {
        match attempt().await {
            Ok(page) => {
                tracing::debug!(
                    "Fetched {} ({}, {} bytes, attempt {})",
                    page.final_url,
                    page.status_code,
                    page.body.len(),
                    attempt_no
                );
                return FetchResult::Success { body: page.body };
            }
            Err(AttemptError::Retryable(error)) => {
                tracing::warn!(
                    "Network error for {}: {}. Attempt {} of {}",
                    url,
                    error,
                    attempt_no,
                    max_attempts
                );
                last_error = error;
                if attempt_no < max_attempts {
                    tokio::time::sleep(policy.delay).await;
                }
            }
            Err(AttemptError::Fatal(error)) => {
                tracing::warn!("Unexpected error while requesting {}: {}", url, error);
                return FetchResult::Failed {
                    error,
                    attempts: attempt_no,
                };
            }
        }
    }

    FetchResult::Failed {
        error: last_error,
        attempts: max_attempts,
    }
}

/// Performs a single GET request
async fn fetch_once(client: &Client, url: &str) -> Result<FetchedPage, AttemptError> {
    let response = client.get(url).send().await.map_err(classify_error)?;
    let response = response.error_for_status().map_err(classify_error)?;

    let final_url = response.url().to_string();
    let status_code = response.status().as_u16();
    let body = response.text().await.map_err(classify_error)?;

    Ok(FetchedPage {
        final_url,
        status_code,
        body,
    })
}

/// Decides whether a reqwest error is worth retrying
pub fn classify_error(error: reqwest::Error) -> AttemptError {
    if error.is_builder() || error.is_decode() {
        AttemptError::Fatal(error.to_string())
    } else if error.is_timeout() {
        AttemptError::Retryable("Request timeout".to_string())
    } else {
        AttemptError::Retryable(error.to_string())
    }
}
