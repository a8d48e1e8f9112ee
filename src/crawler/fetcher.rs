//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester:
//! - Building HTTP clients with proper user agent strings
//! - GET requests returning the page body
//! - Fail-fast classification of non-success responses
//!
//! There is no retry logic. A single failed request aborts the run.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::HarvestError;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

/// Anything that can turn a URL into a page body
///
/// Implementations must fail on any non-success response instead of returning
/// a partial or error page.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, HarvestError>> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `crawler` - Timeouts are taken from the crawler configuration
///
/// # Example
///
/// ```no_run
/// use listing_harvester::config::{CrawlerConfig, UserAgentConfig};
/// use listing_harvester::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed [`PageFetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher with a client configured from `user_agent` and `crawler`
    pub fn from_config(
        user_agent: &UserAgentConfig,
        crawler: &CrawlerConfig,
    ) -> Result<Self, HarvestError> {
        Ok(Self::new(build_http_client(user_agent, crawler)?))
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, HarvestError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| HarvestError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| HarvestError::Http {
            url: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&UserAgentConfig::default(), &CrawlerConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_user_agent_without_contact() {
        let ua = UserAgentConfig {
            crawler_name: "TestHarvester".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: None,
            contact_email: None,
        };
        assert_eq!(ua.header_value(), "TestHarvester/1.0");
    }

    #[test]
    fn test_user_agent_format() {
        let ua = UserAgentConfig {
            crawler_name: "TestHarvester".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: Some("https://example.com/about".to_string()),
            contact_email: Some("admin@example.com".to_string()),
        };
        assert_eq!(
            ua.header_value(),
            "TestHarvester/1.0 (+https://example.com/about; admin@example.com)"
        );
    }

    // Status handling is covered with wiremock in the integration tests
}
