//! HTTP client for the food catalogue endpoint.

use crate::catalogue::models::{Item, parse_items};
use crate::config::Config;
use crate::error::{FoodyError, Result};
use reqwest::Client;
use std::time::Duration;

/// Catalogue endpoint client.
///
/// Issues a single unauthenticated `GET` to the configured base URL.
#[derive(Debug, Clone)]
pub struct CatalogueClient {
    /// HTTP client for API requests
    client: Client,
    /// Catalogue base URL (also the image host)
    base_url: String,
}

impl CatalogueClient {
    /// Create a new catalogue client from configuration.
    ///
    /// # Arguments
    /// * `config` - Application configuration
    ///
    /// # Returns
    /// * `Result<CatalogueClient>` - New client or error
    ///
    /// # Details
    /// Fails when the base URL is empty or not an http(s) URL.
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(FoodyError::Config(format!(
                "base_url must be an http(s) URL, got {:?}",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Base URL the catalogue is fetched from.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch and normalize the catalogue.
    ///
    /// # Returns
    /// * `Result<Vec<Item>>` - Items in response order or error
    ///
    /// # Details
    /// Network errors, non-success statuses and bodies that are not a JSON
    /// array are all errors. There is no retry.
    pub async fn fetch_items(&self) -> Result<Vec<Item>> {
        tracing::debug!(url = %self.base_url, "fetching catalogue");

        let response = self.client.get(&self.base_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FoodyError::Status { status, body });
        }

        let body = response.text().await?;
        let items = parse_items(&body)?;
        tracing::info!(count = items.len(), "catalogue fetched");
        Ok(items)
    }
}
