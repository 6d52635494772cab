//! # NASA APOD Client Module
//!
//! Client for the NASA Astronomy Picture of the Day endpoint. Returns the
//! dated content item used as the source of a publication; any transport
//! error or non-success status is a hard failure for that call, no retries.

use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info};

use crate::errors::PublishError;

/// Default NASA API base URL
const DEFAULT_API_BASE: &str = "https://api.nasa.gov";

/// One day's content item as returned by the APOD endpoint
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ApodItem {
    pub explanation: String,
    pub url: String,
    /// High-resolution image URL, absent for non-image items
    pub hdurl: Option<String>,
    pub media_type: String,
    pub title: String,
    pub date: String,
}

/// Client for the daily picture endpoint
pub struct ApodClient {
    client: Client,
    api_key: String,
    /// Base URL for the API (overridable for testing)
    api_base: String,
}

impl ApodClient {
    /// Create a new client with the given API key
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_API_BASE.to_string())
    }

    /// Create a new client with a custom base URL (for testing)
    pub fn with_base_url(api_key: String, api_base: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_base,
        }
    }

    /// Fetch the content item for the given `YYYY-MM-DD` date
    pub async fn fetch(&self, date: &str) -> Result<ApodItem, PublishError> {
        info!(date = %date, "Requesting daily item from the NASA API");

        let url = format!("{}/planetary/apod", self.api_base);
        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("date", date)])
            .send()
            .await
            .map_err(|e| PublishError::ContentFetch(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "NASA API returned a failure status");
            return Err(PublishError::ContentFetch(format!("HTTP {status}: {body}")));
        }

        let item: ApodItem = response
            .json()
            .await
            .map_err(|e| PublishError::ContentFetch(format!("failed to parse response: {e}")))?;

        info!(date = %item.date, media_type = %item.media_type, "Retrieved daily item");
        Ok(item)
    }
}
