use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::error::{BridgeError, Result};

/// Per-request timeout for API calls
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Bearer-authenticated JSON client shared by the Graph and Sheets readers
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
    access_token: String,
}

impl ApiClient {
    pub fn new(base_url: &str, access_token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        // Ensure URL ends with / so segments append instead of replacing
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&base_url)
            .map_err(|e| BridgeError::config(format!("Invalid API base URL '{}': {}", base_url, e)))?;

        Ok(Self {
            client,
            base_url,
            access_token: access_token.into(),
        })
    }

    /// Build an endpoint URL from raw path segments. Each segment is
    /// percent-encoded on its own, so ids and sheet names may contain
    /// spaces or non-ASCII characters.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BridgeError::config(format!("API base URL '{}' cannot take a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {}", url);

        let response = self.client
            .get(url)
            .header("Accept", "application/json")
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BridgeError::Transport { status, body });
        }

        Ok(response.json::<T>().await?)
    }
}
