use crate::config::ScraperConfig;
use crate::error::RequestError;
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::debug;

/// Thin wrapper over a pooled `reqwest::Client`. One GET per call, no retries.
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { inner })
    }

    /// Fetch a URL as text. Any non-2xx status is an error.
    pub async fn get_text(&self, url: &str) -> Result<String, RequestError> {
        debug!("GET {}", url);

        let resp = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|source| RequestError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RequestError::Status {
                url: url.to_string(),
                status,
            });
        }

        let text = resp.text().await.map_err(|source| RequestError::Body {
            url: url.to_string(),
            source,
        })?;

        debug!("{} -> {} ({} bytes)", url, status, text.len());
        Ok(text)
    }
}
