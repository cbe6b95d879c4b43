//! Remote tile retrieval.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tile_common::{TileError, TileResult};
use tracing::{debug, instrument};

/// Source of encoded tile images.
#[async_trait]
pub trait TileFetcher: Send + Sync {
    /// Fetch the image at `url`. Any transport failure, timeout or
    /// non-success status is reported as `ImageFetchFailed`.
    async fn fetch(&self, url: &str) -> TileResult<Bytes>;
}

/// HTTP fetcher backed by a shared `reqwest` client.
pub struct HttpTileFetcher {
    client: Client,
}

impl HttpTileFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .user_agent(concat!("tile-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl TileFetcher for HttpTileFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> TileResult<Bytes> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TileError::ImageFetchFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TileError::ImageFetchFailed(format!(
                "HTTP {} from {}",
                status, url
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TileError::ImageFetchFailed(e.to_string()))?;

        debug!(bytes = body.len(), "Fetched tile");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_failure() {
        let fetcher = HttpTileFetcher::new(Duration::from_millis(500)).unwrap();
        let result = fetcher.fetch("http://127.0.0.1:1/tile.png").await;
        assert!(matches!(result, Err(TileError::ImageFetchFailed(_))));
    }

    #[tokio::test]
    async fn test_malformed_url_is_fetch_failure() {
        let fetcher = HttpTileFetcher::new(Duration::from_secs(1)).unwrap();
        let result = fetcher.fetch("not a url").await;
        assert!(matches!(result, Err(TileError::ImageFetchFailed(_))));
    }
}
