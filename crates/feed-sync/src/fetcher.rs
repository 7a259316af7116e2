//! The transport seam between resync and the network.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Result, SyncError};

/// Default per-feed timeout in seconds. A slow or dead feed must not hold
/// up the other feeds in the cycle.
pub const FEED_TIMEOUT_SECS: u64 = 20;

/// Fetches one feed body.
///
/// Object-safe so the sync service can hold any transport: live HTTP, a
/// fixture file, a test double.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Live HTTP transport with a per-request timeout.
pub struct HttpFeedFetcher {
    client: reqwest::Client,
}

impl HttpFeedFetcher {
    /// Build a fetcher with the default feed timeout.
    ///
    /// # Errors
    /// Returns `SyncError::Client` when the underlying client cannot be
    /// constructed.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(FEED_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("stay-core/0.1.0")
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| fetch_error(url, &e))?;
        response.text().await.map_err(|e| fetch_error(url, &e))
    }
}

fn fetch_error(url: &str, error: &reqwest::Error) -> SyncError {
    SyncError::Fetch {
        url: url.to_string(),
        reason: error.to_string(),
    }
}
