//! Single-attempt HTTP GET

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use thiserror::Error;

const USER_AGENT: &str = concat!("deezer-rs/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NetworkFailure {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("response carried no data")]
    NoData,
}

/// Issues exactly one GET per call and resolves with the response body.
///
/// Dropping the returned future cancels the request; nothing is delivered
/// afterwards.
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, NetworkFailure>;
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// `timeout` of `None` keeps the transport's default
    pub fn new(timeout: Option<Duration>) -> Result<Self, NetworkFailure> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| NetworkFailure::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, NetworkFailure> {
        tracing::trace!(%url, "GET");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| NetworkFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%url, %status, "Unexpected HTTP status");
            return Err(NetworkFailure::Transport(format!("unexpected HTTP status {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| NetworkFailure::Transport(e.to_string()))?;

        if body.is_empty() {
            return Err(NetworkFailure::NoData);
        }

        Ok(body.to_vec())
    }
}
