//! HTTP plumbing shared by the tier-sheet, game-data, avatar and roster fetches.

pub mod alternates;

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::Config;

pub use alternates::{alternate_url, fetch_in_order, fetch_via_alternates, shuffle_alternates};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(
        "all {attempts} alternate source(s) failed to connect; the network is likely blocking them"
    )]
    ConnectivityRestricted { attempts: usize },
    #[error("all {attempts} alternate source(s) failed; last error: {last}")]
    AlternatesExhausted {
        attempts: usize,
        last: Box<FetchError>,
    },
    #[error("no alternate sources configured")]
    NoAlternates,
}

impl FetchError {
    /// Network-level failure, as opposed to a server answering with an error status.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::ConnectivityRestricted { .. }
        )
    }
}

/// Thin wrapper over a shared reqwest client. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.user_agent, Duration::from_secs(config.timeout_secs))
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        tracing::debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response)
    }

    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.get(url).await?;
        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;
        Ok(body.to_vec())
    }

    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get(url).await?;
        response
            .text()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let body = self.get_bytes(url).await?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
