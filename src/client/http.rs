//! Plain HTTP(S) client.

use reqwest::{Client, Response};

use crate::error::{Error, Result};

/// Thin wrapper over `reqwest::Client` shared by snapshot and attachment fetching.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Build a client sending the given user agent.
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Issue a metadata-only request. The status is left to the caller.
    pub async fn head(&self, url: &str) -> Result<Response> {
        tracing::debug!("HEAD {}", url);
        let response = self.client.head(url).send().await?;
        tracing::debug!("Response status: {}", response.status());
        Ok(response)
    }

    /// GET a resource, failing on any non-success status.
    pub async fn get(&self, url: &str) -> Result<Response> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(Error::Transport {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}
