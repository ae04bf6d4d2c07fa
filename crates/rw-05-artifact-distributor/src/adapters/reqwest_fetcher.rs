//! # Reqwest HTTP Adapter

use async_trait::async_trait;
use reqwest::Client;
use shared_types::TransportError;
use std::time::Duration;

use crate::ports::{HttpFetcher, HttpResponse};

/// [`HttpFetcher`] over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
    timeout: Duration,
}

impl ReqwestFetcher {
    /// Create a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;
        Ok(Self { client, timeout })
    }

    fn map_error(&self, url: &str, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout {
                endpoint: url.to_string(),
                after_ms: self.timeout.as_millis() as u64,
            }
        } else {
            TransportError::Unreachable {
                endpoint: url.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_error(url, e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Decode {
                endpoint: url.to_string(),
                reason: format!("Error reading response bytes: {e}"),
            })?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}
