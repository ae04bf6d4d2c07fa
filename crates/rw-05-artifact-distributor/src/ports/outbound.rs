//! # Outbound Ports
//!
//! Plain HTTP GET against mirrors and the fallback repository.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::TransportError;
use std::collections::HashMap;
use std::time::Duration;

/// A fully read HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// 200 response with `body`.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP access - outbound port.
///
/// Implementations return `Ok` for any response that arrived, whatever its
/// status; only connection and body-read failures are errors.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// GET `url` and read the whole body.
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Scripted reply for one URL.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Answer with this response.
    Respond(HttpResponse),
    /// Fail with a connection error.
    Unreachable,
    /// Sleep before answering 200 with an empty body.
    Stall(Duration),
}

/// Mock fetcher answering from a URL table; unknown URLs get a 404.
#[derive(Debug, Default)]
pub struct MockHttpFetcher {
    replies: Mutex<HashMap<String, MockReply>>,
    requests: Mutex<Vec<String>>,
}

impl MockHttpFetcher {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the reply for `url`.
    pub fn reply(&self, url: impl Into<String>, reply: MockReply) {
        self.replies.lock().insert(url.into(), reply);
    }

    /// Answer `url` with 200 and `body`.
    pub fn serve(&self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.reply(url, MockReply::Respond(HttpResponse::ok(body)));
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl HttpFetcher for MockHttpFetcher {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(url.to_string());
        let reply = self.replies.lock().get(url).cloned();

        match reply {
            Some(MockReply::Respond(response)) => Ok(response),
            Some(MockReply::Unreachable) => Err(TransportError::Unreachable {
                endpoint: url.to_string(),
                reason: "Mock failure".to_string(),
            }),
            Some(MockReply::Stall(delay)) => {
                tokio::time::sleep(delay).await;
                Ok(HttpResponse::ok(Vec::new()))
            }
            None => Ok(HttpResponse {
                status: 404,
                body: b"Not Found".to_vec(),
            }),
        }
    }
}
