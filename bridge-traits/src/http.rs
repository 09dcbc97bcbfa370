//! HTTP transport contract
//!
//! The catalog connectors talk to their upstream APIs only through
//! [`HttpClient`]. Status codes come back untouched: a 404 or a 429 is an
//! `Ok(HttpResponse)`, and classifying it is the connector's job. Only
//! transport failures (connect errors, timeouts) are `Err`.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{BridgeError, Result};

/// The verbs the catalog APIs need
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Bytes>,
    /// Per-request timeout, overriding the client default
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn bearer_token(self, token: impl Into<String>) -> Self {
        self.header("Authorization", format!("Bearer {}", token.into()))
    }

    /// Serialize `body` as the JSON payload.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let payload = serde_json::to_vec(body)
            .map_err(|e| BridgeError::OperationFailed(format!("Failed to encode JSON body: {}", e)))?;
        self.body = Some(Bytes::from(payload));
        Ok(self.header("Content-Type", "application/json"))
    }

    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| BridgeError::OperationFailed(format!("Failed to decode JSON body: {}", e)))
    }

    /// Body as lossy UTF-8, for error messages
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// `Retry-After` in whole seconds. HTTP-date values are ignored.
    pub fn retry_after_seconds(&self) -> Option<u64> {
        self.header("Retry-After")
            .and_then(|value| value.trim().parse().ok())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Retries for transport failures only. HTTP statuses never trigger them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts including the first
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// A single attempt
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Exponential delay before the given retry (1-based), capped
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
        }
    }
}

/// Async HTTP transport.
///
/// Implementations own connection pooling and TLS. They must hand back
/// non-2xx responses as `Ok` so callers can classify them.
///
/// ```ignore
/// use bridge_traits::http::{HttpClient, HttpRequest};
///
/// async fn playlist_page(client: &dyn HttpClient, url: String) -> Result<String> {
///     let response = client.execute(HttpRequest::get(url)).await?;
///     Ok(response.text_lossy())
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send one request.
    ///
    /// # Errors
    ///
    /// Only transport failures: connection refused, DNS, TLS, timeout.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Send one request, retrying transport failures per `policy`.
    ///
    /// The default ignores the policy; clients that can retry override it.
    async fn execute_with_retry(
        &self,
        request: HttpRequest,
        policy: RetryPolicy,
    ) -> Result<HttpResponse> {
        let _ = policy;
        self.execute(request).await
    }
}
