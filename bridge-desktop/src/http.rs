//! Reqwest-backed [`HttpClient`]

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy},
};
use core_async::time::sleep;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("playlist-bridge/", env!("CARGO_PKG_VERSION"));

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Production transport for the catalog connectors.
///
/// Pools connections per host and speaks TLS through rustls. Connect and
/// timeout failures are retried per [`RetryPolicy`]; every HTTP response,
/// 429 included, goes straight back to the connector.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| BridgeError::NotAvailable(format!("reqwest client: {}", e)))?;

        Ok(Self { client })
    }

    fn method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }

    fn prepare(&self, request: &HttpRequest) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(Self::method(request.method), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        builder
    }

    async fn read_response(response: reqwest::Response) -> Result<HttpResponse> {
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(|e| transport_error(&e))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn transport_error(error: &reqwest::Error) -> BridgeError {
    if error.is_timeout() {
        BridgeError::Timeout(error.to_string())
    } else if error.is_connect() {
        BridgeError::OperationFailed(format!("Connection failed: {}", error))
    } else {
        BridgeError::OperationFailed(error.to_string())
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.execute_with_retry(request, RetryPolicy::none()).await
    }

    async fn execute_with_retry(
        &self,
        request: HttpRequest,
        policy: RetryPolicy,
    ) -> Result<HttpResponse> {
        let max_attempts = policy.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            debug!(attempt, max_attempts, method = ?request.method, "Sending HTTP request");

            let error = match self.prepare(&request).send().await {
                Ok(response) => return Self::read_response(response).await,
                Err(e) => transport_error(&e),
            };

            if attempt == max_attempts {
                warn!(attempt, error = %error, "HTTP transport failed, giving up");
                return Err(error);
            }

            let delay = policy.delay_for(attempt);
            warn!(
                attempt,
                error = %error,
                delay_ms = delay.as_millis() as u64,
                "HTTP transport failed, retrying"
            );
            sleep(delay).await;
        }

        Err(BridgeError::OperationFailed(
            "HTTP retry loop ended without an attempt".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_builds() {
        assert!(ReqwestHttpClient::new().is_ok());
    }

    #[test]
    fn test_method_mapping() {
        assert_eq!(ReqwestHttpClient::method(HttpMethod::Get), reqwest::Method::GET);
        assert_eq!(ReqwestHttpClient::method(HttpMethod::Post), reqwest::Method::POST);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let client = ReqwestHttpClient::with_timeout(Duration::from_millis(200)).unwrap();
        let request = HttpRequest::get("http://127.0.0.1:9/playlistItems");

        let result = client
            .execute_with_retry(
                request,
                RetryPolicy {
                    max_attempts: 2,
                    base_delay: Duration::from_millis(1),
                    max_delay: Duration::from_millis(1),
                },
            )
            .await;

        assert!(result.is_err());
    }

    #[test]
    fn test_user_agent_names_product() {
        assert!(USER_AGENT.starts_with("playlist-bridge/"));
    }
}
