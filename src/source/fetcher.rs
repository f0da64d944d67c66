//! Fetcher trait and the reqwest-backed implementation

use crate::error::FetchError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Fetch a named resource from the upstream API
///
/// Implementations own transport, credentials and timeout policy. Retries
/// are not part of the contract: a failed fetch is terminal for that call.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, resource: &str) -> Result<Value, FetchError>;
}

/// HTTP fetcher issuing `GET {base_url}/{resource}`
///
/// Attaches `Authorization: Bearer <token>` when a token is configured.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(
        base_url: impl Into<String>,
        auth_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            auth_token,
            timeout,
        })
    }

    pub fn url_for(&self, resource: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            resource.trim_start_matches('/')
        )
    }

    fn transport_error(&self, resource: &str, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                resource: resource.to_string(),
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            FetchError::Transport {
                resource: resource.to_string(),
                cause: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, resource: &str) -> Result<Value, FetchError> {
        let url = self.url_for(resource);
        let mut request = self.client.get(&url);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(resource, e))?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                resource: resource.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                self.transport_error(resource, e)
            } else {
                FetchError::Decode {
                    resource: resource.to_string(),
                    cause: e.to_string(),
                }
            }
        })
    }
}
