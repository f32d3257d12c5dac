//! Single-attempt HTTP fetch that folds every failure into its result.
//!
//! Callers never see an `Err` from this module: transport failures, non-2xx
//! statuses and undecodable bodies all end up in [`FetchResult::error`] as a
//! message ready for inline display. Requests are never retried.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::HttpConfig;
use crate::error::{NetworkError, ReqwestErrorExt};

const USER_AGENT: &str = concat!("Daybook/", env!("CARGO_PKG_VERSION"));

/// Outcome of a fetch: data or error once settled, `loading` while in flight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchResult<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> FetchResult<T> {
    /// In-flight placeholder.
    pub fn pending() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }

    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            loading: false,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            data: None,
            loading: false,
            error: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        !self.loading && self.data.is_some() && self.error.is_none()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchResult<U> {
        FetchResult {
            data: self.data.map(f),
            loading: self.loading,
            error: self.error,
        }
    }

    /// Collapse into a `Result`. A still-loading value reads as an error.
    pub fn into_result(self) -> Result<T, String> {
        match (self.data, self.error) {
            (_, Some(error)) => Err(error),
            (Some(data), None) => Ok(data),
            (None, None) if self.loading => Err("Request still in progress".to_string()),
            (None, None) => Err("Something went wrong".to_string()),
        }
    }
}

/// Shared HTTP client issuing one-shot JSON GETs.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Arc<Client>,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| NetworkError::ConnectionFailed(e.to_string()))?;

        Ok(Self::with_client(client))
    }

    pub fn from_config(config: &HttpConfig) -> Result<Self, NetworkError> {
        Self::new(Duration::from_secs(config.timeout_secs))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Fetch `url` and return the parsed JSON body.
    pub async fn api_fetch(&self, url: &str) -> FetchResult<Value> {
        self.fetch_json(url, &[]).await
    }

    /// Fetch `url` with `query` parameters and decode the body as `T`.
    ///
    /// Query values are kept out of the logs since they carry API keys.
    #[tracing::instrument(skip(self, query), level = "debug")]
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> FetchResult<T> {
        match self.get_json(url, query).await {
            Ok(data) => FetchResult::success(data),
            Err(e) => {
                tracing::warn!("Fetch failed: {}", e);
                FetchResult::failure(e.to_string())
            }
        }
    }

    /// Like `fetch_json`, but keeps the typed error so callers can inspect
    /// API error bodies.
    ///
    /// # Errors
    /// Returns the `NetworkError` for transport failures, non-2xx statuses
    /// (with the response body) and undecodable bodies.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, NetworkError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NetworkError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        serde_json::from_slice(&body).map_err(|e| NetworkError::InvalidResponse(e.to_string()))
    }
}
