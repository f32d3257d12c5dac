//! WeatherAPI.com current-conditions client.

use daybook_core::{FetchResult, HttpFetcher, NetworkError, WeatherConfig, WeatherError};

use crate::types::{ApiErrorBody, WeatherQuery, WeatherReport};

/// WeatherAPI error code for "No matching location found."
const NO_MATCHING_LOCATION: u32 = 1006;

#[derive(Debug, Clone)]
pub struct WeatherClient {
    fetcher: HttpFetcher,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(fetcher: HttpFetcher, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(fetcher: HttpFetcher, config: &WeatherConfig) -> Self {
        Self::new(fetcher, config.base_url.clone(), config.resolved_api_key())
    }

    /// Fetch current conditions. One attempt; failures land in `error`.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn current(&self, query: &WeatherQuery) -> FetchResult<WeatherReport> {
        if self.api_key.is_empty() {
            return FetchResult::failure(WeatherError::MissingApiKey.to_string());
        }

        let url = format!("{}/current.json", self.base_url.trim_end_matches('/'));
        let q = query.as_param();
        let result = self
            .fetcher
            .get_json::<WeatherReport>(
                &url,
                &[("key", self.api_key.as_str()), ("q", q.as_str()), ("aqi", "no")],
            )
            .await;

        match result {
            Ok(report) => {
                tracing::info!("Weather for {}: {}", report.location.name, report.current.condition.text);
                FetchResult::success(report)
            }
            Err(e) => {
                let err = classify(e);
                tracing::warn!("Weather lookup failed: {}", err);
                FetchResult::failure(err.to_string())
            }
        }
    }
}

/// Prefer WeatherAPI's own explanation over the bare HTTP status.
fn classify(err: NetworkError) -> WeatherError {
    match err.body_json::<ApiErrorBody>() {
        Some(body) if body.error.code == NO_MATCHING_LOCATION => {
            WeatherError::LocationNotFound(body.error.message)
        }
        Some(body) => WeatherError::ApiError(body.error.message),
        None => WeatherError::Network(err),
    }
}
