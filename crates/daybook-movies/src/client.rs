//! OMDb search client.

use daybook_core::{group_by, FetchResult, Groups, HttpFetcher, MovieError, MoviesConfig};

use crate::types::{Movie, SearchResponse};

const NO_MOVIES_FOUND: &str = "No movies found";

#[derive(Debug, Clone)]
pub struct MovieClient {
    fetcher: HttpFetcher,
    base_url: String,
    api_key: String,
    popular_query: String,
}

impl MovieClient {
    pub fn new(fetcher: HttpFetcher, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            api_key: api_key.into(),
            popular_query: "avengers".to_string(),
        }
    }

    pub fn from_config(fetcher: HttpFetcher, config: &MoviesConfig) -> Self {
        Self::new(fetcher, config.base_url.clone(), config.resolved_api_key())
            .with_popular_query(config.popular_query.clone())
    }

    pub fn with_popular_query(mut self, query: impl Into<String>) -> Self {
        self.popular_query = query.into();
        self
    }

    /// Search titles matching `text`.
    ///
    /// Blank text succeeds with no results and sends nothing. An OMDb
    /// "Response": "False" becomes an error carrying OMDb's message, as does
    /// an error status whose body carries one (OMDb answers a bad key with
    /// 401 and `{"Response":"False","Error":"Invalid API key!"}`).
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn search(&self, text: &str) -> FetchResult<Vec<Movie>> {
        if text.trim().is_empty() {
            return FetchResult::success(Vec::new());
        }
        if self.api_key.is_empty() {
            return FetchResult::failure(MovieError::MissingApiKey.to_string());
        }

        let result = self
            .fetcher
            .get_json::<SearchResponse>(
                &self.base_url,
                &[("apikey", self.api_key.as_str()), ("s", text)],
            )
            .await;

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                let err = match e.body_json::<SearchResponse>().and_then(|r| r.error) {
                    Some(message) => MovieError::ApiError(message),
                    None => MovieError::Network(e),
                };
                tracing::warn!("Movie search failed: {}", err);
                return FetchResult::failure(err.to_string());
            }
        };

        if resp.is_failure() {
            let message = resp.error.unwrap_or_else(|| NO_MOVIES_FOUND.to_string());
            tracing::debug!("OMDb returned no results: {}", message);
            return FetchResult::failure(MovieError::NoResults(message).to_string());
        }

        let movies = resp.search.unwrap_or_default();
        tracing::info!("Found {} movie(s)", movies.len());
        FetchResult::success(movies)
    }

    /// Default list shown before the user searches. Failures yield an empty list.
    pub async fn popular(&self) -> Vec<Movie> {
        let result = self.search(&self.popular_query).await;
        match result.into_result() {
            Ok(movies) => movies,
            Err(e) => {
                tracing::warn!("Failed to load popular movies: {}", e);
                Vec::new()
            }
        }
    }
}

/// Group movies by their `Year` field, in first-appearance order.
pub fn group_by_year(movies: &[Movie]) -> Groups<String, Movie> {
    group_by(movies.iter().cloned(), |m| m.year.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn movie(title: &str, year: &str) -> Movie {
        Movie {
            title: title.to_string(),
            year: year.to_string(),
            kind: "movie".to_string(),
            poster: "N/A".to_string(),
            imdb_id: format!("tt-{title}"),
        }
    }

    #[test]
    fn test_group_by_year_preserves_order() {
        let movies = vec![
            movie("Avengers", "2012"),
            movie("Endgame", "2019"),
            movie("Age of Ultron", "2015"),
            movie("Assemble", "2012"),
        ];

        let groups = group_by_year(&movies);
        let years: Vec<_> = groups.keys().cloned().collect();
        assert_eq!(years, vec!["2012", "2019", "2015"]);

        let titles: Vec<_> = groups
            .get_or_empty(&"2012".to_string())
            .iter()
            .map(|m| m.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Avengers", "Assemble"]);
    }

    #[tokio::test]
    async fn test_blank_search_sends_nothing() {
        let fetcher = HttpFetcher::new(Duration::from_secs(1)).unwrap();
        let client = MovieClient::new(fetcher, "http://127.0.0.1:1/", "key");

        let result = client.search("   ").await;
        assert!(result.is_success());
        assert!(result.data.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_key() {
        let fetcher = HttpFetcher::new(Duration::from_secs(1)).unwrap();
        let client = MovieClient::new(fetcher, "http://127.0.0.1:1/", "");

        let result = client.search("alien").await;
        assert_eq!(result.error.as_deref(), Some("Missing API key"));
    }
}
