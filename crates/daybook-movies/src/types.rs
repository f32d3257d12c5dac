use serde::{Deserialize, Serialize};

/// Placeholder OMDb uses for missing fields.
pub const NOT_AVAILABLE: &str = "N/A";

/// One hit from an OMDb search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: String,
    /// "movie", "series" or "episode"
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
}

impl Movie {
    /// Poster URL, or `None` when OMDb has no poster.
    pub fn poster_url(&self) -> Option<&str> {
        match self.poster.as_str() {
            "" | NOT_AVAILABLE => None,
            url => Some(url),
        }
    }
}

/// Raw search response. `Response` is the string "True" or "False".
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Search", default)]
    pub search: Option<Vec<Movie>>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn is_failure(&self) -> bool {
        self.response == "False"
    }
}
