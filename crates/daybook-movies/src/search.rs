//! Search-as-you-type session.
//!
//! Keystrokes go through a debouncer so only the last query after a quiet
//! period reaches OMDb. Every executed query takes a ticket; a response is
//! applied only while its ticket is still the latest, so a slow response can
//! never overwrite the results of a newer query.

use std::sync::Arc;
use std::time::Duration;

use daybook_core::{Debouncer, Groups, MoviesConfig, RequestSequencer};
use parking_lot::Mutex;
use tokio::runtime::Handle;

use crate::client::{group_by_year, MovieClient};
use crate::types::Movie;

/// What a movie screen renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieSearchState {
    /// Latest text typed, whether or not it has been sent yet
    pub query: String,
    pub results: Vec<Movie>,
    /// Default list shown while `query` is blank
    pub popular: Vec<Movie>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct MovieSearch {
    client: Arc<MovieClient>,
    state: Arc<Mutex<MovieSearchState>>,
    debouncer: Debouncer<String>,
}

impl MovieSearch {
    pub fn new(handle: Handle, client: MovieClient, delay: Duration) -> Self {
        let client = Arc::new(client);
        let state = Arc::new(Mutex::new(MovieSearchState::default()));
        let sequencer = Arc::new(RequestSequencer::new());

        let debouncer = {
            let client = client.clone();
            let state = state.clone();
            Debouncer::new(handle, delay, move |text: String| {
                let client = client.clone();
                let state = state.clone();
                let sequencer = sequencer.clone();
                async move { run_search(&client, &state, &sequencer, text).await }
            })
        };

        Self {
            client,
            state,
            debouncer,
        }
    }

    pub fn from_config(handle: Handle, client: MovieClient, config: &MoviesConfig) -> Self {
        Self::new(
            handle,
            client,
            Duration::from_millis(config.search_debounce_ms),
        )
    }

    /// Record the typed text and schedule a search once typing pauses.
    pub fn set_query(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.lock().query = text.clone();
        self.debouncer.call(text);
    }

    /// Fill the default list. Errors leave it empty.
    pub async fn load_popular(&self) {
        let popular = self.client.popular().await;
        self.state.lock().popular = popular;
    }

    pub fn snapshot(&self) -> MovieSearchState {
        self.state.lock().clone()
    }

    /// Current results grouped by release year.
    pub fn grouped(&self) -> Groups<String, Movie> {
        group_by_year(&self.state.lock().results)
    }

    /// Whether typed text is still waiting out the debounce delay.
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}

async fn run_search(
    client: &MovieClient,
    state: &Mutex<MovieSearchState>,
    sequencer: &RequestSequencer,
    text: String,
) {
    let ticket = sequencer.issue();

    if text.trim().is_empty() {
        let mut state = state.lock();
        state.results.clear();
        state.error = None;
        state.loading = false;
        return;
    }

    {
        let mut state = state.lock();
        state.loading = true;
        state.error = None;
    }

    let result = client.search(&text).await;

    let mut state = state.lock();
    sequencer.apply_if_latest(ticket, || {
        state.loading = false;
        match result.into_result() {
            Ok(movies) => {
                state.results = movies;
                state.error = None;
            }
            Err(e) => {
                state.results.clear();
                state.error = Some(e);
            }
        }
    });
}
