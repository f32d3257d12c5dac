//! Movie search for Daybook
//!
//! OMDb title search, the default "popular" list, grouping by year, and a
//! debounced search session that ignores stale responses.

pub mod client;
pub mod search;
pub mod types;

pub use client::{group_by_year, MovieClient};
pub use search::{MovieSearch, MovieSearchState};
pub use types::Movie;
